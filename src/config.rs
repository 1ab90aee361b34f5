use std::env;

use crate::models::UserId;

pub const DEFAULT_HTTP_BASE: &str = "http://127.0.0.1:8000";
pub const DEFAULT_WS_URL: &str = "ws://127.0.0.1:8000/ws/chat/1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub http_base: String,
    pub ws_url: String,
    // the current-user identity; there is no fallback, callers must have one
    pub user_id: Option<UserId>,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        ClientConfig {
            http_base: env::var("ROOM_CLIENT_HTTP_BASE")
                .unwrap_or_else(|_| DEFAULT_HTTP_BASE.to_string()),
            ws_url: env::var("ROOM_CLIENT_WS_URL").unwrap_or_else(|_| DEFAULT_WS_URL.to_string()),
            user_id: env::var("ROOM_CLIENT_USER_ID")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }
}
