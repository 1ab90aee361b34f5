use serde::{Deserialize, Serialize};

use crate::models::{ChatMessage, Conversation, User, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Joined,
    Left,
}

/// Inbound envelope on the chat room socket, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "history")]
    History {
        #[serde(default)]
        messages: Vec<ChatMessage>,
    },
    #[serde(rename = "user_list")]
    UserList {
        #[serde(default)]
        users: Vec<User>,
    },
    #[serde(rename = "user_status")]
    UserStatus { status: PresenceStatus, user: User },
    #[serde(rename = "message")]
    Message {
        sender: UserId,
        text: String,
        #[serde(default)]
        user: Option<User>,
    },
    #[serde(rename = "error_message")]
    ErrorMessage { text: String },
    // Catch-all so a new server-side event type never kills the stream
    #[serde(other)]
    Unknown,
}

/// Outbound chat send. No type tag, asymmetric with receive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub text: String,
}

/// Payload pushed on the conversation-list socket of the select-room page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationPush {
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}
