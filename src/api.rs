use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::{json, Value};
use thiserror::Error;

use crate::forms::{FormErrors, SignupForm};
use crate::models::Conversation;

pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";

const LOGIN_PATH: &str = "/api/auth/login/";
const REGISTER_PATH: &str = "/api/auth/register/";
const LOGOUT_PATH: &str = "/api/auth/logout/";
const CONVERSATION_PATH: &str = "/api/conversation/";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected request ({status})")]
    Rejected {
        status: StatusCode,
        errors: FormErrors,
    },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// The field-keyed errors the form renderer consumes. Transport and
    /// decode failures collapse into the single generic message; there are
    /// no retries anywhere.
    pub fn form_errors(&self) -> FormErrors {
        match self {
            ApiError::Rejected { errors, .. } => errors.clone(),
            ApiError::Transport(_) | ApiError::Decode(_) => {
                FormErrors::detail(crate::forms::MSG_GENERIC_ERROR)
            }
        }
    }
}

/// JSON gateway to the auth and conversation endpoints. Mutating calls carry
/// `X-CSRFToken`, taken from an explicitly supplied token (the embedded
/// form-field variant) or from the `csrftoken` cookie in the jar.
pub struct ApiClient {
    http: Client,
    jar: Arc<Jar>,
    base: String,
    csrf_override: Option<String>,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());
        let http = Client::builder().cookie_provider(jar.clone()).build()?;
        Ok(ApiClient {
            http,
            jar,
            base: base.into(),
            csrf_override: None,
        })
    }

    #[must_use]
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_override = Some(token.into());
        self
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.post_json(LOGIN_PATH, &json!({ "email": email, "password": password }))
            .await
            .map(|_| ())
    }

    pub async fn register(&self, form: &SignupForm) -> Result<(), ApiError> {
        let body = json!({
            "email": form.email,
            "first_name": form.first_name,
            "last_name": form.last_name,
            "password1": form.password,
            "password2": form.password2,
        });
        self.post_json(REGISTER_PATH, &body).await.map(|_| ())
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.post_json(LOGOUT_PATH, &json!({})).await.map(|_| ())
    }

    pub async fn conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let resp = self.http.get(self.url(CONVERSATION_PATH)).send().await?;
        let body = Self::decode(resp).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn create_conversation(&self, title: &str) -> Result<Conversation, ApiError> {
        let body = self
            .post_json(CONVERSATION_PATH, &json!({ "title": title }))
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }

    fn csrf_token(&self) -> Option<String> {
        if let Some(token) = &self.csrf_override {
            return Some(token.clone());
        }
        let url = Url::parse(&self.base).ok()?;
        let header = self.jar.cookies(&url)?;
        csrf_from_cookie_header(header.to_str().ok()?)
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let mut req = self.http.post(self.url(path)).json(body);
        if let Some(token) = self.csrf_token() {
            req = req.header(CSRF_HEADER, token);
        }
        let resp = req.send().await?;
        Self::decode(resp).await
    }

    async fn decode(resp: Response) -> Result<Value, ApiError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::Rejected {
                status,
                errors: FormErrors::from_json(&body),
            })
        }
    }
}

fn csrf_from_cookie_header(header: &str) -> Option<String> {
    header.split(';').find_map(|cookie| {
        let (name, value) = cookie.trim().split_once('=')?;
        (name == CSRF_COOKIE).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::MSG_GENERIC_ERROR;

    #[test]
    fn csrf_found_among_other_cookies() {
        let header = "sessionid=abc123; csrftoken=tok-456; theme=dark";
        assert_eq!(csrf_from_cookie_header(header), Some("tok-456".to_string()));
        assert_eq!(csrf_from_cookie_header("sessionid=abc123"), None);
    }

    #[test]
    fn explicit_token_wins_over_jar() {
        let client = ApiClient::new("http://127.0.0.1:8000")
            .expect("client builds")
            .with_csrf_token("from-form-field");
        assert_eq!(client.csrf_token(), Some("from-form-field".to_string()));
    }

    #[test]
    fn rejection_exposes_field_errors_and_transport_is_generic() {
        let rejected = ApiError::Rejected {
            status: StatusCode::BAD_REQUEST,
            errors: FormErrors::field("email", "taken"),
        };
        assert_eq!(
            rejected.form_errors().get("email"),
            Some(&["taken".to_string()][..])
        );

        let decode = ApiError::Decode(serde_json::from_str::<Value>("{").unwrap_err());
        assert_eq!(
            decode.form_errors().get("detail"),
            Some(&[MSG_GENERIC_ERROR.to_string()][..])
        );
    }
}
