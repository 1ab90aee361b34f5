use log::error;

use crate::api::{ApiClient, ApiError};
use crate::forms::{validate_login, validate_signup, FormErrors, LoginForm, SignupForm};

pub const SELECT_ROOM_PAGE: &str = "/chat/select_room/";

/// What the page does after a submit: follow a redirect or render the error
/// list inline. Navigation is a value here; the browser side effect is out
/// of scope.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Navigate(String),
    Errors(FormErrors),
}

/// Validate first; a local failure never reaches the network.
pub async fn submit_login(api: &ApiClient, form: &LoginForm) -> SubmitOutcome {
    if let Err(errors) = validate_login(form) {
        return SubmitOutcome::Errors(errors);
    }
    match api.login(&form.email, &form.password).await {
        Ok(()) => SubmitOutcome::Navigate(SELECT_ROOM_PAGE.to_string()),
        Err(e) => rejected(e, "login"),
    }
}

pub async fn submit_signup(api: &ApiClient, form: &SignupForm) -> SubmitOutcome {
    if let Err(errors) = validate_signup(form) {
        return SubmitOutcome::Errors(errors);
    }
    match api.register(form).await {
        Ok(()) => SubmitOutcome::Navigate(SELECT_ROOM_PAGE.to_string()),
        Err(e) => rejected(e, "signup"),
    }
}

fn rejected(e: ApiError, action: &str) -> SubmitOutcome {
    if matches!(e, ApiError::Transport(_) | ApiError::Decode(_)) {
        error!("{action} error: {e}");
    }
    SubmitOutcome::Errors(e.form_errors())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::MSG_PASSWORD_TOO_SHORT;

    #[tokio::test]
    async fn invalid_login_blocks_before_any_network_call() {
        // points at nothing; a network attempt would fail loudly, but the
        // validator short-circuits first
        let api = ApiClient::new("http://127.0.0.1:1").expect("client builds");
        let form = LoginForm {
            email: "a@b.com".to_string(),
            password: "short".to_string(),
        };
        match submit_login(&api, &form).await {
            SubmitOutcome::Errors(errors) => {
                assert_eq!(
                    errors.get("password"),
                    Some(&[MSG_PASSWORD_TOO_SHORT.to_string()][..])
                );
            }
            SubmitOutcome::Navigate(_) => panic!("short password must not submit"),
        }
    }
}
