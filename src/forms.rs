use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub const MSG_INVALID_EMAIL: &str = "Please enter a valid email address.";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long.";
pub const MSG_FIRST_NAME_TOO_SHORT: &str = "First name must be at least 2 characters long.";
pub const MSG_LAST_NAME_TOO_SHORT: &str = "Last name must be at least 2 characters long.";
pub const MSG_PASSWORDS_DIFFER: &str = "Passwords do not match.";
pub const MSG_GENERIC_ERROR: &str = "An error occurred. Please try again.";

const MIN_PASSWORD_LEN: usize = 8;
const MIN_NAME_LEN: usize = 2;

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email pattern"));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

/// Field-keyed error messages, as rendered inline under the form. The flat
/// variant lives under the `detail` key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn field(name: &str, message: &str) -> Self {
        let mut errors = FormErrors::default();
        errors.push(name, message);
        errors
    }

    pub fn detail(message: &str) -> Self {
        FormErrors::field("detail", message)
    }

    pub fn push(&mut self, name: &str, message: &str) {
        self.0
            .entry(name.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Vec<String>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Folds a rejected-response body into field-keyed errors. Objects map
    /// field -> message(s); a bare array collapses into one `detail` entry;
    /// anything else becomes the generic message.
    pub fn from_json(body: &Value) -> Self {
        match body {
            Value::Object(map) => {
                let mut errors = FormErrors::default();
                for (field, value) in map {
                    match value {
                        Value::Array(items) => {
                            for item in items {
                                errors.push(field, value_as_text(item).as_str());
                            }
                        }
                        other => errors.push(field, value_as_text(other).as_str()),
                    }
                }
                if errors.is_empty() {
                    FormErrors::detail(MSG_GENERIC_ERROR)
                } else {
                    errors
                }
            }
            Value::Array(items) => {
                let joined = items
                    .iter()
                    .map(value_as_text)
                    .collect::<Vec<_>>()
                    .join("\n");
                FormErrors::detail(&joined)
            }
            _ => FormErrors::detail(MSG_GENERIC_ERROR),
        }
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn email_is_valid(email: &str) -> bool {
    !email.is_empty() && EMAIL_SHAPE.is_match(email)
}

/// Field order matters: the first failing check blocks submission and is the
/// only one reported.
pub fn validate_login(form: &LoginForm) -> Result<(), FormErrors> {
    if !email_is_valid(&form.email) {
        return Err(FormErrors::field("email", MSG_INVALID_EMAIL));
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FormErrors::field("password", MSG_PASSWORD_TOO_SHORT));
    }
    Ok(())
}

pub fn validate_signup(form: &SignupForm) -> Result<(), FormErrors> {
    if form.first_name.chars().count() < MIN_NAME_LEN {
        return Err(FormErrors::field("first_name", MSG_FIRST_NAME_TOO_SHORT));
    }
    if form.last_name.chars().count() < MIN_NAME_LEN {
        return Err(FormErrors::field("last_name", MSG_LAST_NAME_TOO_SHORT));
    }
    if !email_is_valid(&form.email) {
        return Err(FormErrors::field("email", MSG_INVALID_EMAIL));
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FormErrors::field("password", MSG_PASSWORD_TOO_SHORT));
    }
    if form.password != form.password2 {
        return Err(FormErrors::field("password2", MSG_PASSWORDS_DIFFER));
    }
    Ok(())
}
