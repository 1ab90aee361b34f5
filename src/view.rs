use std::fmt::Write as _;
use std::time::Duration;

use crate::forms::FormErrors;
use crate::models::{ChatMessage, Conversation, User, UserId};
use crate::store::ChatStore;

pub const DEFAULT_AVATAR_COLOR: &str = "#FF5E5B";
pub const SELECT_ROOM_PLACEHOLDER: &str = "Select a chat room...";
pub const LOAD_ROOMS_FAILED: &str = "Error loading rooms";

/// How long a notification banner stays visible. Expiry is the caller's
/// concern; the renderer only produces the fragment.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Error,
    Success,
}

impl NotificationLevel {
    fn class(self) -> &'static str {
        match self {
            NotificationLevel::Error => "error",
            NotificationLevel::Success => "success",
        }
    }
}

/// Escapes user-controlled text for both element and attribute positions.
/// Every interpolation below goes through this; none of the payloads coming
/// off the socket or the API can be trusted as markup.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn avatar_color(color: Option<&str>) -> String {
    escape_html(color.unwrap_or(DEFAULT_AVATAR_COLOR))
}

pub fn user_card(user: &User) -> String {
    format!(
        concat!(
            "<div class=\"user-card\">",
            "<div class=\"user-avatar\" style=\"background-color: {color}\">{initials}</div>",
            "<div class=\"user-info\"><h3>{name}</h3><p>{email}</p></div>",
            "</div>"
        ),
        color = avatar_color(user.color.as_deref()),
        initials = escape_html(&user.initials()),
        name = escape_html(&user.full_name()),
        email = escape_html(&user.email),
    )
}

/// Full roster rebuild from the store snapshot.
pub fn roster(store: &ChatStore) -> String {
    let mut out = String::new();
    for user in store.users() {
        out.push_str(&user_card(user));
    }
    out
}

pub fn message_bubble(message: &ChatMessage, user: &User, current: UserId) -> String {
    let own = message.sender == current;
    let display_name = if own {
        "You".to_string()
    } else {
        user.full_name()
    };
    format!(
        concat!(
            "<div class=\"message{own}\">",
            "<div class=\"message-avatar\" style=\"background-color: {color}\">{initials}</div>",
            "<div class=\"message-content\">",
            "<div class=\"message-sender\">{name}</div>",
            "<div class=\"message-text\">{text}</div>",
            "</div></div>"
        ),
        own = if own { " own" } else { "" },
        color = avatar_color(user.color.as_deref()),
        initials = escape_html(&user.initials()),
        name = escape_html(&display_name),
        text = escape_html(&message.text),
    )
}

/// Full message-pane rebuild. A message renders with its embedded sender
/// profile when present, falling back to the roster; messages from senders
/// known neither way stay stored but produce no markup.
pub fn message_pane(store: &ChatStore) -> String {
    let mut out = String::new();
    for message in store.messages() {
        let user = message.user.as_ref().or_else(|| store.user(message.sender));
        if let Some(user) = user {
            out.push_str(&message_bubble(message, user, store.current_user_id()));
        }
    }
    out
}

/// `<option>` list for the room dropdown. The HTTP-loaded page variant leads
/// with a placeholder option; the socket-refresh variant does not.
pub fn conversation_options(conversations: &[Conversation], with_placeholder: bool) -> String {
    let mut out = String::new();
    if with_placeholder {
        let _ = write!(out, "<option value=\"\">{SELECT_ROOM_PLACEHOLDER}</option>");
    }
    for conv in conversations {
        let _ = write!(
            out,
            "<option value=\"{id}\">{label}</option>",
            id = conv.id,
            label = escape_html(&conv.label()),
        );
    }
    out
}

pub fn load_rooms_failed_option() -> String {
    format!("<option value=\"\">{LOAD_ROOMS_FAILED}</option>")
}

pub fn notification(text: &str, level: NotificationLevel) -> String {
    format!(
        "<div class=\"notifier {} show\">{}</div>",
        level.class(),
        escape_html(text),
    )
}

/// Inline error list consumed by the auth pages. Field-scoped entries carry
/// their field name as a data attribute; `detail` and `non_field_errors`
/// render unanchored.
pub fn form_errors(errors: &FormErrors) -> String {
    let mut out = String::new();
    for (field, messages) in errors.iter() {
        let joined = escape_html(&messages.join(", "));
        if field == "detail" || field == "non_field_errors" {
            let _ = write!(out, "<div class=\"error-message\">{joined}</div>");
        } else {
            let _ = write!(
                out,
                "<div class=\"error-message\" data-field=\"{}\">{joined}</div>",
                escape_html(field),
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: UserId, first: &str, last: &str) -> User {
        User {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{first}@example.com"),
            color: None,
        }
    }

    #[test]
    fn escapes_markup_in_message_text() {
        let sender = user(2, "Mallory", "M");
        let message = ChatMessage {
            sender: 2,
            text: "<script>alert(1)</script>".to_string(),
            user: None,
        };
        let html = message_bubble(&message, &sender, 1);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn escapes_attribute_position_color() {
        let mut u = user(2, "Eve", "E");
        u.color = Some("\" onmouseover=\"alert(1)".to_string());
        let html = user_card(&u);
        assert!(!html.contains("onmouseover=\"alert(1)"));
        assert!(html.contains("&quot;"));
    }

    #[test]
    fn own_message_shows_you() {
        let sender = user(1, "Ada", "Lovelace");
        let message = ChatMessage {
            sender: 1,
            text: "hi".to_string(),
            user: None,
        };
        let html = message_bubble(&message, &sender, 1);
        assert!(html.contains("message own"));
        assert!(html.contains(">You<"));
        assert!(!html.contains("Ada Lovelace</div>"));
    }

    #[test]
    fn foreign_message_shows_full_name() {
        let sender = user(2, "Ada", "Lovelace");
        let message = ChatMessage {
            sender: 2,
            text: "hi".to_string(),
            user: None,
        };
        let html = message_bubble(&message, &sender, 1);
        assert!(!html.contains("own"));
        assert!(html.contains("Ada Lovelace"));
    }

    #[test]
    fn pane_skips_messages_without_any_sender_profile() {
        let mut store = ChatStore::new(1);
        store.replace_users(vec![user(2, "Bo", "Ek")]);
        store.push_message(ChatMessage {
            sender: 2,
            text: "seen".to_string(),
            user: None,
        });
        store.push_message(ChatMessage {
            sender: 42,
            text: "ghost".to_string(),
            user: None,
        });
        let html = message_pane(&store);
        assert!(html.contains("seen"));
        assert!(!html.contains("ghost"));
    }

    #[test]
    fn options_lead_with_placeholder_when_asked() {
        let convs = vec![Conversation {
            id: 5,
            title: Some("general".to_string()),
        }];
        let html = conversation_options(&convs, true);
        assert!(html.starts_with("<option value=\"\">Select a chat room...</option>"));
        assert!(html.contains("<option value=\"5\">general</option>"));
        assert!(!conversation_options(&convs, false).contains(SELECT_ROOM_PLACEHOLDER));
    }

    #[test]
    fn notification_carries_level_class() {
        let html = notification("boom", NotificationLevel::Error);
        assert_eq!(html, "<div class=\"notifier error show\">boom</div>");
    }
}
