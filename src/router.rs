use std::time::Duration;

use log::warn;

use crate::messages::{PresenceStatus, ServerEvent};
use crate::models::ChatMessage;
use crate::store::ChatStore;
use crate::view;

/// A full-container rebuild of one DOM region, already rendered. No
/// incremental diffing; expected volumes are tiny.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    Roster(String),
    MessagePane(String),
    MessageAppend(String),
    Notification { html: String, ttl: Duration },
}

/// Applies decoded socket events to the store, one at a time, in delivery
/// order. Exactly one arm fires per event.
#[derive(Debug)]
pub struct EventRouter {
    store: ChatStore,
}

impl EventRouter {
    pub fn new(store: ChatStore) -> Self {
        EventRouter { store }
    }

    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    /// Decodes one raw text frame and routes it. Undecodable frames and
    /// unknown event tags are logged and dropped; they never kill the
    /// stream.
    pub fn handle_raw(&mut self, raw: &str) -> Vec<ViewUpdate> {
        match serde_json::from_str::<ServerEvent>(raw) {
            Ok(ServerEvent::Unknown) => {
                warn!("ignoring unknown event type: {}", event_tag(raw));
                Vec::new()
            }
            Ok(event) => self.handle(event),
            Err(e) => {
                warn!("undecodable socket frame: {e}");
                Vec::new()
            }
        }
    }

    pub fn handle(&mut self, event: ServerEvent) -> Vec<ViewUpdate> {
        match event {
            ServerEvent::History { messages } => {
                self.store.replace_messages(messages);
                vec![ViewUpdate::MessagePane(view::message_pane(&self.store))]
            }
            ServerEvent::UserList { users } => {
                self.store.replace_users(users);
                vec![ViewUpdate::Roster(view::roster(&self.store))]
            }
            ServerEvent::UserStatus { status, user } => match status {
                PresenceStatus::Joined => {
                    if self.store.add_user(user) {
                        vec![ViewUpdate::Roster(view::roster(&self.store))]
                    } else {
                        Vec::new()
                    }
                }
                PresenceStatus::Left => {
                    self.store.remove_user(user.id);
                    vec![ViewUpdate::Roster(view::roster(&self.store))]
                }
            },
            ServerEvent::Message { sender, text, user } => {
                let message = ChatMessage { sender, text, user };
                // stored either way; rendered only for senders on the roster
                let update = self.store.user(sender).map(|known| {
                    let profile = message.user.as_ref().unwrap_or(known);
                    ViewUpdate::MessageAppend(view::message_bubble(
                        &message,
                        profile,
                        self.store.current_user_id(),
                    ))
                });
                self.store.push_message(message);
                update.into_iter().collect()
            }
            ServerEvent::ErrorMessage { text } => vec![ViewUpdate::Notification {
                html: view::notification(&text, view::NotificationLevel::Error),
                ttl: view::NOTIFICATION_TTL,
            }],
            ServerEvent::Unknown => {
                warn!("ignoring unknown event type");
                Vec::new()
            }
        }
    }
}

fn event_tag(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|v| v.get("type").and_then(|t| t.as_str().map(String::from)))
        .unwrap_or_else(|| "<missing>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn user(id: u64) -> User {
        User {
            id,
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
            email: format!("user{id}@example.com"),
            color: None,
        }
    }

    fn router_with_users(ids: &[u64]) -> EventRouter {
        let mut store = ChatStore::new(1);
        store.replace_users(ids.iter().map(|id| user(*id)).collect());
        EventRouter::new(store)
    }

    #[test]
    fn message_from_unknown_sender_is_stored_not_rendered() {
        let mut router = router_with_users(&[1, 2]);
        let updates = router.handle(ServerEvent::Message {
            sender: 42,
            text: "ghost".to_string(),
            user: None,
        });
        assert!(updates.is_empty());
        assert_eq!(router.store().messages().len(), 1);
    }

    #[test]
    fn error_message_leaves_store_untouched() {
        let mut router = router_with_users(&[1, 2]);
        let updates = router.handle(ServerEvent::ErrorMessage {
            text: "rate limited".to_string(),
        });
        assert_eq!(updates.len(), 1);
        assert!(matches!(
            &updates[0],
            ViewUpdate::Notification { ttl, .. } if *ttl == view::NOTIFICATION_TTL
        ));
        assert!(router.store().messages().is_empty());
        assert_eq!(router.store().users().len(), 2);
    }

    #[test]
    fn rejoin_of_present_user_renders_nothing() {
        let mut router = router_with_users(&[1, 2]);
        let updates = router.handle(ServerEvent::UserStatus {
            status: PresenceStatus::Joined,
            user: user(2),
        });
        assert!(updates.is_empty());
        assert_eq!(router.store().users().len(), 2);
    }

    #[test]
    fn undecodable_frame_is_dropped() {
        let mut router = router_with_users(&[1]);
        assert!(router.handle_raw("{not json").is_empty());
        assert!(router.handle_raw(r#"{"type": "mystery"}"#).is_empty());
        assert_eq!(router.store().messages().len(), 0);
    }
}
