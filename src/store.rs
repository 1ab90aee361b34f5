use crate::models::{ChatMessage, User, UserId};

/// In-memory chat page state. Mutated only by socket events routed through
/// [`crate::router::EventRouter`] or by local send actions; everything is
/// discarded when the page (process) goes away.
#[derive(Debug, Clone)]
pub struct ChatStore {
    current_user_id: UserId,
    users: Vec<User>,
    messages: Vec<ChatMessage>,
}

impl ChatStore {
    /// The current-user identity is a required input. There is deliberately
    /// no fallback to the first listed user.
    pub fn new(current_user_id: UserId) -> Self {
        ChatStore {
            current_user_id,
            users: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn current_user_id(&self) -> UserId {
        self.current_user_id
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn replace_users(&mut self, users: Vec<User>) {
        self.users = users;
    }

    pub fn replace_messages(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
    }

    /// Adds a user unless one with the same id is already present.
    /// Returns whether the roster changed.
    pub fn add_user(&mut self, user: User) -> bool {
        if self.users.iter().any(|u| u.id == user.id) {
            return false;
        }
        self.users.push(user);
        true
    }

    /// Removes the user with the given id. Returns whether it was present.
    pub fn remove_user(&mut self, id: UserId) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        self.users.len() != before
    }

    /// Messages are append-only and kept even when the sender is not on the
    /// roster; rendering decides what to show.
    pub fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: UserId) -> User {
        User {
            id,
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
            email: format!("user{id}@example.com"),
            color: None,
        }
    }

    #[test]
    fn add_user_is_idempotent_per_id() {
        let mut store = ChatStore::new(1);
        assert!(store.add_user(user(2)));
        assert!(!store.add_user(user(2)));
        assert_eq!(store.users().len(), 1);
    }

    #[test]
    fn remove_user_filters_exactly_that_id() {
        let mut store = ChatStore::new(1);
        store.replace_users(vec![user(2), user(3), user(4)]);
        assert!(store.remove_user(3));
        assert!(!store.remove_user(3));
        let ids: Vec<UserId> = store.users().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn messages_kept_for_unknown_senders() {
        let mut store = ChatStore::new(1);
        store.push_message(ChatMessage {
            sender: 99,
            text: "from nobody".to_string(),
            user: None,
        });
        assert_eq!(store.messages().len(), 1);
        assert!(store.user(99).is_none());
    }
}
