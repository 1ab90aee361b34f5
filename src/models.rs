use serde::{Deserialize, Serialize};

pub type UserId = u64;
pub type ConversationId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn initials(&self) -> String {
        let mut initials = String::new();
        if let Some(c) = self.first_name.chars().next() {
            initials.push(c);
        }
        if let Some(c) = self.last_name.chars().next() {
            initials.push(c);
        }
        initials
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: UserId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    // HTTP responses spell this "title", the socket push spells it "name"
    #[serde(default, alias = "name")]
    pub title: Option<String>,
}

impl Conversation {
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => format!("Room {}", self.id),
        }
    }
}
