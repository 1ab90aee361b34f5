use log::error;

use crate::api::{ApiClient, ApiError};
use crate::messages::ConversationPush;
use crate::models::ConversationId;
use crate::view;

pub const LOGIN_PAGE: &str = "/login/";

pub fn room_page(id: ConversationId) -> String {
    format!("/chat/room/{id}/")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageUpdate {
    Navigate(String),
    Alert(String),
}

/// Fetches the room list and renders the dropdown (placeholder first, rooms
/// in arrival order). A failed load renders a single inert option.
pub async fn load_conversations(api: &ApiClient) -> String {
    match api.conversations().await {
        Ok(conversations) => view::conversation_options(&conversations, true),
        Err(e) => {
            error!("error loading conversations: {e}");
            view::load_rooms_failed_option()
        }
    }
}

pub async fn create_room(api: &ApiClient, title: &str) -> PageUpdate {
    match api.create_conversation(title).await {
        Ok(conversation) => PageUpdate::Navigate(room_page(conversation.id)),
        Err(e @ ApiError::Rejected { .. }) => {
            let detail = e
                .form_errors()
                .get("detail")
                .map(|messages| messages.join(", "))
                .unwrap_or_default();
            PageUpdate::Alert(format!("Failed to create room: {detail}"))
        }
        Err(e) => {
            error!("error creating room: {e}");
            PageUpdate::Alert("Failed to create room. Please try again.".to_string())
        }
    }
}

/// The join button only navigates for a non-empty selection.
pub fn join(selected: &str) -> PageUpdate {
    if selected.is_empty() {
        PageUpdate::Alert("Please select a chat room to join.".to_string())
    } else {
        PageUpdate::Navigate(format!("/chat/room/{selected}/"))
    }
}

pub async fn logout(api: &ApiClient) -> PageUpdate {
    match api.logout().await {
        Ok(()) => PageUpdate::Navigate(LOGIN_PAGE.to_string()),
        Err(e) => {
            error!("logout error: {e}");
            PageUpdate::Alert("Failed to logout. Please try again.".to_string())
        }
    }
}

/// Rebuilt dropdown state from a conversation-list socket push. The list
/// renders newest-first and the join button targets the first rendered room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomListView {
    pub options: String,
    pub join_href: String,
}

pub fn conversations_pushed(push: &ConversationPush) -> RoomListView {
    let mut conversations = push.conversations.clone();
    conversations.reverse();
    let join_href = conversations
        .first()
        .map_or_else(|| "#".to_string(), |c| room_page(c.id));
    RoomListView {
        options: view::conversation_options(&conversations, false),
        join_href,
    }
}
