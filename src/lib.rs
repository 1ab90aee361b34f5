//! Client-side glue for a WebSocket chat room: an in-memory presence and
//! message store synchronized from server push events, HTML-fragment
//! renderers over that store, login/signup form validation, and the JSON
//! HTTP calls for auth and room management.

pub mod api;
pub mod auth;
pub mod config;
pub mod forms;
pub mod messages;
pub mod models;
pub mod router;
pub mod rooms;
pub mod socket;
pub mod store;
pub mod view;

pub use router::{EventRouter, ViewUpdate};
pub use store::ChatStore;
