//! HTTP access to the chat backend.

pub mod api;
pub mod chat;
pub mod error;

pub use api::{ApiClient, ApiConfig, RequestOptions};
pub use chat::{ChatBackend, ChatClient};
pub use error::ApiError;
