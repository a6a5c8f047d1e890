//! HTTP request handlers for the message service.

pub mod health;
pub mod messages;

pub use health::health_check;
pub use messages::{
    create_message, delete_message_by_id, get_message_by_id, list_messages, update_message_by_id,
};
