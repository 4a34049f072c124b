//! Conversations domain - one messaging thread per accepted match
//!
//! The matching engine only asks for a thread to exist; listing and storing
//! messages is handled by the messaging service.

pub mod models;

pub use models::Conversation;
