//! Bot module for handling Telegram interactions
//!
//! This module is split into two submodules:
//! - `message_handler`: routes incoming text messages through the dialogue engine
//! - `ui_builder`: creates reply keyboards and formats messages

pub mod message_handler;
pub mod ui_builder;

// Re-export the handler and context for use in main.rs
pub use message_handler::{message_handler, AppContext};
