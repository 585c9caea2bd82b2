//! listkeeper-telegram: Telegram transport for the listkeeper bot
//!
//! Wires the conversation state machine in [`dispatch`] to Telegram
//! via teloxide: command registration, update routing, inline keyboard
//! callbacks and QR photo replies.

pub mod bot;
pub mod callback;
pub mod dispatch;
pub mod error;

pub use bot::{BotState, ListBot};
pub use callback::CallbackAction;
pub use dispatch::Reply;
pub use error::{Result, TelegramError};
