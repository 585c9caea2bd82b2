//! listkeeper-core: persistence and encoding for the listkeeper bot
//!
//! Holds the List/Command store (per-user pending command + named
//! lists of string values, backed by SQLite), QR code rendering and
//! configuration. Transport wiring lives in `listkeeper-telegram`.

pub mod config;
pub mod error;
pub mod qr;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use store::{ListStore, PendingCommand};
