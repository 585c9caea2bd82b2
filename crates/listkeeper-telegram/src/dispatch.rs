//! Conversation state machine
//!
//! The per-user state lives entirely in the [`ListStore`]: each event
//! reads the pending command, acts, and writes the next state back, so
//! this module is stateless and reentrant across users. Handlers
//! return a [`Reply`] value; actually talking to Telegram is `bot`'s
//! job, which keeps every transition unit-testable.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use listkeeper_core::{ListStore, PendingCommand};

use crate::callback::CallbackAction;

/// Literal that resets a user's pending state
pub const RESET_TRIGGER: &str = "start";

/// Literal (and reply-keyboard button label) that opens the inline menu
pub const MENU_TRIGGER: &str = "Menu";

const MENU_PROMPT: &str = "Choose a command:";
const PICK_LIST_PROMPT: &str = "Pick a list:";
const PICK_DELETE_PROMPT: &str = "Pick a list to delete:";
const SAVE_PROMPT: &str = "Enter the list name, a space, then the value:";
const SAVE_USAGE: &str = "Usage: list name, then a space, then the value";

/// What the transport should send back for one inbound event
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Nothing to send
    None,
    /// Plain text reply
    Text(String),
    /// Text with an inline keyboard attached
    Keyboard {
        text: String,
        markup: InlineKeyboardMarkup,
    },
    /// Render `text` as a QR image and send it threaded to the
    /// originating message
    QrCode { text: String },
}

/// Extract the slash-command token of a message: the first word
/// without its leading `/`, with any `@botname` suffix dropped.
/// Non-command text has no token.
pub fn command_token(text: &str) -> &str {
    let Some(rest) = text.strip_prefix('/') else {
        return "";
    };
    let word = rest.split_whitespace().next().unwrap_or("");
    word.split('@').next().unwrap_or("")
}

/// Handle one inbound text message for a user
pub fn handle_text(store: &ListStore, user_id: i64, text: &str) -> Reply {
    if text == RESET_TRIGGER {
        // Bare "start" carries no command token, so this clears state.
        let next = PendingCommand::from_tag(command_token(text));
        return match store.set_pending_command(user_id, next) {
            Ok(()) => Reply::None,
            Err(e) => Reply::Text(e.to_string()),
        };
    }

    if text == MENU_TRIGGER {
        return Reply::Keyboard {
            text: MENU_PROMPT.to_string(),
            markup: menu_keyboard(),
        };
    }

    let pending = match store.pending_command(user_id) {
        Ok(pending) => pending,
        Err(e) => {
            // Reset forward so the user is not wedged on a bad row.
            let next = PendingCommand::from_tag(command_token(text));
            let _ = store.set_pending_command(user_id, next);
            return Reply::Text(e.to_string());
        }
    };

    // Guard against the user echoing the state label itself (e.g. the
    // bot's own prompt quoted back).
    if pending != PendingCommand::Idle && pending.as_tag() == text {
        return Reply::None;
    }

    match pending {
        PendingCommand::Save => {
            let Some((name, value)) = text.split_once(' ') else {
                // State stays Save so the user can retry.
                return Reply::Text(SAVE_USAGE.to_string());
            };
            if let Err(e) = store.append_value(user_id, name, value) {
                // A handled storage error still completes the save
                // attempt; only the usage hint retains the state.
                let _ = store.clear_pending_command(user_id);
                return Reply::Text(e.to_string());
            }
            match store.clear_pending_command(user_id) {
                Ok(()) => Reply::None,
                Err(e) => Reply::Text(e.to_string()),
            }
        }
        PendingCommand::GetList => {
            let reply = match store.list_values(user_id, text) {
                Ok(values) => Reply::Text(values.join("\n")),
                Err(e) => Reply::Text(e.to_string()),
            };
            // Cleared regardless of the fetch outcome.
            match store.clear_pending_command(user_id) {
                Ok(()) => reply,
                Err(e) => Reply::Text(e.to_string()),
            }
        }
        PendingCommand::QrCode => match store.clear_pending_command(user_id) {
            Ok(()) => Reply::QrCode {
                text: text.to_string(),
            },
            Err(e) => Reply::Text(e.to_string()),
        },
        PendingCommand::Ping => match store.clear_pending_command(user_id) {
            Ok(()) => Reply::Text(format!("Pong {text}")),
            Err(e) => Reply::Text(e.to_string()),
        },
        PendingCommand::Idle => {
            // Unmatched input: its command token (if any) becomes the
            // pending command for the user's next message.
            let next = PendingCommand::from_tag(command_token(text));
            match store.set_pending_command(user_id, next) {
                Ok(()) => Reply::None,
                Err(e) => Reply::Text(e.to_string()),
            }
        }
    }
}

/// Handle one decoded inline-button callback for a user
pub fn handle_callback(store: &ListStore, user_id: i64, action: &CallbackAction) -> Reply {
    match action {
        CallbackAction::ShowListMenu => match store.list_keys(user_id) {
            Ok(keys) => Reply::Keyboard {
                text: PICK_LIST_PROMPT.to_string(),
                markup: keys_keyboard(&keys, CallbackAction::ShowList),
            },
            Err(e) => Reply::Text(e.to_string()),
        },
        CallbackAction::ShowList(key) => match store.list_values(user_id, key) {
            Ok(values) => Reply::Text(values.join("\n")),
            Err(e) => Reply::Text(e.to_string()),
        },
        CallbackAction::CreateList => match store.set_pending_command(user_id, PendingCommand::Save)
        {
            Ok(()) => Reply::Text(SAVE_PROMPT.to_string()),
            Err(e) => Reply::Text(e.to_string()),
        },
        // The zero-lists case is a fresh EmptyList error from the
        // store, not a value reused from an earlier query.
        CallbackAction::DeleteListMenu => match store.list_keys(user_id) {
            Ok(keys) => Reply::Keyboard {
                text: PICK_DELETE_PROMPT.to_string(),
                markup: keys_keyboard(&keys, CallbackAction::DeleteList),
            },
            Err(e) => Reply::Text(e.to_string()),
        },
        CallbackAction::DeleteList(key) => match store.delete_list(user_id, key) {
            Ok(()) => Reply::Text(format!("List '{key}' deleted")),
            Err(e) => Reply::Text(e.to_string()),
        },
    }
}

/// Top-level inline menu
fn menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("Lists", CallbackAction::ShowListMenu.encode()),
        InlineKeyboardButton::callback("Create list", CallbackAction::CreateList.encode()),
        InlineKeyboardButton::callback("Delete list", CallbackAction::DeleteListMenu.encode()),
    ]])
}

/// One button per list key, each carrying `make(key)` as its payload
fn keys_keyboard(keys: &[String], make: fn(String) -> CallbackAction) -> InlineKeyboardMarkup {
    let rows = keys
        .iter()
        .map(|key| vec![InlineKeyboardButton::callback(key.clone(), make(key.clone()).encode())])
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}
