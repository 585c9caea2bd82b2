//! Telegram bot wiring

use std::sync::Arc;

use teloxide::types::{InputFile, KeyboardButton, KeyboardMarkup, MessageId, ReplyParameters};
use teloxide::{dispatching::UpdateFilterExt, prelude::*, utils::command::BotCommands};
use tracing::{info, warn};

use listkeeper_core::{ListStore, qr};

use crate::callback::CallbackAction;
use crate::dispatch::{self, MENU_TRIGGER, Reply};
use crate::error::Result;

/// Commands registered in the Telegram command menu
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "listkeeper bot commands")]
enum Command {
    #[command(description = "Save a value into a named list")]
    Save,
    #[command(description = "Show the values of a named list")]
    Getlist,
    #[command(description = "Generate a QR code image")]
    Qrcode,
    #[command(description = "Check that the bot is alive")]
    Ping,
}

/// State shared across handlers
pub struct BotState {
    pub store: Arc<ListStore>,
}

/// Telegram bot wrapper
pub struct ListBot {
    bot: Bot,
    state: Arc<BotState>,
}

impl ListBot {
    /// Create a new bot over the given store
    pub fn new(token: &str, store: Arc<ListStore>) -> Self {
        let bot = Bot::new(token);
        let state = Arc::new(BotState { store });
        Self { bot, state }
    }

    /// Register the command menu and run the update loop until Ctrl-C
    pub async fn start(self) -> Result<()> {
        info!("Registering bot commands...");
        self.bot.set_my_commands(Command::bot_commands()).await?;

        info!("Starting Telegram bot...");
        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(handle_message))
            .branch(Update::filter_callback_query().endpoint(handle_callback_query));

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.state])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<BotState>) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let reply = dispatch::handle_text(&state.store, msg.chat.id.0, text);
    send_reply(&bot, msg.chat.id, Some(msg.id), reply).await
}

async fn handle_callback_query(bot: Bot, q: CallbackQuery, state: Arc<BotState>) -> Result<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(action) = q.data.as_deref().and_then(CallbackAction::parse) else {
        warn!("Ignoring unknown callback payload: {:?}", q.data);
        return Ok(());
    };

    let Some(user_id) = storage_key(q.from.id) else {
        warn!("Ignoring callback from out-of-range user id: {}", q.from.id.0);
        return Ok(());
    };
    let reply = dispatch::handle_callback(&state.store, user_id, &action);
    send_reply(&bot, ChatId(user_id), None, reply).await
}

/// Store key for a Telegram user id; `None` when the unsigned id does
/// not fit the store's signed key space.
fn storage_key(id: teloxide::types::UserId) -> Option<i64> {
    i64::try_from(id.0).ok()
}

async fn send_reply(
    bot: &Bot,
    chat_id: ChatId,
    reply_to: Option<MessageId>,
    reply: Reply,
) -> Result<()> {
    match reply {
        Reply::None => {}
        Reply::Text(text) => {
            bot.send_message(chat_id, text)
                .reply_markup(menu_reply_keyboard())
                .await?;
        }
        Reply::Keyboard { text, markup } => {
            bot.send_message(chat_id, text).reply_markup(markup).await?;
        }
        Reply::QrCode { text } => {
            // Fire and forget: rendering and sending the image must not
            // hold up the update loop, and its failure is reported to
            // this user only.
            let bot = bot.clone();
            tokio::spawn(async move {
                if let Err(e) = send_qr_code(&bot, chat_id, reply_to, &text).await {
                    warn!("Failed to send QR code: {}", e);
                    let _ = bot.send_message(chat_id, e.to_string()).await;
                }
            });
        }
    }
    Ok(())
}

async fn send_qr_code(
    bot: &Bot,
    chat_id: ChatId,
    reply_to: Option<MessageId>,
    text: &str,
) -> Result<()> {
    let png = qr::encode_png(text)?;
    let photo = InputFile::memory(png).file_name("qr.png");

    let mut request = bot.send_photo(chat_id, photo);
    if let Some(message_id) = reply_to {
        request = request.reply_parameters(ReplyParameters::new(message_id));
    }
    request.await?;
    Ok(())
}

/// Persistent one-button keyboard that opens the inline menu
fn menu_reply_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(MENU_TRIGGER)]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        let cmd = Command::parse("/save", "listkeeper_bot").unwrap();
        assert!(matches!(cmd, Command::Save));

        let cmd = Command::parse("/getlist", "listkeeper_bot").unwrap();
        assert!(matches!(cmd, Command::Getlist));

        let cmd = Command::parse("/qrcode", "listkeeper_bot").unwrap();
        assert!(matches!(cmd, Command::Qrcode));

        let cmd = Command::parse("/ping", "listkeeper_bot").unwrap();
        assert!(matches!(cmd, Command::Ping));
    }

    #[test]
    fn test_storage_key_conversion() {
        use teloxide::types::UserId;

        assert_eq!(storage_key(UserId(42)), Some(42));
        assert_eq!(storage_key(UserId(i64::MAX as u64)), Some(i64::MAX));
        assert_eq!(storage_key(UserId(u64::MAX)), None);
    }

    #[test]
    fn test_menu_registration_covers_all_commands() {
        let commands = Command::bot_commands();
        let names: Vec<_> = commands
            .iter()
            .map(|c| c.command.trim_start_matches('/'))
            .collect();
        assert_eq!(names, vec!["save", "getlist", "qrcode", "ping"]);
    }
}
