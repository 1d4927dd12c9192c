//! Reply helpers shared by command and callback handlers.

use std::future::Future;
use std::time::Duration;

use teloxide::{
    ApiError, RequestError,
    prelude::*,
    types::{
        CallbackQuery, InlineKeyboardMarkup, MaybeInaccessibleMessage, MessageId, ParseMode,
    },
};

pub const GENERIC_ERROR: &str = "⚠️ An error occurred, please try again later.";

/// Chat and message a callback query came from. The message is `None` when
/// Telegram no longer lets us edit it.
pub fn callback_origin(query: &CallbackQuery) -> (ChatId, Option<MessageId>) {
    match &query.message {
        Some(MaybeInaccessibleMessage::Regular(message)) => (message.chat.id, Some(message.id)),
        Some(MaybeInaccessibleMessage::Inaccessible(message)) => (message.chat.id, None),
        None => (ChatId::from(query.from.id), None),
    }
}

pub async fn send_html(
    bot: &Bot,
    chat_id: ChatId,
    text: impl Into<String>,
    keyboard: Option<InlineKeyboardMarkup>,
) -> ResponseResult<()> {
    let request = bot.send_message(chat_id, text.into()).parse_mode(ParseMode::Html);
    match keyboard {
        Some(keyboard) => request.reply_markup(keyboard).await?,
        None => request.await?,
    };
    Ok(())
}

/// Replaces the menu message in place, or sends a fresh one when the message
/// can't be edited (too old, or it carries media instead of text).
pub async fn show_menu(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    text: String,
    keyboard: InlineKeyboardMarkup,
) -> ResponseResult<()> {
    if let Some(message_id) = message_id {
        match bot
            .edit_message_text(chat_id, message_id, text.clone())
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard.clone())
            .await
        {
            Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => return Ok(()),
            Err(e) => {
                log::debug!(
                    "Could not edit message {} in chat {}: {}",
                    message_id.0,
                    chat_id,
                    e
                );
            }
        }
    }
    send_html(bot, chat_id, text, Some(keyboard)).await
}

/// Logs a failed handler and tells the user something went wrong.
pub async fn report_failure(bot: &Bot, chat_id: ChatId, context: &str, error: anyhow::Error) {
    log::error!("{} failed in chat {}: {:#}", context, chat_id, error);
    if let Err(e) = bot.send_message(chat_id, GENERIC_ERROR).await {
        log::warn!("Failed to send error notice to chat {}: {}", chat_id, e);
    }
}

fn is_transient(error: &RequestError) -> bool {
    matches!(
        error,
        RequestError::Network(_) | RequestError::Io(_) | RequestError::RetryAfter(_)
    )
}

/// Runs a Bot API call until it succeeds or fails with a non-network error,
/// sleeping `delay` between attempts.
pub async fn retry_transient<T, F, Fut>(what: &str, delay: Duration, mut call: F) -> ResponseResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ResponseResult<T>>,
{
    loop {
        match call().await {
            Err(e) if is_transient(&e) => {
                log::warn!("{} failed: {}. Retrying in {:?}", what, e, delay);
                tokio::time::sleep(delay).await;
            }
            other => return other,
        }
    }
}
