use anyhow::Result;
use mino_core::catalog::dto::PlayerRecord;
use mino_core::helpers::bot_commands::Command;
use mino_core::helpers::format::{chart_caption, chart_url, text_chart};
use teloxide::{
    prelude::*,
    types::{InputFile, Message, ParseMode},
    utils::{command::BotCommands, html::escape},
};
use url::Url;

use crate::dependencies::BotDependencies;
use crate::menu;
use crate::utils::send_html;

const WELCOME_TEXT: &str = "👋 <b>Welcome to the Mino NFT bot!</b>\n\n\
Look up football player NFTs, their stats and what they earn.\n\
Use the menu below, or /help to see every command.";

const EARNINGS_TEXT: &str = "💰 <b>Top earners</b>\n\nPick a period:";

const UNKNOWN_TEXT: &str =
    "🤔 I didn't get that. Use /players to browse the catalog or /help to see what I can do.";

pub async fn handle_start(bot: Bot, msg: Message, bot_deps: BotDependencies) -> Result<()> {
    bot_deps.sessions.clear(msg.chat.id);
    send_html(&bot, msg.chat.id, WELCOME_TEXT, Some(menu::main_menu())).await?;
    Ok(())
}

pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

pub async fn handle_players(bot: Bot, msg: Message, bot_deps: BotDependencies) -> Result<()> {
    bot_deps.sessions.clear(msg.chat.id);
    send_html(&bot, msg.chat.id, menu::MAIN_MENU_TEXT, Some(menu::main_menu())).await?;
    Ok(())
}

pub async fn handle_player(
    bot: Bot,
    msg: Message,
    name: String,
    bot_deps: BotDependencies,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bot.send_message(
            msg.chat.id,
            "Please include a player name after /player, e.g. /player Messi",
        )
        .await?;
        return Ok(());
    }
    send_player_card(&bot, msg.chat.id, name, &bot_deps).await
}

pub async fn handle_earnings(bot: Bot, msg: Message) -> Result<()> {
    send_html(&bot, msg.chat.id, EARNINGS_TEXT, Some(menu::earnings_periods())).await?;
    Ok(())
}

pub async fn handle_chart(
    bot: Bot,
    msg: Message,
    name: String,
    bot_deps: BotDependencies,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bot.send_message(
            msg.chat.id,
            "Please include a player name after /chart, e.g. /chart Messi",
        )
        .await?;
        return Ok(());
    }
    send_chart(&bot, msg.chat.id, name, &bot_deps).await
}

pub async fn handle_unknown(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, UNKNOWN_TEXT).await?;
    Ok(())
}

/// Looks `name` up with an exact, case-insensitive match and sends the card.
pub async fn send_player_card(
    bot: &Bot,
    chat_id: ChatId,
    name: &str,
    bot_deps: &BotDependencies,
) -> Result<()> {
    let roster = bot_deps.catalog.load_roster().await?;
    reply_with_card(bot, chat_id, name, roster.player(name), bot_deps).await
}

/// Sends the player's card, as a video caption when the sheet links a clip.
/// Falls back to a plain text card with the link if Telegram rejects the
/// video.
pub async fn reply_with_card(
    bot: &Bot,
    chat_id: ChatId,
    name: &str,
    record: Option<&PlayerRecord>,
    bot_deps: &BotDependencies,
) -> Result<()> {
    let Some(record) = record else {
        send_html(
            bot,
            chat_id,
            format!("❌ No player named <b>{}</b> was found.", escape(name)),
            Some(menu::back_only()),
        )
        .await?;
        return Ok(());
    };

    let card = bot_deps.catalog.card(record);
    let keyboard = menu::player_card(&record.player);
    let Some(link) = card.video_link.as_deref() else {
        send_html(bot, chat_id, card.text, Some(keyboard)).await?;
        return Ok(());
    };

    match Url::parse(link) {
        Ok(url) => {
            let sent = bot
                .send_video(chat_id, InputFile::url(url))
                .caption(card.text.clone())
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard.clone())
                .await;
            match sent {
                Ok(_) => return Ok(()),
                Err(e) => log::warn!("Failed to send video {} for {}: {}", link, name, e),
            }
        }
        Err(e) => log::warn!("Invalid video link {:?} for {}: {}", link, name, e),
    }

    let text = format!(
        "{}\n\n🎬 <a href=\"{}\">Watch video</a>",
        card.text,
        escape(link)
    );
    send_html(bot, chat_id, text, Some(keyboard)).await?;
    Ok(())
}

/// Sends the player's earnings history as a chart image, or as a text chart
/// when the image can't be delivered.
pub async fn send_chart(
    bot: &Bot,
    chat_id: ChatId,
    name: &str,
    bot_deps: &BotDependencies,
) -> Result<()> {
    let unit = bot_deps.catalog.unit();
    let history = match bot_deps.catalog.load_earnings_history(name).await? {
        Some(history) if !history.points.is_empty() => history,
        _ => {
            send_html(
                bot,
                chat_id,
                format!("❌ No earnings history found for <b>{}</b>.", escape(name)),
                Some(menu::back_only()),
            )
            .await?;
            return Ok(());
        }
    };

    match Url::parse(&chart_url(&history, unit)) {
        Ok(url) => {
            let sent = bot
                .send_photo(chat_id, InputFile::url(url))
                .caption(chart_caption(&history, unit))
                .parse_mode(ParseMode::Html)
                .await;
            match sent {
                Ok(_) => return Ok(()),
                Err(e) => log::warn!("Failed to send chart image for {}: {}", history.player, e),
            }
        }
        Err(e) => log::warn!("Could not build chart URL for {}: {}", history.player, e),
    }

    send_html(bot, chat_id, text_chart(&history, unit), None).await?;
    Ok(())
}
