//! Callback query handlers for the inline menus.

use anyhow::Result;
use mino_core::catalog::dto::{EarningsPeriod, PlayerField};
use mino_core::helpers::callback_data::CallbackAction;
use mino_core::helpers::format::{filter_values_header, player_list_header, top_earners};
use teloxide::{
    prelude::*,
    types::{CallbackQuery, InlineKeyboardMarkup, MessageId},
    utils::html::escape,
};

use crate::bot::handler::{reply_with_card, send_chart};
use crate::dependencies::BotDependencies;
use crate::menu;
use crate::session::dto::{ListKind, PaginationState};
use crate::utils::{callback_origin, report_failure, show_menu};

const EXPIRED_NOTICE: &str = "This list has expired, use /players to start again.";
const UNKNOWN_NOTICE: &str = "Sorry, I can't handle that button.";
const STATUS_MENU_TEXT: &str = "🔎 <b>Filter by Status</b>\n\nActive players or the retired archive?";

pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    bot_deps: BotDependencies,
) -> Result<()> {
    let (chat_id, message_id) = callback_origin(&query);

    let Some(action) = query.data.as_deref().and_then(CallbackAction::parse) else {
        log::warn!(
            "Unrecognised callback data {:?} from user {}",
            query.data,
            query.from.id
        );
        bot.answer_callback_query(query.id.clone())
            .text(UNKNOWN_NOTICE)
            .await?;
        return Ok(());
    };

    log::debug!("Callback {} in chat {}", action, chat_id);
    let context = action.to_data();
    let notice = match route(&bot, chat_id, message_id, action, &bot_deps).await {
        Ok(notice) => notice,
        Err(e) => {
            report_failure(&bot, chat_id, &context, e).await;
            None
        }
    };

    let answer = bot.answer_callback_query(query.id.clone());
    match notice {
        Some(text) => answer.text(text).await?,
        None => answer.await?,
    };
    Ok(())
}

/// Performs the action. Returns a short notice to pop up on the button, if
/// any.
async fn route(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    action: CallbackAction,
    bot_deps: &BotDependencies,
) -> Result<Option<&'static str>> {
    let catalog = &bot_deps.catalog;
    let sessions = &bot_deps.sessions;

    match action {
        CallbackAction::BackToMenu => {
            sessions.clear(chat_id);
            show_menu(
                bot,
                chat_id,
                message_id,
                menu::MAIN_MENU_TEXT.to_string(),
                menu::main_menu(),
            )
            .await?;
        }
        CallbackAction::SortAlpha => {
            let names = catalog.load_roster().await?.sorted_names();
            if names.is_empty() {
                show_empty(bot, chat_id, message_id, "😕 No players found.".to_string()).await?;
                return Ok(None);
            }
            let state = PaginationState::players("All players A–Z", names);
            show_page(bot, chat_id, message_id, &state).await?;
            sessions.set(chat_id, state);
        }
        CallbackAction::FilterMenu(PlayerField::Status) => {
            sessions.clear(chat_id);
            show_menu(
                bot,
                chat_id,
                message_id,
                STATUS_MENU_TEXT.to_string(),
                menu::status_filter(),
            )
            .await?;
        }
        CallbackAction::FilterMenu(field) => {
            let values = catalog.load_roster().await?.unique_values(field);
            if values.is_empty() {
                let text = format!("😕 No {} values found.", field.label().to_lowercase());
                show_empty(bot, chat_id, message_id, text).await?;
                return Ok(None);
            }
            let state = PaginationState::values(field, values);
            show_page(bot, chat_id, message_id, &state).await?;
            sessions.set(chat_id, state);
        }
        CallbackAction::FilterValue { field, value } => {
            let roster = catalog.load_roster().await?;
            let value = roster.resolve_value(field, &value).unwrap_or(value);
            let names: Vec<String> = roster
                .by_field(field, &value)
                .into_iter()
                .map(|record| record.player)
                .collect();
            if names.is_empty() {
                let text = format!(
                    "😕 No players found for {}: <b>{}</b>.",
                    field.label(),
                    escape(&value)
                );
                show_empty(bot, chat_id, message_id, text).await?;
                return Ok(None);
            }
            let state = PaginationState::players(filter_title(field, &value), names);
            show_page(bot, chat_id, message_id, &state).await?;
            sessions.set(chat_id, state);
        }
        CallbackAction::ListPage { page, .. } => {
            let Some(state) = sessions.turn_page(chat_id, page, |kind| *kind == ListKind::Players)
            else {
                return Ok(Some(EXPIRED_NOTICE));
            };
            show_page(bot, chat_id, message_id, &state).await?;
        }
        CallbackAction::FilterPage { page, .. } => {
            let Some(state) =
                sessions.turn_page(chat_id, page, |kind| matches!(kind, ListKind::Values(_)))
            else {
                return Ok(Some(EXPIRED_NOTICE));
            };
            show_page(bot, chat_id, message_id, &state).await?;
        }
        CallbackAction::Player(name) => {
            let roster = catalog.load_roster().await?;
            let name = roster.resolve_player_name(&name).unwrap_or(name);
            reply_with_card(bot, chat_id, &name, roster.player(&name), bot_deps).await?;
        }
        CallbackAction::Chart(name) => {
            let name = catalog
                .load_roster()
                .await?
                .resolve_player_name(&name)
                .unwrap_or(name);
            send_chart(bot, chat_id, &name, bot_deps).await?;
        }
        CallbackAction::Earnings { period, page } => {
            show_earnings(bot, chat_id, message_id, period, page, bot_deps).await?;
        }
    }

    Ok(None)
}

fn filter_title(field: PlayerField, value: &str) -> String {
    match field {
        PlayerField::Status => format!("{} players", value),
        _ => format!("{}: {}", field.label(), value),
    }
}

fn render_page(state: &PaginationState) -> (String, InlineKeyboardMarkup) {
    let paged = state.current();
    match state.kind {
        ListKind::Players => (
            player_list_header(&state.title, &paged),
            menu::player_list(&paged),
        ),
        ListKind::Values(field) => (
            filter_values_header(field.label(), &paged),
            menu::filter_values(field, &paged),
        ),
    }
}

async fn show_page(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    state: &PaginationState,
) -> Result<()> {
    let (text, keyboard) = render_page(state);
    show_menu(bot, chat_id, message_id, text, keyboard).await?;
    Ok(())
}

async fn show_empty(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    text: String,
) -> Result<()> {
    show_menu(bot, chat_id, message_id, text, menu::back_only()).await?;
    Ok(())
}

async fn show_earnings(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    period: EarningsPeriod,
    page: usize,
    bot_deps: &BotDependencies,
) -> Result<()> {
    let paged = bot_deps.catalog.load_roster().await?.top_earners(period, page);
    if paged.is_empty() {
        let text = format!("😕 No earnings data for <b>{}</b>.", period.label());
        show_menu(bot, chat_id, message_id, text, menu::earnings_periods()).await?;
        return Ok(());
    }

    let text = top_earners(period, &paged, bot_deps.catalog.unit());
    show_menu(bot, chat_id, message_id, text, menu::top_earners(period, &paged)).await?;
    Ok(())
}
