//! Inline keyboards. Every list keyboard shows at most one page of buttons,
//! an optional navigation row and a final "Back to menu" row.

use mino_core::catalog::dto::{EarningsPeriod, EarningsRecord, PlayerField};
use mino_core::helpers::callback_data::{CallbackAction, Direction};
use mino_core::helpers::pagination::Paged;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

pub const MAIN_MENU_TEXT: &str =
    "⚽ <b>Mino Football NFTs</b>\n\nBrowse the player catalog or check who is earning the most:";

fn button(text: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.into(), action.to_data())
}

fn back_row() -> Vec<InlineKeyboardButton> {
    vec![button("🔙 Back to menu", CallbackAction::BackToMenu)]
}

fn nav_row<T>(
    paged: &Paged<T>,
    action: impl Fn(Direction, usize) -> CallbackAction,
) -> Option<Vec<InlineKeyboardButton>> {
    let mut row = Vec::new();
    if paged.has_prev() {
        row.push(button("⬅️ Previous", action(Direction::Prev, paged.page - 1)));
    }
    if paged.has_next() {
        row.push(button("Next ➡️", action(Direction::Next, paged.page + 1)));
    }
    (!row.is_empty()).then_some(row)
}

fn paged_keyboard<T>(
    paged: &Paged<T>,
    item: impl Fn(&T) -> InlineKeyboardButton,
    nav: impl Fn(Direction, usize) -> CallbackAction,
) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> =
        paged.items.iter().map(|entry| vec![item(entry)]).collect();
    if let Some(row) = nav_row(paged, nav) {
        rows.push(row);
    }
    rows.push(back_row());
    InlineKeyboardMarkup::new(rows)
}

pub fn main_menu() -> InlineKeyboardMarkup {
    let mut rows = vec![vec![button("🔤 All players A–Z", CallbackAction::SortAlpha)]];
    for pair in PlayerField::ALL.chunks(2) {
        rows.push(
            pair.iter()
                .map(|field| {
                    button(
                        format!("Filter by {}", field.label()),
                        CallbackAction::FilterMenu(*field),
                    )
                })
                .collect(),
        );
    }
    rows.push(vec![button(
        "💰 Top earners",
        CallbackAction::Earnings {
            period: EarningsPeriod::Season,
            page: 0,
        },
    )]);
    InlineKeyboardMarkup::new(rows)
}

pub fn player_list(paged: &Paged<String>) -> InlineKeyboardMarkup {
    paged_keyboard(
        paged,
        |name| button(name.as_str(), CallbackAction::Player(name.clone())),
        |direction, page| CallbackAction::ListPage { direction, page },
    )
}

pub fn filter_values(field: PlayerField, paged: &Paged<String>) -> InlineKeyboardMarkup {
    paged_keyboard(
        paged,
        |value| {
            button(
                value.as_str(),
                CallbackAction::FilterValue {
                    field,
                    value: value.clone(),
                },
            )
        },
        |direction, page| CallbackAction::FilterPage { direction, page },
    )
}

/// The Status filter has a fixed pair of views rather than values read from
/// the sheet.
pub fn status_filter() -> InlineKeyboardMarkup {
    let view = |label: &str, value: &str| {
        button(
            label,
            CallbackAction::FilterValue {
                field: PlayerField::Status,
                value: value.to_string(),
            },
        )
    };
    InlineKeyboardMarkup::new(vec![
        vec![view("✅ Active", "active"), view("🗄️ Retired", "retired")],
        back_row(),
    ])
}

/// Earnings page: one button per ranked player, navigation within the period,
/// then a row switching to the other periods.
pub fn top_earners(period: EarningsPeriod, paged: &Paged<EarningsRecord>) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = paged
        .items
        .iter()
        .enumerate()
        .map(|(i, record)| {
            vec![button(
                format!("{}. {}", paged.offset() + i + 1, record.player),
                CallbackAction::Player(record.player.clone()),
            )]
        })
        .collect();
    if let Some(row) = nav_row(paged, |_, page| CallbackAction::Earnings { period, page }) {
        rows.push(row);
    }
    rows.push(
        EarningsPeriod::ALL
            .iter()
            .filter(|other| **other != period)
            .map(|other| {
                button(
                    other.label(),
                    CallbackAction::Earnings {
                        period: *other,
                        page: 0,
                    },
                )
            })
            .collect(),
    );
    rows.push(back_row());
    InlineKeyboardMarkup::new(rows)
}

pub fn earnings_periods() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = EarningsPeriod::ALL
        .iter()
        .map(|period| {
            vec![button(
                period.label(),
                CallbackAction::Earnings {
                    period: *period,
                    page: 0,
                },
            )]
        })
        .collect();
    rows.push(back_row());
    InlineKeyboardMarkup::new(rows)
}

/// Shown under a player card.
pub fn player_card(name: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("📈 Earnings chart", CallbackAction::Chart(name.to_string()))],
        back_row(),
    ])
}

pub fn back_only() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![back_row()])
}
