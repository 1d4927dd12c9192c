//! Inline-button payloads.
//!
//! Telegram caps callback data at 64 bytes, so free-text parts (player names,
//! filter values) are cut on a char boundary when encoded. Whoever resolves
//! them must accept a prefix match.

use std::fmt;

use crate::catalog::dto::{EarningsPeriod, PlayerField};
use crate::helpers::utils::truncate_bytes;

pub const MAX_CALLBACK_BYTES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    fn as_str(&self) -> &'static str {
        match self {
            Direction::Prev => "prev",
            Direction::Next => "next",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallbackAction {
    /// `filter_<field>`: list the distinct values of a field.
    FilterMenu(PlayerField),
    /// `filter_<field>_value_<value>`: players whose field equals value.
    FilterValue { field: PlayerField, value: String },
    /// `sort_alpha`: every active player, A to Z.
    SortAlpha,
    /// `(prev|next)_page_<n>`: page `n` of the player list in the session.
    ListPage { direction: Direction, page: usize },
    /// `filter_(prev|next)_<n>`: page `n` of the value list in the session.
    FilterPage { direction: Direction, page: usize },
    Player(String),
    Chart(String),
    Earnings { period: EarningsPeriod, page: usize },
    BackToMenu,
}

fn parse_direction(token: &str) -> Option<Direction> {
    match token {
        "prev" => Some(Direction::Prev),
        "next" => Some(Direction::Next),
        _ => None,
    }
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "back_to_menu" => return Some(CallbackAction::BackToMenu),
            "sort_alpha" => return Some(CallbackAction::SortAlpha),
            _ => {}
        }

        if let Some(rest) = data.strip_prefix("filter_") {
            return Self::parse_filter(rest);
        }

        if let Some(name) = data.strip_prefix("player_") {
            return (!name.is_empty()).then(|| CallbackAction::Player(name.to_string()));
        }

        if let Some(name) = data.strip_prefix("chart_") {
            return (!name.is_empty()).then(|| CallbackAction::Chart(name.to_string()));
        }

        if let Some((direction, page)) = data.split_once("_page_") {
            return Some(CallbackAction::ListPage {
                direction: parse_direction(direction)?,
                page: page.parse().ok()?,
            });
        }

        if let Some(rest) = data.strip_prefix("earnings_") {
            let (period, page) = rest.rsplit_once('_')?;
            return Some(CallbackAction::Earnings {
                period: period.parse().ok()?,
                page: page.parse().ok()?,
            });
        }

        None
    }

    fn parse_filter(rest: &str) -> Option<Self> {
        if let Some((direction, page)) = rest.split_once('_') {
            if let Some(direction) = parse_direction(direction) {
                return Some(CallbackAction::FilterPage {
                    direction,
                    page: page.parse().ok()?,
                });
            }
        }

        match rest.split_once("_value_") {
            Some((field, value)) if !value.is_empty() => Some(CallbackAction::FilterValue {
                field: field.parse().ok()?,
                value: value.to_string(),
            }),
            Some(_) => None,
            None => Some(CallbackAction::FilterMenu(rest.parse().ok()?)),
        }
    }

    /// Encoded payload, never longer than [`MAX_CALLBACK_BYTES`].
    pub fn to_data(&self) -> String {
        let with_text = |prefix: String, text: &str| {
            let room = MAX_CALLBACK_BYTES.saturating_sub(prefix.len());
            format!("{}{}", prefix, truncate_bytes(text, room))
        };

        match self {
            CallbackAction::FilterMenu(field) => format!("filter_{}", field.slug()),
            CallbackAction::FilterValue { field, value } => {
                with_text(format!("filter_{}_value_", field.slug()), value)
            }
            CallbackAction::SortAlpha => "sort_alpha".to_string(),
            CallbackAction::ListPage { direction, page } => {
                format!("{}_page_{}", direction.as_str(), page)
            }
            CallbackAction::FilterPage { direction, page } => {
                format!("filter_{}_{}", direction.as_str(), page)
            }
            CallbackAction::Player(name) => with_text("player_".to_string(), name),
            CallbackAction::Chart(name) => with_text("chart_".to_string(), name),
            CallbackAction::Earnings { period, page } => {
                format!("earnings_{}_{}", period.slug(), page)
            }
            CallbackAction::BackToMenu => "back_to_menu".to_string(),
        }
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_data())
    }
}
