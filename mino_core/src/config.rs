//! Environment-driven configuration.
//!
//! Every binary calls `dotenvy::dotenv().ok()` first, so values may come from
//! a `.env` file as well as from the process environment.

use std::{env, path::PathBuf, time::Duration};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn var_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match var_opt(name) {
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

/// Column headers of the player worksheet. Header matching is
/// case-insensitive; see `SheetTable::column`.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSchema {
    pub player: String,
    pub rarity: String,
    pub position: String,
    pub club: String,
    pub country: String,
    pub total_earnings: String,
    pub season_earnings: String,
    pub month_earnings: String,
    pub video: String,
}

impl Default for SheetSchema {
    fn default() -> Self {
        Self {
            player: "Player".to_string(),
            rarity: "Rarity".to_string(),
            position: "Position".to_string(),
            club: "Club".to_string(),
            country: "Country".to_string(),
            total_earnings: "Total Yearly Earnings".to_string(),
            season_earnings: "Season Earnings".to_string(),
            month_earnings: "Monthly Earnings".to_string(),
            video: "Video".to_string(),
        }
    }
}

impl SheetSchema {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            player: var_or("PLAYER_COLUMN", &defaults.player),
            rarity: var_or("RARITY_COLUMN", &defaults.rarity),
            position: var_or("POSITION_COLUMN", &defaults.position),
            club: var_or("CLUB_COLUMN", &defaults.club),
            country: var_or("COUNTRY_COLUMN", &defaults.country),
            total_earnings: var_or("TOTAL_EARNINGS_COLUMN", &defaults.total_earnings),
            season_earnings: var_or("SEASON_EARNINGS_COLUMN", &defaults.season_earnings),
            month_earnings: var_or("MONTH_EARNINGS_COLUMN", &defaults.month_earnings),
            video: var_or("VIDEO_COLUMN", &defaults.video),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SheetCredentials {
    /// Path to a service-account JSON key.
    ServiceAccount(PathBuf),
    /// API key, only works for sheets shared publicly.
    ApiKey(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpreadsheetLocator {
    Id(String),
    /// Looked up through the Drive API on first use.
    Name(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetConfig {
    pub credentials: SheetCredentials,
    pub spreadsheet: SpreadsheetLocator,
    pub player_sheet: String,
    pub history_sheet: String,
    pub schema: SheetSchema,
}

impl SheetConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let credentials = match var_opt("GOOGLE_API_KEY") {
            Some(key) => SheetCredentials::ApiKey(key),
            None => SheetCredentials::ServiceAccount(PathBuf::from(var_or(
                "GOOGLE_CREDENTIALS_PATH",
                "credentials.json",
            ))),
        };

        let spreadsheet = match var_opt("SPREADSHEET_ID") {
            Some(id) => SpreadsheetLocator::Id(id),
            None => SpreadsheetLocator::Name(var_or(
                "SPREADSHEET_NAME",
                "Mino Football Earnings - 2024/25",
            )),
        };

        if matches!(
            (&credentials, &spreadsheet),
            (SheetCredentials::ApiKey(_), SpreadsheetLocator::Name(_))
        ) {
            // Drive search needs an OAuth token, an API key cannot list files.
            return Err(ConfigError::Missing("SPREADSHEET_ID"));
        }

        Ok(Self {
            credentials,
            spreadsheet,
            player_sheet: var_or("PLAYER_SHEET", "Player List"),
            history_sheet: var_or("HISTORY_SHEET", "Monthly Earnings"),
            schema: SheetSchema::from_env(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub webhook_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub earnings_unit: String,
    pub retry_delay: Duration,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = var_opt("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;
        let webhook_url = var_opt("WEBHOOK_URL").map(|url| url.trim_end_matches('/').to_string());

        Ok(Self {
            token,
            webhook_url,
            host: var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", 5000u16)?,
            earnings_unit: var_or("EARNINGS_UNIT", "sTLOS"),
            retry_delay: Duration::from_secs(parse_var("POLLING_RETRY_SECS", 5u64)?),
        })
    }

    /// Full URL Telegram should post updates to.
    pub fn webhook_endpoint(&self) -> Option<String> {
        self.webhook_url
            .as_ref()
            .map(|base| format!("{}/{}", base, self.token))
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
