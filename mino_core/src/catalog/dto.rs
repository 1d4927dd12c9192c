use std::{fmt, str::FromStr};

use crate::helpers::utils::contains_retired_marker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    Active,
    Retired,
}

impl PlayerStatus {
    pub fn from_club_and_country(club: &str, country: &str) -> Self {
        if contains_retired_marker(club) || contains_retired_marker(country) {
            PlayerStatus::Retired
        } else {
            PlayerStatus::Active
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayerStatus::Active => "Active",
            PlayerStatus::Retired => "Retired",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub player: String,
    pub rarity: String,
    pub position: String,
    pub club: String,
    pub country: String,
    pub total_earnings: String,
    pub season_earnings: String,
    pub month_earnings: String,
    pub video_link: Option<String>,
    pub status: PlayerStatus,
}

impl PlayerRecord {
    pub fn is_retired(&self) -> bool {
        self.status == PlayerStatus::Retired
    }

    pub fn field(&self, field: PlayerField) -> &str {
        match field {
            PlayerField::Rarity => &self.rarity,
            PlayerField::Position => &self.position,
            PlayerField::Club => &self.club,
            PlayerField::Country => &self.country,
            PlayerField::Status => self.status.label(),
        }
    }

    pub fn earnings(&self, period: EarningsPeriod) -> &str {
        match period {
            EarningsPeriod::Season => &self.season_earnings,
            EarningsPeriod::Total => &self.total_earnings,
            EarningsPeriod::Month => &self.month_earnings,
        }
    }
}

/// Fields players can be filtered by from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerField {
    Rarity,
    Position,
    Club,
    Country,
    Status,
}

impl PlayerField {
    pub const ALL: [PlayerField; 5] = [
        PlayerField::Rarity,
        PlayerField::Position,
        PlayerField::Club,
        PlayerField::Country,
        PlayerField::Status,
    ];

    /// Token used inside callback data.
    pub fn slug(&self) -> &'static str {
        match self {
            PlayerField::Rarity => "rarity",
            PlayerField::Position => "position",
            PlayerField::Club => "club",
            PlayerField::Country => "country",
            PlayerField::Status => "status",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayerField::Rarity => "Rarity",
            PlayerField::Position => "Position",
            PlayerField::Club => "Club",
            PlayerField::Country => "Country",
            PlayerField::Status => "Status",
        }
    }
}

impl fmt::Display for PlayerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for PlayerField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerField::ALL
            .into_iter()
            .find(|field| field.slug() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EarningsPeriod {
    Season,
    Total,
    Month,
}

impl EarningsPeriod {
    pub const ALL: [EarningsPeriod; 3] = [
        EarningsPeriod::Season,
        EarningsPeriod::Month,
        EarningsPeriod::Total,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            EarningsPeriod::Season => "season",
            EarningsPeriod::Total => "total",
            EarningsPeriod::Month => "month",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EarningsPeriod::Season => "This season",
            EarningsPeriod::Total => "Yearly total",
            EarningsPeriod::Month => "This month",
        }
    }
}

impl fmt::Display for EarningsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for EarningsPeriod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EarningsPeriod::ALL
            .into_iter()
            .find(|period| period.slug() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EarningsRecord {
    pub player: String,
    pub amount: f64,
}

/// What `/player` shows: an HTML caption and, if the sheet has one, a video.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerCard {
    pub text: String,
    pub video_link: Option<String>,
}

/// Per-period earnings of one player, in sheet column order.
#[derive(Debug, Clone, PartialEq)]
pub struct EarningsHistory {
    pub player: String,
    pub points: Vec<(String, f64)>,
}

impl EarningsHistory {
    pub fn total(&self) -> f64 {
        self.points.iter().map(|(_, amount)| amount).sum()
    }
}
