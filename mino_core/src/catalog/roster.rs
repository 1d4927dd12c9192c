use std::cmp::Ordering;

use crate::catalog::dto::{EarningsPeriod, EarningsRecord, PlayerField, PlayerRecord, PlayerStatus};
use crate::helpers::pagination::{paginate, Paged};
use crate::helpers::utils::{contains_retired_marker, eq_folded, fold_key, normalize_text, parse_amount};

/// One read of the player worksheet. All lookups of a single interaction run
/// against the same snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    records: Vec<PlayerRecord>,
}

fn by_name(a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    fold_key(&a.player)
        .cmp(&fold_key(&b.player))
        .then_with(|| a.player.cmp(&b.player))
}

/// Case-insensitive sort with deduplication, keeping the first spelling seen.
fn sorted_unique(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut keyed: Vec<(String, String)> = Vec::new();
    for value in values {
        let key = fold_key(&value);
        if !keyed.iter().any(|(k, _)| *k == key) {
            keyed.push((key, value));
        }
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    keyed.into_iter().map(|(_, value)| value).collect()
}

/// Exact (folded) match first, then the first candidate starting with
/// `partial`.
fn resolve_prefix<'a>(candidates: impl Iterator<Item = &'a str> + Clone, partial: &str) -> Option<String> {
    let wanted = fold_key(partial);
    if wanted.is_empty() {
        return None;
    }
    candidates
        .clone()
        .find(|candidate| fold_key(candidate) == wanted)
        .or_else(|| candidates.into_iter().find(|candidate| fold_key(candidate).starts_with(&wanted)))
        .map(str::to_string)
}

impl Roster {
    pub fn new(records: Vec<PlayerRecord>) -> Self {
        Self { records }
    }

    /// Active players in sheet order.
    pub fn active(&self) -> Vec<PlayerRecord> {
        self.records
            .iter()
            .filter(|record| !record.is_retired())
            .cloned()
            .collect()
    }

    /// Retired players, A to Z.
    pub fn retired(&self) -> Vec<PlayerRecord> {
        let mut retired: Vec<PlayerRecord> = self
            .records
            .iter()
            .filter(|record| record.is_retired())
            .cloned()
            .collect();
        retired.sort_by(by_name);
        retired
    }

    pub fn sorted_names(&self) -> Vec<String> {
        let mut active = self.active();
        active.sort_by(by_name);
        active.into_iter().map(|record| record.player).collect()
    }

    /// Players whose `field` equals `value`, ignoring case and whitespace,
    /// sorted by name. `Status` selects the active or the retired view.
    pub fn by_field(&self, field: PlayerField, value: &str) -> Vec<PlayerRecord> {
        let mut matches = match field {
            PlayerField::Status => match fold_key(value).as_str() {
                "retired" => return self.retired(),
                "active" => self.active(),
                _ => Vec::new(),
            },
            _ => self
                .active()
                .into_iter()
                .filter(|record| eq_folded(record.field(field), value))
                .collect(),
        };
        matches.sort_by(by_name);
        matches
    }

    /// Distinct values of `field` over active players. Never blank, never a
    /// "retired" marker, sorted case-insensitively. For `Status` that leaves
    /// only "Active"; the retired view has its own button.
    pub fn unique_values(&self, field: PlayerField) -> Vec<String> {
        sorted_unique(
            self.records
                .iter()
                .filter(|record| !record.is_retired())
                .map(|record| match field {
                    PlayerField::Status => record.status.label().to_string(),
                    _ => record.field(field).to_string(),
                })
                .filter(|value| !value.is_empty() && !contains_retired_marker(value)),
        )
    }

    /// Case-insensitive, whitespace-tolerant lookup by name, retired players
    /// included.
    pub fn player(&self, name: &str) -> Option<&PlayerRecord> {
        if normalize_text(name).is_empty() {
            return None;
        }
        self.records.iter().find(|record| eq_folded(&record.player, name))
    }

    /// Full player name for a possibly truncated one.
    pub fn resolve_player_name(&self, partial: &str) -> Option<String> {
        let mut sorted: Vec<&PlayerRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| by_name(a, b));
        resolve_prefix(sorted.iter().map(|record| record.player.as_str()), partial)
    }

    /// Full filter value for a possibly truncated one.
    pub fn resolve_value(&self, field: PlayerField, partial: &str) -> Option<String> {
        match field {
            PlayerField::Status => resolve_prefix(
                [PlayerStatus::Active, PlayerStatus::Retired]
                    .iter()
                    .map(|status| status.label()),
                partial,
            ),
            _ => {
                let values = self.unique_values(field);
                resolve_prefix(values.iter().map(String::as_str), partial)
            }
        }
    }

    /// Active players ranked by their earnings for `period`, highest first.
    /// Rows without a parseable amount are left out.
    pub fn top_earners(&self, period: EarningsPeriod, page: usize) -> Paged<EarningsRecord> {
        let mut ranked: Vec<EarningsRecord> = self
            .records
            .iter()
            .filter(|record| !record.is_retired())
            .filter_map(|record| {
                parse_amount(record.earnings(period)).map(|amount| EarningsRecord {
                    player: record.player.clone(),
                    amount,
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(Ordering::Equal)
                .then_with(|| fold_key(&a.player).cmp(&fold_key(&b.player)))
        });

        paginate(&ranked, page)
    }
}
