use std::sync::Arc;

use crate::catalog::dto::{
    EarningsHistory, EarningsPeriod, EarningsRecord, PlayerCard, PlayerField, PlayerRecord,
    PlayerStatus,
};
use crate::catalog::roster::Roster;
use crate::config::{SheetConfig, SheetSchema};
use crate::helpers::format::player_card;
use crate::helpers::pagination::Paged;
use crate::helpers::utils::{eq_folded, normalize_text, parse_amount};
use crate::sheets::{SheetError, SheetSource, SheetTable};

/// Read-only view of the player spreadsheet. The `fetch_*` calls each re-read
/// the sheet and turn upstream failures into logged, empty results; the
/// `load_*` calls return the error instead.
#[derive(Clone)]
pub struct Catalog {
    source: Arc<dyn SheetSource>,
    player_sheet: String,
    history_sheet: String,
    schema: SheetSchema,
    unit: String,
}

struct Columns {
    player: usize,
    rarity: Option<usize>,
    position: Option<usize>,
    club: Option<usize>,
    country: Option<usize>,
    total: Option<usize>,
    season: Option<usize>,
    month: Option<usize>,
    video: Option<usize>,
}

impl Columns {
    fn resolve(table: &SheetTable, schema: &SheetSchema) -> Result<Self, SheetError> {
        let player = table
            .column_or_containing(&schema.player, "player")
            .ok_or_else(|| SheetError::NotFound(format!("column '{}'", schema.player)))?;

        Ok(Self {
            player,
            rarity: table.column(&schema.rarity),
            position: table.column(&schema.position),
            club: table.column(&schema.club),
            country: table.column(&schema.country),
            total: table.column(&schema.total_earnings),
            season: table.column(&schema.season_earnings),
            month: table.column(&schema.month_earnings),
            video: table.column(&schema.video),
        })
    }
}

fn cell(row: &[String], index: Option<usize>) -> String {
    index
        .and_then(|i| row.get(i))
        .map(|value| normalize_text(value))
        .unwrap_or_default()
}

impl Catalog {
    pub fn new(
        source: Arc<dyn SheetSource>,
        player_sheet: &str,
        history_sheet: &str,
        schema: SheetSchema,
        unit: &str,
    ) -> Self {
        Self {
            source,
            player_sheet: player_sheet.to_string(),
            history_sheet: history_sheet.to_string(),
            schema,
            unit: unit.to_string(),
        }
    }

    pub fn from_config(source: Arc<dyn SheetSource>, config: &SheetConfig, unit: &str) -> Self {
        Self::new(
            source,
            &config.player_sheet,
            &config.history_sheet,
            config.schema.clone(),
            unit,
        )
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    async fn load_players(&self) -> Result<Vec<PlayerRecord>, SheetError> {
        let table = self.source.read_table(&self.player_sheet).await?;
        let columns = Columns::resolve(&table, &self.schema)?;

        let records = table
            .rows
            .iter()
            .filter_map(|row| {
                let player = cell(row, Some(columns.player));
                if player.is_empty() {
                    return None;
                }
                let club = cell(row, columns.club);
                let country = cell(row, columns.country);
                let video = cell(row, columns.video);

                Some(PlayerRecord {
                    player,
                    rarity: cell(row, columns.rarity),
                    position: cell(row, columns.position),
                    status: PlayerStatus::from_club_and_country(&club, &country),
                    club,
                    country,
                    total_earnings: cell(row, columns.total),
                    season_earnings: cell(row, columns.season),
                    month_earnings: cell(row, columns.month),
                    video_link: (video.starts_with("http://") || video.starts_with("https://"))
                        .then_some(video),
                })
            })
            .collect();

        Ok(records)
    }

    /// Reads the player worksheet once.
    pub async fn load_roster(&self) -> Result<Roster, SheetError> {
        Ok(Roster::new(self.load_players().await?))
    }

    /// Same as [`Catalog::load_roster`], but logs failures and returns an
    /// empty roster.
    async fn roster(&self, operation: &str) -> Roster {
        match self.load_roster().await {
            Ok(roster) => roster,
            Err(e) => {
                log::warn!("{}: failed to read '{}': {}", operation, self.player_sheet, e);
                Roster::default()
            }
        }
    }

    pub fn card(&self, record: &PlayerRecord) -> PlayerCard {
        PlayerCard {
            text: player_card(record, &self.unit),
            video_link: record.video_link.clone(),
        }
    }

    /// Active players in sheet order.
    pub async fn fetch_all(&self) -> Vec<PlayerRecord> {
        self.roster("fetch_all").await.active()
    }

    pub async fn fetch_retired(&self) -> Vec<PlayerRecord> {
        self.roster("fetch_retired").await.retired()
    }

    /// Active player names, A to Z.
    pub async fn fetch_sorted_names(&self) -> Vec<String> {
        self.roster("fetch_sorted_names").await.sorted_names()
    }

    pub async fn fetch_by_field(&self, field: PlayerField, value: &str) -> Vec<PlayerRecord> {
        self.roster("fetch_by_field").await.by_field(field, value)
    }

    pub async fn fetch_unique_values(&self, field: PlayerField) -> Vec<String> {
        self.roster("fetch_unique_values").await.unique_values(field)
    }

    pub async fn fetch_player_record(&self, name: &str) -> Option<PlayerRecord> {
        self.roster("fetch_player").await.player(name).cloned()
    }

    /// Case-insensitive, whitespace-tolerant lookup by name.
    pub async fn fetch_player(&self, name: &str) -> Option<PlayerCard> {
        self.fetch_player_record(name)
            .await
            .map(|record| self.card(&record))
    }

    /// Full player name for a possibly truncated one: exact match first, then
    /// the first name (A to Z) starting with it.
    pub async fn resolve_player_name(&self, partial: &str) -> Option<String> {
        self.roster("resolve_player_name").await.resolve_player_name(partial)
    }

    pub async fn resolve_value(&self, field: PlayerField, partial: &str) -> Option<String> {
        self.roster("resolve_value").await.resolve_value(field, partial)
    }

    pub async fn fetch_top_earners(&self, period: EarningsPeriod, page: usize) -> Paged<EarningsRecord> {
        self.roster("fetch_top_earners").await.top_earners(period, page)
    }

    pub async fn fetch_earnings_history(&self, name: &str) -> Option<EarningsHistory> {
        match self.load_earnings_history(name).await {
            Ok(history) => history,
            Err(e) => {
                log::warn!("fetch_earnings_history: failed to read '{}': {}", self.history_sheet, e);
                None
            }
        }
    }

    /// One player's row of the history worksheet. `Ok(None)` when the player
    /// has no row or no parseable amounts.
    pub async fn load_earnings_history(&self, name: &str) -> Result<Option<EarningsHistory>, SheetError> {
        if normalize_text(name).is_empty() {
            return Ok(None);
        }

        let table = self.source.read_table(&self.history_sheet).await?;
        let player_col = table
            .column_or_containing(&self.schema.player, "player")
            .ok_or_else(|| {
                SheetError::NotFound(format!("column '{}' in '{}'", self.schema.player, self.history_sheet))
            })?;

        let Some(row) = table.rows.iter().find(|row| eq_folded(&row[player_col], name)) else {
            return Ok(None);
        };

        let points = table
            .headers
            .iter()
            .enumerate()
            .filter(|(i, header)| *i != player_col && !header.is_empty())
            .filter_map(|(i, header)| parse_amount(&row[i]).map(|amount| (header.clone(), amount)))
            .collect::<Vec<_>>();

        if points.is_empty() {
            return Ok(None);
        }

        Ok(Some(EarningsHistory {
            player: normalize_text(&row[player_col]),
            points,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::pagination::paginate;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSheets(HashMap<String, SheetTable>);

    #[async_trait]
    impl SheetSource for StaticSheets {
        async fn read_table(&self, worksheet: &str) -> Result<SheetTable, SheetError> {
            self.0
                .get(worksheet)
                .cloned()
                .ok_or_else(|| SheetError::NotFound(worksheet.to_string()))
        }
    }

    /// Counts reads so tests can check how often the sheet is hit.
    struct CountingSheets {
        table: SheetTable,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl SheetSource for CountingSheets {
        async fn read_table(&self, _worksheet: &str) -> Result<SheetTable, SheetError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.table.clone())
        }
    }

    struct FailingSheets;

    #[async_trait]
    impl SheetSource for FailingSheets {
        async fn read_table(&self, _worksheet: &str) -> Result<SheetTable, SheetError> {
            Err(SheetError::Auth("expired".to_string()))
        }
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn player_table() -> SheetTable {
        SheetTable::new(
            row(&[
                "Player",
                "Rarity",
                "Position",
                "Club",
                "Country",
                "Total Yearly Earnings",
                "Season Earnings",
                "Video",
            ]),
            vec![
                row(&["Messi", "Legendary", "Forward", "Inter Miami", "Argentina", "$100", "$10", "https://v.example/messi.mp4"]),
                row(&[" Pelé ", "icon", "Forward", "Retired", "Brazil", "$500", "", ""]),
                row(&["Casemiro", "Rare", "Midfielder", "Manchester United", "Brazil", "$50", "$30", "not a link"]),
                row(&["alisson", "Rare", "Goalkeeper", "Liverpool", " brazil ", "$75", "n/a", ""]),
                row(&["Zidane", "Legendary", "Midfielder", "Real Madrid", "Retired", "$900", "$90", ""]),
                row(&["", "Common", "", "", "", "", "", ""]),
                row(&["Ghost", "", "Defender", "", "", "", "", ""]),
            ],
        )
    }

    fn history_table() -> SheetTable {
        SheetTable::new(
            row(&["Player Name", "Aug 2024", "Sep 2024", "Oct 2024"]),
            vec![
                row(&["Messi", "$10", "", "$25.5"]),
                row(&["Casemiro", "", "", ""]),
            ],
        )
    }

    fn catalog_with(player: SheetTable) -> Catalog {
        let mut sheets = HashMap::new();
        sheets.insert("Player List".to_string(), player);
        sheets.insert("Monthly Earnings".to_string(), history_table());
        Catalog::new(
            Arc::new(StaticSheets(sheets)),
            "Player List",
            "Monthly Earnings",
            SheetSchema::default(),
            "sTLOS",
        )
    }

    fn catalog() -> Catalog {
        catalog_with(player_table())
    }

    fn names(records: &[PlayerRecord]) -> Vec<&str> {
        records.iter().map(|r| r.player.as_str()).collect()
    }

    #[tokio::test]
    async fn test_fetch_all_excludes_retired_and_blank_names() {
        let all = catalog().fetch_all().await;
        assert_eq!(names(&all), vec!["Messi", "Casemiro", "alisson", "Ghost"]);
        assert_eq!(all[0].video_link.as_deref(), Some("https://v.example/messi.mp4"));
        assert_eq!(all[1].video_link, None);
    }

    #[tokio::test]
    async fn test_retired_view() {
        let retired = catalog().fetch_retired().await;
        assert_eq!(names(&retired), vec!["Pelé", "Zidane"]);

        let by_status = catalog().fetch_by_field(PlayerField::Status, "Retired").await;
        assert_eq!(by_status, retired);
    }

    #[tokio::test]
    async fn test_fetch_by_field_is_case_and_space_insensitive() {
        let brazil = catalog().fetch_by_field(PlayerField::Country, "BRAZIL ").await;
        assert_eq!(names(&brazil), vec!["alisson", "Casemiro"]);

        let legends = catalog().fetch_by_field(PlayerField::Rarity, "legendary").await;
        assert_eq!(names(&legends), vec!["Messi"]);

        assert!(catalog().fetch_by_field(PlayerField::Club, "Atlantis FC").await.is_empty());
    }

    #[tokio::test]
    async fn test_unique_values_skip_retired_and_blank() {
        let catalog = catalog();
        for field in PlayerField::ALL {
            let values = catalog.fetch_unique_values(field).await;
            assert!(values.iter().all(|v| !v.trim().is_empty()));
            assert!(values.iter().all(|v| !v.to_lowercase().contains("retired")));
            let keys: Vec<String> = values.iter().map(|v| v.to_lowercase()).collect();
            let mut sorted = keys.clone();
            sorted.sort();
            assert_eq!(keys, sorted, "{:?} not sorted", field);
        }

        assert_eq!(
            catalog.fetch_unique_values(PlayerField::Country).await,
            vec!["Argentina", "Brazil"]
        );
        assert_eq!(
            catalog.fetch_unique_values(PlayerField::Club).await,
            vec!["Inter Miami", "Liverpool", "Manchester United"]
        );
        assert_eq!(catalog.fetch_unique_values(PlayerField::Status).await, vec!["Active"]);
    }

    #[tokio::test]
    async fn test_player_lookup_is_case_and_whitespace_tolerant() {
        let catalog = catalog();
        let canonical = catalog.fetch_player("Messi").await.unwrap();
        assert_eq!(catalog.fetch_player(" messi ").await, Some(canonical.clone()));
        assert_eq!(catalog.fetch_player("MESSI").await, Some(canonical.clone()));
        assert_eq!(
            canonical.video_link.as_deref(),
            Some("https://v.example/messi.mp4")
        );
        assert!(canonical.text.contains("Yearly Earnings: 100 sTLOS"));

        assert!(catalog.fetch_player("pelé").await.unwrap().text.contains("Retired"));
        assert_eq!(catalog.fetch_player("Maradona").await, None);
        assert_eq!(catalog.fetch_player("   ").await, None);
    }

    #[tokio::test]
    async fn test_resolve_truncated_names() {
        let catalog = catalog();
        assert_eq!(catalog.resolve_player_name("case").await.as_deref(), Some("Casemiro"));
        assert_eq!(catalog.resolve_player_name("ALISSON").await.as_deref(), Some("alisson"));
        assert_eq!(catalog.resolve_player_name("xyz").await, None);
        assert_eq!(
            catalog.resolve_value(PlayerField::Club, "manchester u").await.as_deref(),
            Some("Manchester United")
        );
    }

    #[tokio::test]
    async fn test_top_earners_sorted_descending() {
        let table = SheetTable::new(
            row(&["Player", "Club", "Country", "Total Yearly Earnings"]),
            vec![
                row(&["A", "X", "Y", "$100"]),
                row(&["B", "X", "Y", "$50"]),
                row(&["C", "X", "Y", "$75"]),
            ],
        );
        let top = catalog_with(table)
            .fetch_top_earners(EarningsPeriod::Total, 0)
            .await;
        let order: Vec<&str> = top.items.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "B"]);
        assert_eq!(top.total, 3);
        assert!(!top.has_next());
    }

    #[tokio::test]
    async fn test_top_earners_skip_retired_and_unparseable() {
        let season = catalog().fetch_top_earners(EarningsPeriod::Season, 0).await;
        let order: Vec<&str> = season.items.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(order, vec!["Casemiro", "Messi"]);

        // No month column in this sheet.
        let month = catalog().fetch_top_earners(EarningsPeriod::Month, 0).await;
        assert!(month.is_empty());
    }

    #[tokio::test]
    async fn test_twenty_five_players_paginate_alphabetically() {
        let rows = (1..=25)
            .rev()
            .map(|i| {
                let name = format!("Player {:02}", i);
                row(&[name.as_str(), "Common", "Forward", "Club", "Country"])
            })
            .collect();
        let table = SheetTable::new(row(&["Player", "Rarity", "Position", "Club", "Country"]), rows);
        let names = catalog_with(table).fetch_sorted_names().await;

        let first = paginate(&names, 0);
        assert_eq!(first.items.first().map(String::as_str), Some("Player 01"));
        assert_eq!(first.items.last().map(String::as_str), Some("Player 10"));
        assert!(first.has_next() && !first.has_prev());

        let last = paginate(&names, 2);
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.items.first().map(String::as_str), Some("Player 21"));
        assert!(last.has_prev() && !last.has_next());
    }

    #[tokio::test]
    async fn test_earnings_history() {
        let history = catalog().fetch_earnings_history(" messi").await.unwrap();
        assert_eq!(history.player, "Messi");
        assert_eq!(
            history.points,
            vec![("Aug 2024".to_string(), 10.0), ("Oct 2024".to_string(), 25.5)]
        );
        assert_eq!(catalog().fetch_earnings_history("Casemiro").await, None);
        assert_eq!(catalog().fetch_earnings_history("Nobody").await, None);
    }

    #[tokio::test]
    async fn test_player_name_header_fallback() {
        let table = SheetTable::new(
            row(&["Player Name", "Club", "Country"]),
            vec![row(&["Messi", "Inter Miami", "Argentina"])],
        );
        assert_eq!(names(&catalog_with(table).fetch_all().await), vec!["Messi"]);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_empty() {
        let catalog = Catalog::new(
            Arc::new(FailingSheets),
            "Player List",
            "Monthly Earnings",
            SheetSchema::default(),
            "sTLOS",
        );
        assert!(catalog.fetch_all().await.is_empty());
        assert!(catalog.fetch_unique_values(PlayerField::Club).await.is_empty());
        assert_eq!(catalog.fetch_player("Messi").await, None);
        assert!(catalog.fetch_top_earners(EarningsPeriod::Season, 0).await.is_empty());
        assert_eq!(catalog.fetch_earnings_history("Messi").await, None);
    }

    #[tokio::test]
    async fn test_roster_serves_resolve_and_filter_from_one_read() {
        let sheets = Arc::new(CountingSheets {
            table: player_table(),
            reads: AtomicUsize::new(0),
        });
        let catalog = Catalog::new(
            sheets.clone(),
            "Player List",
            "Monthly Earnings",
            SheetSchema::default(),
            "sTLOS",
        );

        let roster = catalog.load_roster().await.unwrap();
        let club = roster.resolve_value(PlayerField::Club, "manchester").unwrap();
        assert_eq!(names(&roster.by_field(PlayerField::Club, &club)), vec!["Casemiro"]);
        let name = roster.resolve_player_name("ali").unwrap();
        assert_eq!(roster.player(&name).map(|r| r.club.as_str()), Some("Liverpool"));

        assert_eq!(sheets.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_status_values_resolve_to_both_views() {
        let roster = catalog().load_roster().await.unwrap();
        assert_eq!(roster.resolve_value(PlayerField::Status, "active").as_deref(), Some("Active"));
        assert_eq!(roster.resolve_value(PlayerField::Status, "retired").as_deref(), Some("Retired"));
        assert_eq!(names(&roster.by_field(PlayerField::Status, "Retired")), vec!["Pelé", "Zidane"]);
        assert_eq!(roster.resolve_value(PlayerField::Status, "benched"), None);
    }

    #[tokio::test]
    async fn test_load_calls_surface_upstream_failure() {
        let catalog = Catalog::new(
            Arc::new(FailingSheets),
            "Player List",
            "Monthly Earnings",
            SheetSchema::default(),
            "sTLOS",
        );
        assert!(matches!(catalog.load_roster().await, Err(SheetError::Auth(_))));
        assert!(matches!(
            catalog.load_earnings_history("Messi").await,
            Err(SheetError::Auth(_))
        ));
    }
}
