//! Reply text. Everything here produces Telegram HTML.

use serde_json::json;
use teloxide::utils::html::escape;

use crate::catalog::dto::{EarningsHistory, EarningsPeriod, EarningsRecord, PlayerRecord};
use crate::helpers::pagination::Paged;
use crate::helpers::utils::{format_amount, parse_amount};

const QUICKCHART_URL: &str = "https://quickchart.io/chart";
const BAR_WIDTH: usize = 16;

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "–".to_string()
    } else {
        escape(value)
    }
}

fn earnings_cell(raw: &str, unit: &str) -> String {
    match parse_amount(raw) {
        Some(amount) => format!("{} {}", format_amount(amount), escape(unit)),
        None => or_dash(raw),
    }
}

pub fn player_card(record: &PlayerRecord, unit: &str) -> String {
    let mut text = format!(
        "🔹 <b>{}</b> 🔹\n🎭 Rarity: {}\n⚽ Position: {}\n🏟️ Club: {}\n🌍 Country: {}\n💰 Yearly Earnings: {}\n📅 Season Earnings: {}",
        escape(&record.player),
        or_dash(&record.rarity),
        or_dash(&record.position),
        or_dash(&record.club),
        or_dash(&record.country),
        earnings_cell(&record.total_earnings, unit),
        earnings_cell(&record.season_earnings, unit),
    );

    if !record.month_earnings.trim().is_empty() {
        text.push_str(&format!(
            "\n🗓️ Monthly Earnings: {}",
            earnings_cell(&record.month_earnings, unit)
        ));
    }

    if record.is_retired() {
        text.push_str("\n🗄️ <i>Retired</i>");
    }

    text
}

pub fn player_list_header(title: &str, paged: &Paged<String>) -> String {
    format!(
        "📋 <b>{}</b>\n{} players · page {}/{}\n\nTap a player to see their card.",
        escape(title),
        paged.total,
        paged.page + 1,
        paged.page_count()
    )
}

pub fn filter_values_header(field_label: &str, paged: &Paged<String>) -> String {
    format!(
        "🔎 <b>Filter by {}</b>\npage {}/{}\n\nPick a value:",
        escape(field_label),
        paged.page + 1,
        paged.page_count()
    )
}

pub fn top_earners(period: EarningsPeriod, paged: &Paged<EarningsRecord>, unit: &str) -> String {
    let lines = paged
        .items
        .iter()
        .enumerate()
        .map(|(i, record)| {
            format!(
                "{}. <b>{}</b> — {} {}",
                paged.offset() + i + 1,
                escape(&record.player),
                format_amount(record.amount),
                escape(unit)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "💰 <b>Top earners · {}</b> (page {}/{})\n\n{}",
        period.label(),
        paged.page + 1,
        paged.page_count(),
        lines
    )
}

/// QuickChart URL rendering the history as a bar chart.
pub fn chart_url(history: &EarningsHistory, unit: &str) -> String {
    let labels: Vec<&str> = history.points.iter().map(|(label, _)| label.as_str()).collect();
    let data: Vec<f64> = history.points.iter().map(|(_, amount)| *amount).collect();

    let config = json!({
        "type": "bar",
        "data": {
            "labels": labels,
            "datasets": [{
                "label": format!("{} ({})", history.player, unit),
                "data": data,
            }]
        }
    });

    format!(
        "{}?w=600&h=360&c={}",
        QUICKCHART_URL,
        urlencoding::encode(&config.to_string())
    )
}

pub fn chart_caption(history: &EarningsHistory, unit: &str) -> String {
    format!(
        "📈 <b>{}</b>\nTotal over {} periods: {} {}",
        escape(&history.player),
        history.points.len(),
        format_amount(history.total()),
        escape(unit)
    )
}

/// Text fallback for when the chart image can't be sent.
pub fn text_chart(history: &EarningsHistory, unit: &str) -> String {
    let max = history
        .points
        .iter()
        .map(|(_, amount)| *amount)
        .fold(0.0_f64, f64::max);

    let rows = history
        .points
        .iter()
        .map(|(label, amount)| {
            let filled = if max > 0.0 {
                ((amount.max(0.0) / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            format!(
                "{:<10} {}{} {}",
                label,
                "█".repeat(filled),
                "░".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
                format_amount(*amount)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n<pre>{}</pre>",
        chart_caption(history, unit),
        escape(&rows)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::dto::PlayerStatus;
    use crate::helpers::pagination::paginate;

    fn messi() -> PlayerRecord {
        PlayerRecord {
            player: "Lionel <Messi>".to_string(),
            rarity: "Legendary".to_string(),
            position: "Forward".to_string(),
            club: "Inter Miami".to_string(),
            country: "Argentina".to_string(),
            total_earnings: "$1,234.5".to_string(),
            season_earnings: "".to_string(),
            month_earnings: "".to_string(),
            video_link: None,
            status: PlayerStatus::Active,
        }
    }

    #[test]
    fn test_player_card_escapes_and_formats() {
        let card = player_card(&messi(), "sTLOS");
        assert!(card.contains("<b>Lionel &lt;Messi&gt;</b>"));
        assert!(card.contains("Yearly Earnings: 1,234.50 sTLOS"));
        assert!(card.contains("Season Earnings: –"));
        assert!(!card.contains("Monthly"));
        assert!(!card.contains("Retired"));
    }

    #[test]
    fn test_retired_card_is_marked() {
        let mut record = messi();
        record.club = "Retired".to_string();
        record.status = PlayerStatus::Retired;
        assert!(player_card(&record, "sTLOS").contains("<i>Retired</i>"));
    }

    #[test]
    fn test_top_earners_numbering_continues_across_pages() {
        let records: Vec<EarningsRecord> = (0..12)
            .map(|i| EarningsRecord {
                player: format!("P{}", i),
                amount: 100.0 - i as f64,
            })
            .collect();
        let text = top_earners(EarningsPeriod::Season, &paginate(&records, 1), "sTLOS");
        assert!(text.contains("11. <b>P10</b> — 90 sTLOS"));
        assert!(text.contains("page 2/2"));
    }

    #[test]
    fn test_chart_outputs() {
        let history = EarningsHistory {
            player: "Messi".to_string(),
            points: vec![("Aug".to_string(), 50.0), ("Sep".to_string(), 100.0)],
        };
        let url = chart_url(&history, "sTLOS");
        assert!(url.starts_with("https://quickchart.io/chart?w=600&h=360&c="));
        assert!(url.contains("Messi"));

        let text = text_chart(&history, "sTLOS");
        assert!(text.contains("Total over 2 periods: 150 sTLOS"));
        assert!(text.contains(&format!("{}{}", "█".repeat(8), "░".repeat(8))));
        assert!(text.contains(&"█".repeat(16)));
    }
}
