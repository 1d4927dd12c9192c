use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::helpers::utils::{fold_key, normalize_text};

/// `spreadsheets.values.get` response.
#[derive(Debug, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

/// The subset of a service-account key file we need.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceAccountClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Debug, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DriveFileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

/// A worksheet read as a header row followed by data rows. Every data row
/// has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| normalize_text(h)).collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Builds a table from raw API cells. Numbers and booleans are
    /// stringified, nulls become blanks.
    pub fn from_values(values: Vec<Vec<Value>>) -> Self {
        let mut rows = values.into_iter().map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
        });
        let headers = rows.next().unwrap_or_default();
        Self::new(headers, rows.collect())
    }

    /// Index of the column whose header matches `name` case-insensitively.
    pub fn column(&self, name: &str) -> Option<usize> {
        let wanted = fold_key(name);
        self.headers.iter().position(|h| fold_key(h) == wanted)
    }

    /// Exact header first, then the first header containing `fallback`.
    pub fn column_or_containing(&self, name: &str, fallback: &str) -> Option<usize> {
        self.column(name).or_else(|| {
            let needle = fold_key(fallback);
            self.headers.iter().position(|h| fold_key(h).contains(&needle))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_values_pads_and_stringifies() {
        let values = vec![
            vec![json!("Player"), json!(" Rarity "), json!("Total")],
            vec![json!("Messi"), json!("Legendary")],
            vec![json!("Pele"), json!(null), json!(1234.5)],
            vec![json!(""), json!("  ")],
        ];
        let table = SheetTable::from_values(values);
        assert_eq!(table.headers, vec!["Player", "Rarity", "Total"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["Messi", "Legendary", ""]);
        assert_eq!(table.rows[1], vec!["Pele", "", "1234.5"]);
    }

    #[test]
    fn test_column_lookup() {
        let table = SheetTable::new(
            vec!["Player Name".into(), "CLUB".into()],
            Vec::new(),
        );
        assert_eq!(table.column("club"), Some(1));
        assert_eq!(table.column("Player"), None);
        assert_eq!(table.column_or_containing("Player", "player"), Some(0));
        assert!(table.rows.is_empty());
    }
}
