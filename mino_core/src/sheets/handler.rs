use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tokio::sync::OnceCell;

use super::auth::ServiceAccountAuth;
use super::dto::{DriveFileList, SheetTable, ValueRange};
use super::{SheetError, SheetSource};
use crate::config::{SheetConfig, SheetCredentials, SpreadsheetLocator};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4";
const DRIVE_API: &str = "https://www.googleapis.com/drive/v3";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

pub enum SheetAuth {
    ServiceAccount(ServiceAccountAuth),
    ApiKey(String),
}

/// Google Sheets v4 reader. Every `read_table` call fetches the whole
/// worksheet, nothing is cached apart from the access token and the
/// spreadsheet id.
pub struct GoogleSheets {
    client: Client,
    auth: SheetAuth,
    spreadsheet: SpreadsheetLocator,
    resolved_id: OnceCell<String>,
    sheets_api: String,
    drive_api: String,
}

impl GoogleSheets {
    pub fn new(auth: SheetAuth, spreadsheet: SpreadsheetLocator) -> Self {
        Self {
            client: Client::new(),
            auth,
            spreadsheet,
            resolved_id: OnceCell::new(),
            sheets_api: SHEETS_API.to_string(),
            drive_api: DRIVE_API.to_string(),
        }
    }

    pub fn from_config(config: &SheetConfig) -> Result<Self, SheetError> {
        let auth = match &config.credentials {
            SheetCredentials::ServiceAccount(path) => {
                SheetAuth::ServiceAccount(ServiceAccountAuth::from_file(path)?)
            }
            SheetCredentials::ApiKey(key) => SheetAuth::ApiKey(key.clone()),
        };
        Ok(Self::new(auth, config.spreadsheet.clone()))
    }

    /// Points the client at other API roots, used against mock servers.
    pub fn with_endpoints(mut self, sheets_api: &str, drive_api: &str) -> Self {
        self.sheets_api = sheets_api.trim_end_matches('/').to_string();
        self.drive_api = drive_api.trim_end_matches('/').to_string();
        self
    }

    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, SheetError> {
        match &self.auth {
            SheetAuth::ApiKey(key) => Ok(request.query(&[("key", key.as_str())])),
            SheetAuth::ServiceAccount(auth) => {
                let token = auth.access_token(&self.client).await?;
                Ok(request.bearer_auth(token))
            }
        }
    }

    async fn spreadsheet_id(&self) -> Result<&str, SheetError> {
        let id = self
            .resolved_id
            .get_or_try_init(|| async {
                match &self.spreadsheet {
                    SpreadsheetLocator::Id(id) => Ok(id.clone()),
                    SpreadsheetLocator::Name(name) => self.find_spreadsheet(name).await,
                }
            })
            .await?;
        Ok(id.as_str())
    }

    async fn find_spreadsheet(&self, name: &str) -> Result<String, SheetError> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            name.replace('\\', "\\\\").replace('\'', "\\'"),
            SPREADSHEET_MIME
        );

        let request = self
            .client
            .get(format!("{}/files", self.drive_api))
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id,name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ]);
        let response = self.authorize(request).await?.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let list: DriveFileList = response.json().await?;
        let file = list
            .files
            .into_iter()
            .next()
            .ok_or_else(|| SheetError::NotFound(format!("spreadsheet '{}'", name)))?;

        log::info!("Resolved spreadsheet '{}' to id {}", name, file.id);
        Ok(file.id)
    }
}

/// A1 range covering a whole worksheet.
fn sheet_range(worksheet: &str) -> String {
    format!("'{}'", worksheet.replace('\'', "''"))
}

#[async_trait]
impl SheetSource for GoogleSheets {
    async fn read_table(&self, worksheet: &str) -> Result<SheetTable, SheetError> {
        let id = self.spreadsheet_id().await?;
        let url = format!(
            "{}/spreadsheets/{}/values/{}",
            self.sheets_api,
            id,
            urlencoding::encode(&sheet_range(worksheet))
        );

        let request = self
            .client
            .get(&url)
            .query(&[("majorDimension", "ROWS")]);
        let response = self.authorize(request).await?.send().await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(SheetError::NotFound(format!("worksheet '{}'", worksheet)));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(SheetError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let range: ValueRange = response.json().await?;
        Ok(SheetTable::from_values(range.values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::dto::ServiceAccountKey;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_KEY: &str = include_str!("test_key.pem");

    fn player_values() -> serde_json::Value {
        json!({
            "range": "'Player List'!A1:C3",
            "majorDimension": "ROWS",
            "values": [
                ["Player", "Rarity", "Club"],
                ["Messi", "Legendary", "Inter Miami"],
                ["Pele", "Icon"]
            ]
        })
    }

    #[test]
    fn test_sheet_range_quotes_names() {
        assert_eq!(sheet_range("Player List"), "'Player List'");
        assert_eq!(sheet_range("Bob's"), "'Bob''s'");
    }

    #[tokio::test]
    async fn test_read_table_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/spreadsheets/sheet-1/values/.+Player.+List.+$"))
            .and(query_param("key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(player_values()))
            .expect(1)
            .mount(&server)
            .await;

        let sheets = GoogleSheets::new(
            SheetAuth::ApiKey("secret".to_string()),
            SpreadsheetLocator::Id("sheet-1".to_string()),
        )
        .with_endpoints(&server.uri(), &server.uri());

        let table = sheets.read_table("Player List").await.unwrap();
        assert_eq!(table.headers, vec!["Player", "Rarity", "Club"]);
        assert_eq!(table.rows[1], vec!["Pele", "Icon", ""]);
    }

    #[tokio::test]
    async fn test_read_table_maps_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/spreadsheets/missing/values/.*$"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/spreadsheets/locked/values/.*$"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let missing = GoogleSheets::new(
            SheetAuth::ApiKey("k".to_string()),
            SpreadsheetLocator::Id("missing".to_string()),
        )
        .with_endpoints(&server.uri(), &server.uri());
        assert!(matches!(
            missing.read_table("Player List").await,
            Err(SheetError::NotFound(_))
        ));

        let locked = GoogleSheets::new(
            SheetAuth::ApiKey("k".to_string()),
            SpreadsheetLocator::Id("locked".to_string()),
        )
        .with_endpoints(&server.uri(), &server.uri());
        match locked.read_table("Player List").await {
            Err(SheetError::Status { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("unexpected result: {:?}", other.map(|t| t.headers)),
        }
    }

    #[tokio::test]
    async fn test_service_account_resolves_name_once() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=urn"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok-1",
                "expires_in": 3600,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/files"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [{"id": "resolved-id", "name": "Mino Football Earnings - 2024/25"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path_regex(r"^/spreadsheets/resolved-id/values/.*$"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(player_values()))
            .expect(2)
            .mount(&server)
            .await;

        let key = ServiceAccountKey {
            client_email: "bot@mino.iam.gserviceaccount.com".to_string(),
            private_key: TEST_KEY.to_string(),
            token_uri: format!("{}/token", server.uri()),
        };
        let sheets = GoogleSheets::new(
            SheetAuth::ServiceAccount(ServiceAccountAuth::new(key)),
            SpreadsheetLocator::Name("Mino Football Earnings - 2024/25".to_string()),
        )
        .with_endpoints(&server.uri(), &server.uri());

        let first = sheets.read_table("Player List").await.unwrap();
        let second = sheets.read_table("Player List").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.rows.len(), 2);
    }

    #[tokio::test]
    async fn test_token_endpoint_failure_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let key = ServiceAccountKey {
            client_email: "bot@mino.iam.gserviceaccount.com".to_string(),
            private_key: TEST_KEY.to_string(),
            token_uri: format!("{}/token", server.uri()),
        };
        let sheets = GoogleSheets::new(
            SheetAuth::ServiceAccount(ServiceAccountAuth::new(key)),
            SpreadsheetLocator::Id("sheet-1".to_string()),
        )
        .with_endpoints(&server.uri(), &server.uri());

        assert!(matches!(
            sheets.read_table("Player List").await,
            Err(SheetError::Auth(_))
        ));
    }

    #[test]
    fn test_bad_private_key_is_rejected() {
        let auth = ServiceAccountAuth::new(ServiceAccountKey {
            client_email: "bot@mino.iam.gserviceaccount.com".to_string(),
            private_key: "not a key".to_string(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
        });
        assert!(matches!(auth.sign_assertion(0), Err(SheetError::Key(_))));
    }
}
