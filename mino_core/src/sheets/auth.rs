use std::path::Path;

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use tokio::sync::Mutex;

use super::dto::{ServiceAccountClaims, ServiceAccountKey, TokenResponse};
use super::SheetError;

pub const SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets.readonly https://www.googleapis.com/auth/drive.readonly";

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Refresh this many seconds before Google says the token expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: i64,
}

/// Exchanges a signed service-account assertion for an OAuth access token and
/// keeps it until shortly before it expires.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key,
            cached: Mutex::new(None),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, SheetError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SheetError::Key(format!("{}: {}", path.display(), e)))?;
        let key: ServiceAccountKey = serde_json::from_str(&raw)?;
        Ok(Self::new(key))
    }

    pub fn sign_assertion(&self, now: i64) -> Result<String, SheetError> {
        let claims = ServiceAccountClaims {
            iss: self.key.client_email.clone(),
            scope: SCOPES.to_string(),
            aud: self.key.token_uri.clone(),
            iat: now,
            exp: now + Duration::hours(1).num_seconds(),
        };

        let key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| SheetError::Key(e.to_string()))?;

        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| SheetError::Key(e.to_string()))
    }

    pub async fn access_token(&self, client: &Client) -> Result<String, SheetError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now().timestamp();

        if let Some(token) = cached.as_ref() {
            if token.expires_at - EXPIRY_MARGIN_SECS > now {
                return Ok(token.value.clone());
            }
        }

        log::debug!("Requesting Google access token for {}", self.key.client_email);

        let assertion = self.sign_assertion(now)?;
        let response = client
            .post(&self.key.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(SheetError::Auth(format!("token endpoint returned {}: {}", status, body)));
        }

        let token: TokenResponse = response.json().await?;
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: now + token.expires_in,
        });

        Ok(token.access_token)
    }
}
