//! Google Sheets v4 REST transport authenticated with a service account.

use crate::config::SheetsConfig;
use crate::error::StoreError;
use crate::sheets::transport::{RangeUpdate, Row, SheetsTransport};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// How long an authorized handle is reused before re-authenticating.
const HANDLE_TTL: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Row>,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

struct CachedToken {
    token: String,
    acquired_at: Instant,
}

/// Lazily acquired bearer token with a refresh-on-expiry lifecycle. The
/// signed assertion is cheap; the network exchange is what the TTL amortizes.
struct TokenManager {
    config: SheetsConfig,
    encoding_key: EncodingKey,
    current: RwLock<Option<CachedToken>>,
}

impl TokenManager {
    fn new(config: SheetsConfig) -> Result<Self, StoreError> {
        let encoding_key = EncodingKey::from_rsa_pem(config.private_key.as_bytes())
            .map_err(|e| StoreError::Config(format!("invalid service-account private key: {e}")))?;
        Ok(Self {
            config,
            encoding_key,
            current: RwLock::new(None),
        })
    }

    async fn bearer(&self, http: &reqwest::Client) -> Result<String, StoreError> {
        if let Some(cached) = self.current.read().await.as_ref() {
            if cached.acquired_at.elapsed() < HANDLE_TTL {
                return Ok(cached.token.clone());
            }
        }

        let token = self.exchange(http).await?;
        *self.current.write().await = Some(CachedToken {
            token: token.clone(),
            acquired_at: Instant::now(),
        });
        Ok(token)
    }

    /// Sign a short-lived RS256 assertion and trade it for an access token.
    async fn exchange(&self, http: &reqwest::Client) -> Result<String, StoreError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.config.service_account_email,
            scope: SHEETS_SCOPE,
            aud: TOKEN_URL,
            iat: now,
            exp: now + 3600,
        };
        let assertion = jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.encoding_key,
        )
        .map_err(|e| StoreError::Auth(format!("failed to sign auth assertion: {e}")))?;

        debug!("Exchanging service-account assertion for access token");

        let response = http
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Auth(format!(
                "token endpoint returned {status}: {message}"
            )));
        }

        let body: TokenResponse = response.json().await?;
        Ok(body.access_token)
    }
}

/// [`SheetsTransport`] over the Google Sheets REST API.
pub struct HttpTransport {
    http: reqwest::Client,
    tokens: TokenManager,
    spreadsheet_id: String,
}

impl HttpTransport {
    pub fn new(config: SheetsConfig) -> Result<Self, StoreError> {
        let spreadsheet_id = config.spreadsheet_id.clone();
        Ok(Self {
            http: reqwest::Client::new(),
            tokens: TokenManager::new(config)?,
            spreadsheet_id,
        })
    }

    fn full_range(sheet: &str, range: Option<&str>) -> String {
        match range {
            Some(r) => format!("{sheet}!{r}"),
            None => sheet.to_string(),
        }
    }

    async fn authorized(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let token = self.tokens.bearer(&self.http).await?;
        let response = builder.bearer_auth(token).send().await?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let message = response.text().await.unwrap_or_default();
        warn!(%status, "Sheets API call failed");
        Err(StoreError::Api { status, message })
    }
}

#[async_trait::async_trait]
impl SheetsTransport for HttpTransport {
    async fn get_values(&self, sheet: &str, range: Option<&str>) -> Result<Vec<Row>, StoreError> {
        let url = format!(
            "{SHEETS_API_BASE}/{}/values/{}",
            self.spreadsheet_id,
            Self::full_range(sheet, range)
        );
        let response = self.authorized(self.http.get(url)).await?;
        let body: ValuesResponse = response.json().await?;
        Ok(body.values)
    }

    async fn update_values(
        &self,
        sheet: &str,
        range: &str,
        rows: &[Row],
    ) -> Result<(), StoreError> {
        let url = format!(
            "{SHEETS_API_BASE}/{}/values/{}",
            self.spreadsheet_id,
            Self::full_range(sheet, Some(range))
        );
        let builder = self
            .http
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "values": rows }));
        self.authorized(builder).await?;
        Ok(())
    }

    async fn append_values(&self, sheet: &str, rows: &[Row]) -> Result<(), StoreError> {
        let url = format!(
            "{SHEETS_API_BASE}/{}/values/{sheet}:append",
            self.spreadsheet_id
        );
        let builder = self
            .http
            .post(url)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "values": rows }));
        self.authorized(builder).await?;
        Ok(())
    }

    async fn clear_values(&self, sheet: &str, range: Option<&str>) -> Result<(), StoreError> {
        let url = format!(
            "{SHEETS_API_BASE}/{}/values/{}:clear",
            self.spreadsheet_id,
            Self::full_range(sheet, range)
        );
        self.authorized(self.http.post(url).json(&json!({}))).await?;
        Ok(())
    }

    async fn batch_update_values(&self, updates: &[RangeUpdate]) -> Result<(), StoreError> {
        let url = format!(
            "{SHEETS_API_BASE}/{}/values:batchUpdate",
            self.spreadsheet_id
        );
        let data: Vec<_> = updates
            .iter()
            .map(|u| {
                json!({
                    "range": Self::full_range(&u.sheet, Some(&u.range)),
                    "values": u.rows,
                })
            })
            .collect();
        let builder = self.http.post(url).json(&json!({
            "valueInputOption": "RAW",
            "data": data,
        }));
        self.authorized(builder).await?;
        Ok(())
    }

    async fn add_sheet(&self, title: &str) -> Result<(), StoreError> {
        let url = format!("{SHEETS_API_BASE}/{}:batchUpdate", self.spreadsheet_id);
        let builder = self.http.post(url).json(&json!({
            "requests": [{ "addSheet": { "properties": { "title": title } } }],
        }));
        self.authorized(builder).await?;
        Ok(())
    }

    async fn sheet_titles(&self) -> Result<Vec<String>, StoreError> {
        let url = format!("{SHEETS_API_BASE}/{}", self.spreadsheet_id);
        let response = self
            .authorized(
                self.http
                    .get(url)
                    .query(&[("fields", "sheets.properties.title")]),
            )
            .await?;
        let meta: SpreadsheetMeta = response.json().await?;
        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }
}
