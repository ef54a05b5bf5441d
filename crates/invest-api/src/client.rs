//! HTTP client for the Tinkoff Invest OpenAPI (REST v1).
//!
//! Every response is wrapped in an envelope of the form
//! `{"trackingId": "...", "status": "Ok" | "Error", "payload": {...}}`.
//! Error envelopes carry `{"message", "code"}` in the payload.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::errors::{InvestApiError, Result};
use crate::models::{Account, CurrencyBalance, Portfolio, Position};
use crate::traits::InvestApiClient;

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default base URL of the production OpenAPI.
pub const DEFAULT_API_URL: &str = "https://api-invest.tinkoff.ru/openapi";

const STATUS_OK: &str = "Ok";

// ─────────────────────────────────────────────────────────────────────────────
// API Response Types (internal, for parsing OpenAPI envelopes)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEnvelope {
    #[serde(default)]
    tracking_id: Option<String>,
    status: String,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ApiErrorPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiAccountsPayload {
    #[serde(default)]
    accounts: Vec<Account>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiPositionsPayload {
    #[serde(default)]
    positions: Vec<Position>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiCurrenciesPayload {
    #[serde(default)]
    currencies: Vec<CurrencyBalance>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Settings used to build a [`RestClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base URL of the OpenAPI, without trailing slash
    pub base_url: String,
    /// Access token issued in the broker's web UI
    pub token: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl ClientSettings {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// HTTP client for the Invest OpenAPI.
///
/// Cloning is cheap; clones share the underlying connection pool.
///
/// # Example
///
/// ```ignore
/// let client = RestClient::connect(ClientSettings::new("t.secret-token")).await?;
/// let accounts = client.list_accounts().await?;
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderValue,
}

impl RestClient {
    /// Create a client without talking to the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or not a valid header value,
    /// or the HTTP client cannot be initialized.
    pub fn new(settings: ClientSettings) -> Result<Self> {
        if settings.token.trim().is_empty() {
            return Err(InvestApiError::InvalidConfig(
                "access token is empty".to_string(),
            ));
        }

        let mut auth_header = HeaderValue::from_str(&format!("Bearer {}", settings.token))
            .map_err(|e| InvestApiError::InvalidConfig(format!("invalid access token format: {}", e)))?;
        auth_header.set_sensitive(true);

        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| {
                InvestApiError::InvalidConfig(format!("failed to initialize HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    /// Create a client and validate the token with one `list_accounts` call.
    ///
    /// Meant to run once at startup so that a bad token stops the process
    /// instead of silently producing empty scrapes.
    pub async fn connect(settings: ClientSettings) -> Result<Self> {
        info!("Setting up Invest OpenAPI client for {}", settings.base_url);
        let client = Self::new(settings)?;
        let accounts = client.list_accounts().await?;
        info!(
            "Invest OpenAPI token accepted by {}, {} account(s) visible",
            client.base_url(),
            accounts.len()
        );
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, self.auth_header.clone());
        headers
    }

    /// Make a GET request and unwrap the envelope payload.
    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[InvestApi] GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .query(query)
            .send()
            .await
            .map_err(|e| InvestApiError::Request(format!("GET {} failed: {}", path, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InvestApiError::Request(format!("failed to read response: {}", e)))?;

        decode_response(status, &body)
    }

    /// Fetch the positions of one account.
    pub async fn get_positions(&self, account_id: &str) -> Result<Vec<Position>> {
        let payload: ApiPositionsPayload = self
            .get("/portfolio", &[("brokerAccountId", account_id)])
            .await?;
        Ok(payload.positions)
    }

    /// Fetch the free currency balances of one account.
    pub async fn get_currencies(&self, account_id: &str) -> Result<Vec<CurrencyBalance>> {
        let payload: ApiCurrenciesPayload = self
            .get("/portfolio/currencies", &[("brokerAccountId", account_id)])
            .await?;
        Ok(payload.currencies)
    }
}

/// Turn an HTTP status and body into the envelope payload or an error.
fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    let envelope = serde_json::from_str::<ApiEnvelope>(body).ok();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        let message = envelope
            .and_then(|e| serde_json::from_value::<ApiErrorPayload>(e.payload).ok())
            .and_then(|p| p.message)
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(InvestApiError::Unauthorized(message));
    }

    let envelope = match envelope {
        Some(envelope) => envelope,
        None if !status.is_success() => {
            return Err(InvestApiError::Api {
                message: format!(
                    "HTTP {}: {}",
                    status,
                    body.chars().take(200).collect::<String>()
                ),
                code: None,
                tracking_id: None,
            });
        }
        None => {
            return Err(InvestApiError::Decode(format!(
                "unexpected response body: {}",
                body.chars().take(200).collect::<String>()
            )));
        }
    };

    if !status.is_success() || envelope.status != STATUS_OK {
        let payload: ApiErrorPayload =
            serde_json::from_value(envelope.payload).unwrap_or_default();
        return Err(InvestApiError::Api {
            message: payload
                .message
                .unwrap_or_else(|| format!("HTTP {}, status {}", status, envelope.status)),
            code: payload.code,
            tracking_id: envelope.tracking_id,
        });
    }

    serde_json::from_value(envelope.payload)
        .map_err(|e| InvestApiError::Decode(format!("{} (tracking id {:?})", e, envelope.tracking_id)))
}

// ─────────────────────────────────────────────────────────────────────────────
// InvestApiClient Trait Implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl InvestApiClient for RestClient {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let payload: ApiAccountsPayload = self.get("/user/accounts", &[]).await?;
        Ok(payload.accounts)
    }

    async fn get_portfolio(&self, account_id: &str) -> Result<Portfolio> {
        let positions = self.get_positions(account_id).await?;
        let currencies = self.get_currencies(account_id).await?;
        Ok(Portfolio {
            positions,
            currencies,
        })
    }
}
