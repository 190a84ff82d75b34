//! IGDB search with a cached Twitch client-credentials token.
//!
//! The token lives in a [`TokenCache`] owned by the client. Refreshes happen
//! under the cache lock, so concurrent requests wait for one fetch instead of
//! each requesting their own token.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

use crate::{config::IgdbConfig, error::AppError, upstream::Transport};

/// Tokens this close to expiry are treated as expired.
const REFRESH_MARGIN_SECS: i64 = 60;
pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 50;
const SEARCH_FIELDS: &str = "name,slug,first_release_date,cover.url,platforms.name";

#[derive(Debug, Clone)]
pub struct IgdbToken {
    pub access_token: String,
    pub expires_at: NaiveDateTime,
}

impl IgdbToken {
    fn is_fresh(&self, now: NaiveDateTime) -> bool {
        now.checked_add_signed(Duration::seconds(REFRESH_MARGIN_SECS))
            .is_some_and(|deadline| deadline < self.expires_at)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Default)]
pub struct TokenCache {
    entry: Mutex<Option<IgdbToken>>,
}

struct Credentials {
    client_id: String,
    client_secret: String,
}

pub struct IgdbClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    auth_url: String,
    credentials: Option<Credentials>,
    cache: TokenCache,
}

impl IgdbClient {
    pub fn new(config: &IgdbConfig, transport: Arc<dyn Transport>) -> Self {
        let credentials = match (&config.client_id, &config.client_secret) {
            (Some(client_id), Some(client_secret)) => Some(Credentials {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            }),
            _ => None,
        };
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_url: config.auth_url.clone(),
            credentials,
            cache: TokenCache::default(),
        }
    }

    fn credentials(&self) -> Result<&Credentials, AppError> {
        self.credentials
            .as_ref()
            .ok_or(AppError::MissingConfig("IGDB_CLIENT_ID / IGDB_CLIENT_SECRET"))
    }

    /// Returns the cached token, fetching a new one if it is missing or stale.
    pub async fn access_token(&self, now: NaiveDateTime) -> Result<String, AppError> {
        let credentials = self.credentials()?;
        let mut entry = self.cache.entry.lock().await;
        if let Some(token) = entry.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.access_token.clone());
        }

        let token = self.request_token(credentials, now).await?;
        let access_token = token.access_token.clone();
        *entry = Some(token);
        Ok(access_token)
    }

    async fn request_token(
        &self,
        credentials: &Credentials,
        now: NaiveDateTime,
    ) -> Result<IgdbToken, AppError> {
        let url = Url::parse_with_params(
            &self.auth_url,
            [
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ],
        )?;
        let response: TokenResponse = self.transport.post(url, &[], String::new()).await?.json()?;
        let expires_at = expires_at(now, response.expires_in)
            .ok_or(AppError::TokenLifetime(response.expires_in))?;
        info!(expires_in = response.expires_in, "fetched IGDB access token");
        Ok(IgdbToken {
            access_token: response.access_token,
            expires_at,
        })
    }

    pub async fn search_games(
        &self,
        search: &str,
        limit: Option<u32>,
        now: NaiveDateTime,
    ) -> Result<Value, AppError> {
        let token = self.access_token(now).await?;
        let client_id = self.credentials()?.client_id.clone();
        let url = Url::parse(&format!("{}/games", self.base_url))?;
        let body = search_query(search, limit);
        debug!(%body, "querying IGDB");

        let headers = [
            ("Client-ID", client_id),
            ("Authorization", format!("Bearer {token}")),
            ("Accept", "application/json".to_string()),
        ];
        self.transport.post(url, &headers, body).await?.json()
    }
}

/// `None` for a non-positive lifetime or one that does not fit a timestamp.
fn expires_at(now: NaiveDateTime, expires_in: i64) -> Option<NaiveDateTime> {
    if expires_in <= 0 {
        return None;
    }
    now.checked_add_signed(Duration::try_seconds(expires_in)?)
}

/// Apicalypse body for a name search.
pub fn search_query(search: &str, limit: Option<u32>) -> String {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let escaped = search.trim().replace('\\', "\\\\").replace('"', "\\\"");
    format!("search \"{escaped}\"; fields {SEARCH_FIELDS}; limit {limit};")
}
