use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::AppError;

/// Status and body of an outbound call, already read to completion.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body, turning a non-success status into `AppError::Upstream`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        if !self.is_success() {
            return Err(AppError::Upstream {
                status: self.status,
                relay: false,
            });
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: Url) -> Result<UpstreamResponse, AppError>;

    async fn post(
        &self,
        url: Url,
        headers: &[(&'static str, String)],
        body: String,
    ) -> Result<UpstreamResponse, AppError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gamefeed/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: Url) -> Result<UpstreamResponse, AppError> {
        debug!(url = %redacted(&url), "GET upstream");
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(UpstreamResponse { status, body })
    }

    async fn post(
        &self,
        url: Url,
        headers: &[(&'static str, String)],
        body: String,
    ) -> Result<UpstreamResponse, AppError> {
        debug!(url = %redacted(&url), "POST upstream");
        let mut request = self
            .client
            .post(url)
            .header(CACHE_CONTROL, "no-cache")
            .body(body);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(UpstreamResponse { status, body })
    }
}

/// Upstream URL with credentials masked, for logs.
pub fn redacted(url: &Url) -> String {
    fn is_secret(name: &str) -> bool {
        matches!(name, "key" | "client_secret")
    }

    if !url.query_pairs().any(|(k, _)| is_secret(&k)) {
        return url.to_string();
    }
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if is_secret(&k) {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_api_keys_but_keeps_other_params() {
        let url = Url::parse("https://api.rawg.io/api/games?key=s3cret&ordering=-added").unwrap();
        let shown = redacted(&url);
        assert!(!shown.contains("s3cret"));
        assert!(shown.contains("key=***") || shown.contains("key=%2A%2A%2A"));
        assert!(shown.contains("ordering=-added"));
    }

    #[test]
    fn non_success_status_is_an_upstream_error() {
        let response = UpstreamResponse {
            status: 404,
            body: r#"{"detail":"Not found."}"#.to_string(),
        };
        let err = response.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, AppError::Upstream { status: 404, .. }));
    }
}
