//! RAWG client and the one URL builder every listing endpoint goes through.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::{
    config::{RawgConfig, MAX_PAGE_SIZE},
    dates::{iso, DateRange},
    error::AppError,
    upstream::{redacted, Transport},
};

/// Lower bound of the trending fallback window.
pub const TRENDING_SINCE: &str = "2024-01-01";

/// One entry of a RAWG list response, kept as the upstream object so it is
/// relayed exactly as received. Accessors read the few fields the service needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameSummary(Map<String, Value>);

impl GameSummary {
    fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn name(&self) -> &str {
        self.text("name").unwrap_or_default()
    }

    pub fn slug(&self) -> &str {
        self.text("slug").unwrap_or_default()
    }

    pub fn released(&self) -> Option<&str> {
        self.text("released")
    }

    /// Calendar date of `released`, if present and well formed.
    pub fn release_date(&self) -> Option<NaiveDate> {
        self.released().and_then(parse_release)
    }
}

#[derive(Debug, Deserialize)]
struct RawgPage {
    #[serde(default)]
    results: Vec<GameSummary>,
}

/// Accepts `YYYY-MM-DD` and anything that starts with it.
pub fn parse_release(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Query for `GET /games`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub dates: Option<DateRange>,
    pub ordering: Option<String>,
    pub platforms: Option<String>,
    pub page_size: u32,
}

impl ListingRequest {
    pub fn new(page_size: u32) -> Self {
        Self {
            dates: None,
            ordering: None,
            platforms: None,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Recently added titles, used when a filtered listing comes back empty.
    pub fn trending(today: NaiveDate, page_size: u32) -> Self {
        Self::new(page_size)
            .ordering(Some("-added"))
            .dates(DateRange::new(TRENDING_SINCE, iso(today)))
    }

    pub fn dates(mut self, range: DateRange) -> Self {
        self.dates = Some(range);
        self
    }

    pub fn ordering(mut self, ordering: Option<&str>) -> Self {
        self.ordering = nonempty(ordering);
        self
    }

    pub fn platforms(mut self, platforms: Option<&str>) -> Self {
        self.platforms = nonempty(platforms);
        self
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page_size", self.page_size.to_string())];
        if let Some(dates) = &self.dates {
            pairs.push(("dates", dates.to_param()));
        }
        if let Some(ordering) = &self.ordering {
            pairs.push(("ordering", ordering.clone()));
        }
        if let Some(platforms) = &self.platforms {
            pairs.push(("platforms", platforms.clone()));
        }
        pairs
    }
}

fn nonempty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub struct RawgClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
}

impl RawgClient {
    pub fn new(config: &RawgConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            page_size: config.page_size,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn key_len(&self) -> Option<usize> {
        self.api_key.as_ref().map(String::len)
    }

    fn key(&self) -> Result<&str, AppError> {
        self.api_key
            .as_deref()
            .ok_or(AppError::MissingConfig("RAWG_KEY"))
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| AppError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("key", self.key()?);
        Ok(url)
    }

    pub fn listing_url(&self, request: &ListingRequest) -> Result<Url, AppError> {
        let mut url = self.endpoint(&["games"])?;
        url.query_pairs_mut().extend_pairs(request.query_pairs());
        Ok(url)
    }

    /// Raw listing body, for callers that relay it untouched.
    pub async fn fetch_listing(&self, request: &ListingRequest) -> Result<Value, AppError> {
        let url = self.listing_url(request)?;
        debug!(url = %redacted(&url), "fetching listing");
        self.transport.get(url).await?.json()
    }

    pub async fn list_games(&self, request: &ListingRequest) -> Result<Vec<GameSummary>, AppError> {
        let url = self.listing_url(request)?;
        debug!(url = %redacted(&url), "fetching listing");
        let page: RawgPage = self.transport.get(url).await?.json()?;
        Ok(page.results)
    }

    /// Detail payload for one slug, decoded but otherwise untouched.
    pub async fn game_detail(&self, slug: &str) -> Result<Value, AppError> {
        let url = self.endpoint(&["games", slug])?;
        debug!(url = %redacted(&url), "fetching detail");
        self.transport.get(url).await?.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::mock::{query_value, RecordingTransport};

    fn client(transport: Arc<RecordingTransport>, key: Option<&str>) -> RawgClient {
        RawgClient::new(
            &RawgConfig {
                api_key: key.map(str::to_string),
                base_url: "http://rawg.test/api".to_string(),
                page_size: 20,
            },
            transport,
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn listing_url_carries_every_set_parameter() {
        let rawg = client(Arc::new(RecordingTransport::default()), Some("k"));
        let request = ListingRequest::new(20)
            .dates(DateRange::new("2024-06-08", "2024-06-15"))
            .ordering(Some("-rating"))
            .platforms(Some("4"));
        let url = rawg.listing_url(&request).unwrap();

        assert_eq!(url.path(), "/api/games");
        assert_eq!(query_value(&url, "key").as_deref(), Some("k"));
        assert_eq!(query_value(&url, "dates").as_deref(), Some("2024-06-08,2024-06-15"));
        assert_eq!(query_value(&url, "ordering").as_deref(), Some("-rating"));
        assert_eq!(query_value(&url, "platforms").as_deref(), Some("4"));
        assert_eq!(query_value(&url, "page_size").as_deref(), Some("20"));
    }

    #[test]
    fn blank_options_are_omitted() {
        let rawg = client(Arc::new(RecordingTransport::default()), Some("k"));
        let url = rawg
            .listing_url(&ListingRequest::new(5).ordering(Some(" ")).platforms(None))
            .unwrap();
        assert!(query_value(&url, "ordering").is_none());
        assert!(query_value(&url, "platforms").is_none());
        assert!(query_value(&url, "dates").is_none());
    }

    #[test]
    fn trending_request_uses_fixed_lower_bound() {
        let request = ListingRequest::trending(today(), 40);
        assert_eq!(request.ordering.as_deref(), Some("-added"));
        assert_eq!(
            request.dates.map(|d| d.to_param()).as_deref(),
            Some("2024-01-01,2024-06-15")
        );
    }

    #[test]
    fn missing_key_is_reported_before_any_request() {
        let transport = Arc::new(RecordingTransport::default());
        let rawg = client(transport.clone(), None);
        let err = rawg.listing_url(&ListingRequest::new(10)).unwrap_err();
        assert!(matches!(err, AppError::MissingConfig("RAWG_KEY")));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn detail_slug_is_path_encoded() {
        let transport = Arc::new(RecordingTransport::with_json(vec![serde_json::json!({
            "name": "Hades",
            "released": "2020-09-17",
            "description_raw": "Defy the god of the dead.",
            "rating": 4.4
        })]));
        let rawg = client(transport.clone(), Some("k"));

        let detail = rawg.game_detail("hades ii").await.unwrap();
        assert_eq!(detail["name"], "Hades");
        assert_eq!(detail["rating"], 4.4);

        let urls = transport.urls();
        assert_eq!(urls[0].path(), "/api/games/hades%20ii");
    }

    #[tokio::test]
    async fn list_games_keeps_entries_verbatim() {
        let entry = serde_json::json!({
            "name": "Grand Theft Auto V",
            "slug": "grand-theft-auto-v",
            "released": "2013-09-17",
            "platforms": null,
            "metacritic": 92
        });
        let transport = Arc::new(RecordingTransport::with_json(vec![serde_json::json!({
            "count": 1,
            "results": [entry.clone()]
        })]));
        let rawg = client(transport, Some("k"));

        let games = rawg.list_games(&ListingRequest::new(10)).await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].slug(), "grand-theft-auto-v");
        assert_eq!(games[0].release_date(), NaiveDate::from_ymd_opt(2013, 9, 17));
        // No invented id, nulls survive.
        assert_eq!(serde_json::to_value(&games[0]).unwrap(), entry);
    }

    #[test]
    fn non_string_fields_read_as_missing() {
        let game: GameSummary =
            serde_json::from_value(serde_json::json!({ "name": null, "released": 2020 })).unwrap();
        assert_eq!(game.name(), "");
        assert_eq!(game.released(), None);
        assert_eq!(game.release_date(), None);
    }

    #[test]
    fn release_dates_parse_leniently() {
        assert_eq!(parse_release("2020-09-17"), NaiveDate::from_ymd_opt(2020, 9, 17));
        assert_eq!(
            parse_release("2020-09-17T00:00:00"),
            NaiveDate::from_ymd_opt(2020, 9, 17)
        );
        assert_eq!(parse_release("TBA"), None);
        assert_eq!(parse_release(""), None);
    }
}
