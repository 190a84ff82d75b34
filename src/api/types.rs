use serde::{Deserialize, Serialize};

use crate::rawg::GameSummary;

#[derive(Serialize)]
pub struct GameListing {
    pub count: usize,
    pub results: Vec<GameSummary>,
}

impl GameListing {
    pub fn new(results: Vec<GameSummary>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct GameQuery {
    pub slug: Option<String>,
}

/// `GET /api/games`.
#[derive(Deserialize, Default)]
pub struct GamesQuery {
    pub platform: Option<String>,
    pub ordering: Option<String>,
    pub sort: Option<String>,
    pub dates: Option<String>,
    pub range: Option<String>,
    pub page_size: Option<u32>,
}

/// `GET /games`, the older listing with explicit bounds.
#[derive(Deserialize, Default)]
pub struct LegacyGamesQuery {
    pub platform: Option<String>,
    pub sort: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct ReleasesQuery {
    pub section: Option<String>,
    #[serde(rename = "timeFilter")]
    pub time_filter: Option<String>,
    pub platform: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct IgdbQuery {
    pub search: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct EnvStatus {
    pub status: &'static str,
    pub length: usize,
}
