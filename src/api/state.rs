use std::sync::Arc;

use crate::config::Config;
use crate::dates::Clock;
use crate::igdb::IgdbClient;
use crate::rawg::RawgClient;
use crate::upstream::Transport;

#[derive(Clone)]
pub struct AppState {
    pub(super) rawg: Arc<RawgClient>,
    pub(super) igdb: Arc<IgdbClient>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) site_url: Arc<str>,
}

impl AppState {
    pub fn new(config: &Config, transport: Arc<dyn Transport>, clock: Arc<dyn Clock>) -> Self {
        Self {
            rawg: Arc::new(RawgClient::new(&config.rawg, transport.clone())),
            igdb: Arc::new(IgdbClient::new(&config.igdb, transport)),
            clock,
            site_url: Arc::from(config.site_url.as_str()),
        }
    }
}
