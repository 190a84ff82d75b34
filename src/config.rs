use std::{fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_RAWG_BASE_URL: &str = "https://api.rawg.io/api";
pub const DEFAULT_IGDB_BASE_URL: &str = "https://api.igdb.com/v4";
pub const DEFAULT_IGDB_AUTH_URL: &str = "https://id.twitch.tv/oauth2/token";
pub const MAX_PAGE_SIZE: u32 = 40;

/// Settings read once at startup. Blank variables count as unset.
#[derive(Clone)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub site_url: String,
    pub upstream_timeout: Duration,
    pub rawg: RawgConfig,
    pub igdb: IgdbConfig,
}

#[derive(Clone)]
pub struct RawgConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub page_size: u32,
}

#[derive(Clone)]
pub struct IgdbConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub base_url: String,
    pub auth_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        // RAWG_API_KEY is the name the legacy listing used.
        let api_key = var("RAWG_KEY").or_else(|| {
            let legacy = var("RAWG_API_KEY");
            if legacy.is_some() {
                info!("RAWG_KEY not set, using RAWG_API_KEY");
            }
            legacy
        });

        Self {
            bind: var("GAMEFEED_BIND").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&var, "PORT", DEFAULT_PORT),
            site_url: var("SITE_URL")
                .unwrap_or_else(|| format!("http://localhost:{DEFAULT_PORT}"))
                .trim_end_matches('/')
                .to_string(),
            upstream_timeout: Duration::from_secs(parse_or(&var, "UPSTREAM_TIMEOUT_SECS", 10)),
            rawg: RawgConfig {
                api_key,
                base_url: var("RAWG_BASE_URL").unwrap_or_else(|| DEFAULT_RAWG_BASE_URL.to_string()),
                page_size: parse_or(&var, "RAWG_PAGE_SIZE", MAX_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            },
            igdb: IgdbConfig {
                client_id: var("IGDB_CLIENT_ID"),
                client_secret: var("IGDB_CLIENT_SECRET"),
                base_url: var("IGDB_BASE_URL").unwrap_or_else(|| DEFAULT_IGDB_BASE_URL.to_string()),
                auth_url: var("IGDB_AUTH_URL").unwrap_or_else(|| DEFAULT_IGDB_AUTH_URL.to_string()),
            },
        }
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let cfg = config(&[]);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.bind, "0.0.0.0");
        assert!(cfg.rawg.api_key.is_none());
        assert_eq!(cfg.rawg.base_url, DEFAULT_RAWG_BASE_URL);
        assert_eq!(cfg.rawg.page_size, 40);
        assert_eq!(cfg.igdb.auth_url, DEFAULT_IGDB_AUTH_URL);
        assert_eq!(cfg.upstream_timeout, Duration::from_secs(10));
        assert_eq!(cfg.site_url, "http://localhost:3000");
    }

    #[test]
    fn rawg_key_wins_over_legacy_name() {
        let cfg = config(&[("RAWG_KEY", "primary"), ("RAWG_API_KEY", "legacy")]);
        assert_eq!(cfg.rawg.api_key.as_deref(), Some("primary"));

        let cfg = config(&[("RAWG_API_KEY", " legacy ")]);
        assert_eq!(cfg.rawg.api_key.as_deref(), Some("legacy"));

        let cfg = config(&[("RAWG_KEY", "   ")]);
        assert!(cfg.rawg.api_key.is_none());
    }

    #[test]
    fn invalid_numbers_fall_back_and_page_size_is_clamped() {
        let cfg = config(&[
            ("PORT", "eighty"),
            ("RAWG_PAGE_SIZE", "500"),
            ("SITE_URL", "https://games.example.com/"),
        ]);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.rawg.page_size, 40);
        assert_eq!(cfg.site_url, "https://games.example.com");

        let cfg = config(&[("RAWG_PAGE_SIZE", "0")]);
        assert_eq!(cfg.rawg.page_size, 1);
    }
}
