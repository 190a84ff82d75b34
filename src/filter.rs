use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::rawg::GameSummary;

pub const MIN_RELEASE_YEAR: i32 = 2018;

static BANNED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)hentai|porn|sex|erotic|nude|bdsm").expect("banned-term pattern")
});

/// True when neither the name nor the slug contains a banned term.
pub fn is_safe(game: &GameSummary) -> bool {
    !BANNED.is_match(game.name()) && !BANNED.is_match(game.slug())
}

/// Released on or before `today`, no earlier than 2018, and safe.
pub fn keep_release(game: &GameSummary, today: NaiveDate) -> bool {
    match game.release_date() {
        Some(released) => released <= today && released.year() >= MIN_RELEASE_YEAR && is_safe(game),
        None => false,
    }
}

pub fn apply(games: Vec<GameSummary>, today: NaiveDate) -> Vec<GameSummary> {
    games
        .into_iter()
        .filter(|game| keep_release(game, today))
        .collect()
}

pub fn apply_safety(games: Vec<GameSummary>) -> Vec<GameSummary> {
    games.into_iter().filter(is_safe).collect()
}
