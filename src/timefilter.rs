//! "Out now" / "coming soon" release windows.

use chrono::NaiveDate;

use crate::dates::{days_after, days_before};
use crate::rawg::GameSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    OutNow,
    ComingSoon,
    #[default]
    Other,
}

impl Section {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("out-now") => Section::OutNow,
            Some("coming-soon") => Section::ComingSoon,
            _ => Section::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl TimeFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("today") => TimeFilter::Today,
            Some("week") => TimeFilter::Week,
            Some("month") => TimeFilter::Month,
            _ => TimeFilter::All,
        }
    }

    /// Window length in days for a section, `None` for no filtering.
    fn span(self, section: Section) -> Option<u64> {
        match (section, self) {
            (_, TimeFilter::All) | (Section::Other, _) => None,
            (_, TimeFilter::Today) => Some(0),
            (Section::OutNow, TimeFilter::Week) => Some(6),
            (Section::OutNow, TimeFilter::Month) => Some(29),
            (Section::ComingSoon, TimeFilter::Week) => Some(7),
            (Section::ComingSoon, TimeFilter::Month) => Some(31),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterState {
    pub section: Section,
    pub time_filter: TimeFilter,
}

pub trait Released {
    fn release_date(&self) -> Option<NaiveDate>;
}

impl Released for GameSummary {
    fn release_date(&self) -> Option<NaiveDate> {
        GameSummary::release_date(self)
    }
}

pub fn apply<T: Released>(games: Vec<T>, state: FilterState, today: NaiveDate) -> Vec<T> {
    let Some(days) = state.time_filter.span(state.section) else {
        return games;
    };

    match state.section {
        Section::OutNow => {
            let from = days_before(today, days);
            games
                .into_iter()
                .filter(|g| g.release_date().is_some_and(|d| d >= from && d <= today))
                .collect()
        }
        // Undated upcoming titles stay listed.
        Section::ComingSoon => {
            let until = days_after(today, days);
            games
                .into_iter()
                .filter(|g| g.release_date().map_or(true, |d| d >= today && d <= until))
                .collect()
        }
        Section::Other => games,
    }
}
