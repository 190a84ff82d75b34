//! Release-date windows for listing requests.
//!
//! A window is resolved either from an explicit `start,end` pair or from a
//! named preset, always relative to the server-local calendar date.

use chrono::{Days, Local, Months, NaiveDate, NaiveDateTime};

/// Lower bound used when no range is requested.
pub const EPOCH: &str = "2000-01-01";

/// Source of "now". Handlers never read the system clock directly.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(test)]
pub struct FixedClock(pub NaiveDateTime);

#[cfg(test)]
impl FixedClock {
    /// Noon on the given day.
    pub fn on(year: i32, month: u32, day: u32) -> Self {
        let date = NaiveDate::from_ymd_opt(year, month, day).expect("valid date");
        Self(date.and_hms_opt(12, 0, 0).expect("valid time"))
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePreset {
    Today,
    Week,
    Year,
    Upcoming,
    All,
}

impl RangePreset {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("today") => RangePreset::Today,
            Some("week") => RangePreset::Week,
            Some("year") => RangePreset::Year,
            Some("upcoming") => RangePreset::Upcoming,
            _ => RangePreset::All,
        }
    }
}

/// Inclusive `start,end` window as sent upstream. Caller-supplied bounds are
/// passed through untouched, so `start <= end` is not guaranteed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(iso(start), iso(end))
    }

    pub fn to_param(&self) -> String {
        format!("{},{}", self.start, self.end)
    }
}

pub fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn resolve_range(dates: Option<&str>, range: Option<&str>, today: NaiveDate) -> DateRange {
    if let Some(dates) = dates.map(str::trim).filter(|d| !d.is_empty()) {
        let mut parts = dates.split(',');
        let start = parts.next().unwrap_or_default().trim();
        let end = parts
            .next()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| iso(today));
        return DateRange::new(start, end);
    }

    preset_range(RangePreset::parse(range), today)
}

pub fn preset_range(preset: RangePreset, today: NaiveDate) -> DateRange {
    match preset {
        RangePreset::Today => DateRange::between(today, today),
        RangePreset::Week => DateRange::between(days_before(today, 7), today),
        RangePreset::Year => DateRange::between(
            today.checked_sub_months(Months::new(12)).unwrap_or(today),
            today,
        ),
        RangePreset::Upcoming => DateRange::between(today, days_after(today, 90)),
        RangePreset::All => DateRange::new(EPOCH, iso(today)),
    }
}

/// Window for the legacy `start`/`end` parameters.
pub fn legacy_range(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> DateRange {
    let nonempty = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
    DateRange::new(
        nonempty(start).unwrap_or_else(|| EPOCH.to_string()),
        nonempty(end).unwrap_or_else(|| iso(today)),
    )
}

pub fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(date)
}

pub fn days_after(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn parse(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn presets_resolve_against_a_fixed_today() {
        let cases = [
            ("today", "2024-06-15", "2024-06-15"),
            ("week", "2024-06-08", "2024-06-15"),
            ("year", "2023-06-15", "2024-06-15"),
            ("upcoming", "2024-06-15", "2024-09-13"),
            ("bogus", "2000-01-01", "2024-06-15"),
        ];
        for (range, start, end) in cases {
            let resolved = resolve_range(None, Some(range), today());
            assert_eq!(resolved, DateRange::new(start, end), "{range}");
            assert!(parse(&resolved.start) <= parse(&resolved.end), "{range}");
        }

        assert_eq!(
            resolve_range(None, None, today()).to_param(),
            "2000-01-01,2024-06-15"
        );
    }

    #[test]
    fn explicit_dates_take_precedence_over_range() {
        let resolved = resolve_range(Some("2020-01-01,2020-12-31"), Some("week"), today());
        assert_eq!(resolved.to_param(), "2020-01-01,2020-12-31");
    }

    #[test]
    fn missing_end_defaults_to_today() {
        assert_eq!(
            resolve_range(Some("2022-03-01"), None, today()).to_param(),
            "2022-03-01,2024-06-15"
        );
        assert_eq!(
            resolve_range(Some("2022-03-01,"), None, today()).to_param(),
            "2022-03-01,2024-06-15"
        );
    }

    #[test]
    fn empty_dates_fall_through_to_range() {
        assert_eq!(
            resolve_range(Some(""), Some("today"), today()).to_param(),
            "2024-06-15,2024-06-15"
        );
    }

    #[test]
    fn explicit_dates_are_not_validated() {
        let resolved = resolve_range(Some("2030-01-01,2010-01-01"), None, today());
        assert_eq!(resolved.to_param(), "2030-01-01,2010-01-01");
    }

    #[test]
    fn legacy_range_fills_missing_bounds() {
        assert_eq!(
            legacy_range(None, None, today()).to_param(),
            "2000-01-01,2024-06-15"
        );
        assert_eq!(
            legacy_range(Some("2019-01-01"), Some(" "), today()).to_param(),
            "2019-01-01,2024-06-15"
        );
        assert_eq!(
            legacy_range(None, Some("2021-01-01"), today()).to_param(),
            "2000-01-01,2021-01-01"
        );
    }

    #[test]
    fn year_preset_on_leap_day_lands_on_last_day_of_february() {
        let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            preset_range(RangePreset::Year, leap).start,
            "2023-02-28"
        );
    }
}
