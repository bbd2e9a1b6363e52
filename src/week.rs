use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Number of bookable periods in a day.
pub const PERIODS_PER_DAY: i64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub const WEEKDAYS: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn is_weekend(self) -> bool {
        matches!(self, Day::Saturday | Day::Sunday)
    }

    /// Monday = 0 .. Sunday = 6
    pub fn index(self) -> u32 {
        self.weekday().num_days_from_monday()
    }

    pub fn weekday(self) -> Weekday {
        match self {
            Day::Monday => Weekday::Mon,
            Day::Tuesday => Weekday::Tue,
            Day::Wednesday => Weekday::Wed,
            Day::Thursday => Weekday::Thu,
            Day::Friday => Weekday::Fri,
            Day::Saturday => Weekday::Sat,
            Day::Sunday => Weekday::Sun,
        }
    }

    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Day::Monday,
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Sat => Day::Saturday,
            Weekday::Sun => Day::Sunday,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| AppError::BadRequest("Invalid day".to_string()))
    }
}

/// Next occurrence of `day` on or after `today`.
pub fn date_for(today: NaiveDate, day: Day) -> NaiveDate {
    let today_idx = today.weekday().num_days_from_monday() as i64;
    let days_until = (day.index() as i64 - today_idx).rem_euclid(7);
    today + Duration::days(days_until)
}

/// The upcoming week as seen from `today`: every day mapped to its next
/// occurrence, today included.
pub fn week_dates(today: NaiveDate) -> [(Day, NaiveDate); 7] {
    Day::ALL.map(|d| (d, date_for(today, d)))
}

pub fn parse_iso_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid date format, use YYYY-MM-DD".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_week_dates_from_wednesday() {
        // 2026-10-14 is a Wednesday
        let dates = week_dates(d(2026, 10, 14));
        assert_eq!(dates[0], (Day::Monday, d(2026, 10, 19)));
        assert_eq!(dates[1], (Day::Tuesday, d(2026, 10, 20)));
        assert_eq!(dates[2], (Day::Wednesday, d(2026, 10, 14)));
        assert_eq!(dates[5], (Day::Saturday, d(2026, 10, 17)));
        assert_eq!(dates[6], (Day::Sunday, d(2026, 10, 18)));
    }

    #[test]
    fn test_week_dates_match_their_day() {
        for (day, date) in week_dates(d(2026, 12, 31)) {
            assert_eq!(Day::from_weekday(date.weekday()), day);
            assert!(date >= d(2026, 12, 31));
            assert!(date < d(2027, 1, 7));
        }
    }

    #[test]
    fn test_day_parsing() {
        assert_eq!("Saturday".parse::<Day>().unwrap(), Day::Saturday);
        assert!("saturday".parse::<Day>().is_err());
        assert!(Day::Sunday.is_weekend());
        assert!(!Day::Friday.is_weekend());
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2026-10-17").unwrap(), d(2026, 10, 17));
        assert!(parse_iso_date("17-10-2026").is_err());
        assert!(parse_iso_date("2026-02-30").is_err());
    }
}
