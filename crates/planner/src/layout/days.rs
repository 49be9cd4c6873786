//! Compact day-of-week strings such as `"MWF"` or `"TTh"`.

use super::error::LayoutError;
use serde::{Deserialize, Serialize};

/// A day of the week, in grid column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayToken {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Single-character codes, tried in this order after `Th`.
const SINGLE_CODES: [(&str, DayToken); 4] = [
    ("M", DayToken::Monday),
    ("T", DayToken::Tuesday),
    ("W", DayToken::Wednesday),
    ("F", DayToken::Friday),
];

const THURSDAY_CODE: &str = "Th";

impl DayToken {
    pub const ALL: [DayToken; 7] = [
        DayToken::Monday,
        DayToken::Tuesday,
        DayToken::Wednesday,
        DayToken::Thursday,
        DayToken::Friday,
        DayToken::Saturday,
        DayToken::Sunday,
    ];

    /// Short code used in time schedules. Weekend days have none.
    pub fn short_code(&self) -> Option<&'static str> {
        match self {
            DayToken::Monday => Some("M"),
            DayToken::Tuesday => Some("T"),
            DayToken::Wednesday => Some("W"),
            DayToken::Thursday => Some(THURSDAY_CODE),
            DayToken::Friday => Some("F"),
            DayToken::Saturday | DayToken::Sunday => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DayToken::Monday => "Monday",
            DayToken::Tuesday => "Tuesday",
            DayToken::Wednesday => "Wednesday",
            DayToken::Thursday => "Thursday",
            DayToken::Friday => "Friday",
            DayToken::Saturday => "Saturday",
            DayToken::Sunday => "Sunday",
        }
    }

    /// Grid column for this day; column 0 is the label column.
    pub fn column(&self) -> usize {
        *self as usize + 1
    }
}

/// Parses a concatenated day-string into day tokens.
///
/// `Th` is always tried before `T`, so `"TTh"` is Tuesday and Thursday.
/// Blank input means the section has no fixed meeting days and yields an
/// empty list. Any fragment that is not a known code is an error.
pub fn parse_days(raw: &str) -> Result<Vec<DayToken>, LayoutError> {
    let mut rest = raw.trim();
    let mut days = Vec::new();

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix(THURSDAY_CODE) {
            days.push(DayToken::Thursday);
            rest = after;
            continue;
        }

        let matched = SINGLE_CODES
            .iter()
            .find_map(|(code, day)| rest.strip_prefix(code).map(|after| (*day, after)));

        match matched {
            Some((day, after)) => {
                days.push(day);
                rest = after;
            }
            None => {
                return Err(LayoutError::UnrecognizedDays {
                    raw: raw.to_string(),
                    remainder: rest.to_string(),
                })
            }
        }
    }

    Ok(days)
}

/// Formats day tokens back into a concatenated short-code string.
pub fn format_days(days: &[DayToken]) -> Result<String, LayoutError> {
    days.iter()
        .map(|day| day.short_code().ok_or(LayoutError::NoShortCode { day: *day }))
        .collect()
}
