use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Please provide a date, or both a month and a year.")]
    Missing,
    #[error("Unrecognised month: {0}")]
    UnrecognisedMonth(String),
    #[error("Unrecognised date: {0}")]
    UnrecognisedDate(String),
    #[error("Year must be a 4-digit year.")]
    InvalidYear(String),
}

/// Calendar month. The declaration order is the fixed `Jan..Dec` list that
/// month names are indexed against.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Month {
    #[strum(to_string = "Jan", serialize = "January")]
    Jan = 1,
    #[strum(to_string = "Feb", serialize = "February")]
    Feb,
    #[strum(to_string = "Mar", serialize = "March")]
    Mar,
    #[strum(to_string = "Apr", serialize = "April")]
    Apr,
    #[strum(to_string = "May")]
    May,
    #[strum(to_string = "Jun", serialize = "June")]
    Jun,
    #[strum(to_string = "Jul", serialize = "July")]
    Jul,
    #[strum(to_string = "Aug", serialize = "August")]
    Aug,
    #[strum(to_string = "Sep", serialize = "September")]
    Sep,
    #[strum(to_string = "Oct", serialize = "October")]
    Oct,
    #[strum(to_string = "Nov", serialize = "November")]
    Nov,
    #[strum(to_string = "Dec", serialize = "December")]
    Dec,
}

impl Month {
    pub fn number(&self) -> u32 {
        *self as u32
    }

    pub fn from_number(number: u32) -> Option<Month> {
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        Month::iter().nth(index)
    }

    pub fn abbreviation(&self) -> &'static str {
        self.into()
    }

    /// `"01"`..`"12"`
    pub fn zero_padded(&self) -> String {
        format!("{:02}", self.number())
    }

    /// Accepts `"6"`, `"06"`, `"Jun"` or `"June"` in any case.
    pub fn parse(value: &str) -> Result<Month, PeriodError> {
        let value = value.trim();
        let unrecognised = || PeriodError::UnrecognisedMonth(value.to_string());
        if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
            let number = value.parse::<u32>().map_err(|_| unrecognised())?;
            return Month::from_number(number).ok_or_else(unrecognised);
        }
        Month::from_str(value).map_err(|_| unrecognised())
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Year the upstream rates are keyed by.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct FiscalYear(u16);

impl FiscalYear {
    pub fn inner(&self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<&str> for FiscalYear {
    type Error = PeriodError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.len() != 4 || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(PeriodError::InvalidYear(value.to_string()));
        }
        value
            .parse::<i32>()
            .map_err(|_| PeriodError::InvalidYear(value.to_string()))
            .and_then(FiscalYear::try_from)
    }
}

impl TryFrom<i32> for FiscalYear {
    type Error = PeriodError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match u16::try_from(value) {
            Ok(year) if (1000..=9999).contains(&year) => Ok(FiscalYear(year)),
            _ => Err(PeriodError::InvalidYear(value.to_string())),
        }
    }
}

/// Raw period fields as typed by a user. A date wins over month + year.
#[derive(Clone, Debug, Default)]
pub struct PeriodInput<'a> {
    pub date: Option<&'a str>,
    pub month: Option<&'a str>,
    pub year: Option<&'a str>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct PeriodQuery {
    pub month: Month,
    pub year: FiscalYear,
}

impl PeriodQuery {
    pub fn new(month: Month, year: FiscalYear) -> Self {
        Self { month, year }
    }

    /// Parses `YYYY-MM-DD` (date input) or `YYYY-MM` (month input).
    pub fn from_date(value: &str) -> Result<Self, PeriodError> {
        let value = value.trim();
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d"))
            .map_err(|_| PeriodError::UnrecognisedDate(value.to_string()))?;
        Self::from_naive_date(date)
    }

    pub fn from_naive_date(date: NaiveDate) -> Result<Self, PeriodError> {
        let month = Month::from_number(date.month())
            .ok_or_else(|| PeriodError::UnrecognisedDate(date.to_string()))?;
        Ok(Self {
            month,
            year: FiscalYear::try_from(date.year())?,
        })
    }

    pub fn parse(input: PeriodInput<'_>) -> Result<Self, PeriodError> {
        match (present(input.date), present(input.month), present(input.year)) {
            (Some(date), _, _) => Self::from_date(date),
            (None, Some(month), Some(year)) => Ok(Self {
                month: Month::parse(month)?,
                year: FiscalYear::try_from(year)?,
            }),
            _ => Err(PeriodError::Missing),
        }
    }
}
