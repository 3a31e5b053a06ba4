//! Frequency tokens describing time-series granularity.
//!
//! Tokens follow the usual offset-alias shape: an optional positive multiplier
//! followed by a unit, e.g. `"D"`, `"H"`, `"15min"`, `"2W"`, `"ME"`, `"QE-NOV"`.
//!
//! Calendar units are anchored. End-of-period aliases (`M`/`ME`, `BM`/`BME`,
//! `SM`/`SME`, `Q`/`QE`, `A`/`Y`/`YE`) step between period ends; start-of-period
//! aliases (`MS`, `QS`, `AS`/`YS`) step between period starts. A timestamp that
//! is not on an anchor moves to the next anchor on its first step.
//!
//! Predictors only carry the token, so [`Frequency::from_token`] accepts tokens
//! without a known step. Those fail when timestamps have to be generated.

use crate::error::{AdapterError, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use std::fmt;
use std::str::FromStr;

/// Calendar or clock unit of a frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyUnit {
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    /// Monday to Friday.
    BusinessDay,
    Week,
    MonthEnd,
    MonthStart,
    /// Last weekday of the month.
    BusinessMonthEnd,
    /// The 15th and the last day of the month.
    SemiMonthEnd,
    QuarterEnd,
    QuarterStart,
    YearEnd,
    YearStart,
}

impl FrequencyUnit {
    /// Months per period for month-anchored units.
    fn period_months(self) -> Option<u32> {
        match self {
            Self::MonthEnd | Self::MonthStart | Self::BusinessMonthEnd => Some(1),
            Self::QuarterEnd | Self::QuarterStart => Some(3),
            Self::YearEnd | Self::YearStart => Some(12),
            _ => None,
        }
    }

    fn default_anchor_month(self) -> u32 {
        match self {
            Self::QuarterEnd | Self::YearEnd => 12,
            _ => 1,
        }
    }

    /// Anchor day inside a given month.
    fn anchor_day(self, year: i32, month: u32) -> Option<NaiveDate> {
        match self {
            Self::MonthStart | Self::QuarterStart | Self::YearStart => {
                NaiveDate::from_ymd_opt(year, month, 1)
            }
            Self::BusinessMonthEnd => {
                let mut day = last_day_of_month(year, month)?;
                while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                    day = day.pred_opt()?;
                }
                Some(day)
            }
            _ => last_day_of_month(year, month),
        }
    }
}

/// A frequency token, parsed when its alias is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequency {
    token: String,
    multiple: u32,
    unit: Option<FrequencyUnit>,
    /// Month the quarter/year anchors are aligned to (1-12).
    anchor_month: u32,
}

impl Frequency {
    /// Parse a frequency token, rejecting unknown aliases.
    pub fn parse(token: &str) -> Result<Self> {
        let invalid = || AdapterError::InvalidFrequency(token.to_string());
        let trimmed = token.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (digits, alias) = trimmed.split_at(split);

        let multiple = if digits.is_empty() {
            1
        } else {
            digits.parse::<u32>().map_err(|_| invalid())?
        };
        if multiple == 0 {
            return Err(invalid());
        }

        let (base, suffix) = match alias.split_once('-') {
            Some((base, suffix)) => (base, Some(suffix)),
            None => (alias, None),
        };
        let unit = match base {
            "N" | "ns" => FrequencyUnit::Nanosecond,
            "U" | "us" => FrequencyUnit::Microsecond,
            "L" | "ms" => FrequencyUnit::Millisecond,
            "S" | "s" => FrequencyUnit::Second,
            "T" | "min" => FrequencyUnit::Minute,
            "H" | "h" => FrequencyUnit::Hour,
            "D" | "d" => FrequencyUnit::Day,
            "B" => FrequencyUnit::BusinessDay,
            "W" => FrequencyUnit::Week,
            "M" | "ME" => FrequencyUnit::MonthEnd,
            "MS" => FrequencyUnit::MonthStart,
            "BM" | "BME" => FrequencyUnit::BusinessMonthEnd,
            "SM" | "SME" => FrequencyUnit::SemiMonthEnd,
            "Q" | "QE" => FrequencyUnit::QuarterEnd,
            "QS" => FrequencyUnit::QuarterStart,
            "A" | "Y" | "YE" => FrequencyUnit::YearEnd,
            "AS" | "YS" => FrequencyUnit::YearStart,
            _ => return Err(invalid()),
        };

        let anchor_month = match (unit, suffix) {
            (_, None) => unit.default_anchor_month(),
            (FrequencyUnit::Week, Some(day)) => {
                day.parse::<Weekday>().map_err(|_| invalid())?;
                unit.default_anchor_month()
            }
            (
                FrequencyUnit::QuarterEnd
                | FrequencyUnit::QuarterStart
                | FrequencyUnit::YearEnd
                | FrequencyUnit::YearStart,
                Some(month),
            ) => month_from_abbrev(month).ok_or_else(invalid)?,
            (_, Some(_)) => return Err(invalid()),
        };

        Ok(Self {
            token: trimmed.to_string(),
            multiple,
            unit: Some(unit),
            anchor_month,
        })
    }

    /// Accept any non-empty token, keeping unknown aliases as opaque strings.
    pub fn from_token(token: &str) -> Result<Self> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(AdapterError::InvalidFrequency(token.to_string()));
        }
        Ok(Self::parse(trimmed).unwrap_or_else(|_| Self {
            token: trimmed.to_string(),
            multiple: 1,
            unit: None,
            anchor_month: 1,
        }))
    }

    /// The token as given (whitespace trimmed).
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn multiple(&self) -> u32 {
        self.multiple
    }

    /// `None` for opaque tokens.
    pub fn unit(&self) -> Option<FrequencyUnit> {
        self.unit
    }

    /// Whether timestamps can be generated from this frequency.
    pub fn is_known(&self) -> bool {
        self.unit.is_some()
    }

    /// Timestamp `steps` periods after `start`.
    ///
    /// Returns `None` for opaque tokens and when the result leaves chrono's
    /// representable range.
    pub fn advance(&self, start: DateTime<Utc>, steps: usize) -> Option<DateTime<Utc>> {
        let unit = self.unit?;
        let n = i64::try_from(steps).ok()?.checked_mul(i64::from(self.multiple))?;
        if n == 0 {
            return Some(start);
        }
        match unit {
            FrequencyUnit::Nanosecond => start.checked_add_signed(Duration::nanoseconds(n)),
            FrequencyUnit::Microsecond => start.checked_add_signed(Duration::microseconds(n)),
            FrequencyUnit::Millisecond => start.checked_add_signed(Duration::try_milliseconds(n)?),
            FrequencyUnit::Second => start.checked_add_signed(Duration::try_seconds(n)?),
            FrequencyUnit::Minute => start.checked_add_signed(Duration::try_minutes(n)?),
            FrequencyUnit::Hour => start.checked_add_signed(Duration::try_hours(n)?),
            FrequencyUnit::Day => start.checked_add_signed(Duration::try_days(n)?),
            FrequencyUnit::Week => start.checked_add_signed(Duration::try_weeks(n)?),
            FrequencyUnit::BusinessDay => add_business_days(start, n),
            FrequencyUnit::SemiMonthEnd => {
                let mut date = start.date_naive();
                for _ in 0..n {
                    date = next_semi_month_end(date)?;
                }
                Some(date.and_time(start.time()).and_utc())
            }
            _ => self.advance_anchored(unit, start, n),
        }
    }

    /// Month-anchored stepping: one hop to the next anchor, then whole periods.
    fn advance_anchored(
        &self,
        unit: FrequencyUnit,
        start: DateTime<Utc>,
        n: i64,
    ) -> Option<DateTime<Utc>> {
        let period = i64::from(unit.period_months()?);
        let date = start.date_naive();

        let first = (0..=period)
            .filter_map(|offset| {
                let (year, month) = shift_month(date.year(), date.month(), offset)?;
                let is_anchor = (i64::from(month) - i64::from(self.anchor_month))
                    .rem_euclid(period)
                    == 0;
                is_anchor.then(|| unit.anchor_day(year, month)).flatten()
            })
            .find(|candidate| *candidate > date)?;

        let (year, month) = shift_month(
            first.year(),
            first.month(),
            (n - 1).checked_mul(period)?,
        )?;
        let target = unit.anchor_day(year, month)?;
        Some(target.and_time(start.time()).and_utc())
    }

    /// `len` consecutive timestamps starting at `start`.
    pub fn range(&self, start: DateTime<Utc>, len: usize) -> Result<Vec<DateTime<Utc>>> {
        if !self.is_known() {
            return Err(AdapterError::InvalidFrequency(self.token.clone()));
        }
        let mut out = Vec::with_capacity(len);
        let mut current = start;
        for i in 0..len {
            if i > 0 {
                current = self.advance(current, 1).ok_or_else(|| {
                    AdapterError::InvalidParameter(format!(
                        "timestamp {} steps of '{}' after {} is out of range",
                        i, self.token, start
                    ))
                })?;
            }
            out.push(current);
        }
        Ok(out)
    }
}

fn month_from_abbrev(abbrev: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ];
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(abbrev))
        .map(|i| i as u32 + 1)
}

fn shift_month(year: i32, month: u32, offset: i64) -> Option<(i32, u32)> {
    let index = i64::from(year) * 12 + i64::from(month) - 1 + offset;
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    Some((year, index.rem_euclid(12) as u32 + 1))
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = shift_month(year, month, 1)?;
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

fn next_semi_month_end(date: NaiveDate) -> Option<NaiveDate> {
    let month_end = last_day_of_month(date.year(), date.month())?;
    if date.day() < 15 {
        date.with_day(15)
    } else if date < month_end {
        Some(month_end)
    } else {
        let (year, month) = shift_month(date.year(), date.month(), 1)?;
        NaiveDate::from_ymd_opt(year, month, 15)
    }
}

fn add_business_days(start: DateTime<Utc>, n: i64) -> Option<DateTime<Utc>> {
    let mut current = start;
    let mut remaining = n;
    while remaining > 0 {
        current = current.checked_add_signed(Duration::days(1))?;
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            remaining -= 1;
        }
    }
    Some(current)
}

impl FromStr for Frequency {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}
