//! Tagged cell values and total coercion functions.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Date-time formats tried, in order, when coercing text to a timestamp.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only formats, interpreted as midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// A single cell of a table.
///
/// Source files carry no reliable per-column type, so every cell is tagged
/// individually and converted on demand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Timestamp(NaiveDateTime),
    Text(String),
    #[default]
    Missing,
}

impl Value {
    /// Returns true for `Missing` and for NaN numbers.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerce to a number; anything that does not convert becomes `Missing`.
    pub fn to_numeric(&self) -> Value {
        match self {
            Value::Number(n) if n.is_finite() => Value::Number(*n),
            Value::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Value::Number(n),
                _ => Value::Missing,
            },
            _ => Value::Missing,
        }
    }

    /// Coerce to a timestamp; anything that does not convert becomes `Missing`.
    ///
    /// `extra_formats` are tried after the built-in formats, first as
    /// date-time formats and then as date-only formats.
    pub fn to_timestamp(&self, extra_formats: &[String]) -> Value {
        match self {
            Value::Timestamp(ts) => Value::Timestamp(*ts),
            Value::Text(s) => parse_timestamp(s, extra_formats)
                .map(Value::Timestamp)
                .unwrap_or(Value::Missing),
            _ => Value::Missing,
        }
    }

    /// Hashable identity of this cell, used for duplicate and distinct counts.
    pub(crate) fn key(&self) -> CellKey<'_> {
        match self {
            Value::Number(n) if n.is_nan() => CellKey::Missing,
            // -0.0 and 0.0 compare equal, so they must hash equal
            Value::Number(n) if *n == 0.0 => CellKey::Number(0),
            Value::Number(n) => CellKey::Number(n.to_bits()),
            Value::Timestamp(ts) => CellKey::Timestamp(*ts),
            Value::Text(s) => CellKey::Text(s),
            Value::Missing => CellKey::Missing,
        }
    }
}

/// Borrowed, hashable form of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CellKey<'a> {
    Number(u64),
    Timestamp(NaiveDateTime),
    Text(&'a str),
    Missing,
}

/// Parse text as a timestamp using the built-in formats plus `extra_formats`.
pub fn parse_timestamp(text: &str, extra_formats: &[String]) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    let datetime_formats = DATETIME_FORMATS
        .iter()
        .copied()
        .chain(extra_formats.iter().map(String::as_str));
    for fmt in datetime_formats {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(ts);
        }
    }

    let date_formats = DATE_FORMATS
        .iter()
        .copied()
        .chain(extra_formats.iter().map(String::as_str));
    for fmt in date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
            Value::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            Value::Text(s) => f.write_str(s),
            Value::Missing => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}
