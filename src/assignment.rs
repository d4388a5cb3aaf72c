//! Assignment record stored under its name in the backing file.

use chrono::NaiveDateTime;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{AssignmentError, Result};

/// Format accepted for user-supplied deadlines.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const DATE_FORMAT_HUMAN: &str = "YYYY-MM-DD HH:MM (e.g., 2023-12-31 23:59)";

/// ISO-8601 shapes accepted when reading stored timestamps. Files are always
/// written in the first one.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    DATE_FORMAT,
];

/// Priority level, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const DEFAULT: u8 = 3;

    /// Clamp any integer into the valid range.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

// Hand-edited files may carry out-of-range values; clamp instead of rejecting.
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the user who created an assignment. Chat platforms hand out
/// numeric ids, local surfaces use a user name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddedBy {
    Id(u64),
    Name(String),
}

impl fmt::Display for AddedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddedBy::Id(id) => write!(f, "{}", id),
            AddedBy::Name(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub deadline: NaiveDateTime,
    #[serde(default, deserialize_with = "deserialize_details")]
    pub details: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<AddedBy>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_timestamp"
    )]
    pub added_at: Option<NaiveDateTime>,
}

/// Parse a stored timestamp in any of the accepted ISO-8601 shapes.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<NaiveDateTime, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", text)))
}

fn deserialize_optional_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<NaiveDateTime>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(text) => parse_timestamp(&text)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", text))),
        None => Ok(None),
    }
}

// `null` details read as "no details".
fn deserialize_details<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Assignment {
    pub fn new(
        deadline: NaiveDateTime,
        details: impl Into<String>,
        priority: Priority,
        added_by: Option<AddedBy>,
        added_at: NaiveDateTime,
    ) -> Self {
        Self {
            deadline,
            details: details.into(),
            priority,
            added_by,
            added_at: Some(added_at),
        }
    }

    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.deadline < now
    }
}

/// Parse a deadline in `YYYY-MM-DD HH:MM` form.
pub fn parse_deadline(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| AssignmentError::InvalidDeadline(text.to_string()))
}
