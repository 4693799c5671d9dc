// pgdump-etl/src/utils/date_key.rs
use chrono::{Local, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Calendar day that groups one backup set on disk.
///
/// Save uses it as a directory segment; Load uses it as a substring filter over
/// every path under the backup root, so any path containing it counts as part
/// of that day's set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateKey(String);

impl DateKey {
    pub fn today() -> Self {
        DateKey(Local::now().format(DATE_KEY_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DateKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let date = NaiveDate::parse_from_str(trimmed, DATE_KEY_FORMAT).map_err(|e| {
            AppError::InvalidInput(format!("date key '{}' is not YYYY-MM-DD: {}", trimmed, e))
        })?;
        // Re-render so "2023-7-4" style input cannot produce a key that never matches on disk.
        Ok(DateKey(date.format(DATE_KEY_FORMAT).to_string()))
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
