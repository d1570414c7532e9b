//! Scrape run audit records

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Type};

use super::menu::MenuDate;

/// Final outcome of one pipeline invocation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeStatus {
    /// At least one food was found on some dining hall's menu
    Success,
    /// Every dining hall reported no menu
    Closed,
    /// An unrecoverable error escaped hall processing
    Failed,
}

impl ScrapeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ScrapeStatus::Success => "success",
            ScrapeStatus::Closed => "closed",
            ScrapeStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScrapeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(ScrapeStatus::Success),
            "closed" => Ok(ScrapeStatus::Closed),
            "failed" => Ok(ScrapeStatus::Failed),
            other => Err(format!("Invalid ScrapeStatus: {other}")),
        }
    }
}

impl Type<sqlx::Sqlite> for ScrapeStatus {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as Type<sqlx::Sqlite>>::type_info()
    }
}

impl<'q> Encode<'q, sqlx::Sqlite> for ScrapeStatus {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as Encode<sqlx::Sqlite>>::encode(self.as_str().to_string(), buf)
    }
}

impl<'r> Decode<'r, sqlx::Sqlite> for ScrapeStatus {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as Decode<sqlx::Sqlite>>::decode(value)?;
        s.parse::<ScrapeStatus>().map_err(Into::into)
    }
}

/// Counters accumulated across the dining halls of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeCounters {
    /// Foods listed on the menus, new and previously seen alike
    pub foods_found: u64,
    /// Foods actually added to the catalog
    pub new_foods: u64,
    /// Menu rows actually added
    pub menu_rows: u64,
}

impl ScrapeCounters {
    pub fn add(&mut self, other: ScrapeCounters) {
        self.foods_found += other.foods_found;
        self.new_foods += other.new_foods;
        self.menu_rows += other.menu_rows;
    }
}

/// What a caller of a scrape observes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeSummary {
    pub status: ScrapeStatus,
    pub menu_date: MenuDate,
    pub foods_found: u64,
    pub new_foods: u64,
    pub menu_rows: u64,
    /// Human-readable cause when the run failed
    pub error: Option<String>,
}

/// Append-only audit entry, one per invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeRun {
    /// Assigned by storage; `None` before the run is recorded
    pub id: Option<i64>,
    pub menu_date: MenuDate,
    pub ran_at: DateTime<Local>,
    pub status: ScrapeStatus,
    pub foods_found: u64,
    pub new_foods: u64,
    pub menu_rows: u64,
}

impl ScrapeRun {
    pub fn new(
        menu_date: MenuDate,
        ran_at: DateTime<Local>,
        status: ScrapeStatus,
        counters: ScrapeCounters,
    ) -> Self {
        Self {
            id: None,
            menu_date,
            ran_at,
            status,
            foods_found: counters.foods_found,
            new_foods: counters.new_foods,
            menu_rows: counters.menu_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_json_uses_camel_case_keys() {
        let summary = ScrapeSummary {
            status: ScrapeStatus::Success,
            menu_date: "12/23/2025".parse().unwrap(),
            foods_found: 4,
            new_foods: 2,
            menu_rows: 4,
            error: None,
        };

        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["status"], "success");
        assert_eq!(json["menuDate"], "12/23/2025");
        assert_eq!(json["foodsFound"], 4);
        assert_eq!(json["newFoods"], 2);
        assert_eq!(json["menuRows"], 4);
        assert!(json.get("menu_date").is_none());
    }
}
