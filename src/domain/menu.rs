//! Menu value objects: meal periods, tab layouts, menu dates and parsed menu records.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Type};

use crate::infrastructure::parsing_error::ParsingError;

/// Meal period a food is offered in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Brunch,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Brunch => "brunch",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "brunch" => Ok(MealType::Brunch),
            other => Err(format!("Invalid meal type: {other}")),
        }
    }
}

impl Type<sqlx::Sqlite> for MealType {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as Type<sqlx::Sqlite>>::type_info()
    }
}

impl<'q> Encode<'q, sqlx::Sqlite> for MealType {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as Encode<sqlx::Sqlite>>::encode(self.as_str().to_string(), buf)
    }
}

impl<'r> Decode<'r, sqlx::Sqlite> for MealType {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as Decode<sqlx::Sqlite>>::decode(value)?;
        s.parse::<MealType>().map_err(Into::into)
    }
}

/// Tab layout of a dining hall's menu page.
///
/// The upstream site does not label its tabs reliably, so meal names are
/// assigned by zipping the tabs, in document order, with [`MenuLayout::meal_names`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuLayout {
    /// Three tabs: breakfast, lunch, dinner
    ThreeMeal,
    /// Two tabs: brunch, dinner
    Brunch,
}

impl MenuLayout {
    const THREE_MEAL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];
    const BRUNCH: [MealType; 2] = [MealType::Brunch, MealType::Dinner];

    /// Any tab count other than 2 or 3 means the site layout changed.
    pub fn from_tab_count(count: usize) -> Result<Self, ParsingError> {
        match count {
            3 => Ok(MenuLayout::ThreeMeal),
            2 => Ok(MenuLayout::Brunch),
            _ => Err(ParsingError::UnexpectedTabCount { count }),
        }
    }

    /// Ordered meal-name table, one entry per tab position
    pub fn meal_names(self) -> &'static [MealType] {
        match self {
            MenuLayout::ThreeMeal => &Self::THREE_MEAL,
            MenuLayout::Brunch => &Self::BRUNCH,
        }
    }
}

/// Calendar date of a menu, rendered the way the nutrition portal expects (`M/D/YYYY`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MenuDate(NaiveDate);

impl MenuDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn naive(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for MenuDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.0.month(), self.0.day(), self.0.year())
    }
}

impl FromStr for MenuDate {
    type Err = String;

    /// Accepts `M/D/YYYY` (portal format) and `YYYY-MM-DD` (HTML date inputs)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, "%m/%d/%Y")
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .map(MenuDate)
            .map_err(|e| format!("Invalid menu date '{s}': {e}"))
    }
}

impl TryFrom<String> for MenuDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MenuDate> for String {
    fn from(value: MenuDate) -> Self {
        value.to_string()
    }
}

/// One food offered at a dining hall, as found on its menu page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuRecord {
    pub name: String,
    /// Absolute detail-page URL; the food's natural key
    pub url: String,
    pub meal: MealType,
    pub dining_hall: String,
    pub station: String,
    pub date: MenuDate,
    /// Informational only
    pub allergens: Vec<String>,
}
