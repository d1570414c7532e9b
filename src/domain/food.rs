use serde::{Deserialize, Serialize};

/// Catalog entry for one distinct menu item, keyed by its detail-page URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub serving_size: String,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calories: f64,
}

/// Nutrition detail page contents after the defaulting policy has been applied.
///
/// Every macro is a plain number here; absent or unparseable values are already 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub name: String,
    pub url: String,
    pub serving_size: Option<String>,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calories: f64,
}

/// A food as listed under one station of a meal, for menu display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSummary {
    pub id: i64,
    pub name: String,
    #[serde(rename = "servingSize")]
    pub serving_size: String,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calories: f64,
}

/// Row of the catalog/menu join: a food plus the station it was served at
#[derive(Debug, Clone, PartialEq)]
pub struct MenuFoodRow {
    pub station: String,
    pub food: FoodSummary,
}

/// Summed macros over a set of logged foods
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}
