//! Parsing configuration for HTML extraction
//!
//! Centralized CSS selectors for the nutrition portal's menu and label pages.

use serde::{Deserialize, Serialize};

/// CSS selectors for a dining hall's daily menu page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSelectors {
    /// Tabbed meal container; absent when the hall is closed
    pub tab_container: String,

    /// Meal tabs, in document order; `href` is `#<panel id>`
    pub meal_tab: String,

    /// Station card inside a meal panel
    pub station_card: String,

    pub station_title: String,

    pub item_row: String,

    /// Item name link to the nutrition label page
    pub item_link: String,

    pub allergen_icon: String,
}

impl Default for MenuSelectors {
    fn default() -> Self {
        Self {
            tab_container: "div.tab-content".to_string(),
            meal_tab: "a.nav-link".to_string(),
            station_card: ".card".to_string(),
            station_title: "h5.card-title".to_string(),
            item_row: ".menu-item-row".to_string(),
            item_link: "a.menu-item-name[href]".to_string(),
            allergen_icon: ".col-md-4 .nutri-icon[title]".to_string(),
        }
    }
}

/// CSS selectors for a food's nutrition label page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionSelectors {
    pub name: String,

    /// Serving size blocks; the second one carries the value
    pub serving_size: String,

    /// Label rows such as "Protein 4g" or "Calories 120"
    pub top_nutrient: String,
}

impl Default for NutritionSelectors {
    fn default() -> Self {
        Self {
            name: "h2".to_string(),
            serving_size: "div.nutfactsservsize".to_string(),
            top_nutrient: ".nutfactstopnutrient".to_string(),
        }
    }
}
