//! Nutrition label parser
//!
//! Label text is matched loosely: each "top nutrient" block is lower-cased
//! and checked for a keyword, then a number is read from a fixed token
//! position. Anything that does not parse becomes [`FieldValue::Defaulted`];
//! nothing on a label page can make parsing fail.

#![allow(clippy::uninlined_format_args)]

use scraper::{Html, Selector};
use tracing::debug;

use super::config::NutritionSelectors;
use super::{ParsingResult, compile_selector, element_text};
use crate::domain::food::NutritionFacts;

/// Outcome of reading one macro from a label
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Parsed(f64),
    Defaulted,
}

impl FieldValue {
    /// Numeric value; defaulted fields read as 0.0
    pub fn value(self) -> f64 {
        match self {
            FieldValue::Parsed(v) => v,
            FieldValue::Defaulted => 0.0,
        }
    }

    pub fn is_defaulted(self) -> bool {
        matches!(self, FieldValue::Defaulted)
    }
}

/// Label contents before defaults are applied
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNutrition {
    pub name: Option<String>,
    pub url: String,
    pub serving_size: Option<String>,
    pub protein: FieldValue,
    pub carbs: FieldValue,
    pub fat: FieldValue,
    pub calories: FieldValue,
}

impl ParsedNutrition {
    /// Collapse every field to a plain value
    pub fn into_facts(self) -> NutritionFacts {
        NutritionFacts {
            name: self.name.unwrap_or_default(),
            url: self.url,
            serving_size: self.serving_size,
            protein: self.protein.value(),
            carbs: self.carbs.value(),
            fat: self.fat.value(),
            calories: self.calories.value(),
        }
    }
}

/// Keyword, token position and unit suffix for one macro
struct LabelRule {
    keyword: &'static str,
    token: usize,
    unit: &'static str,
}

const PROTEIN: LabelRule = LabelRule { keyword: "protein", token: 1, unit: "g" };
const CARBS: LabelRule = LabelRule { keyword: "total carbohydrate", token: 2, unit: "g" };
const FAT: LabelRule = LabelRule { keyword: "total fat", token: 2, unit: "g" };
const CALORIES: LabelRule = LabelRule { keyword: "calories", token: 1, unit: "kcal" };

impl LabelRule {
    fn read(&self, text: &str) -> FieldValue {
        text.split_whitespace()
            .nth(self.token)
            .map(|token| token.replace(self.unit, ""))
            .and_then(|token| token.parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value >= 0.0)
            .map_or(FieldValue::Defaulted, FieldValue::Parsed)
    }
}

/// Parser for a food's nutrition label page
pub struct NutritionParser {
    name: Selector,
    serving_size: Selector,
    top_nutrient: Selector,
}

impl NutritionParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&NutritionSelectors::default())
    }

    pub fn with_config(selectors: &NutritionSelectors) -> ParsingResult<Self> {
        Ok(Self {
            name: compile_selector(&selectors.name)?,
            serving_size: compile_selector(&selectors.serving_size)?,
            top_nutrient: compile_selector(&selectors.top_nutrient)?,
        })
    }

    /// Per-field parse outcome
    pub fn parse_fields(&self, html: &str, url: &str) -> ParsedNutrition {
        let document = Html::parse_document(html);
        self.extract(&document, url)
    }

    /// Label contents with missing macros set to 0.0
    pub fn parse(&self, html: &str, url: &str) -> NutritionFacts {
        self.parse_fields(html, url).into_facts()
    }

    fn extract(&self, document: &Html, url: &str) -> ParsedNutrition {
        let name = document
            .select(&self.name)
            .next()
            .map(|el| element_text(&el))
            .filter(|name| !name.is_empty());

        // The first block repeats the header; the second holds the amount
        let serving_size = document
            .select(&self.serving_size)
            .nth(1)
            .map(|el| element_text(&el).to_lowercase());

        let mut parsed = ParsedNutrition {
            name,
            url: url.to_string(),
            serving_size,
            protein: FieldValue::Defaulted,
            carbs: FieldValue::Defaulted,
            fat: FieldValue::Defaulted,
            calories: FieldValue::Defaulted,
        };

        let mut calories_seen = false;
        for block in document.select(&self.top_nutrient) {
            let text = block
                .text()
                .collect::<String>()
                .to_lowercase()
                .replace('\u{a0}', " ");
            let text = text.trim();

            if text.contains(PROTEIN.keyword) {
                parsed.protein = PROTEIN.read(text);
            } else if text.contains(CARBS.keyword) {
                parsed.carbs = CARBS.read(text);
            } else if text.contains(FAT.keyword) {
                parsed.fat = FAT.read(text);
            } else if text.contains(CALORIES.keyword) && !calories_seen {
                calories_seen = true;
                parsed.calories = CALORIES.read(text);
            }
        }

        debug!("Parsed nutrition for {}: {:?}", url, parsed);
        parsed
    }
}
