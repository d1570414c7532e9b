//! HTML parsing for the nutrition portal
//!
//! Two page kinds are parsed: a dining hall's daily menu and a food's
//! nutrition label. Both parsers compile their selectors once and are
//! cheap to share across tasks.

pub mod config;
pub mod context;
pub mod menu_parser;
pub mod nutrition_parser;

pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use config::{MenuSelectors, NutritionSelectors};
pub use context::MenuParseContext;
pub use menu_parser::MenuParser;
pub use nutrition_parser::{FieldValue, NutritionParser, ParsedNutrition};

use scraper::{ElementRef, Html, Selector};

/// Parser over an already-built document plus the context it was fetched in
pub trait ContextualParser {
    type Output;
    type Context;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}

pub(crate) fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, &e.to_string()))
}

/// Trimmed text content of an element
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
