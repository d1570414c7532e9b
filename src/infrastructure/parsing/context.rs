//! Parsing context for HTML extraction
//!
//! Tags that a menu page does not carry itself but every parsed record needs.

use crate::domain::menu::MenuDate;

/// Context for one dining hall's menu page
#[derive(Debug, Clone)]
pub struct MenuParseContext {
    /// Dining hall the page was fetched for
    pub dining_hall: String,

    /// Menu date the page was fetched for
    pub date: MenuDate,
}

impl MenuParseContext {
    pub fn new(dining_hall: impl Into<String>, date: MenuDate) -> Self {
        Self {
            dining_hall: dining_hall.into(),
            date,
        }
    }
}
