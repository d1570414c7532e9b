//! Menu page parser
//!
//! Turns a dining hall's daily menu page into flat [`MenuRecord`]s. Meal
//! names come from tab position only: tabs are zipped, in document order,
//! with [`MenuLayout::meal_names`]. Tab labels are never read.

#![allow(clippy::uninlined_format_args)]

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::config::MenuSelectors;
use super::context::MenuParseContext;
use super::{ContextualParser, ParsingError, ParsingResult, compile_selector, element_text};
use crate::domain::menu::{MealType, MenuDate, MenuLayout, MenuRecord};
use crate::infrastructure::config::utils::resolve_url;

/// Parser for a dining hall's daily menu page
pub struct MenuParser {
    base_url: String,
    tab_container: Selector,
    meal_tab: Selector,
    station_card: Selector,
    station_title: Selector,
    item_row: Selector,
    item_link: Selector,
    allergen_icon: Selector,
    any_id: Selector,
}

impl MenuParser {
    /// Parser with default selectors; item links resolve against `base_url`
    pub fn new(base_url: &str) -> ParsingResult<Self> {
        Self::with_config(base_url, &MenuSelectors::default())
    }

    pub fn with_config(base_url: &str, selectors: &MenuSelectors) -> ParsingResult<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            tab_container: compile_selector(&selectors.tab_container)?,
            meal_tab: compile_selector(&selectors.meal_tab)?,
            station_card: compile_selector(&selectors.station_card)?,
            station_title: compile_selector(&selectors.station_title)?,
            item_row: compile_selector(&selectors.item_row)?,
            item_link: compile_selector(&selectors.item_link)?,
            allergen_icon: compile_selector(&selectors.allergen_icon)?,
            any_id: compile_selector("[id]")?,
        })
    }

    /// Whether the page carries the tabbed meal container
    pub fn is_valid_menu(&self, html: &str) -> bool {
        self.has_menu_container(&Html::parse_document(html))
    }

    /// Meal name and panel id for each tab, in tab order
    pub fn meal_panels(&self, html: &str) -> ParsingResult<Vec<(MealType, String)>> {
        self.panels_in(&Html::parse_document(html))
    }

    /// Parse every item on the page into menu records
    pub fn parse(&self, html: &str, dining_hall: &str, date: MenuDate) -> ParsingResult<Vec<MenuRecord>> {
        let document = Html::parse_document(html);
        self.parse_with_context(&document, &MenuParseContext::new(dining_hall, date))
    }

    fn has_menu_container(&self, document: &Html) -> bool {
        document.select(&self.tab_container).next().is_some()
    }

    fn panels_in(&self, document: &Html) -> ParsingResult<Vec<(MealType, String)>> {
        let tabs: Vec<ElementRef<'_>> = document.select(&self.meal_tab).collect();
        let layout = MenuLayout::from_tab_count(tabs.len())?;

        tabs.iter()
            .zip(layout.meal_names())
            .map(|(tab, meal)| {
                let href = tab.value().attr("href").ok_or_else(|| ParsingError::HtmlParsingFailed {
                    message: format!("{} tab has no panel reference", meal),
                    url: None,
                })?;
                Ok((*meal, href.trim_start_matches('#').to_string()))
            })
            .collect()
    }

    fn find_panel<'a>(&self, document: &'a Html, panel_id: &str) -> Option<ElementRef<'a>> {
        document
            .select(&self.any_id)
            .find(|element| element.value().id() == Some(panel_id))
    }

    fn parse_row(
        &self,
        row: &ElementRef<'_>,
        meal: MealType,
        station: &str,
        context: &MenuParseContext,
    ) -> Option<MenuRecord> {
        let Some(link) = row.select(&self.item_link).next() else {
            warn!("Skipping menu row without item link at {} ({})", context.dining_hall, station);
            return None;
        };
        let href = link.value().attr("href")?;

        let allergens = row
            .select(&self.allergen_icon)
            .filter_map(|icon| icon.value().attr("title"))
            .map(|title| title.trim().to_string())
            .collect();

        Some(MenuRecord {
            name: element_text(&link),
            url: resolve_url(&self.base_url, href),
            meal,
            dining_hall: context.dining_hall.clone(),
            station: station.to_string(),
            date: context.date,
            allergens,
        })
    }
}

impl ContextualParser for MenuParser {
    type Output = Vec<MenuRecord>;
    type Context = MenuParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        if !self.has_menu_container(html) {
            return Err(ParsingError::MenuContainerMissing);
        }

        let mut records = Vec::new();

        for (meal, panel_id) in self.panels_in(html)? {
            let Some(panel) = self.find_panel(html, &panel_id) else {
                warn!("No menu for {} on {} at {}", meal, context.date, context.dining_hall);
                continue;
            };

            for card in panel.select(&self.station_card) {
                let Some(title) = card.select(&self.station_title).next() else {
                    warn!("Skipping station without a title in {} at {}", meal, context.dining_hall);
                    continue;
                };
                let station = element_text(&title);

                for row in card.select(&self.item_row) {
                    if let Some(record) = self.parse_row(&row, meal, &station, context) {
                        debug!("Scraped {} ({}, {}) from {}", record.name, meal, station, context.dining_hall);
                        records.push(record);
                    }
                }
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    const BASE: &str = "https://nutrition.umd.edu/";

    fn date() -> MenuDate {
        MenuDate::new(NaiveDate::from_ymd_opt(2025, 12, 23).unwrap())
    }

    fn item(name: &str, href: &str) -> String {
        format!(
            r#"<div class="row menu-item-row">
                 <div class="col-md-8"><a class="menu-item-name" href="{href}">{name}</a></div>
                 <div class="col-md-4"><img class="nutri-icon" title="vegetarian"/><img class="nutri-icon" title="contains dairy"/></div>
               </div>"#
        )
    }

    fn card(station: &str, items: &[String]) -> String {
        format!(
            r#"<div class="card"><div class="card-body"><h5 class="card-title"> {station} </h5>{}</div></div>"#,
            items.concat()
        )
    }

    fn page(panels: &[&str]) -> String {
        let tabs: String = (0..panels.len())
            .map(|i| format!(r##"<li><a class="nav-link" href="#pane-{i}">Tab {i}</a></li>"##))
            .collect();
        let bodies: String = panels
            .iter()
            .enumerate()
            .map(|(i, body)| format!(r#"<div class="tab-pane" id="pane-{i}">{body}</div>"#))
            .collect();
        format!(r#"<html><body><ul class="nav">{tabs}</ul><div class="tab-content">{bodies}</div></body></html>"#)
    }

    fn parser() -> MenuParser {
        MenuParser::new(BASE).unwrap()
    }

    #[rstest]
    #[case(3, vec![MealType::Breakfast, MealType::Lunch, MealType::Dinner])]
    #[case(2, vec![MealType::Brunch, MealType::Dinner])]
    fn test_meals_follow_tab_position(#[case] tabs: usize, #[case] expected: Vec<MealType>) {
        let bodies: Vec<String> = (0..tabs)
            .map(|i| card("Grill", &[item(&format!("Item {i}"), &format!("label.aspx?id={i}"))]))
            .collect();
        let refs: Vec<&str> = bodies.iter().map(String::as_str).collect();

        let records = parser().parse(&page(&refs), "South Campus", date()).unwrap();

        let meals: Vec<MealType> = records.iter().map(|r| r.meal).collect();
        assert_eq!(meals, expected);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.name, format!("Item {i}"));
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(4)]
    fn test_unexpected_tab_count_is_unrecoverable(#[case] tabs: usize) {
        let bodies = vec![""; tabs];
        let err = parser().parse(&page(&bodies), "South Campus", date()).unwrap_err();
        assert_eq!(err, ParsingError::UnexpectedTabCount { count: tabs });
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_missing_container_means_closed() {
        let html = "<html><body><p>No menu available</p></body></html>";
        assert!(!parser().is_valid_menu(html));
        let err = parser().parse(html, "251 North", date()).unwrap_err();
        assert_eq!(err, ParsingError::MenuContainerMissing);
    }

    #[test]
    fn test_record_fields() {
        let body = card("Grill", &[item("Scrambled Eggs", "label.aspx?RecNumAndPort=1")]);
        let html = page(&[&body, "", ""]);

        let records = parser().parse(&html, "Yahentamitsi Dining Hall", date()).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.name, "Scrambled Eggs");
        assert_eq!(record.url, "https://nutrition.umd.edu/label.aspx?RecNumAndPort=1");
        assert_eq!(record.station, "Grill");
        assert_eq!(record.meal, MealType::Breakfast);
        assert_eq!(record.dining_hall, "Yahentamitsi Dining Hall");
        assert_eq!(record.date, date());
        assert_eq!(record.allergens, vec!["vegetarian", "contains dairy"]);
    }

    #[test]
    fn test_row_without_link_is_skipped() {
        let broken = r#"<div class="menu-item-row"><span>Mystery</span></div>"#.to_string();
        let body = card("Deli", &[broken, item("Turkey Club", "label.aspx?id=7")]);
        let html = page(&[&body, ""]);

        let records = parser().parse(&html, "South Campus", date()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Turkey Club");
        assert_eq!(records[0].meal, MealType::Brunch);
    }

    #[test]
    fn test_card_without_title_is_skipped() {
        let untitled = format!(r#"<div class="card">{}</div>"#, item("Orphan", "label.aspx?id=1"));
        let html = page(&[&untitled, "", ""]);

        let records = parser().parse(&html, "South Campus", date()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_panel_without_cards_is_empty_not_error() {
        let html = page(&["", "", ""]);
        let records = parser().parse(&html, "South Campus", date()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_panel_is_skipped() {
        let body = card("Grill", &[item("Burger", "label.aspx?id=2")]);
        let html = format!(
            r##"<html><body>
                <a class="nav-link" href="#gone">A</a><a class="nav-link" href="#here">B</a>
                <div class="tab-content"><div id="here">{body}</div></div>
              </body></html>"##
        );

        let records = parser().parse(&html, "South Campus", date()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].meal, MealType::Dinner);
    }

    #[test]
    fn test_meal_panels_strip_anchor() {
        let html = page(&["", ""]);
        let panels = parser().meal_panels(&html).unwrap();
        assert_eq!(
            panels,
            vec![
                (MealType::Brunch, "pane-0".to_string()),
                (MealType::Dinner, "pane-1".to_string()),
            ]
        );
    }
}
