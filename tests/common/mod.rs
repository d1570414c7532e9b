#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use dining_menu_sync::domain::menu::MenuDate;
use dining_menu_sync::infrastructure::config::{DiningHall, ScraperConfig};
use dining_menu_sync::infrastructure::http_client::PageFetcher;
use dining_menu_sync::infrastructure::parsing_error::FetchError;

pub const BASE_URL: &str = "https://nutrition.test/";

/// Serves canned HTML by URL and counts every request
#[derive(Default)]
pub struct StaticPageFetcher {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    counts: Mutex<HashMap<String, usize>>,
}

impl StaticPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    pub fn failing(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.counts.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.counts.lock().unwrap().values().sum()
    }

    /// Requests for anything other than a menu page
    pub fn label_fetches(&self) -> usize {
        self.counts
            .lock()
            .unwrap()
            .iter()
            .filter(|(url, _)| url.contains("label.aspx"))
            .map(|(_, n)| n)
            .sum()
    }
}

#[async_trait]
impl PageFetcher for StaticPageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        *self.counts.lock().unwrap().entry(url.to_string()).or_default() += 1;

        if self.failing.contains(url) {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: 503,
            });
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound { url: url.to_string() })
    }
}

pub fn menu_date() -> MenuDate {
    MenuDate::new(NaiveDate::from_ymd_opt(2025, 12, 23).unwrap())
}

pub fn scraper_config(halls: &[(&str, u32)]) -> ScraperConfig {
    ScraperConfig {
        base_url: BASE_URL.to_string(),
        dining_halls: halls.iter().map(|(name, num)| DiningHall::new(name, *num)).collect(),
        ..ScraperConfig::default()
    }
}

pub fn menu_url(config: &ScraperConfig, hall: &str) -> String {
    config.menu_url(hall, &menu_date().to_string()).unwrap()
}

pub fn label_href(id: u32) -> String {
    format!("label.aspx?RecNumAndPort={id}")
}

pub fn label_url(id: u32) -> String {
    format!("{BASE_URL}{}", label_href(id))
}

/// One station card: `(station, [(item name, label id)])`
pub type Station<'a> = (&'a str, &'a [(&'a str, u32)]);

/// A menu page whose tabs hold the given stations, one slice per tab
pub fn menu_page(tabs: &[&[Station<'_>]]) -> String {
    let nav: String = (0..tabs.len())
        .map(|i| format!(r##"<li class="nav-item"><a class="nav-link" href="#pane-{i}">Meal {i}</a></li>"##))
        .collect();

    let panes: String = tabs
        .iter()
        .enumerate()
        .map(|(i, stations)| {
            let cards: String = stations
                .iter()
                .map(|(station, items)| {
                    let rows: String = items
                        .iter()
                        .map(|(name, id)| {
                            format!(
                                r#"<div class="row menu-item-row">
                                     <div class="col-md-8"><a class="menu-item-name" href="{}">{name}</a></div>
                                     <div class="col-md-4"><img class="nutri-icon" title="vegan"/></div>
                                   </div>"#,
                                label_href(*id)
                            )
                        })
                        .collect();
                    format!(
                        r#"<div class="card"><div class="card-body"><h5 class="card-title">{station}</h5>{rows}</div></div>"#
                    )
                })
                .collect();
            format!(r#"<div class="tab-pane" id="pane-{i}">{cards}</div>"#)
        })
        .collect();

    format!(
        r#"<!doctype html><html><body>
             <ul class="nav nav-tabs">{nav}</ul>
             <div class="tab-content">{panes}</div>
           </body></html>"#
    )
}

/// Page served when a hall is closed: no tab container at all
pub fn closed_page() -> String {
    r#"<!doctype html><html><body><p>No menu items available.</p></body></html>"#.to_string()
}

pub fn label_page(name: &str, protein: f64, carbs: f64, fat: f64, calories: f64) -> String {
    format!(
        r#"<!doctype html><html><body>
             <h2>{name}</h2>
             <div class="nutfactsservsize">Serving size</div>
             <div class="nutfactsservsize">1 Cup</div>
             <table>
               <tr><td class="nutfactstopnutrient">Calories&nbsp;{calories}</td></tr>
               <tr><td class="nutfactstopnutrient">Total Fat&nbsp;{fat}g</td></tr>
               <tr><td class="nutfactstopnutrient">Total Carbohydrate&nbsp;{carbs}g</td></tr>
               <tr><td class="nutfactstopnutrient">Protein&nbsp;{protein}g</td></tr>
             </table>
           </body></html>"#
    )
}
