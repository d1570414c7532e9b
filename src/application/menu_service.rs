//! Read-side queries over the catalog for menu display and food lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;

use crate::domain::food::{Food, FoodSummary};
use crate::domain::menu::{MealType, MenuDate, MenuLayout};
use crate::domain::repositories::FoodCatalog;

/// Foods of one meal grouped by station; stations sort by name
pub type StationMenu = BTreeMap<String, Vec<FoodSummary>>;

pub struct MenuService {
    catalog: Arc<dyn FoodCatalog>,
}

impl MenuService {
    pub fn new(catalog: Arc<dyn FoodCatalog>) -> Self {
        Self { catalog }
    }

    pub async fn lookup_foods_for_meal(
        &self,
        meal: MealType,
        date: MenuDate,
        location: &str,
    ) -> Result<StationMenu> {
        let rows = self.catalog.foods_for_meal(meal, date, location).await?;

        let mut menu = StationMenu::new();
        for row in rows {
            menu.entry(row.station).or_default().push(row.food);
        }
        Ok(menu)
    }

    pub async fn lookup_food_by_id(&self, id: i64) -> Result<Option<Food>> {
        self.catalog.food_by_id(id).await
    }

    /// Meal periods served on `date`: brunch days have no breakfast or lunch
    pub async fn meals_for_date(&self, date: MenuDate) -> Result<&'static [MealType]> {
        let layout = if self.catalog.has_brunch(date).await? {
            MenuLayout::Brunch
        } else {
            MenuLayout::ThreeMeal
        };
        Ok(layout.meal_names())
    }

    /// Every meal of the day at one hall; meals with nothing listed are left out
    pub async fn menu_for_day(&self, date: MenuDate, location: &str) -> Result<Vec<(MealType, StationMenu)>> {
        let mut day = Vec::new();
        for meal in self.meals_for_date(date).await? {
            let menu = self.lookup_foods_for_meal(*meal, date, location).await?;
            if !menu.is_empty() {
                day.push((*meal, menu));
            }
        }
        Ok(day)
    }
}
