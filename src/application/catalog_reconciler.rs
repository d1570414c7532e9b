//! Reconciles one dining hall's parsed menu against the catalog.
//!
//! Discover first, then enrich: the new-vs-existing split is taken against a
//! fresh catalog snapshot, labels are fetched only for new URLs, and menu rows
//! are written for every record of the hall, new and known foods alike.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use super::nutrition_fetcher::{EnrichedFood, NutritionFetcher};
use crate::domain::food::NutritionFacts;
use crate::domain::menu::MenuRecord;
use crate::domain::repositories::FoodCatalog;

/// Records whose URL is not yet in the catalog, in their original order
pub fn partition_new(records: &[MenuRecord], existing: &HashSet<String>) -> Vec<MenuRecord> {
    records
        .iter()
        .filter(|record| !existing.contains(&record.url))
        .cloned()
        .collect()
}

/// What reconciling one hall changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HallOutcome {
    /// Records whose URL was unknown before this hall
    pub new_candidates: usize,
    /// Catalog rows actually inserted
    pub new_foods: u64,
    /// Menu rows actually inserted
    pub menu_rows: u64,
}

pub struct CatalogReconciler {
    catalog: Arc<dyn FoodCatalog>,
    nutrition: NutritionFetcher,
}

impl CatalogReconciler {
    pub fn new(catalog: Arc<dyn FoodCatalog>, nutrition: NutritionFetcher) -> Self {
        Self { catalog, nutrition }
    }

    pub async fn reconcile_hall(&self, records: &[MenuRecord]) -> Result<HallOutcome> {
        let existing = self.catalog.existing_urls().await?;
        let new_records = partition_new(records, &existing);

        let enriched = self.nutrition.fetch_all(&new_records).await;
        let foods: Vec<NutritionFacts> = enriched.into_iter().map(EnrichedFood::into_catalog_entry).collect();

        let new_foods = self.catalog.insert_foods(&foods).await?;
        let menu_rows = self.catalog.insert_menu_entries(records).await?;

        info!(
            "Reconciled {} records: {} new candidates, {} foods added, {} menu rows added",
            records.len(),
            new_records.len(),
            new_foods,
            menu_rows
        );

        Ok(HallOutcome {
            new_candidates: new_records.len(),
            new_foods,
            menu_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::menu::MealType;
    use crate::test_utils::sample_record;
    use proptest::prelude::*;

    fn record(url: &str) -> MenuRecord {
        sample_record(url, url, MealType::Lunch, "Grill")
    }

    #[test]
    fn test_partition_keeps_source_order() {
        let records: Vec<MenuRecord> = ["a", "b", "c", "d"].iter().map(|u| record(u)).collect();
        let existing: HashSet<String> = ["b".to_string()].into_iter().collect();

        let new: Vec<String> = partition_new(&records, &existing).into_iter().map(|r| r.url).collect();
        assert_eq!(new, vec!["a", "c", "d"]);
    }

    proptest! {
        #[test]
        fn prop_partition_is_an_ordered_subsequence(
            urls in prop::collection::vec("[a-e]{1,2}", 0..30),
            known in prop::collection::hash_set("[a-e]{1,2}", 0..10),
        ) {
            let records: Vec<MenuRecord> = urls.iter().map(|u| record(u)).collect();
            let new = partition_new(&records, &known);

            let expected: Vec<&String> = urls.iter().filter(|u| !known.contains(*u)).collect();
            let actual: Vec<&String> = new.iter().map(|r| &r.url).collect();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn prop_partition_against_full_snapshot_is_empty(
            urls in prop::collection::vec("[a-z]{1,4}", 0..30),
        ) {
            let records: Vec<MenuRecord> = urls.iter().map(|u| record(u)).collect();
            let everything: HashSet<String> = urls.iter().cloned().collect();
            prop_assert!(partition_new(&records, &everything).is_empty());
        }

        #[test]
        fn prop_partition_is_deterministic(
            urls in prop::collection::vec("[a-c]", 0..20),
            known in prop::collection::hash_set("[a-c]", 0..3),
        ) {
            let records: Vec<MenuRecord> = urls.iter().map(|u| record(u)).collect();
            prop_assert_eq!(partition_new(&records, &known), partition_new(&records, &known));
        }
    }
}
