//! Integration tests for the catalog query engine and store.
//!
//! These tests run the full pipeline (search, category, price range, energy
//! tag, sort) over a realistic catalog and load it through the
//! `CatalogSource` seam the HTTP client implements.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

use qorikusi_integration_tests::{FixedCatalog, sample_catalog};
use qorikusi_storefront::catalog::{
    self, CatalogStore, FilterCriteria, SortKey, apply_all, categories_from_products,
};
use qorikusi_storefront::models::Product;

fn names(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.name.as_str()).collect()
}

// =============================================================================
// Query Engine
// =============================================================================

#[test]
fn test_empty_criteria_is_identity() {
    let products = sample_catalog();
    let criteria = FilterCriteria::new();
    assert!(criteria.is_empty());
    assert_eq!(apply_all(&criteria, &products), products);
}

#[test]
fn test_blank_text_filters_are_identity() {
    let products = sample_catalog();
    let criteria = FilterCriteria::new()
        .with_search("   ")
        .with_category("  ")
        .with_energy(" \t");
    assert!(criteria.is_empty());
    assert_eq!(apply_all(&criteria, &products), products);
}

#[test]
fn test_combined_filters_narrow_and_sort() {
    let criteria = FilterCriteria::new()
        .with_search("collar")
        .with_price_range(Some(dec!(100)), None)
        .with_energy("LUNA LLENA")
        .sorted_by(SortKey::PriceDesc);

    let result = apply_all(&criteria, &sample_catalog());
    assert_eq!(names(&result), vec!["Collar Ámbar", "Collar Luna"]);
}

#[test]
fn test_every_result_satisfies_every_criterion() {
    let criteria = FilterCriteria::new()
        .with_category("anillos")
        .with_price_range(Some(dec!(40)), Some(dec!(100)));

    let result = apply_all(&criteria, &sample_catalog());
    assert_eq!(result.len(), 2);
    for product in &result {
        assert_eq!(product.category, "Anillos");
        assert!(product.price >= dec!(40) && product.price <= dec!(100));
    }
}

#[test]
fn test_filters_never_invent_products() {
    let products = sample_catalog();
    let criteria = FilterCriteria::new().with_search("a").sorted_by(SortKey::NameAsc);
    let result = apply_all(&criteria, &products);

    assert!(result.len() <= products.len());
    assert!(result.iter().all(|p| products.contains(p)));
}

#[test]
fn test_price_bounds_are_inclusive() {
    let result = catalog::by_price_range(Some(dec!(120)), Some(dec!(180)), &sample_catalog());
    assert_eq!(names(&result), vec!["Collar Luna", "Aretes Plata"]);
}

#[test]
fn test_inverted_price_bounds_match_nothing() {
    let criteria = FilterCriteria::new().with_price_range(Some(dec!(200)), Some(dec!(100)));
    assert!(apply_all(&criteria, &sample_catalog()).is_empty());
}

#[test]
fn test_untagged_products_never_match_a_tag() {
    let result = catalog::by_energy_tag("Luna Nueva", &sample_catalog());
    assert_eq!(names(&result), vec!["Anillo Sol"]);
}

#[test]
fn test_name_sort_ignores_accents() {
    let criteria = FilterCriteria::new().sorted_by(SortKey::NameAsc);
    let result = apply_all(&criteria, &sample_catalog());
    assert_eq!(
        names(&result),
        vec![
            "Anillo Cobre",
            "Anillo Sol",
            "Aretes Plata",
            "Collar Ámbar",
            "Collar Luna",
            "Pulsera Estrella",
        ]
    );
}

#[test]
fn test_unknown_sort_key_keeps_order() {
    let products = sample_catalog();
    let criteria = FilterCriteria::new().sorted_by(SortKey::parse("bestsellers"));
    assert_eq!(apply_all(&criteria, &products), products);
}

#[test]
fn test_categories_and_pagination() {
    let products = sample_catalog();
    assert_eq!(
        categories_from_products(&products),
        vec!["Anillos", "Aretes", "Collares", "Pulseras"]
    );

    let page = catalog::paginate(&products, 1, 4);
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.total_elements, 6);
    assert_eq!(page.total_pages, 2);
    assert!(page.has_previous());
    assert!(!page.has_next());
}

// =============================================================================
// Catalog Store
// =============================================================================

#[tokio::test]
async fn test_store_refresh_then_query() {
    let store = CatalogStore::new();
    let mut updates = store.subscribe();

    let count = store
        .refresh(&FixedCatalog::new(sample_catalog()), None)
        .await
        .unwrap();
    assert_eq!(count, 6);
    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().len(), 6);

    let result = store.query(&FilterCriteria::new().with_category("Collares"));
    assert_eq!(result.len(), 2);
}

#[tokio::test]
async fn test_store_refresh_by_category() {
    let store = CatalogStore::new();
    store
        .refresh(&FixedCatalog::new(sample_catalog()), Some("pulseras"))
        .await
        .unwrap();
    assert_eq!(names(&store.snapshot()), vec!["Pulsera Estrella"]);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_snapshot() {
    let store = CatalogStore::with_products(sample_catalog());

    let err = store.refresh(&FixedCatalog::failing(), None).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(store.snapshot().len(), 6);
}
