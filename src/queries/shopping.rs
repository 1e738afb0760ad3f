//! Customer Shopping Behavior panels

use super::{FacetOptions, distinct_values, run_catalog};
use crate::error::Result;
use crate::filters::ShoppingFilters;
use crate::filters::shopping::{CATEGORY, GENDER, LOCATION, SEASON};
use crate::store::Store;
use polars::prelude::*;

pub const TABLE: &str = "shopping";

const SALES_BY_CATEGORY: &str = r#"
SELECT
    "Category" AS category,
    SUM("Purchase Amount (USD)") AS total_sales,
    COUNT(*) AS transactions
FROM shopping
GROUP BY "Category"
ORDER BY total_sales DESC, category ASC
"#;

const SALES_BY_GENDER_SEASON: &str = r#"
SELECT
    "Gender" AS gender,
    "Season" AS season,
    SUM("Purchase Amount (USD)") AS total_sales,
    COUNT(*) AS transactions
FROM shopping
GROUP BY "Gender", "Season"
ORDER BY gender ASC, season ASC
"#;

const AVG_BASKET_BY_AGE: &str = r#"
SELECT
    age_band,
    ROUND(AVG(amount), 2) AS avg_basket,
    COUNT(*) AS customers
FROM (
    SELECT
        CASE
            WHEN "Age" < 25 THEN '18-24'
            WHEN "Age" < 35 THEN '25-34'
            WHEN "Age" < 45 THEN '35-44'
            WHEN "Age" < 55 THEN '45-54'
            ELSE '55+'
        END AS age_band,
        "Purchase Amount (USD)" AS amount
    FROM shopping
) AS banded
GROUP BY age_band
ORDER BY age_band ASC
"#;

const PAYMENT_METHODS: &str = r#"
SELECT
    "Payment Method" AS payment_method,
    COUNT(*) AS transactions
FROM shopping
GROUP BY "Payment Method"
ORDER BY transactions DESC, payment_method ASC
"#;

fn predicate(filters: Option<&ShoppingFilters>) -> crate::filters::Predicate {
    filters.map(ShoppingFilters::predicate).unwrap_or_default()
}

/// Revenue and transaction count per category, largest revenue first
pub fn sales_by_category(store: &Store, filters: Option<&ShoppingFilters>) -> Result<DataFrame> {
    run_catalog(store, TABLE, &predicate(filters), SALES_BY_CATEGORY)
}

/// Revenue and transactions for every gender and season pair
pub fn sales_by_gender_season(
    store: &Store,
    filters: Option<&ShoppingFilters>,
) -> Result<DataFrame> {
    run_catalog(store, TABLE, &predicate(filters), SALES_BY_GENDER_SEASON)
}

/// Mean purchase amount per age band
pub fn avg_basket_by_age(store: &Store, filters: Option<&ShoppingFilters>) -> Result<DataFrame> {
    run_catalog(store, TABLE, &predicate(filters), AVG_BASKET_BY_AGE)
}

/// Transactions per payment method with their share of the total in percent
pub fn payment_methods(store: &Store, filters: Option<&ShoppingFilters>) -> Result<DataFrame> {
    let counts = run_catalog(store, TABLE, &predicate(filters), PAYMENT_METHODS)?;

    let transactions = col("transactions").cast(DataType::Float64);
    Ok(counts
        .lazy()
        .with_column(
            (transactions.clone() * lit(100.0) / transactions.sum())
                .round(2)
                .alias("percentage"),
        )
        .collect()?)
}

/// Distinct values for the location, category, season and gender facets
pub fn filter_options(store: &Store) -> Result<Vec<FacetOptions>> {
    Ok(vec![
        FacetOptions {
            facet: "location",
            values: distinct_values(store, TABLE, LOCATION)?,
        },
        FacetOptions {
            facet: "category",
            values: distinct_values(store, TABLE, CATEGORY)?,
        },
        FacetOptions {
            facet: "season",
            values: distinct_values(store, TABLE, SEASON)?,
        },
        FacetOptions {
            facet: "gender",
            values: distinct_values(store, TABLE, GENDER)?,
        },
    ])
}
