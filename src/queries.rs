//! Fixed aggregate queries behind each dashboard panel
//!
//! Every catalog function takes the [`Store`] and an optional filter
//! selection for its dashboard and returns one result frame. SQL templates
//! are constant text; filter values reach the rows through
//! [`Store::query_filtered`] as bound expression literals.

pub mod airbnb;
pub mod shopping;

use crate::error::Result;
use crate::filters::{Predicate, quote_ident};
use crate::store::Store;
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Distinct values offered for one filter facet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    /// Facet key as accepted by the filter structs
    pub facet: &'static str,
    pub values: Vec<String>,
}

pub(crate) fn run_catalog(
    store: &Store,
    table: &str,
    predicate: &Predicate,
    sql: &str,
) -> Result<DataFrame> {
    if !predicate.is_empty() {
        debug!(table, filter = %predicate.where_clause(), "Applying dashboard filters");
    }
    store.query_filtered(table, predicate, sql)
}

/// Sorted distinct non-null values of `column`, rendered as strings
pub(crate) fn distinct_values(store: &Store, table: &str, column: &str) -> Result<Vec<String>> {
    let ident = quote_ident(column);
    let sql = format!(
        "SELECT DISTINCT {ident} AS value FROM {table} WHERE {ident} IS NOT NULL ORDER BY value"
    );
    let df = store.query(&sql)?;

    let values = df
        .column("value")?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(values
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_owned)
        .collect())
}
