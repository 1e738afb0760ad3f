//! Dataset shape detection from column names

use super::DatasetShape;
use polars::prelude::DataFrame;
use std::collections::HashSet;

/// Lower-cased columns that identify the Airbnb Open Data export
pub const AIRBNB_MARKERS: [&str; 4] = [
    "neighbourhood group",
    "room type",
    "host id",
    "availability 365",
];

/// Lower-cased columns that identify the Customer Shopping Behavior export
pub const SHOPPING_MARKERS: [&str; 4] = [
    "customer id",
    "purchase amount (usd)",
    "item purchased",
    "category",
];

/// Classify a set of column names.
///
/// A single marker column is enough. Airbnb is checked first, so a table
/// carrying markers of both shapes is classified as Airbnb.
pub fn detect_shape_from_names<I, S>(names: I) -> DatasetShape
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let columns: HashSet<String> = names
        .into_iter()
        .map(|name| name.as_ref().to_lowercase())
        .collect();

    let matches_any = |markers: &[&str]| markers.iter().any(|m| columns.contains(*m));

    if matches_any(&AIRBNB_MARKERS) {
        DatasetShape::Airbnb
    } else if matches_any(&SHOPPING_MARKERS) {
        DatasetShape::Shopping
    } else {
        DatasetShape::Unknown
    }
}

pub fn detect_shape(df: &DataFrame) -> DatasetShape {
    detect_shape_from_names(df.get_column_names().into_iter().map(|name| name.as_str()))
}
