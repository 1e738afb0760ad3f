//! Per-shape cleaning pipelines
//!
//! Each shape has a fixed, ordered list of [`CleanStep`]s. Steps that target a
//! column the upload does not carry are skipped rather than failing, so a
//! trimmed export still cleans. Running a pipeline twice yields the same
//! frame as running it once.

use super::{DatasetShape, detect::detect_shape};
use crate::error::{InsightsError, Result};
use polars::prelude::*;

pub const PRICE: &str = "price";
pub const SERVICE_FEE: &str = "service fee";
pub const NEIGHBOURHOOD_GROUP: &str = "neighbourhood group";
pub const REVIEWS_PER_MONTH: &str = "reviews per month";

/// Free-text Airbnb columns with no analytic use
pub const AIRBNB_DROPPED_COLUMNS: [&str; 2] = ["license", "house_rules"];

/// Column spellings the shopping queries and filters refer to
pub const SHOPPING_COLUMNS: [&str; 9] = [
    "Customer ID",
    "Age",
    "Gender",
    "Item Purchased",
    "Category",
    "Purchase Amount (USD)",
    "Location",
    "Season",
    "Payment Method",
];

/// Column spellings the Airbnb queries, filters and cleaning steps refer to
pub const AIRBNB_COLUMNS: [&str; 11] = [
    "host id",
    NEIGHBOURHOOD_GROUP,
    "room type",
    "cancellation_policy",
    PRICE,
    SERVICE_FEE,
    REVIEWS_PER_MONTH,
    "review rate number",
    "availability 365",
    "house_rules",
    "license",
];

/// A single deterministic cleaning operation
pub trait CleanStep: Send + Sync {
    /// Short identifier used in logs and errors
    fn name(&self) -> &'static str;

    /// Produce the cleaned frame; the input is left untouched
    fn apply(&self, df: &DataFrame) -> Result<DataFrame>;
}

/// An ordered sequence of steps applied one after the other
pub struct CleaningPipeline {
    steps: Vec<Box<dyn CleanStep>>,
}

impl CleaningPipeline {
    pub fn new(steps: Vec<Box<dyn CleanStep>>) -> Self {
        Self { steps }
    }

    /// Steps for a detected shape; empty for [`DatasetShape::Unknown`]
    pub fn for_shape(shape: DatasetShape) -> Self {
        match shape {
            DatasetShape::Shopping => Self::new(vec![
                Box::new(CanonicalColumnNames::new(&SHOPPING_COLUMNS)),
                Box::new(DropDuplicates),
            ]),
            DatasetShape::Airbnb => Self::new(vec![
                Box::new(CanonicalColumnNames::new(&AIRBNB_COLUMNS)),
                Box::new(DropDuplicates),
                Box::new(DropColumns::new(&AIRBNB_DROPPED_COLUMNS)),
                Box::new(DropMissing::new(&[PRICE, NEIGHBOURHOOD_GROUP])),
                Box::new(FillMissingWithZero::new(REVIEWS_PER_MONTH)),
                Box::new(ParseCurrency::new(PRICE)),
                Box::new(ParseCurrency::new(SERVICE_FEE)),
            ]),
            DatasetShape::Unknown => Self::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut current = df.clone();

        for step in &self.steps {
            let (rows_before, cols_before) = (current.height(), current.width());
            current = step.apply(&current)?;
            tracing::debug!(
                step = step.name(),
                rows_before,
                rows_after = current.height(),
                cols_before,
                cols_after = current.width(),
                "Applied cleaning step"
            );
        }

        Ok(current)
    }
}

// ============================================================================
// Steps
// ============================================================================

/// Rename columns that match a known name up to ASCII case and surrounding
/// whitespace, so `purchase amount (usd)` becomes `Purchase Amount (USD)`.
///
/// A name already present in its exact spelling is left alone.
#[derive(Debug, Clone)]
pub struct CanonicalColumnNames {
    names: Vec<String>,
}

impl CanonicalColumnNames {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|c| (*c).to_owned()).collect(),
        }
    }
}

impl CleanStep for CanonicalColumnNames {
    fn name(&self) -> &'static str {
        "canonical_column_names"
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();
        for canonical in &self.names {
            if has_column(&result, canonical) {
                continue;
            }

            let current = result
                .get_column_names_str()
                .into_iter()
                .find(|name| name.trim().eq_ignore_ascii_case(canonical))
                .map(str::to_owned);

            if let Some(current) = current {
                tracing::debug!(from = %current, to = %canonical, "Renaming column");
                result.rename(&current, canonical.as_str().into())?;
            }
        }
        Ok(result)
    }
}

/// Drop exact-duplicate rows, keeping the first occurrence in order
#[derive(Debug, Clone, Copy)]
pub struct DropDuplicates;

impl CleanStep for DropDuplicates {
    fn name(&self) -> &'static str {
        "drop_duplicates"
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        Ok(df
            .clone()
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()?)
    }
}

/// Remove columns by name, ignoring the ones that are absent
#[derive(Debug, Clone)]
pub struct DropColumns {
    columns: Vec<String>,
}

impl DropColumns {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_owned()).collect(),
        }
    }
}

impl CleanStep for DropColumns {
    fn name(&self) -> &'static str {
        "drop_columns"
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();
        for name in &self.columns {
            if has_column(&result, name) {
                result = result.drop(name)?;
            }
        }
        Ok(result)
    }
}

/// Drop rows holding a null in any of the listed columns that are present
#[derive(Debug, Clone)]
pub struct DropMissing {
    columns: Vec<String>,
}

impl DropMissing {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_owned()).collect(),
        }
    }
}

impl CleanStep for DropMissing {
    fn name(&self) -> &'static str {
        "drop_missing"
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let condition = self
            .columns
            .iter()
            .filter(|name| has_column(df, name))
            .map(|name| col(name.as_str()).is_not_null())
            .reduce(|acc, condition| acc.and(condition));

        match condition {
            Some(condition) => Ok(df.clone().lazy().filter(condition).collect()?),
            None => Ok(df.clone()),
        }
    }
}

/// Replace nulls in one column with zero, casting it to `Float64` first so an
/// all-empty column read as text still ends up numeric
#[derive(Debug, Clone)]
pub struct FillMissingWithZero {
    column: String,
}

impl FillMissingWithZero {
    pub fn new(column: &str) -> Self {
        Self {
            column: column.to_owned(),
        }
    }
}

impl CleanStep for FillMissingWithZero {
    fn name(&self) -> &'static str {
        "fill_missing_with_zero"
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        if !has_column(df, &self.column) {
            return Ok(df.clone());
        }

        let name = self.column.as_str();
        Ok(df
            .clone()
            .lazy()
            .with_column(
                col(name)
                    .cast(DataType::Float64)
                    .fill_null(lit(0.0))
                    .alias(name),
            )
            .collect()?)
    }
}

/// Parse a currency column such as `"$1,060 "` into `Float64`.
///
/// `$`, `,` and surrounding whitespace are stripped; anything else that does
/// not parse as a number is an error naming the first offending value.
#[derive(Debug, Clone)]
pub struct ParseCurrency {
    column: String,
}

impl ParseCurrency {
    pub fn new(column: &str) -> Self {
        Self {
            column: column.to_owned(),
        }
    }

    fn parsed_expr(&self) -> Expr {
        col(self.column.as_str())
            .cast(DataType::String)
            .str()
            .replace_all(lit(r"[\$,]"), lit(""), false)
            .str()
            .strip_chars(lit(NULL))
            .cast(DataType::Float64)
    }
}

impl CleanStep for ParseCurrency {
    fn name(&self) -> &'static str {
        "parse_currency"
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let name = self.column.as_str();
        let Ok(column) = df.column(name) else {
            return Ok(df.clone());
        };

        if column.dtype() == &DataType::Float64 {
            return Ok(df.clone());
        }

        if column.dtype().is_primitive_numeric() {
            return Ok(df
                .clone()
                .lazy()
                .with_column(col(name).cast(DataType::Float64))
                .collect()?);
        }

        let rejected = df
            .clone()
            .lazy()
            .select([col(name).alias("raw"), self.parsed_expr().alias("parsed")])
            .filter(col("raw").is_not_null().and(col("parsed").is_null()))
            .limit(1)
            .collect()?;

        if rejected.height() > 0 {
            let value = rejected.column("raw")?.get(0)?;
            return Err(InsightsError::Cleaning {
                step: self.name(),
                column: self.column.clone(),
                message: format!("value {value} is not a valid amount"),
            });
        }

        Ok(df
            .clone()
            .lazy()
            .with_column(self.parsed_expr().alias(name))
            .collect()?)
    }
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

// ============================================================================
// Entry points
// ============================================================================

pub fn clean_shopping(df: &DataFrame) -> Result<DataFrame> {
    CleaningPipeline::for_shape(DatasetShape::Shopping).apply(df)
}

pub fn clean_airbnb(df: &DataFrame) -> Result<DataFrame> {
    CleaningPipeline::for_shape(DatasetShape::Airbnb).apply(df)
}

/// Detect the shape of `raw` and clean it accordingly.
///
/// Unknown datasets come back unchanged, tagged [`DatasetShape::Unknown`].
pub fn preprocess_auto(raw: DataFrame) -> Result<(DataFrame, DatasetShape)> {
    let shape = detect_shape(&raw);

    let clean = match shape {
        DatasetShape::Shopping => clean_shopping(&raw)?,
        DatasetShape::Airbnb => clean_airbnb(&raw)?,
        DatasetShape::Unknown => {
            tracing::warn!(
                columns = raw.width(),
                "Dataset shape not recognised, skipping cleaning"
            );
            return Ok((raw, shape));
        }
    };

    tracing::info!(
        %shape,
        rows_before = raw.height(),
        rows_after = clean.height(),
        columns = clean.width(),
        "Dataset cleaned"
    );

    Ok((clean, shape))
}
