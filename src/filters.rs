//! Dashboard filter selections and their compiled predicates
//!
//! Each dashboard has its own typed filter struct ([`ShoppingFilters`],
//! [`AirbnbFilters`]). Both compile to a [`Predicate`] whose condition order
//! is fixed per dashboard, so the same selection always yields the same
//! predicate text.

pub mod airbnb;
pub mod predicate;
pub mod shopping;

pub use airbnb::{AirbnbFilters, PriceRange};
pub use predicate::{Condition, Predicate, quote_ident, quote_literal};
pub use shopping::ShoppingFilters;

use crate::dataset::DatasetShape;
use crate::error::{InsightsError, Result};
use serde::{Deserialize, Serialize};

/// Filter selection for whichever dashboard is active
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum FilterSpec {
    #[default]
    None,
    Shopping(ShoppingFilters),
    Airbnb(AirbnbFilters),
}

impl FilterSpec {
    /// Build a selection from `key=value` facet pairs for the given shape
    ///
    /// Repeated keys accumulate values. Bare `None` is returned when no
    /// pairs are given, whatever the shape.
    ///
    /// # Errors
    ///
    /// Fails for an unknown shape with pairs, for facet keys the shape's
    /// dashboard does not have, and for malformed price bounds.
    pub fn from_pairs(shape: DatasetShape, pairs: &[(String, String)]) -> Result<Self> {
        if pairs.is_empty() {
            return Ok(Self::None);
        }

        let grouped = group_pairs(pairs);
        match shape {
            DatasetShape::Shopping => {
                let mut filters = ShoppingFilters::new();
                for (key, values) in grouped {
                    if !filters.set_facet(&key, values) {
                        return Err(unknown_facet(&key, &shopping::FACETS));
                    }
                }
                Ok(Self::Shopping(filters))
            }
            DatasetShape::Airbnb => {
                let mut filters = AirbnbFilters::new();
                for (key, values) in grouped {
                    if !filters.set_facet(&key, values)? {
                        return Err(unknown_facet(&key, &airbnb::FACETS));
                    }
                }
                Ok(Self::Airbnb(filters))
            }
            DatasetShape::Unknown => Err(InsightsError::InvalidFilter(
                "filters need a shopping or airbnb dataset".to_owned(),
            )),
        }
    }

    /// Dashboard this selection belongs to; `None` for an empty selection
    pub fn shape(&self) -> Option<DatasetShape> {
        match self {
            Self::None => None,
            Self::Shopping(_) => Some(DatasetShape::Shopping),
            Self::Airbnb(_) => Some(DatasetShape::Airbnb),
        }
    }

    pub fn predicate(&self) -> Predicate {
        match self {
            Self::None => Predicate::new(),
            Self::Shopping(filters) => filters.predicate(),
            Self::Airbnb(filters) => filters.predicate(),
        }
    }
}

/// Keys in first-seen order, values merged across repeats
fn group_pairs(pairs: &[(String, String)]) -> Vec<(String, Vec<String>)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in pairs {
        let key = key.trim().to_lowercase();
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value.clone()),
            None => grouped.push((key, vec![value.clone()])),
        }
    }
    grouped
}

fn unknown_facet(key: &str, allowed: &[&str]) -> InsightsError {
    InsightsError::InvalidFilter(format!(
        "unknown facet '{key}', expected one of: {}",
        allowed.join(", ")
    ))
}
