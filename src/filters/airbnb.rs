//! Filters for the Airbnb Open Data dashboard

use super::Predicate;
use crate::error::{InsightsError, Result};
use serde::{Deserialize, Serialize};

pub const NEIGHBOURHOOD_GROUP: &str = "neighbourhood group";
pub const ROOM_TYPE: &str = "room type";
pub const CANCELLATION_POLICY: &str = "cancellation_policy";
pub const PRICE: &str = "price";

/// Facet keys accepted by [`AirbnbFilters::set_facet`]
pub const FACETS: [&str; 5] = [
    "neighbourhood",
    "room_type",
    "cancellation_policy",
    "price_min",
    "price_max",
];

/// Inclusive price bounds; either side may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceRange")]
pub struct PriceRange {
    min: Option<f64>,
    max: Option<f64>,
}

/// Unchecked wire form of [`PriceRange`]
#[derive(Deserialize)]
struct RawPriceRange {
    min: Option<f64>,
    max: Option<f64>,
}

impl TryFrom<RawPriceRange> for PriceRange {
    type Error = InsightsError;

    fn try_from(raw: RawPriceRange) -> Result<Self> {
        Self::new(raw.min, raw.max)
    }
}

impl PriceRange {
    /// # Errors
    ///
    /// Rejects NaN and infinite bounds.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Result<Self> {
        for bound in [min, max].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(InsightsError::InvalidFilter(format!(
                    "price bound {bound} is not a finite number"
                )));
            }
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }
}

/// Selected values per facet plus an optional price range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirbnbFilters {
    pub neighbourhood: Vec<String>,
    pub room_type: Vec<String>,
    pub cancellation_policy: Vec<String>,
    pub price: PriceRange,
}

impl AirbnbFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_neighbourhood<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.neighbourhood = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_room_type<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.room_type = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cancellation_policy<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cancellation_policy = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_price(mut self, price: PriceRange) -> Self {
        self.price = price;
        self
    }

    /// Set a facet by key; returns `Ok(false)` for keys this dashboard lacks
    ///
    /// # Errors
    ///
    /// Fails when a price bound is not exactly one finite number.
    pub fn set_facet(&mut self, key: &str, values: Vec<String>) -> Result<bool> {
        match key {
            "neighbourhood" => self.neighbourhood = values,
            "room_type" => self.room_type = values,
            "cancellation_policy" => self.cancellation_policy = values,
            "price_min" => {
                self.price = PriceRange::new(Some(parse_bound(key, &values)?), self.price.max)?;
            }
            "price_max" => {
                self.price = PriceRange::new(self.price.min, Some(parse_bound(key, &values)?))?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub fn is_empty(&self) -> bool {
        self.predicate().is_empty()
    }

    /// Neighbourhood group, room type, cancellation policy, then the price
    /// lower and upper bounds
    pub fn predicate(&self) -> Predicate {
        Predicate::new()
            .is_in(NEIGHBOURHOOD_GROUP, &self.neighbourhood)
            .is_in(ROOM_TYPE, &self.room_type)
            .is_in(CANCELLATION_POLICY, &self.cancellation_policy)
            .at_least(PRICE, self.price.min)
            .at_most(PRICE, self.price.max)
    }
}

fn parse_bound(key: &str, values: &[String]) -> Result<f64> {
    let [value] = values else {
        return Err(InsightsError::InvalidFilter(format!(
            "{key} takes exactly one number, got {}",
            values.len()
        )));
    };

    value.trim().parse::<f64>().map_err(|e| {
        InsightsError::InvalidFilter(format!("{key} value '{value}' is not a number: {e}"))
    })
}
