//! Filters for the Customer Shopping Behavior dashboard

use super::Predicate;
use serde::{Deserialize, Serialize};

pub const LOCATION: &str = "Location";
pub const CATEGORY: &str = "Category";
pub const SEASON: &str = "Season";
pub const GENDER: &str = "Gender";

/// Facet keys accepted by [`ShoppingFilters::set_facet`]
pub const FACETS: [&str; 4] = ["location", "category", "season", "gender"];

/// Selected values per facet; an empty list leaves the facet unfiltered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoppingFilters {
    pub location: Vec<String>,
    pub category: Vec<String>,
    pub season: Vec<String>,
    pub gender: Vec<String>,
}

impl ShoppingFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.location = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_season<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.season = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_gender<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gender = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set a facet by key; returns `false` for keys this dashboard lacks
    pub fn set_facet(&mut self, key: &str, values: Vec<String>) -> bool {
        let slot = match key {
            "location" => &mut self.location,
            "category" => &mut self.category,
            "season" => &mut self.season,
            "gender" => &mut self.gender,
            _ => return false,
        };
        *slot = values;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.predicate().is_empty()
    }

    /// Location, category, season, gender, in that order
    pub fn predicate(&self) -> Predicate {
        Predicate::new()
            .is_in(LOCATION, &self.location)
            .is_in(CATEGORY, &self.category)
            .is_in(SEASON, &self.season)
            .is_in(GENDER, &self.gender)
    }
}
