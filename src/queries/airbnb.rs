//! Airbnb Open Data panels

use super::{FacetOptions, distinct_values, run_catalog};
use crate::error::Result;
use crate::filters::airbnb::{CANCELLATION_POLICY, NEIGHBOURHOOD_GROUP, ROOM_TYPE};
use crate::filters::{AirbnbFilters, Predicate};
use crate::store::Store;
use polars::prelude::*;

pub const TABLE: &str = "airbnb";

const AVG_PRICE_BY_NEIGHBOURHOOD: &str = r#"
SELECT
    "neighbourhood group" AS neighbourhood,
    ROUND(AVG(price), 2) AS avg_price
FROM airbnb
GROUP BY "neighbourhood group"
ORDER BY avg_price DESC, neighbourhood ASC
"#;

const ROOM_TYPE_DISTRIBUTION: &str = r#"
SELECT
    "room type" AS room_type,
    COUNT(*) AS listings
FROM airbnb
GROUP BY "room type"
ORDER BY listings DESC, room_type ASC
"#;

const AVG_AVAILABILITY_BY_NEIGHBOURHOOD: &str = r#"
SELECT
    "neighbourhood group" AS neighbourhood,
    ROUND(AVG("availability 365"), 0) AS avg_availability
FROM airbnb
GROUP BY "neighbourhood group"
ORDER BY avg_availability DESC, neighbourhood ASC
"#;

const AVG_RATING_BY_ROOM_TYPE: &str = r#"
SELECT
    "room type" AS room_type,
    ROUND(AVG("review rate number"), 2) AS avg_rating
FROM airbnb
GROUP BY "room type"
ORDER BY avg_rating DESC, room_type ASC
"#;

fn predicate(filters: Option<&AirbnbFilters>) -> Predicate {
    filters.map(AirbnbFilters::predicate).unwrap_or_default()
}

pub fn avg_price_by_neighbourhood(
    store: &Store,
    filters: Option<&AirbnbFilters>,
) -> Result<DataFrame> {
    run_catalog(store, TABLE, &predicate(filters), AVG_PRICE_BY_NEIGHBOURHOOD)
}

pub fn room_type_distribution(store: &Store, filters: Option<&AirbnbFilters>) -> Result<DataFrame> {
    run_catalog(store, TABLE, &predicate(filters), ROOM_TYPE_DISTRIBUTION)
}

/// Mean days available per year, rounded to whole days
pub fn avg_availability_by_neighbourhood(
    store: &Store,
    filters: Option<&AirbnbFilters>,
) -> Result<DataFrame> {
    run_catalog(store, TABLE, &predicate(filters), AVG_AVAILABILITY_BY_NEIGHBOURHOOD)
}

/// Mean review score per room type
pub fn avg_rating_by_room_type(
    store: &Store,
    filters: Option<&AirbnbFilters>,
) -> Result<DataFrame> {
    run_catalog(store, TABLE, &predicate(filters), AVG_RATING_BY_ROOM_TYPE)
}

/// Distinct values for the neighbourhood, room type and cancellation policy
/// facets; listings without a policy are not offered as an option
pub fn filter_options(store: &Store) -> Result<Vec<FacetOptions>> {
    Ok(vec![
        FacetOptions {
            facet: "neighbourhood",
            values: distinct_values(store, TABLE, NEIGHBOURHOOD_GROUP)?,
        },
        FacetOptions {
            facet: "room_type",
            values: distinct_values(store, TABLE, ROOM_TYPE)?,
        },
        FacetOptions {
            facet: "cancellation_policy",
            values: distinct_values(store, TABLE, CANCELLATION_POLICY)?,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::PriceRange;
    use crate::queries::test_support::{number, strings};
    use anyhow::Result;

    fn store() -> Result<Store> {
        let df = DataFrame::new(vec![
            Column::from(Series::new(
                "neighbourhood group".into(),
                vec!["Brooklyn", "Manhattan", "Brooklyn", "Queens", "Manhattan"],
            )),
            Column::from(Series::new(
                "room type".into(),
                vec![
                    "Private room",
                    "Entire home/apt",
                    "Entire home/apt",
                    "Private room",
                    "Shared room",
                ],
            )),
            Column::from(Series::new(
                "price".into(),
                vec![100.0, 300.0, 200.0, 80.0, 60.0],
            )),
            Column::from(Series::new(
                "availability 365".into(),
                vec![100i64, 202, 50, 365, 0],
            )),
            Column::from(Series::new(
                "review rate number".into(),
                vec![Some(4i64), Some(5), Some(3), None, Some(2)],
            )),
            Column::from(Series::new(
                "cancellation_policy".into(),
                vec![Some("strict"), Some("flexible"), None, Some("moderate"), Some("strict")],
            )),
        ])?;
        let store = Store::new();
        store.register(TABLE, df)?;
        Ok(store)
    }

    #[test]
    fn test_avg_price_by_neighbourhood() -> Result<()> {
        let df = avg_price_by_neighbourhood(&store()?, None)?;
        assert_eq!(df.get_column_names_str(), vec!["neighbourhood", "avg_price"]);
        assert_eq!(strings(&df, "neighbourhood")?, vec!["Manhattan", "Brooklyn", "Queens"]);
        assert_eq!(number(&df, "avg_price", 0)?, Some(180.0));
        assert_eq!(number(&df, "avg_price", 1)?, Some(150.0));
        Ok(())
    }

    #[test]
    fn test_room_type_distribution_ties_by_name() -> Result<()> {
        let df = room_type_distribution(&store()?, None)?;
        assert_eq!(
            strings(&df, "room_type")?,
            vec!["Entire home/apt", "Private room", "Shared room"]
        );
        assert_eq!(number(&df, "listings", 0)?, Some(2.0));
        Ok(())
    }

    #[test]
    fn test_avg_availability_rounds_to_days() -> Result<()> {
        let df = avg_availability_by_neighbourhood(&store()?, None)?;
        assert_eq!(strings(&df, "neighbourhood")?, vec!["Queens", "Manhattan", "Brooklyn"]);
        assert_eq!(number(&df, "avg_availability", 1)?, Some(101.0));
        assert_eq!(number(&df, "avg_availability", 2)?, Some(75.0));
        Ok(())
    }

    #[test]
    fn test_avg_rating_by_room_type() -> Result<()> {
        let df = avg_rating_by_room_type(&store()?, None)?;
        assert_eq!(number(&df, "avg_rating", 0)?, Some(4.0));
        assert_eq!(strings(&df, "room_type")?[0], "Entire home/apt");
        Ok(())
    }

    #[test]
    fn test_price_range_filter() -> Result<()> {
        let filters = AirbnbFilters::new()
            .with_price(PriceRange::new(Some(90.0), Some(250.0))?);
        let df = room_type_distribution(&store()?, Some(&filters))?;
        assert_eq!(strings(&df, "room_type")?, vec!["Entire home/apt", "Private room"]);
        assert_eq!(number(&df, "listings", 0)?, Some(1.0));
        Ok(())
    }

    #[test]
    fn test_quote_in_filter_value_matches_nothing() -> Result<()> {
        let filters = AirbnbFilters::new().with_neighbourhood(["Brooklyn') OR ('1'='1"]);
        let df = avg_price_by_neighbourhood(&store()?, Some(&filters))?;
        assert_eq!(df.height(), 0);
        Ok(())
    }

    #[test]
    fn test_filter_options_skip_missing_policy() -> Result<()> {
        let options = filter_options(&store()?)?;
        assert_eq!(options[0].values, vec!["Brooklyn", "Manhattan", "Queens"]);
        assert_eq!(options[2].facet, "cancellation_policy");
        assert_eq!(options[2].values, vec!["flexible", "moderate", "strict"]);
        Ok(())
    }
}
