//! Dashboard assembly: the panels shown for each dataset shape

use crate::dataset::DatasetShape;
use crate::error::{InsightsError, Result};
use crate::filters::{AirbnbFilters, FilterSpec, ShoppingFilters};
use crate::queries::{airbnb, shopping};
use crate::session::Session;
use crate::store::Store;
use polars::prelude::DataFrame;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
    Heatmap,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bar => "bar",
            Self::Pie => "pie",
            Self::Heatmap => "heatmap",
        };
        f.write_str(name)
    }
}

/// One chart with the query result that feeds it
#[derive(Debug, Clone)]
pub struct Panel {
    pub title: &'static str,
    pub kind: ChartKind,
    pub data: DataFrame,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub title: &'static str,
    pub shape: DatasetShape,
    pub panels: Vec<Panel>,
}

/// Run every panel query for the session's active dataset
///
/// Returns `Ok(None)` when nothing is loaded or the shape is unknown.
///
/// # Errors
///
/// Fails with [`InsightsError::InvalidFilter`] when `filters` belong to the
/// other dashboard, and with any error raised by the panel queries.
pub fn build(session: &Session, filters: &FilterSpec) -> Result<Option<Dashboard>> {
    let shape = session.shape();
    if let Some(filter_shape) = filters.shape()
        && filter_shape != shape
    {
        return Err(InsightsError::InvalidFilter(format!(
            "{filter_shape} filters cannot be applied to a {shape} dataset"
        )));
    }

    let store = session.store();
    let dashboard = match (shape, filters) {
        (DatasetShape::Shopping, FilterSpec::Shopping(selected)) => {
            shopping_dashboard(store, Some(selected))?
        }
        (DatasetShape::Shopping, _) => shopping_dashboard(store, None)?,
        (DatasetShape::Airbnb, FilterSpec::Airbnb(selected)) => {
            airbnb_dashboard(store, Some(selected))?
        }
        (DatasetShape::Airbnb, _) => airbnb_dashboard(store, None)?,
        (DatasetShape::Unknown, _) => return Ok(None),
    };

    tracing::info!(
        shape = %dashboard.shape,
        panels = dashboard.panels.len(),
        filtered = !filters.predicate().is_empty(),
        "Dashboard built"
    );
    Ok(Some(dashboard))
}

fn shopping_dashboard(store: &Store, filters: Option<&ShoppingFilters>) -> Result<Dashboard> {
    Ok(Dashboard {
        title: "Customer Shopping Behavior",
        shape: DatasetShape::Shopping,
        panels: vec![
            Panel {
                title: "Sales by Category",
                kind: ChartKind::Bar,
                data: shopping::sales_by_category(store, filters)?,
            },
            Panel {
                title: "Payment Methods",
                kind: ChartKind::Pie,
                data: shopping::payment_methods(store, filters)?,
            },
            Panel {
                title: "Average Basket by Age Band",
                kind: ChartKind::Bar,
                data: shopping::avg_basket_by_age(store, filters)?,
            },
            Panel {
                title: "Sales by Gender and Season",
                kind: ChartKind::Heatmap,
                data: shopping::sales_by_gender_season(store, filters)?,
            },
        ],
    })
}

fn airbnb_dashboard(store: &Store, filters: Option<&AirbnbFilters>) -> Result<Dashboard> {
    Ok(Dashboard {
        title: "Airbnb Open Data",
        shape: DatasetShape::Airbnb,
        panels: vec![
            Panel {
                title: "Average Price by Neighbourhood",
                kind: ChartKind::Bar,
                data: airbnb::avg_price_by_neighbourhood(store, filters)?,
            },
            Panel {
                title: "Room Types",
                kind: ChartKind::Pie,
                data: airbnb::room_type_distribution(store, filters)?,
            },
            Panel {
                title: "Average Availability (days/year)",
                kind: ChartKind::Bar,
                data: airbnb::avg_availability_by_neighbourhood(store, filters)?,
            },
            Panel {
                title: "Average Rating by Room Type",
                kind: ChartKind::Bar,
                data: airbnb::avg_rating_by_room_type(store, filters)?,
            },
        ],
    })
}
