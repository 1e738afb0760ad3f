//! Integration tests for the upload-to-dashboard workflow
//!
//! These tests load the fixture files in `testdata/` through a session and
//! check the panels end to end.

use anyhow::Result;
use consumer_insights::config::AppSettings;
use consumer_insights::dashboard::{self, ChartKind};
use consumer_insights::dataset::{DatasetShape, io, preprocess_auto};
use consumer_insights::error::InsightsError;
use consumer_insights::filters::{AirbnbFilters, FilterSpec, PriceRange, ShoppingFilters};
use consumer_insights::queries::{airbnb, shopping};
use consumer_insights::session::Session;
use polars::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn load(path: &str) -> Result<Session> {
    let mut session = Session::new(AppSettings::default());
    session.upload_path(Path::new(path))?;
    Ok(session)
}

fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().flatten().collect())
}

fn column_str(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let series = df.column(name)?.as_materialized_series().cast(&DataType::String)?;
    Ok(series.str()?.into_iter().flatten().map(str::to_owned).collect())
}

#[test]
fn test_shopping_upload_drops_duplicates() -> Result<()> {
    let session = load("testdata/shopping.csv")?;
    let dataset = session.active().expect("dataset loaded");

    assert_eq!(dataset.shape, DatasetShape::Shopping);
    assert_eq!(dataset.rows, 7, "3 duplicate rows should be removed");
    assert_eq!(session.store().table_names()?, vec!["shopping".to_owned()]);
    Ok(())
}

#[test]
fn test_shopping_dashboard() -> Result<()> {
    let session = load("testdata/shopping.csv")?;
    let dashboard = dashboard::build(&session, &FilterSpec::None)?.expect("shopping dashboard");

    assert_eq!(dashboard.title, "Customer Shopping Behavior");
    assert_eq!(dashboard.panels.len(), 4);
    assert_eq!(dashboard.panels[3].kind, ChartKind::Heatmap);

    let sales = &dashboard.panels[0].data;
    assert_eq!(column_str(sales, "category")?, vec!["Clothing", "Footwear"]);
    assert_eq!(column_f64(sales, "total_sales")?, vec![324.0, 110.0]);
    assert_eq!(column_f64(sales, "transactions")?, vec![5.0, 2.0]);

    let payments = &dashboard.panels[1].data;
    let total: f64 = column_f64(payments, "percentage")?.iter().sum();
    assert!((total - 100.0).abs() < 0.1, "percentages sum to {total}");
    assert_eq!(column_str(payments, "payment_method")?[0], "Cash");
    Ok(())
}

#[test]
fn test_lower_cased_headers_still_build_dashboard() -> Result<()> {
    let raw = std::fs::read_to_string("testdata/shopping.csv")?;
    let (header, body) = raw.split_once('\n').expect("header line");
    let upload = format!("{}\n{body}", header.to_lowercase());

    let mut session = Session::new(AppSettings::default());
    let dataset = session.upload_bytes(upload.as_bytes())?;
    assert_eq!(dataset.shape, DatasetShape::Shopping);
    assert!(dataset.columns.iter().any(|c| c == "Purchase Amount (USD)"));

    let filters = FilterSpec::Shopping(ShoppingFilters::new().with_category(["Clothing"]));
    let dashboard = dashboard::build(&session, &filters)?.expect("shopping dashboard");
    assert_eq!(dashboard.panels.len(), 4);

    let sales = &dashboard.panels[0].data;
    assert_eq!(column_str(sales, "category")?, vec!["Clothing"]);
    assert_eq!(column_f64(sales, "total_sales")?, vec![324.0]);
    Ok(())
}

#[test]
fn test_shopping_filters() -> Result<()> {
    let session = load("testdata/shopping.csv")?;
    let filters = ShoppingFilters::new()
        .with_category(["Footwear"])
        .with_gender(["Female"]);

    let sales = shopping::sales_by_category(session.store(), Some(&filters))?;
    assert_eq!(column_str(&sales, "category")?, vec!["Footwear"]);
    assert_eq!(column_f64(&sales, "total_sales")?, vec![90.0]);

    let bands = shopping::avg_basket_by_age(session.store(), Some(&filters))?;
    assert_eq!(column_str(&bands, "age_band")?, vec!["18-24"]);
    Ok(())
}

#[test]
fn test_airbnb_cleaning_invariants() -> Result<()> {
    let session = load("testdata/airbnb.csv")?;
    let dataset = session.active().expect("dataset loaded");
    assert_eq!(dataset.shape, DatasetShape::Airbnb);

    let df = dataset.data();
    assert_eq!(df.height(), 5);
    assert_eq!(df.column("price")?.dtype(), &DataType::Float64);
    assert_eq!(df.column("price")?.null_count(), 0);
    assert_eq!(df.column("neighbourhood group")?.null_count(), 0);
    assert_eq!(df.column("reviews per month")?.null_count(), 0);
    assert!(df.column("house_rules").is_err());
    assert!(df.column("license").is_err());
    assert_eq!(
        column_f64(df, "price")?,
        vec![966.0, 1060.0, 124.0, 368.0, 204.0]
    );
    Ok(())
}

#[test]
fn test_airbnb_dashboard_with_filters() -> Result<()> {
    let session = load("testdata/airbnb.csv")?;

    let dashboard = dashboard::build(&session, &FilterSpec::None)?.expect("airbnb dashboard");
    let prices = &dashboard.panels[0].data;
    assert_eq!(
        column_str(prices, "neighbourhood")?,
        vec!["Brooklyn", "Manhattan", "Queens"]
    );
    assert_eq!(column_f64(prices, "avg_price")?, vec![667.0, 592.0, 204.0]);

    let filters = AirbnbFilters::new()
        .with_room_type(["Private room"])
        .with_price(PriceRange::new(Some(100.0), None)?);
    let rooms = airbnb::room_type_distribution(session.store(), Some(&filters))?;
    assert_eq!(column_str(&rooms, "room_type")?, vec!["Private room"]);
    assert_eq!(column_f64(&rooms, "listings")?, vec![2.0]);

    let options = airbnb::filter_options(session.store())?;
    assert_eq!(options[2].values, vec!["flexible", "moderate", "strict"]);
    Ok(())
}

#[test]
fn test_unknown_dataset() -> Result<()> {
    let session = load("testdata/unknown.csv")?;
    assert_eq!(session.shape(), DatasetShape::Unknown);
    assert!(dashboard::build(&session, &FilterSpec::None)?.is_none());

    let err = shopping::sales_by_category(session.store(), None);
    assert!(matches!(err, Err(InsightsError::TableNotFound(_))));
    Ok(())
}

#[test]
fn test_clean_output_round_trips() -> Result<()> {
    let temp = TempDir::new()?;
    let output = temp.path().join("airbnb_clean.csv");

    let settings = AppSettings::default();
    let raw = io::read_csv_path(Path::new("testdata/airbnb.csv"), &settings.csv)?;
    let (mut clean, shape) = preprocess_auto(raw)?;
    io::write_csv(&mut clean, &output)?;

    let reloaded = io::read_csv_path(&output, &settings.csv)?;
    let (again, shape_again) = preprocess_auto(reloaded)?;
    assert_eq!(shape, shape_again);
    assert_eq!(again.height(), clean.height());
    assert_eq!(again.column("price")?.dtype(), &DataType::Float64);
    Ok(())
}
