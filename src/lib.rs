//! # Consumer Insights
//!
//! Load a consumer CSV export, recognise which dataset it is, clean it, and
//! answer the fixed set of dashboard questions for that dataset with SQL.
//!
//! Two exports are recognised: *Customer Shopping Behavior* and *Airbnb Open
//! Data*. Anything else is loaded and previewed but gets no dashboard.
//!
//! ## Quick Start
//!
//! ```no_run
//! use consumer_insights::config::AppSettings;
//! use consumer_insights::filters::{FilterSpec, ShoppingFilters};
//! use consumer_insights::session::Session;
//! use consumer_insights::dashboard;
//! use std::path::Path;
//!
//! # fn example() -> consumer_insights::error::Result<()> {
//! let mut session = Session::new(AppSettings::default());
//! session.upload_path(Path::new("shopping_behavior.csv"))?;
//!
//! let filters = FilterSpec::Shopping(ShoppingFilters::new().with_season(["Winter"]));
//! if let Some(dashboard) = dashboard::build(&session, &filters)? {
//!     for panel in &dashboard.panels {
//!         println!("{}\n{}", panel.title, panel.data);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`dataset`]: CSV parsing, shape detection and cleaning pipelines
//! - [`store`]: In-process table registry queried with SQL
//! - [`filters`]: Typed dashboard filters compiled to predicates
//! - [`queries`]: The aggregate queries behind each dashboard panel
//! - [`session`]: Upload flow and the active dataset
//! - [`dashboard`]: Panel assembly per dataset shape
//! - [`config`], [`logging`], [`error`]: Settings, tracing setup and error types

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod filters;
pub mod logging;
pub mod queries;
pub mod session;
pub mod store;
