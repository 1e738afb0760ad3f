//! Application session: one store, one active dataset
//!
//! Each upload is parsed, classified, cleaned and registered under its
//! shape's table name. The previous dataset's table is dropped first, so
//! the store only ever holds the latest upload.

use crate::config::AppSettings;
use crate::dataset::{DatasetShape, io, preprocess_auto};
use crate::error::Result;
use crate::store::Store;
use chrono::{DateTime, Utc};
use polars::prelude::DataFrame;
use std::path::Path;
use tracing::{info, warn};

/// Summary of the dataset most recently loaded into a [`Session`]
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub shape: DatasetShape,
    pub rows: usize,
    pub columns: Vec<String>,
    pub loaded_at: DateTime<Utc>,
    data: DataFrame,
}

impl LoadedDataset {
    /// The cleaned frame
    pub fn data(&self) -> &DataFrame {
        &self.data
    }
}

#[derive(Debug, Default)]
pub struct Session {
    store: Store,
    settings: AppSettings,
    active: Option<LoadedDataset>,
}

impl Session {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            store: Store::new(),
            settings,
            active: None,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn active(&self) -> Option<&LoadedDataset> {
        self.active.as_ref()
    }

    /// Shape of the active dataset, `Unknown` when nothing is loaded
    pub fn shape(&self) -> DatasetShape {
        self.active
            .as_ref()
            .map_or(DatasetShape::Unknown, |dataset| dataset.shape)
    }

    /// Load CSV bytes as the new active dataset
    pub fn upload_bytes(&mut self, bytes: &[u8]) -> Result<&LoadedDataset> {
        let raw = io::read_csv_bytes(bytes, &self.settings.csv)?;
        self.load_frame(raw)
    }

    /// Load a `.csv` file as the new active dataset
    pub fn upload_path(&mut self, path: &Path) -> Result<&LoadedDataset> {
        info!("Loading {}", path.display());
        let raw = io::read_csv_path(path, &self.settings.csv)?;
        self.load_frame(raw)
    }

    /// Clean an already parsed frame and make it the active dataset
    ///
    /// Unknown shapes become active but are not registered in the store.
    pub fn load_frame(&mut self, raw: DataFrame) -> Result<&LoadedDataset> {
        let (clean, shape) = preprocess_auto(raw)?;

        if let Some(previous) = self.active.take()
            && let Some(table) = previous.shape.table_name()
        {
            self.store.unregister(table)?;
        }

        match shape.table_name() {
            Some(table) => {
                self.store.register(table, clean.clone())?;
                info!(table, rows = clean.height(), "Dataset registered");
            }
            None => warn!("Dataset shape not recognised; no dashboard is available"),
        }

        let dataset = self.active.insert(LoadedDataset {
            shape,
            rows: clean.height(),
            columns: clean
                .get_column_names()
                .into_iter()
                .map(|name| name.to_string())
                .collect(),
            loaded_at: Utc::now(),
            data: clean,
        });
        Ok(dataset)
    }

    /// First `preview_rows` rows of the active dataset
    pub fn preview(&self) -> Option<DataFrame> {
        self.active
            .as_ref()
            .map(|dataset| dataset.data.head(Some(self.settings.preview_rows)))
    }
}
