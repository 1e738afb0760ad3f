//! Dataset ingestion: shape detection, cleaning and CSV I/O
//!
//! An upload flows through three steps:
//!
//! 1. [`io::read_csv_bytes`] parses the upload into a raw `DataFrame`.
//! 2. [`detect::detect_shape`] classifies it by its column names.
//! 3. [`cleaning::preprocess_auto`] runs the cleaning pipeline for that shape.
//!
//! ```no_run
//! use consumer_insights::dataset::{io, preprocess_auto};
//! use consumer_insights::config::CsvSettings;
//!
//! # fn example(bytes: &[u8]) -> consumer_insights::error::Result<()> {
//! let raw = io::read_csv_bytes(bytes, &CsvSettings::default())?;
//! let (clean, shape) = preprocess_auto(raw)?;
//! println!("{shape}: {} rows", clean.height());
//! # Ok(())
//! # }
//! ```

pub mod cleaning;
pub mod detect;
pub mod io;

pub use cleaning::{CleanStep, CleaningPipeline, clean_airbnb, clean_shopping, preprocess_auto};
pub use detect::{detect_shape, detect_shape_from_names};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The recognised schema of an uploaded dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetShape {
    /// Customer Shopping Behavior
    Shopping,
    /// Airbnb Open Data
    Airbnb,
    Unknown,
}

impl DatasetShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shopping => "shopping",
            Self::Airbnb => "airbnb",
            Self::Unknown => "unknown",
        }
    }

    /// Store table name for this shape; `None` for [`DatasetShape::Unknown`],
    /// which is never registered.
    pub fn table_name(&self) -> Option<&'static str> {
        match self {
            Self::Shopping | Self::Airbnb => Some(self.as_str()),
            Self::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for DatasetShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_names() {
        assert_eq!(DatasetShape::Shopping.to_string(), "shopping");
        assert_eq!(DatasetShape::Airbnb.table_name(), Some("airbnb"));
        assert_eq!(DatasetShape::Unknown.table_name(), None);
        assert!(!DatasetShape::Unknown.is_known());
    }

    #[test]
    fn test_shape_serialization() -> anyhow::Result<()> {
        let json = serde_json::to_string(&DatasetShape::Airbnb)?;
        assert_eq!(json, "\"airbnb\"");
        let back: DatasetShape = serde_json::from_str("\"shopping\"")?;
        assert_eq!(back, DatasetShape::Shopping);
        Ok(())
    }
}
