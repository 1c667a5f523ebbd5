//! Dataset files: the products and recipes tables an economy is built from.
//!
//! A dataset is a TOML or JSON document with two arrays of rows:
//!
//! ```toml
//! [[products]]
//! name = "sugar"
//! price = 1
//! duration = 0.0
//! source = "factory"
//!
//! [[recipes]]
//! product_name = "donuts"
//! ingredient = "sugar"
//! quantity = 2
//! ```
//!
//! The format is picked from the file extension.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::ProductRow;
use crate::error::DatasetError;
use crate::recipe::RecipeRow;

/// Result type for dataset operations.
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;

/// On-disk encoding of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Toml,
    Json,
}

impl DatasetFormat {
    /// Pick the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> DatasetResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(DatasetError::UnsupportedFormat { extension }),
        }
    }
}

/// Raw products and recipes rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    #[serde(default)]
    pub products: Vec<ProductRow>,
    #[serde(default)]
    pub recipes: Vec<RecipeRow>,
}

impl Dataset {
    /// Read a dataset file.
    pub fn load(path: &Path) -> DatasetResult<Self> {
        let format = DatasetFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let dataset = Self::parse(&content, format).map_err(|message| DatasetError::Parse {
            path: path.display().to_string(),
            message,
        })?;
        tracing::info!(
            path = %path.display(),
            products = dataset.products.len(),
            recipes = dataset.recipes.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse dataset text in the given format.
    pub fn parse(content: &str, format: DatasetFormat) -> Result<Self, String> {
        match format {
            DatasetFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            DatasetFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }

    /// Write the dataset, in the format implied by the extension.
    pub fn save(&self, path: &Path) -> DatasetResult<()> {
        let format = DatasetFormat::from_path(path)?;
        let content = match format {
            DatasetFormat::Toml => toml::to_string_pretty(self).map_err(|e| e.to_string()),
            DatasetFormat::Json => serde_json::to_string_pretty(self).map_err(|e| e.to_string()),
        }
        .map_err(|message| DatasetError::Serialize {
            path: path.display().to_string(),
            message,
        })?;
        std::fs::write(path, content).map_err(|e| DatasetError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }
}
