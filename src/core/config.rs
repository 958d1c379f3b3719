//! Pipeline configuration
//!
//! Every value here has a working default, so a config file is optional.
//! A TOML file can override any subset of fields:
//!
//! ```toml
//! title_keys = ["title", "short_name"]
//! titular_bucket = "unlanded"
//!
//! [output]
//! source_column = "MYMOD"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TemplateError};

/// Configuration for a template generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Structural attribute keys copied from landed title definitions
    ///
    /// These sort ahead of every other key for a title. Culture names are
    /// recognised on top of this set at runtime.
    pub title_keys: Vec<String>,

    /// Prefix marking a leaf region in the region declaration file
    pub region_prefix: String,

    /// Bucket name for titles that end up without a region
    pub titular_bucket: String,

    /// Output table naming
    pub output: OutputConfig,
}

/// File naming and headers of the published template tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Per-region title tables are named `<prefix><region>.csv`
    pub title_file_prefix: String,

    /// File holding province entries without a title
    pub other_file: String,

    /// Substring identifying the other-provinces file when reading back
    pub other_marker: String,

    /// Header of the column holding the freshly extracted source text
    pub source_column: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            title_keys: [
                "title",
                "title_female",
                "foa",
                "title_prefix",
                "short_name",
                "name_tier",
                "location_ruler_title",
                "dynasty_title_names",
                "male_names",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
            region_prefix: "world_".to_string(),
            titular_bucket: "titular".to_string(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            title_file_prefix: "zz~_titles_".to_string(),
            other_file: "zz~_provinces_other.csv".to_string(),
            other_marker: "provinces_other".to_string(),
            source_column: "SOURCE".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load overrides from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| TemplateError::io(path, e))?;
        let config: PipelineConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.region_prefix.is_empty() {
            return Err(TemplateError::InvalidConfig(
                "region_prefix must not be empty".into(),
            ));
        }

        if self.titular_bucket.is_empty() {
            return Err(TemplateError::InvalidConfig(
                "titular_bucket must not be empty".into(),
            ));
        }

        let output = &self.output;
        if output.title_file_prefix.is_empty() || output.other_marker.is_empty() {
            return Err(TemplateError::InvalidConfig(
                "output file prefix and marker must not be empty".into(),
            ));
        }

        // The marker is how previous revisions tell the two table kinds apart
        if !output.other_file.contains(&output.other_marker) {
            return Err(TemplateError::InvalidConfig(format!(
                "other_file ({}) must contain other_marker ({})",
                output.other_file, output.other_marker
            )));
        }
        if output.title_file_prefix.contains(&output.other_marker) {
            return Err(TemplateError::InvalidConfig(format!(
                "title_file_prefix ({}) must not contain other_marker ({})",
                output.title_file_prefix, output.other_marker
            )));
        }

        Ok(())
    }
}
