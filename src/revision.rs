//! Previous revision of the published templates
//!
//! Every published `*.csv` starts with a header row. Files whose name contains
//! the other-provinces marker hold `key,value,...` rows; all others hold
//! `title,key,value,...` rows. The value column is the maintained translation
//! carried into the next revision.

use std::path::Path;

use ahash::AHashMap;

use crate::core::config::OutputConfig;
use crate::core::error::Result;
use crate::source;
use crate::titles::{Attributes, TitleAttributes};

/// Values published by the previous run
#[derive(Debug, Clone, Default)]
pub struct PreviousRevision {
    /// Titles in order of first appearance across files
    pub titles: TitleAttributes,
    pub others: AHashMap<String, String>,
}

impl PreviousRevision {
    /// Previously published value of a title key, or empty
    pub fn title_value(&self, title: &str, key: &str) -> &str {
        self.titles
            .get(title)
            .and_then(|attrs| attrs.get(key))
            .map_or("", String::as_str)
    }

    /// Previously published value of an other-provinces key, or empty
    pub fn other_value(&self, key: &str) -> &str {
        self.others.get(key).map_or("", String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty() && self.others.is_empty()
    }
}

/// Read the published templates directory. A missing directory is an empty
/// previous revision.
pub fn read_previous(dir: &Path, output: &OutputConfig) -> Result<PreviousRevision> {
    let mut previous = PreviousRevision::default();
    if !dir.is_dir() {
        tracing::info!("No previous revision at {:?}", dir);
        return Ok(previous);
    }

    for path in source::list_files(dir, "csv")? {
        let is_other = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.contains(&output.other_marker));

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)?;

        for record in reader.records() {
            let record = record?;
            if is_other {
                if let (Some(key), Some(value)) = (record.get(0), record.get(1)) {
                    previous.others.insert(key.to_string(), value.to_string());
                }
            } else if let (Some(title), Some(key), Some(value)) =
                (record.get(0), record.get(1), record.get(2))
            {
                if !previous.titles.contains(title) {
                    previous.titles.insert(title.to_string(), Attributes::new());
                }
                if let Some(attrs) = previous.titles.get_mut(title) {
                    attrs.insert(key.to_string(), value.to_string());
                }
            }
        }
    }

    tracing::info!(
        "Previous revision: {} titles, {} other provinces",
        previous.titles.len(),
        previous.others.len()
    );
    Ok(previous)
}
