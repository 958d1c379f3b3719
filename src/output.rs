//! Template tables and publishing
//!
//! Tables are written into a staging directory next to the published one and
//! swapped in only once every file is complete. A failed run leaves the
//! previous revision untouched.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::PipelineConfig;
use crate::core::error::{Result, TemplateError};
use crate::merge::SortedAttributes;
use crate::regions::RegionMap;
use crate::revision::PreviousRevision;

/// `title, key, previous value, current value`
pub type TitleRow = [String; 4];
/// `key, previous value, current value`
pub type OtherRow = [String; 3];

/// Every output table, ready to write
#[derive(Debug, Clone, Default)]
pub struct TemplateTables {
    /// Region bucket → rows, titles in merged order
    pub regions: BTreeMap<String, Vec<TitleRow>>,
    pub others: Vec<OtherRow>,
}

impl TemplateTables {
    /// Group sorted titles by region. Titles without a region land in the
    /// titular bucket.
    pub fn build(
        titles: &[(String, SortedAttributes)],
        others: &[(String, String)],
        regions: &RegionMap,
        previous: &PreviousRevision,
        config: &PipelineConfig,
    ) -> Self {
        let mut tables = TemplateTables::default();
        for (title, attrs) in titles {
            let bucket = regions
                .get(title)
                .unwrap_or(config.titular_bucket.as_str())
                .to_string();
            let rows = tables.regions.entry(bucket).or_default();
            for (key, value) in attrs {
                rows.push([
                    title.clone(),
                    key.clone(),
                    previous.title_value(title, key).to_string(),
                    value.clone(),
                ]);
            }
        }

        tables.others = others
            .iter()
            .map(|(key, value)| [key.clone(), previous.other_value(key).to_string(), value.clone()])
            .collect();
        tables
    }

    pub fn row_count(&self) -> usize {
        self.regions.values().map(Vec::len).sum::<usize>() + self.others.len()
    }

    /// Write every table into `dir`
    pub fn write_to(&self, dir: &Path, config: &PipelineConfig) -> Result<Vec<PathBuf>> {
        let output = &config.output;
        let mut written = Vec::new();

        for (region, rows) in &self.regions {
            let path = dir.join(format!("{}{}.csv", output.title_file_prefix, region));
            write_table(
                &path,
                &["#TITLE", "KEY", "VALUE", output.source_column.as_str()],
                rows.iter().map(|row| row.as_slice()),
            )?;
            written.push(path);
        }

        let path = dir.join(&output.other_file);
        write_table(
            &path,
            &["#KEY", "VALUE", output.source_column.as_str()],
            self.others.iter().map(|row| row.as_slice()),
        )?;
        written.push(path);

        Ok(written)
    }
}

fn write_table<'a, I>(path: &Path, header: &[&str], rows: I) -> Result<()>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(|e| TemplateError::io(path, e))?;
    tracing::debug!("Wrote {:?}", path.file_name());
    Ok(())
}

/// Write `tables` and replace the directory at `target` with the result.
///
/// Returns the number of files published.
pub fn publish(tables: &TemplateTables, target: &Path, config: &PipelineConfig) -> Result<usize> {
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| TemplateError::io(&parent, e))?;

    let staging = tempfile::Builder::new()
        .prefix(".templates-staging-")
        .tempdir_in(&parent)
        .map_err(|e| TemplateError::io(&parent, e))?;
    let written = tables.write_to(staging.path(), config)?;

    swap_in(staging.path(), target, &parent, |from, to| fs::rename(from, to))?;

    tracing::info!("Published {} files to {:?}", written.len(), target);
    Ok(written.len())
}

/// Move `staging` to `target`, retiring the directory already there.
///
/// On a failed swap the retired directory is moved back. If that fails too
/// it is kept on disk and its location is reported in the error.
fn swap_in<R>(staging: &Path, target: &Path, parent: &Path, mut rename: R) -> Result<()>
where
    R: FnMut(&Path, &Path) -> io::Result<()>,
{
    if !target.exists() {
        return rename(staging, target).map_err(|e| TemplateError::io(target, e));
    }

    let retired = tempfile::Builder::new()
        .prefix(".templates-retired-")
        .tempdir_in(parent)
        .map_err(|e| TemplateError::io(parent, e))?;
    let old = retired.path().join("templates");
    rename(target, &old).map_err(|e| TemplateError::io(target, e))?;

    let Err(source) = rename(staging, target) else {
        return Ok(());
    };
    match rename(&old, target) {
        Ok(()) => Err(TemplateError::io(target, source)),
        Err(restore) => {
            let kept = retired.keep().join("templates");
            tracing::error!("Previous revision of {:?} left at {:?}", target, kept);
            Err(TemplateError::RestoreFailed {
                target: target.to_path_buf(),
                kept,
                source,
                restore,
            })
        }
    }
}
