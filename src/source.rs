//! Mod source tree access
//!
//! Resolves paths under the mod root, lists definition files in the order the
//! game loads them, and reads the `;`-separated tables the game uses for
//! localisation and province definitions.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{Result, TemplateError};
use crate::script::{self, Tree};

/// Read-only view of a mod directory
#[derive(Debug, Clone)]
pub struct ModSource {
    root: PathBuf,
}

impl ModSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of a mandatory file under the root
    pub fn file(&self, relative: &str) -> Result<PathBuf> {
        let path = self.root.join(relative);
        if !path.is_file() {
            return Err(TemplateError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "required file is missing"),
            ));
        }
        Ok(path)
    }

    /// Files in `dir` with the given extension, sorted by file name.
    ///
    /// A missing directory yields no files.
    pub fn files(&self, dir: &str, extension: &str) -> Result<Vec<PathBuf>> {
        let dir_path = self.root.join(dir);
        if !dir_path.is_dir() {
            tracing::debug!("No directory at {:?}", dir_path);
            return Ok(Vec::new());
        }
        list_files(&dir_path, extension)
    }

    /// Parse a mandatory script file under the root
    pub fn parse_file(&self, relative: &str) -> Result<Tree> {
        script::parse_file(&self.file(relative)?)
    }
}

/// Files directly inside `dir` with the given extension, sorted by file name
pub fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| TemplateError::io(dir, e))? {
        let entry = entry.map_err(|e| TemplateError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Rows of a `;`-separated game table.
///
/// Empty rows and rows whose first field starts with `#` are skipped.
pub fn csv_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let text = script::read_text(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        match record.get(0) {
            None => continue,
            Some(first) if first.is_empty() || first.starts_with('#') => continue,
            Some(_) => rows.push(record.iter().map(str::to_string).collect()),
        }
    }
    Ok(rows)
}
