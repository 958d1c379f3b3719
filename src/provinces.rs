//! Province → county mapping
//!
//! Province localisation keys (`PROV123`) are attached to the county that
//! holds the province. The link comes from province history files named
//! `<id> - <name>.txt`, trusted only when the id/name pair agrees with the map
//! definitions table.

use ahash::AHashMap;

use crate::core::error::{Result, TemplateError};
use crate::core::types::{is_province_id, province_key};
use crate::script::{self, Tree, Value};
use crate::source::{self, ModSource};

pub const PROVINCE_HISTORY_DIR: &str = "history/provinces";

/// `PROV<id>` → owning title
pub type ProvinceTitles = AHashMap<String, String>;

/// Province id → name, from the definitions table named in `default.map`
pub fn load_definitions(source: &ModSource, default_map: &Tree) -> Result<AHashMap<String, String>> {
    let file_name = default_map
        .get("definitions")
        .and_then(Value::as_scalar)
        .ok_or_else(|| TemplateError::MissingKey {
            key: "definitions".into(),
            context: "map/default.map".into(),
        })?;
    let path = source.file(&format!("map/{}", file_name))?;

    let mut id_names = AHashMap::new();
    for row in source::csv_rows(&path)? {
        if row.len() < 5 {
            continue;
        }
        id_names.insert(row[0].clone(), row[4].clone());
    }
    Ok(id_names)
}

/// Province key for a history file stem, if it agrees with the definitions
pub fn history_key(stem: &str, id_names: &AHashMap<String, String>) -> Option<String> {
    let (number, name) = stem.split_once(" - ")?;
    match id_names.get(number) {
        Some(expected) if expected == name && is_province_id(number) => {
            Some(province_key(number))
        }
        _ => None,
    }
}

pub fn load_province_titles(source: &ModSource, default_map: &Tree) -> Result<ProvinceTitles> {
    let id_names = load_definitions(source, default_map)?;
    let mut titles = ProvinceTitles::new();

    for path in source.files(PROVINCE_HISTORY_DIR, "txt")? {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(key) = history_key(stem, &id_names) else {
            tracing::debug!("Skipping province history {:?}", path.file_name());
            continue;
        };
        let tree = script::parse_file(&path)?;
        if let Some(title) = tree.get("title").and_then(Value::as_scalar) {
            titles.insert(key, title.to_string());
        }
    }

    tracing::debug!("Mapped {} provinces to titles", titles.len());
    Ok(titles)
}
