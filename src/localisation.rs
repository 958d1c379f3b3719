//! Localisation attach
//!
//! Localisation tables are scanned in reverse file name order, so files that
//! load later in the game win. The first occurrence of a key is kept and later
//! ones ignored.

use ahash::{AHashMap, AHashSet};
use regex::Regex;

use crate::core::error::Result;
use crate::core::types::province_id;
use crate::provinces::ProvinceTitles;
use crate::source::{self, ModSource};
use crate::titles::TitleAttributes;

pub const LOCALISATION_DIR: &str = "localisation";

/// Province localisation with no owning title, `PROV<n>` → text
pub type OtherLocs = AHashMap<String, String>;

/// Where a localisation key belongs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOwner {
    Title(String),
    Other,
    Ignored,
}

/// Rules for attaching localisation keys to titles
#[derive(Debug, Clone)]
pub struct LocalisationRules {
    title_key: Regex,
    adjective: Regex,
}

impl LocalisationRules {
    pub fn new() -> Result<Self> {
        Ok(Self {
            title_key: Regex::new(r"^[ekdcb]_")?,
            adjective: Regex::new(r"^(.+)_adj(?:_|$)")?,
        })
    }

    /// Owner of a key. Title keys belong to the text before their last
    /// `_adj` marker; province keys to the county holding the province.
    pub fn owner(&self, key: &str, provinces: &ProvinceTitles) -> KeyOwner {
        if self.title_key.is_match(key) {
            let title = self
                .adjective
                .captures(key)
                .and_then(|caps| caps.get(1))
                .map_or(key, |m| m.as_str());
            return KeyOwner::Title(title.to_string());
        }
        if province_id(key).is_some() {
            return match provinces.get(key) {
                Some(title) => KeyOwner::Title(title.clone()),
                None => KeyOwner::Other,
            };
        }
        KeyOwner::Ignored
    }
}

/// Counts of an attach pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachStats {
    pub attached: usize,
    pub dropped: usize,
}

/// Attach `(key, text)` pairs in priority order. Returns the province
/// entries that have no owning title.
pub fn attach_pairs<I>(
    pairs: I,
    rules: &LocalisationRules,
    provinces: &ProvinceTitles,
    titles: &mut TitleAttributes,
) -> (OtherLocs, AttachStats)
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut seen = AHashSet::new();
    let mut others = OtherLocs::new();
    let mut stats = AttachStats::default();

    for (key, text) in pairs {
        if !seen.insert(key.clone()) {
            continue;
        }
        match rules.owner(&key, provinces) {
            KeyOwner::Title(title) => match titles.get_mut(&title) {
                Some(attrs) => {
                    attrs.insert(key, text);
                    stats.attached += 1;
                }
                None => stats.dropped += 1,
            },
            KeyOwner::Other => {
                others.insert(key, text);
            }
            KeyOwner::Ignored => {}
        }
    }
    (others, stats)
}

/// Scan the mod's localisation tables and attach their text to titles
pub fn attach_localisation(
    source: &ModSource,
    provinces: &ProvinceTitles,
    titles: &mut TitleAttributes,
) -> Result<OtherLocs> {
    let rules = LocalisationRules::new()?;
    let mut files = source.files(LOCALISATION_DIR, "csv")?;
    files.reverse();

    let mut pairs = Vec::new();
    for path in &files {
        tracing::debug!("Reading localisation {:?}", path.file_name());
        for row in source::csv_rows(path)? {
            let mut fields = row.into_iter();
            if let (Some(key), Some(text)) = (fields.next(), fields.next()) {
                pairs.push((key, text));
            }
        }
    }

    let (others, stats) = attach_pairs(pairs, &rules, provinces, titles);
    tracing::info!(
        "Localisation: {} files, {} keys attached, {} without a collected title, {} other provinces",
        files.len(),
        stats.attached,
        stats.dropped,
        others.len()
    );
    Ok(others)
}
