//! End-to-end template generation

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::core::config::PipelineConfig;
use crate::core::error::{Result, TemplateError};
use crate::cultures;
use crate::localisation;
use crate::merge;
use crate::output::{self, TemplateTables};
use crate::provinces;
use crate::regions::{self, Provenance};
use crate::revision;
use crate::script::Value;
use crate::source::ModSource;
use crate::titles::{self, InferenceStats, KeySet};

pub const DEFAULT_MAP: &str = "map/default.map";
const REGION_FILE_KEY: &str = "geographical_region";

/// What a run produced
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub titles: usize,
    pub cultures: usize,
    pub mapped_provinces: usize,
    pub seeded_regions: usize,
    pub derived_regions: usize,
    pub inference: InferenceStats,
    pub other_provinces: usize,
    pub carried_keys: usize,
    pub carried_titles: usize,
    /// Titles per output bucket
    pub buckets: BTreeMap<String, usize>,
    pub rows: usize,
    pub files_written: usize,
    pub elapsed_ms: u64,
}

impl RunSummary {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        format!(
            "{} titles in {} buckets, {} rows in {} files ({}ms)\n{} seeded, {} derived, {} without a region",
            self.titles,
            self.buckets.len(),
            self.rows,
            self.files_written,
            self.elapsed_ms,
            self.seeded_regions,
            self.derived_regions,
            self.inference.unresolved,
        )
    }
}

/// Generate the templates for the mod at `mod_root` and publish them to
/// `templates_dir`, merging with whatever was published there before
pub fn run(mod_root: &Path, templates_dir: &Path, config: &PipelineConfig) -> Result<RunSummary> {
    let start = Instant::now();
    config.validate()?;
    let source = ModSource::new(mod_root);
    let mut summary = RunSummary::default();

    let default_map = source.parse_file(DEFAULT_MAP)?;
    let province_titles = provinces::load_province_titles(&source, &default_map)?;
    summary.mapped_provinces = province_titles.len();

    let region_file = default_map
        .get(REGION_FILE_KEY)
        .and_then(Value::as_scalar)
        .ok_or_else(|| TemplateError::MissingKey {
            key: REGION_FILE_KEY.to_string(),
            context: DEFAULT_MAP.to_string(),
        })?;
    let region_tree = source.parse_file(&format!("map/{}", region_file))?;
    let mut region_map = regions::build_region_map(&region_tree, &config.region_prefix)?;

    let culture_names = cultures::load_cultures(&source)?;
    summary.cultures = culture_names.len();
    let keys = KeySet::new(config.title_keys.iter().cloned()).with_cultures(culture_names);

    let collection = titles::collect_titles(&source, &keys)?;
    tracing::info!(
        "Collected {} titles, {} cultures, {} mapped provinces",
        collection.attributes.len(),
        keys.culture_count(),
        summary.mapped_provinces
    );

    summary.inference = titles::infer_regions(&collection.hierarchy, &mut region_map);
    summary.seeded_regions = region_map.count(Provenance::Seeded);
    summary.derived_regions = region_map.count(Provenance::Derived);
    tracing::info!(
        "Regions: {} seeded, {} derived, {} titles unresolved",
        summary.seeded_regions,
        summary.derived_regions,
        summary.inference.unresolved
    );

    let mut attributes = collection.attributes;
    let other_locs = localisation::attach_localisation(&source, &province_titles, &mut attributes)?;

    let previous = revision::read_previous(templates_dir, &config.output)?;
    let merge_stats = merge::merge_previous(&mut attributes, &previous);
    summary.carried_keys = merge_stats.carried_keys;
    summary.carried_titles = merge_stats.carried_titles;

    let sorted_titles = merge::sort_titles(&attributes, &keys);
    let sorted_others = merge::merge_others(other_locs, &previous);
    summary.titles = sorted_titles.len();
    summary.other_provinces = sorted_others.len();

    let tables = TemplateTables::build(&sorted_titles, &sorted_others, &region_map, &previous, config);
    for (title, _) in &sorted_titles {
        let bucket = region_map.get(title).unwrap_or(config.titular_bucket.as_str());
        *summary.buckets.entry(bucket.to_string()).or_insert(0) += 1;
    }
    summary.rows = tables.row_count();
    summary.files_written = output::publish(&tables, templates_dir, config)?;

    summary.elapsed_ms = elapsed_ms(start.elapsed());
    tracing::info!("Finished in {}ms", summary.elapsed_ms);
    Ok(summary)
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    elapsed.as_millis() as u64
}
