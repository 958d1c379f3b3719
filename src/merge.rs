//! Merge with the previous revision and output ordering
//!
//! Keys and titles only ever accumulate across revisions: anything the
//! previous revision published is carried forward with an empty current
//! value, so translators never lose a row.

use std::cmp::Ordering;

use crate::core::types::{compare_province_ids, province_id};
use crate::localisation::OtherLocs;
use crate::revision::PreviousRevision;
use crate::titles::{Attributes, KeyKind, KeySet, TitleAttributes};

/// A title's attributes in output order
pub type SortedAttributes = Vec<(String, String)>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Keys re-added to titles that still exist
    pub carried_keys: usize,
    /// Titles that only exist in the previous revision
    pub carried_titles: usize,
}

/// Fill in every title and key the previous revision published
pub fn merge_previous(current: &mut TitleAttributes, previous: &PreviousRevision) -> MergeStats {
    let mut stats = MergeStats::default();
    for (title, prev_attrs) in previous.titles.iter() {
        match current.get_mut(title) {
            Some(attrs) => {
                for key in prev_attrs.keys() {
                    if !attrs.contains_key(key) {
                        attrs.insert(key.clone(), String::new());
                        stats.carried_keys += 1;
                    }
                }
            }
            None => {
                let attrs: Attributes = prev_attrs
                    .keys()
                    .map(|key| (key.clone(), String::new()))
                    .collect();
                current.insert(title.to_string(), attrs);
                stats.carried_titles += 1;
            }
        }
    }
    if stats.carried_titles > 0 {
        tracing::warn!(
            "{} titles no longer defined, carried forward from the previous revision",
            stats.carried_titles
        );
    }
    stats
}

/// Key a culture attribute sorts under
fn culture_sort_key(title: &str, culture: &str) -> String {
    format!("{}_{}", title, culture)
}

/// `X_adj_suffix` sorts as `X_suffix_adj`, keeping adjectives next to their
/// noun forms
pub fn adjective_sort_key(key: &str) -> Option<String> {
    let pos = key.rfind("_adj_")?;
    if pos == 0 {
        return None;
    }
    let (stem, rest) = key.split_at(pos);
    Some(format!("{}{}_adj", stem, &rest[4..]))
}

/// Compare two attributes of `title`.
///
/// Structural keys come first, then culture keys, then everything else.
pub fn compare_attributes(
    title: &str,
    keys: &KeySet,
    a: (&str, &str),
    b: (&str, &str),
) -> Ordering {
    let (kind_a, kind_b) = (keys.kind(a.0), keys.kind(b.0));
    let rank = |kind: KeyKind| match kind {
        KeyKind::Structural => 0,
        KeyKind::Culture => 1,
        KeyKind::Other => 2,
    };
    rank(kind_a).cmp(&rank(kind_b)).then_with(|| match kind_a {
        KeyKind::Structural => a.cmp(&b),
        KeyKind::Culture => culture_sort_key(title, a.0)
            .cmp(&culture_sort_key(title, b.0))
            .then_with(|| a.cmp(&b)),
        KeyKind::Other => {
            let sort_a = adjective_sort_key(a.0);
            let sort_b = adjective_sort_key(b.0);
            sort_a
                .as_deref()
                .unwrap_or(a.0)
                .cmp(sort_b.as_deref().unwrap_or(b.0))
                .then_with(|| a.cmp(&b))
        }
    })
}

/// A title's attributes in output order
pub fn sort_attributes(title: &str, attrs: &Attributes, keys: &KeySet) -> SortedAttributes {
    let mut sorted: SortedAttributes = attrs
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    sorted.sort_by(|a, b| compare_attributes(title, keys, (&a.0, &a.1), (&b.0, &b.1)));
    sorted
}

/// Every title in merged order with its attributes sorted
pub fn sort_titles(titles: &TitleAttributes, keys: &KeySet) -> Vec<(String, SortedAttributes)> {
    titles
        .iter()
        .map(|(title, attrs)| (title.to_string(), sort_attributes(title, attrs, keys)))
        .collect()
}

/// Order province keys by number; malformed keys go last, by name
pub fn compare_province_keys(a: &str, b: &str) -> Ordering {
    match (province_id(a), province_id(b)) {
        (Some(x), Some(y)) => compare_province_ids(x, y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Current other-province entries plus the previous revision's, sorted
pub fn merge_others(current: OtherLocs, previous: &PreviousRevision) -> Vec<(String, String)> {
    let mut merged = current;
    for key in previous.others.keys() {
        merged.entry(key.clone()).or_default();
    }
    let mut sorted: Vec<(String, String)> = merged.into_iter().collect();
    sorted.sort_by(|a, b| compare_province_keys(&a.0, &b.0));
    sorted
}
