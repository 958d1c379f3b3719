//! Region inference over the title hierarchy
//!
//! Titles are visited in post-order, so every vassal is settled before its
//! liege is looked at:
//! - a duchy with a region hands it down to every vassal still lacking one;
//! - a kingdom or empire takes the most common region among its direct
//!   vassals (ties go to the smallest name) and hands it down from itself.
//!
//! A downward walk never overwrites a region and never descends below a title
//! that already had one. A liege none of whose vassals has a region stays
//! unresolved.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::Tier;
use crate::regions::RegionMap;

use super::hierarchy::TitleHierarchy;

/// Counts of what an inference pass assigned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceStats {
    /// Titles that received a region from a duchy above them
    pub inherited: usize,
    /// Titles that received a region through a kingdom or empire vote
    pub voted: usize,
    /// Titles left without a region after the pass
    pub unresolved: usize,
}

/// Assign regions to every title reachable in the hierarchy
pub fn infer_regions(hierarchy: &TitleHierarchy, regions: &mut RegionMap) -> InferenceStats {
    let mut stats = InferenceStats::default();

    for &idx in hierarchy.post_order() {
        let node = hierarchy.node(idx);
        match node.tier {
            Tier::Duchy => {
                let Some(region) = regions.get(&node.id).map(str::to_string) else {
                    continue;
                };
                for &vassal in &node.vassals {
                    stats.inherited += propagate(hierarchy, regions, vassal, &region);
                }
            }
            tier if tier.is_top_tier() => {
                if let Some(region) = majority_region(hierarchy, regions, idx) {
                    stats.voted += propagate(hierarchy, regions, idx, &region);
                }
            }
            _ => {}
        }
    }

    stats.unresolved = hierarchy
        .iter()
        .filter(|node| !regions.contains(&node.id))
        .count();
    tracing::debug!(
        "Region inference: {} inherited, {} voted, {} unresolved",
        stats.inherited,
        stats.voted,
        stats.unresolved
    );
    stats
}

/// Most common region among the direct vassals of `idx` that have one.
///
/// Ties go to the lexicographically smallest region name.
pub fn majority_region(hierarchy: &TitleHierarchy, regions: &RegionMap, idx: usize) -> Option<String> {
    let mut tally: AHashMap<&str, usize> = AHashMap::new();
    for &vassal in &hierarchy.node(idx).vassals {
        if let Some(region) = regions.get(&hierarchy.node(vassal).id) {
            *tally.entry(region).or_insert(0) += 1;
        }
    }

    tally
        .into_iter()
        .min_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
        .map(|(region, _)| region.to_string())
}

/// Assign `region` to `start` and its descendants, stopping at titles that
/// already have one. Returns how many titles were assigned.
fn propagate(hierarchy: &TitleHierarchy, regions: &mut RegionMap, start: usize, region: &str) -> usize {
    let mut assigned = 0;
    let mut stack = vec![start];
    while let Some(idx) = stack.pop() {
        let node = hierarchy.node(idx);
        if !regions.assign(&node.id, region) {
            continue;
        }
        assigned += 1;
        stack.extend(node.vassals.iter().rev());
    }
    assigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::Provenance;
    use crate::script::parse_str;
    use crate::titles::collector::AttributeCollector;
    use crate::titles::keys::KeySet;

    fn hierarchy(source: &str) -> TitleHierarchy {
        let keys = KeySet::new(["title"]);
        let mut collector = AttributeCollector::new(&keys);
        collector.collect_tree(&parse_str(source).unwrap());
        collector.finish().hierarchy
    }

    fn seeded(pairs: &[(&str, &str)]) -> RegionMap {
        let mut map = RegionMap::new();
        for (entity, region) in pairs {
            map.seed(entity, region);
        }
        map
    }

    #[test]
    fn test_single_chain_end_to_end() {
        let h = hierarchy("k_test = { d_test = { c_test = { } } }");
        let mut regions = seeded(&[("d_test", "north")]);

        let stats = infer_regions(&h, &mut regions);

        assert_eq!(regions.get("c_test"), Some("north"));
        assert_eq!(regions.get("k_test"), Some("north"));
        assert_eq!(regions.assignment("d_test").unwrap().provenance, Provenance::Seeded);
        assert_eq!(regions.assignment("c_test").unwrap().provenance, Provenance::Derived);
        assert_eq!(stats.inherited, 1);
        assert_eq!(stats.voted, 1);
        assert_eq!(stats.unresolved, 0);
    }

    #[test]
    fn test_duchy_does_not_overwrite_vassals() {
        let h = hierarchy("d_test = { c_one = { b_a = { } } c_two = { b_b = { } } }");
        let mut regions = seeded(&[("d_test", "north"), ("c_two", "south")]);

        infer_regions(&h, &mut regions);

        assert_eq!(regions.get("c_one"), Some("north"));
        assert_eq!(regions.get("b_a"), Some("north"));
        assert_eq!(regions.get("c_two"), Some("south"));
        // Walk stops at an already-assigned title
        assert_eq!(regions.get("b_b"), None);
    }

    #[test]
    fn test_majority_vote() {
        let h = hierarchy("k_test = { d_a = { } d_b = { } d_c = { c_x = { } } }");
        let mut regions = seeded(&[("d_a", "west"), ("d_b", "west"), ("d_c", "east")]);

        infer_regions(&h, &mut regions);

        assert_eq!(regions.get("k_test"), Some("west"));
        // d_c keeps its own region and hands it down
        assert_eq!(regions.get("c_x"), Some("east"));
    }

    #[test]
    fn test_tie_goes_to_smallest_name() {
        let h = hierarchy("e_test = { d_z = { } d_a = { } }");
        let mut regions = seeded(&[("d_z", "beta"), ("d_a", "alpha")]);

        infer_regions(&h, &mut regions);

        assert_eq!(regions.get("e_test"), Some("alpha"));
    }

    #[test]
    fn test_vote_ignores_unresolved_vassals() {
        let h = hierarchy("k_test = { d_a = { } d_b = { } d_c = { } }");
        let mut regions = seeded(&[("d_c", "south")]);

        infer_regions(&h, &mut regions);

        // Only d_c voted; the kingdom's walk then fills its other duchies
        assert_eq!(regions.get("k_test"), Some("south"));
        assert_eq!(regions.get("d_a"), Some("south"));
        assert_eq!(regions.get("d_b"), Some("south"));
    }

    #[test]
    fn test_no_votes_leaves_title_unresolved() {
        let h = hierarchy("k_test = { d_a = { c_a = { } } }");
        let mut regions = RegionMap::new();

        let stats = infer_regions(&h, &mut regions);

        assert!(regions.is_empty());
        assert_eq!(stats.unresolved, 3);
    }

    #[test]
    fn test_counties_do_not_vote() {
        let h = hierarchy("c_test = { b_a = { } }");
        let mut regions = seeded(&[("b_a", "north")]);

        infer_regions(&h, &mut regions);

        assert_eq!(regions.get("c_test"), None);
    }

    #[test]
    fn test_nested_vote_uses_resolved_kingdoms() {
        let h = hierarchy(
            r#"
e_test = {
    k_one = { d_a = { } }
    k_two = { d_b = { } }
    k_three = { d_c = { } }
}
"#,
        );
        let mut regions = seeded(&[("d_a", "south"), ("d_b", "north"), ("d_c", "north")]);

        infer_regions(&h, &mut regions);

        assert_eq!(regions.get("k_one"), Some("south"));
        assert_eq!(regions.get("k_two"), Some("north"));
        assert_eq!(regions.get("e_test"), Some("north"));
    }

    #[test]
    fn test_second_pass_changes_nothing() {
        let h = hierarchy("e_x = { k_a = { d_a = { c_a = { } } d_b = { } } k_b = { d_c = { } } }");
        let mut regions = seeded(&[("d_a", "one"), ("d_c", "two")]);

        infer_regions(&h, &mut regions);
        let first: Vec<(String, String)> = regions
            .sorted()
            .into_iter()
            .map(|(e, r)| (e.to_string(), r.to_string()))
            .collect();

        let stats = infer_regions(&h, &mut regions);
        let second: Vec<(String, String)> = regions
            .sorted()
            .into_iter()
            .map(|(e, r)| (e.to_string(), r.to_string()))
            .collect();

        assert_eq!(first, second);
        assert_eq!(stats.inherited + stats.voted, 0);
    }
}
