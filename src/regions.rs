//! Region declarations and the entity → region map
//!
//! The region declaration file lists leaf regions and the duchies they cover:
//!
//! ```text
//! world_europe_west_francia = { duchies = { d_ile_de_france d_orleans } }
//! world_europe_west = { regions = { world_europe_west_francia } }
//! ```
//!
//! Only leaf regions seed the map. Region groups (`regions = { ... }`) are
//! skipped.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TemplateError};
use crate::script::Tree;

const MEMBER_LIST: &str = "duchies";
const GROUP_LIST: &str = "regions";

/// Where an entity's region came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Listed in the region declaration
    Seeded,
    /// Propagated through the title hierarchy
    Derived,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub region: String,
    pub provenance: Provenance,
}

/// Entity → region. Derived assignments never overwrite existing ones.
#[derive(Debug, Clone, Default)]
pub struct RegionMap {
    assignments: AHashMap<String, Assignment>,
}

impl RegionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declared membership. Later declarations win.
    pub fn seed(&mut self, entity: &str, region: &str) {
        self.assignments.insert(
            entity.to_string(),
            Assignment {
                region: region.to_string(),
                provenance: Provenance::Seeded,
            },
        );
    }

    /// Assign a derived region if the entity has none yet.
    ///
    /// Returns true if the entity was unassigned.
    pub fn assign(&mut self, entity: &str, region: &str) -> bool {
        if self.assignments.contains_key(entity) {
            return false;
        }
        self.assignments.insert(
            entity.to_string(),
            Assignment {
                region: region.to_string(),
                provenance: Provenance::Derived,
            },
        );
        true
    }

    pub fn get(&self, entity: &str) -> Option<&str> {
        self.assignments.get(entity).map(|a| a.region.as_str())
    }

    pub fn assignment(&self, entity: &str) -> Option<&Assignment> {
        self.assignments.get(entity)
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.assignments.contains_key(entity)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn count(&self, provenance: Provenance) -> usize {
        self.assignments
            .values()
            .filter(|a| a.provenance == provenance)
            .count()
    }

    /// Assignments sorted by entity, for stable comparisons and reports
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .assignments
            .iter()
            .map(|(k, v)| (k.as_str(), v.region.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

/// Build the seed map from a parsed region declaration.
///
/// A leaf region may carry one duchy list and one other child. Anything more
/// means the declaration is in a shape this tool does not understand, and the
/// run must stop.
pub fn build_region_map(tree: &Tree, prefix: &str) -> Result<RegionMap> {
    let mut map = RegionMap::new();

    for node in tree {
        let Some(region) = node.name.strip_prefix(prefix) else {
            continue;
        };
        let Some(body) = node.value.as_tree() else {
            tracing::warn!("Region {} has no body, skipping", node.name);
            continue;
        };
        if body.contains(GROUP_LIST) {
            continue;
        }

        let extra: Vec<String> = body
            .iter()
            .filter(|child| child.name != MEMBER_LIST)
            .map(|child| child.name.clone())
            .collect();
        if extra.len() > 1 || body.get_all(MEMBER_LIST).count() > 1 {
            let children = if extra.len() > 1 {
                extra
            } else {
                body.iter().map(|child| child.name.clone()).collect()
            };
            return Err(TemplateError::MalformedRegion {
                region: node.name.clone(),
                children,
            });
        }

        let members = body
            .get(MEMBER_LIST)
            .ok_or_else(|| TemplateError::MissingKey {
                key: MEMBER_LIST.to_string(),
                context: format!("region {}", node.name),
            })?;

        for duchy in members.scalars() {
            map.seed(duchy, region);
        }
    }

    tracing::debug!("Seeded {} duchies from region declarations", map.len());
    Ok(map)
}
