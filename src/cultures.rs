//! Culture discovery
//!
//! Culture files group cultures under culture groups:
//!
//! ```text
//! north_germanic = {
//!     graphical_cultures = { norsegfx }
//!     norse = { color = { 0.2 0.2 0.6 } male_names = { Ulf } }
//! }
//! ```
//!
//! Cultures are the tree-valued children of a group that are not group
//! properties. Their names can appear as per-culture title names in landed
//! title definitions.

use crate::core::error::Result;
use crate::script::{self, Tree};
use crate::source::ModSource;

pub const CULTURES_DIR: &str = "common/cultures";

/// Tree-valued group entries that are not cultures
const GROUP_PROPERTIES: &[&str] = &[
    "graphical_cultures",
    "unit_graphical_cultures",
    "alternate_start",
];

/// Culture names declared in one parsed culture file, in source order
pub fn cultures_in(tree: &Tree) -> Vec<String> {
    let mut cultures = Vec::new();
    for group in tree {
        let Some(body) = group.value.as_tree() else {
            continue;
        };
        for entry in body {
            if entry.value.as_tree().is_some() && !GROUP_PROPERTIES.contains(&entry.name.as_str()) {
                cultures.push(entry.name.clone());
            }
        }
    }
    cultures
}

/// Every culture declared by the mod
pub fn load_cultures(source: &ModSource) -> Result<Vec<String>> {
    let mut cultures = Vec::new();
    for path in source.files(CULTURES_DIR, "txt")? {
        let tree = script::parse_file(&path)?;
        let found = cultures_in(&tree);
        tracing::debug!("{} cultures in {:?}", found.len(), path.file_name());
        cultures.extend(found);
    }
    Ok(cultures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_str;

    #[test]
    fn test_cultures_in_groups() {
        let tree = parse_str(
            r#"
north_germanic = {
    graphical_cultures = { norsegfx }
    unit_graphical_cultures = { norsegfx }
    norse = { color = { 0.2 0.2 0.6 } male_names = { Ulf } }
    swedish = { }
}
latin = {
    italian = { color = { 0.1 0.5 0.1 } }
}
"#,
        )
        .unwrap();

        assert_eq!(cultures_in(&tree), vec!["norse", "swedish", "italian"]);
    }
}
