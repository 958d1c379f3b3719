//! Attribute collection over landed title definitions
//!
//! One pass over every landed titles file records, for each title:
//! - the always-present `<title>` and `<title>_adj` keys (empty),
//! - every direct child whose key is recognised (structural or culture),
//! - the title's place in the hierarchy.

use crate::core::error::Result;
use crate::core::types::is_codename;
use crate::script::{self, Node, Tree};
use crate::source::ModSource;

use super::attributes::{Attributes, TitleAttributes};
use super::hierarchy::TitleHierarchy;
use super::keys::KeySet;

pub const LANDED_TITLES_DIR: &str = "common/landed_titles";

/// Result of walking every landed titles file
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub hierarchy: TitleHierarchy,
    pub attributes: TitleAttributes,
}

/// Walks title trees, accumulating hierarchy and attributes across files
pub struct AttributeCollector<'a> {
    keys: &'a KeySet,
    collection: Collection,
}

struct Frame<'t> {
    nodes: std::slice::Iter<'t, Node>,
    title: Option<usize>,
}

impl<'a> AttributeCollector<'a> {
    pub fn new(keys: &'a KeySet) -> Self {
        Self {
            keys,
            collection: Collection::default(),
        }
    }

    /// Walk one parsed landed titles file
    pub fn collect_tree(&mut self, tree: &Tree) {
        let mut stack = vec![Frame {
            nodes: tree.iter(),
            title: None,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(node) = frame.nodes.next() else {
                if let Some(Frame { title: Some(idx), .. }) = stack.pop() {
                    self.collection.hierarchy.finish(idx);
                }
                continue;
            };
            if !is_codename(&node.name) {
                continue;
            }
            let Some(body) = node.value.as_tree() else {
                tracing::warn!("Title {} has no definition block, skipping", node.name);
                continue;
            };

            let liege = frame.title;
            let idx = self.collection.hierarchy.intern(&node.name);
            let attrs = extract_attributes(self.keys, &node.name, body);
            self.collection.attributes.insert(node.name.clone(), attrs);
            if let Some(liege) = liege {
                let hierarchy = &mut self.collection.hierarchy;
                if !hierarchy.node(liege).tier.outranks(&hierarchy.node(idx).tier) {
                    tracing::debug!(
                        "{} is nested under {} without ranking below it",
                        node.name,
                        hierarchy.node(liege).id
                    );
                }
                hierarchy.add_vassal(liege, idx);
            }

            stack.push(Frame {
                nodes: body.iter(),
                title: Some(idx),
            });
        }
    }

    pub fn finish(self) -> Collection {
        self.collection
    }
}

/// Attributes of a single title definition
pub fn extract_attributes(keys: &KeySet, title: &str, body: &Tree) -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert(title.to_string(), String::new());
    attrs.insert(format!("{}_adj", title), String::new());
    for child in body {
        if keys.recognizes(&child.name) {
            attrs.insert(child.name.clone(), child.value.joined());
        }
    }
    attrs
}

/// Collect every landed titles file of the mod, in file name order
pub fn collect_titles(source: &ModSource, keys: &KeySet) -> Result<Collection> {
    let mut collector = AttributeCollector::new(keys);
    for path in source.files(LANDED_TITLES_DIR, "txt")? {
        tracing::debug!("Collecting titles from {:?}", path.file_name());
        let tree = script::parse_file(&path)?;
        collector.collect_tree(&tree);
    }
    Ok(collector.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_str;

    fn keys() -> KeySet {
        KeySet::new(["title", "male_names", "dynasty_title_names"]).with_cultures(["norse"])
    }

    const TITLES: &str = r#"
e_test = {
    k_test = {
        title = "KING"
        capital = 12
        d_test = {
            norse = "Testmark"
            male_names = { Ulf Bjorn "Harald Hardrada" }
            c_test = {
                b_one = { }
                b_two = { }
            }
            allow = { k_other = { } }
        }
        d_second = { dynasty_title_names = no }
    }
}
"#;

    #[test]
    fn test_collect_attributes() {
        let keys = keys();
        let mut collector = AttributeCollector::new(&keys);
        collector.collect_tree(&parse_str(TITLES).unwrap());
        let collection = collector.finish();

        let kingdom = collection.attributes.get("k_test").unwrap();
        assert_eq!(kingdom["title"], "KING");
        assert_eq!(kingdom["k_test"], "");
        assert_eq!(kingdom["k_test_adj"], "");
        assert!(!kingdom.contains_key("capital"));

        let duchy = collection.attributes.get("d_test").unwrap();
        assert_eq!(duchy["norse"], "Testmark");
        assert_eq!(duchy["male_names"], "Ulf Bjorn Harald Hardrada");
        assert_eq!(duchy.len(), 4);

        assert_eq!(
            collection.attributes.get("d_second").unwrap()["dynasty_title_names"],
            "no"
        );
        // Titles inside non-title blocks are not part of the hierarchy
        assert!(!collection.attributes.contains("k_other"));
    }

    #[test]
    fn test_collect_hierarchy_and_order() {
        let keys = keys();
        let mut collector = AttributeCollector::new(&keys);
        collector.collect_tree(&parse_str(TITLES).unwrap());
        let collection = collector.finish();
        let h = &collection.hierarchy;

        assert_eq!(h.vassals("k_test"), vec!["d_test", "d_second"]);
        assert_eq!(h.vassals("c_test"), vec!["b_one", "b_two"]);

        let first_seen: Vec<&str> = collection.attributes.iter().map(|(t, _)| t).collect();
        assert_eq!(
            first_seen,
            vec!["e_test", "k_test", "d_test", "c_test", "b_one", "b_two", "d_second"]
        );

        let post: Vec<&str> = h.post_order().iter().map(|&i| h.node(i).id.as_str()).collect();
        assert_eq!(
            post,
            vec!["b_one", "b_two", "c_test", "d_test", "d_second", "k_test", "e_test"]
        );
    }

    #[test]
    fn test_redefinition_replaces_attributes_and_appends_vassals() {
        let keys = keys();
        let mut collector = AttributeCollector::new(&keys);
        collector.collect_tree(&parse_str("k_a = { title = OLD d_x = { } }").unwrap());
        collector.collect_tree(&parse_str("k_a = { d_y = { } }").unwrap());
        let collection = collector.finish();

        let kingdom = collection.attributes.get("k_a").unwrap();
        assert!(!kingdom.contains_key("title"));
        assert_eq!(collection.hierarchy.vassals("k_a"), vec!["d_x", "d_y"]);
    }
}
