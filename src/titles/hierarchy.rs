//! Title hierarchy arena
//!
//! Titles form a forest: every title has an ordered list of direct vassals. Titles are addressed by index into the arena so
//! walks can run on explicit stacks instead of recursion.

use ahash::AHashMap;

use crate::core::types::Tier;

#[derive(Debug, Clone)]
pub struct TitleNode {
    pub id: String,
    pub tier: Tier,
    /// Direct vassals in order of first appearance
    pub vassals: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct TitleHierarchy {
    nodes: Vec<TitleNode>,
    index: AHashMap<String, usize>,
    /// Each title after all of its vassals, siblings in source order
    post_order: Vec<usize>,
}

impl TitleHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `id`, adding it on first sight.
    ///
    /// Callers only pass title codenames.
    pub fn intern(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(TitleNode {
            id: id.to_string(),
            tier: Tier::from_id(id).unwrap_or(Tier::Barony),
            vassals: Vec::new(),
        });
        self.index.insert(id.to_string(), idx);
        idx
    }

    /// Record `vassal` under `liege`. Repeats are ignored.
    pub fn add_vassal(&mut self, liege: usize, vassal: usize) {
        if !self.nodes[liege].vassals.contains(&vassal) {
            self.nodes[liege].vassals.push(vassal);
        }
    }

    /// Mark a title as fully walked (all vassals seen)
    pub fn finish(&mut self, idx: usize) {
        self.post_order.push(idx);
    }

    pub fn get(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node(&self, idx: usize) -> &TitleNode {
        &self.nodes[idx]
    }

    pub fn post_order(&self) -> &[usize] {
        &self.post_order
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TitleNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct vassals of a title
    pub fn vassals(&self, id: &str) -> Vec<&str> {
        self.get(id)
            .map(|idx| {
                self.nodes[idx]
                    .vassals
                    .iter()
                    .map(|&v| self.nodes[v].id.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build() -> TitleHierarchy {
        // e_test -> k_test -> d_test -> c_a, c_b
        let mut h = TitleHierarchy::new();
        let e = h.intern("e_test");
        let k = h.intern("k_test");
        let d = h.intern("d_test");
        let a = h.intern("c_a");
        let b = h.intern("c_b");
        h.add_vassal(e, k);
        h.add_vassal(k, d);
        h.add_vassal(d, a);
        h.add_vassal(d, b);
        h.add_vassal(d, a);
        h
    }

    #[test]
    fn test_intern_is_stable() {
        let mut h = build();
        assert_eq!(h.intern("d_test"), 2);
        assert_eq!(h.len(), 5);
        assert_eq!(h.node(2).tier, Tier::Duchy);
    }

    #[test]
    fn test_vassal_queries() {
        let h = build();
        assert_eq!(h.vassals("d_test"), vec!["c_a", "c_b"]);
        assert!(h.vassals("c_a").is_empty());
        assert!(h.vassals("k_missing").is_empty());
    }
}
