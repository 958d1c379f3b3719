//! Per-title attribute tables

use ahash::AHashMap;

/// Attribute key → value for one title
pub type Attributes = AHashMap<String, String>;

/// Titles and their attributes, in order of first appearance
#[derive(Debug, Clone, Default)]
pub struct TitleAttributes {
    titles: Vec<(String, Attributes)>,
    index: AHashMap<String, usize>,
}

impl TitleAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a title's attributes. A replaced title keeps its
    /// original position.
    pub fn insert(&mut self, title: String, attrs: Attributes) {
        match self.index.get(&title) {
            Some(&idx) => self.titles[idx].1 = attrs,
            None => {
                self.index.insert(title.clone(), self.titles.len());
                self.titles.push((title, attrs));
            }
        }
    }

    pub fn get(&self, title: &str) -> Option<&Attributes> {
        self.index.get(title).map(|&idx| &self.titles[idx].1)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut Attributes> {
        let idx = *self.index.get(title)?;
        Some(&mut self.titles[idx].1)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.index.contains_key(title)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attributes)> {
        self.titles.iter().map(|(t, a)| (t.as_str(), a))
    }
}
