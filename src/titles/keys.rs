//! Recognised attribute keys
//!
//! Structural keys come from configuration; culture keys are discovered from
//! the mod at runtime and injected here, so the collector never hard-codes
//! either set.

use ahash::AHashSet;

/// How an attribute key is treated when collecting and ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Structural,
    Culture,
    Other,
}

#[derive(Debug, Clone, Default)]
pub struct KeySet {
    structural: AHashSet<String>,
    cultures: AHashSet<String>,
}

impl KeySet {
    pub fn new<I, S>(structural: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            structural: structural.into_iter().map(Into::into).collect(),
            cultures: AHashSet::new(),
        }
    }

    pub fn with_cultures<I, S>(mut self, cultures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cultures.extend(cultures.into_iter().map(Into::into));
        self
    }

    /// Structural membership wins over culture membership
    pub fn kind(&self, key: &str) -> KeyKind {
        if self.structural.contains(key) {
            KeyKind::Structural
        } else if self.cultures.contains(key) {
            KeyKind::Culture
        } else {
            KeyKind::Other
        }
    }

    /// Keys the collector copies out of title definitions
    pub fn recognizes(&self, key: &str) -> bool {
        self.kind(key) != KeyKind::Other
    }

    pub fn culture_count(&self) -> usize {
        self.cultures.len()
    }
}
