//! Landed titles: hierarchy, attributes and region inference

pub mod attributes;
pub mod collector;
pub mod hierarchy;
pub mod inference;
pub mod keys;

pub use attributes::{Attributes, TitleAttributes};
pub use collector::{collect_titles, AttributeCollector, Collection, LANDED_TITLES_DIR};
pub use hierarchy::{TitleHierarchy, TitleNode};
pub use inference::{infer_regions, InferenceStats};
pub use keys::{KeyKind, KeySet};
