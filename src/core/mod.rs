pub mod config;
pub mod error;
pub mod types;

pub use config::{OutputConfig, PipelineConfig};
pub use error::{Result, TemplateError};
pub use types::Tier;
