//! Landed Templates - localisation templates for landed title mods

pub mod core;
pub mod cultures;
pub mod localisation;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod provinces;
pub mod regions;
pub mod revision;
pub mod script;
pub mod source;
pub mod titles;

pub use crate::core::{PipelineConfig, Result, TemplateError};
pub use crate::pipeline::{run, RunSummary};
