use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Syntax error in {path}:{line}: {message}")]
    Script {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Missing key '{key}' in {context}")]
    MissingKey { key: String, context: String },

    #[error("Malformed region '{region}': expected at most one child besides 'duchies', found {children:?}")]
    MalformedRegion { region: String, children: Vec<String> },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not publish to {target}: {source}. Restoring the previous revision also failed ({restore}); it is kept at {kept}")]
    RestoreFailed {
        target: PathBuf,
        kept: PathBuf,
        #[source]
        source: std::io::Error,
        restore: std::io::Error,
    },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Pattern error: {0}")]
    PatternError(#[from] regex::Error),
}

impl TemplateError {
    /// Attach the offending path to an I/O failure
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TemplateError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
