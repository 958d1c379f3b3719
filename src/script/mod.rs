//! Script definition files: decoding and parsing into name/value trees

pub mod parser;
pub mod tree;

use std::fs;
use std::path::Path;

use crate::core::error::{Result, TemplateError};

pub use parser::{parse_str, ParseFailure};
pub use tree::{Node, Operator, Tree, Value};

/// Decode mod file contents.
///
/// Game files are Windows-1252 unless they start with a UTF-8 BOM.
pub fn decode(bytes: &[u8]) -> String {
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Read and decode a text file
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| TemplateError::io(path, e))?;
    Ok(decode(&bytes))
}

/// Read, decode and parse a script file
pub fn parse_file(path: &Path) -> Result<Tree> {
    let text = read_text(path)?;
    parse_str(&text).map_err(|failure| TemplateError::Script {
        path: path.to_path_buf(),
        line: failure.line,
        message: failure.message,
    })
}
