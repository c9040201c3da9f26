//! The supported text resource syntaxes.
//!
//! This module re-exports one [`Parser`] implementation per [`Syntax`] and
//! provides [`parse`] to dispatch on a [`SourceFile`]'s syntax.

pub mod csv;
pub mod json;

// Reexporting the formats for easier access
pub use csv::Format as CsvFormat;
pub use json::Format as JsonFormat;

use crate::{
    error::Error,
    source::{SourceFile, Syntax},
    traits::Parser,
    types::ParsedFile,
};

/// Parses one source file with the parser matching its syntax.
///
/// # Example
/// ```rust
/// use i18ntext::{SourceFile, formats};
///
/// let file = SourceFile::new("Greeting.en.json", r#"{"hello": "Hello"}"#)?;
/// let parsed = formats::parse(&file)?;
/// assert_eq!(parsed.get("hello"), Some("Hello"));
/// # Ok::<(), i18ntext::Error>(())
/// ```
pub fn parse(file: &SourceFile) -> Result<ParsedFile, Error> {
    match file.syntax {
        Syntax::Json => JsonFormat::from_source(file),
        Syntax::Csv => CsvFormat::from_source(file),
    }
}
