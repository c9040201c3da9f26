//! Traits for syntax-agnostic parsing of text resource files.

use std::{fs, io::Read, path::Path};

use encoding_rs::UTF_8;

use crate::{
    error::Error,
    source::{SourceFile, decode_bytes},
    types::ParsedFile,
};

/// A trait for parsing one text resource syntax into a [`ParsedFile`].
///
/// Whole-file failures (unreadable input, broken syntax) are returned as
/// `Err`; per-entry problems are carried in [`ParsedFile::errors`].
///
/// # Example
///
/// ```rust
/// use i18ntext::{formats::CsvFormat, traits::Parser};
///
/// let parsed = CsvFormat::from_str("Greeting.en.csv", "hello,Hello\n")?;
/// assert_eq!(parsed.get("hello"), Some("Hello"));
/// # Ok::<(), i18ntext::Error>(())
/// ```
pub trait Parser {
    /// Parse already-decoded text. `path` is only used to label errors.
    fn from_str<P: AsRef<Path>>(path: P, text: &str) -> Result<ParsedFile, Error>;

    /// Parse from any reader yielding UTF-8 (or BOM-marked UTF-16) bytes.
    fn from_reader<P: AsRef<Path>, R: Read>(path: P, mut reader: R) -> Result<ParsedFile, Error> {
        let path = path.as_ref();
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(path, &bytes)
    }

    /// Parse from UTF-8 bytes. A byte-order mark is honoured and stripped.
    fn from_bytes<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<ParsedFile, Error> {
        let path = path.as_ref();
        let text = decode_bytes(path, bytes, UTF_8)?;
        Self::from_str(path, &text)
    }

    /// Parse a host-supplied source file, honouring its encoding.
    fn from_source(file: &SourceFile) -> Result<ParsedFile, Error> {
        let text = file.decode()?;
        Self::from_str(&file.path, &text)
    }

    /// Parse from a file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<ParsedFile, Error> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(path, &bytes)
    }
}
