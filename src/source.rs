//! Source file descriptors handed to the compiler by a host.

use std::{
    fmt::{Display, Formatter},
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use encoding_rs::{Encoding, UTF_8};

use crate::error::Error;

/// The two supported text resource syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Syntax {
    /// A top-level JSON object of `"key": "text"` members.
    Json,
    /// Headerless two-column CSV: key, text.
    Csv,
}

impl Syntax {
    /// Returns the file extension for this syntax.
    pub fn extension(&self) -> &'static str {
        match self {
            Syntax::Json => "json",
            Syntax::Csv => "csv",
        }
    }

    /// Infers the syntax from a path's extension (case-insensitive).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl Display for Syntax {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Syntax {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Syntax::Json),
            "csv" => Ok(Syntax::Csv),
            other => Err(Error::config(format!("unsupported syntax `{other}`"))),
        }
    }
}

/// One discovered text resource file.
///
/// Immutable once constructed; the compiler reads `content` exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub syntax: Syntax,
    /// Language declared by the host; overrides the file-name language.
    pub language: Option<String>,
    pub content: Vec<u8>,
    /// Encoding used when the content carries no byte-order mark.
    pub encoding: &'static Encoding,
}

impl SourceFile {
    /// Creates a UTF-8 source file from in-memory content, inferring the
    /// syntax from the extension.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Result<Self, Error> {
        let path = path.into();
        let syntax = Syntax::from_path(&path).ok_or_else(|| {
            Error::unrecognized(&path, "the extension must be `.json` or `.csv`")
        })?;
        Ok(SourceFile {
            path,
            syntax,
            language: None,
            content: content.into(),
            encoding: UTF_8,
        })
    }

    /// Reads a source file from disk.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        SourceFile::new(path, content)
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Decodes the content to text.
    ///
    /// A byte-order mark wins over the declared encoding. Malformed byte
    /// sequences are an error rather than being replaced.
    pub fn decode(&self) -> Result<String, Error> {
        decode_bytes(&self.path, &self.content, self.encoding)
    }
}

/// Decodes `bytes` as `encoding` unless a byte-order mark names another one.
pub(crate) fn decode_bytes(
    path: &Path,
    bytes: &[u8],
    encoding: &'static Encoding,
) -> Result<String, Error> {
    let (encoding, bom_length) = Encoding::for_bom(bytes).unwrap_or((encoding, 0));
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_length..])
        .map(|text| text.into_owned())
        .ok_or_else(|| Error::Encoding {
            path: path.to_path_buf(),
            encoding: encoding.name(),
        })
}
