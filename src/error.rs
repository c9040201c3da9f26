//! All error types for the i18ntext crate.
//!
//! Every variant maps to exactly one stable [`DiagnosticCode`], so the compiler
//! driver can turn any failure into a diagnostic instead of aborting the batch.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::diagnostics::{DiagnosticCode, Location};

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not read `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{}` is not valid {encoding} text", .path.display())]
    Encoding {
        path: PathBuf,
        encoding: &'static str,
    },

    #[error("`{}` is not a valid JSON text resource: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{}` line {line}: malformed CSV: {message}", .path.display())]
    Csv {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("`{}`: the value of key `{key}` must be a string, found {found}", .path.display())]
    InvalidValue {
        path: PathBuf,
        key: String,
        found: &'static str,
    },

    #[error("`{}`{}: {reason}", .path.display(), at_line(.line))]
    InvalidRow {
        path: PathBuf,
        line: Option<usize>,
        reason: String,
    },

    #[error("`{}`{}: duplicate key `{key}`", .path.display(), at_line(.line))]
    DuplicateKey {
        path: PathBuf,
        key: String,
        line: Option<usize>,
    },

    #[error("unrecognized file name `{}`: {reason}", .path.display())]
    UnrecognizedFileName { path: PathBuf, reason: String },

    #[error(
        "duplicate language `{language}` for type `{type_name}`: `{}` is ignored, `{}` is used",
        .path.display(),
        .first.display()
    )]
    DuplicateLanguage {
        path: PathBuf,
        type_name: String,
        language: String,
        first: PathBuf,
    },

    #[error("type `{type_name}` is ignored because type `{other}` uses it as a namespace")]
    NamespaceConflict {
        path: PathBuf,
        type_name: String,
        other: String,
    },

    #[error("type `{type_name}` has no text resource for the fallback language `{language}`")]
    MissingFallbackLanguage { type_name: String, language: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("could not write `{}`: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("internal error: {0}")]
    Internal(String),

    #[error("compilation cancelled")]
    Cancelled,
}

fn at_line(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" line {line}"),
        None => String::new(),
    }
}

impl Error {
    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Creates a new unrecognized-file-name error.
    pub fn unrecognized(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::UnrecognizedFileName {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The stable diagnostic code reported for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Error::Io { .. } => DiagnosticCode::UnreadableFile,
            Error::Encoding { .. }
            | Error::Json { .. }
            | Error::Csv { .. }
            | Error::InvalidValue { .. }
            | Error::InvalidRow { .. } => DiagnosticCode::MalformedFile,
            Error::DuplicateKey { .. } => DiagnosticCode::DuplicateKey,
            Error::UnrecognizedFileName { .. } => DiagnosticCode::UnrecognizedFileName,
            Error::DuplicateLanguage { .. } => DiagnosticCode::DuplicateLanguage,
            Error::MissingFallbackLanguage { .. } => DiagnosticCode::MissingFallbackLanguage,
            Error::Config(_) => DiagnosticCode::InvalidConfiguration,
            Error::Write { .. } => DiagnosticCode::WriteFailed,
            Error::NamespaceConflict { .. } => DiagnosticCode::NamespaceConflict,
            Error::Internal(_) | Error::Cancelled => DiagnosticCode::Unhandled,
        }
    }

    /// Positional arguments for the [`DiagnosticCode::message_format`]
    /// template of [`Error::code`].
    pub fn message_args(&self) -> Vec<String> {
        let display = |path: &PathBuf| path.display().to_string();
        match self {
            Error::Io { path, source } | Error::Write { path, source } => {
                vec![display(path), source.to_string()]
            }
            Error::DuplicateKey { path, key, .. } => vec![display(path), key.clone()],
            Error::UnrecognizedFileName { path, reason } => vec![display(path), reason.clone()],
            Error::DuplicateLanguage {
                path,
                type_name,
                language,
                first,
            } => vec![type_name.clone(), language.clone(), display(path), display(first)],
            Error::NamespaceConflict {
                type_name, other, ..
            } => vec![type_name.clone(), other.clone()],
            Error::MissingFallbackLanguage {
                type_name,
                language,
            } => vec![type_name.clone(), language.clone()],
            Error::Config(message) => vec![message.clone()],
            Error::Encoding { .. }
            | Error::Json { .. }
            | Error::Csv { .. }
            | Error::InvalidValue { .. }
            | Error::InvalidRow { .. }
            | Error::Internal(_)
            | Error::Cancelled => vec![self.to_string()],
        }
    }

    /// The file (and line, when known) this error is attached to.
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::Io { path, .. }
            | Error::Encoding { path, .. }
            | Error::InvalidValue { path, .. }
            | Error::UnrecognizedFileName { path, .. }
            | Error::DuplicateLanguage { path, .. }
            | Error::NamespaceConflict { path, .. }
            | Error::Write { path, .. } => Some(Location::new(path.clone(), None)),
            Error::Json { path, source } => {
                let line = (source.line() > 0).then(|| source.line());
                Some(Location::new(path.clone(), line))
            }
            Error::Csv { path, line, .. } => Some(Location::new(path.clone(), Some(*line))),
            Error::InvalidRow { path, line, .. } | Error::DuplicateKey { path, line, .. } => {
                Some(Location::new(path.clone(), *line))
            }
            Error::MissingFallbackLanguage { .. }
            | Error::Config(_)
            | Error::Internal(_)
            | Error::Cancelled => None,
        }
    }
}
