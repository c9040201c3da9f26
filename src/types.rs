//! Core types shared by the compiler stages.
//! Parsers produce [`ParsedFile`]s, the grouper produces [`ResourceType`]s,
//! the fallback resolver produces [`MergedResource`]s and the code generator
//! produces [`GeneratedUnit`]s.

use std::{
    collections::{BTreeMap, HashSet},
    fmt::Display,
    path::Path,
};

use serde::Serialize;

use crate::{error::Error, source::SourceFile};

/// One `key → text` pair read from a single file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LocaleEntry {
    pub key: String,
    pub value: String,
}

impl LocaleEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        LocaleEntry {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Display for LocaleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocaleEntry {{ key: {}, value: {} }}", self.key, self.value)
    }
}

/// The outcome of parsing one file: the usable entries in document order plus
/// the per-entry errors that did not prevent the rest of the file from
/// parsing.
#[derive(Debug, Default)]
pub struct ParsedFile {
    pub entries: Vec<LocaleEntry>,
    pub errors: Vec<Error>,
}

/// One occurrence of a key in a file. `value` is `None` when the row was
/// rejected, which still counts towards duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Row {
    pub key: String,
    pub value: Option<String>,
    /// 1-based line, when the syntax tracks it.
    pub line: Option<usize>,
}

impl Row {
    pub fn accepted(key: impl Into<String>, value: impl Into<String>, line: Option<usize>) -> Self {
        Row {
            key: key.into(),
            value: Some(value.into()),
            line,
        }
    }

    pub fn rejected(key: impl Into<String>, line: Option<usize>) -> Self {
        Row {
            key: key.into(),
            value: None,
            line,
        }
    }
}

impl ParsedFile {
    /// Builds a parsed file from every key occurrence, dropping each
    /// occurrence of a duplicated key and recording one
    /// [`Error::DuplicateKey`] per such key.
    pub(crate) fn from_rows(path: &Path, rows: Vec<Row>, mut errors: Vec<Error>) -> Self {
        let mut seen = HashSet::new();
        let mut duplicated = HashSet::new();
        for row in &rows {
            if !seen.insert(row.key.as_str()) && duplicated.insert(row.key.as_str()) {
                // Reported once, at the first repeated occurrence.
                errors.push(Error::DuplicateKey {
                    path: path.to_path_buf(),
                    key: row.key.clone(),
                    line: row.line,
                });
            }
        }
        let duplicated: HashSet<String> = duplicated.into_iter().map(str::to_string).collect();

        let entries = rows
            .into_iter()
            .filter(|row| !duplicated.contains(&row.key))
            .filter_map(|row| row.value.map(|value| LocaleEntry::new(row.key, value)))
            .collect();

        ParsedFile { entries, errors }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }
}

/// A logical group of per-language text resource files that compiles into
/// one generated type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceType {
    /// Namespace segments, root first.
    pub namespace: Vec<String>,
    /// The generated type's name.
    pub base_name: String,
    /// Contributing files by canonical language code.
    pub files: BTreeMap<String, SourceFile>,
    /// Whether directory segments contributed to `namespace`.
    pub sub_namespace: bool,
}

impl ResourceType {
    /// Namespace joined with `.`, e.g. `MyApp.I18nText`.
    pub fn namespace_name(&self) -> String {
        self.namespace.join(".")
    }

    /// Fully-qualified name, e.g. `MyApp.I18nText.Greeting`.
    pub fn full_name(&self) -> String {
        full_name(&self.namespace, &self.base_name)
    }

    /// Stable identity of the generated unit for incremental builds.
    pub fn hint_name(&self) -> String {
        format!("{}.g.rs", self.full_name())
    }

    /// Contributing language codes in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn source_paths(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.files
            .iter()
            .map(|(language, file)| (language.as_str(), file.path.as_path()))
    }
}

pub(crate) fn full_name(namespace: &[String], base_name: &str) -> String {
    if namespace.is_empty() {
        base_name.to_string()
    } else {
        format!("{}.{}", namespace.join("."), base_name)
    }
}

/// The result of fallback resolution for one [`ResourceType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedResource {
    pub fallback_language: String,
    /// Canonical key order shared by every language.
    pub keys: Vec<String>,
    /// Value rows aligned with `keys`, by language code.
    pub values: BTreeMap<String, Vec<String>>,
}

impl MergedResource {
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// The text for `key` in `language`, after fallback substitution.
    pub fn value(&self, language: &str, key: &str) -> Option<&str> {
        let index = self.keys.iter().position(|k| k == key)?;
        self.values
            .get(language)
            .and_then(|row| row.get(index))
            .map(String::as_str)
    }
}

/// A per-language text table written next to the generated code for
/// runtimes that load texts at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextTableAsset {
    pub language: String,
    pub file_name: String,
    pub content: String,
}

/// One generated source unit, handed to the host's sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedUnit {
    pub hint_name: String,
    pub type_name: String,
    pub namespace: Vec<String>,
    pub source: String,
    pub text_tables: Vec<TextTableAsset>,
}
