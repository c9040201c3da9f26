//! Compiler configuration.
//!
//! Every field is required; the compiler assumes no defaults. Hosts either
//! build [`CompileOptions`] directly or load it from a TOML file:
//!
//! ```toml
//! base-dir = "."
//! source-dir = "i18ntext"
//! out-dir = "target/i18ntext"
//! namespace = "my_app::i18n_text"
//! fallback-language = "en"
//! disable-sub-namespace = false
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{error::Error, grouping::canonical_language, ident::is_identifier};

/// Options for one compilation. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CompileOptions {
    /// Directory relative paths below are resolved against.
    pub base_dir: PathBuf,
    /// Root of the text resource tree.
    pub source_dir: PathBuf,
    /// Where a host persists generated output, if it chooses to.
    pub out_dir: PathBuf,
    /// Root namespace, segments separated by `::` or `.`.
    pub namespace: String,
    /// Language whose keys define the canonical key list.
    pub fallback_language: String,
    /// Map every file into the root namespace regardless of its directory.
    pub disable_sub_namespace: bool,
}

impl CompileOptions {
    pub fn new(
        base_dir: impl Into<PathBuf>,
        source_dir: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
        namespace: impl Into<String>,
        fallback_language: impl Into<String>,
        disable_sub_namespace: bool,
    ) -> Self {
        CompileOptions {
            base_dir: base_dir.into(),
            source_dir: source_dir.into(),
            out_dir: out_dir.into(),
            namespace: namespace.into(),
            fallback_language: fallback_language.into(),
            disable_sub_namespace,
        }
    }

    /// Parses options from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        toml::from_str(text).map_err(|err| Error::config(err.to_string()))
    }

    /// Loads options from a TOML file. A relative `base-dir` is resolved
    /// against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut options = Self::from_toml_str(&text)?;
        if options.base_dir.is_relative()
            && let Some(parent) = path.parent()
        {
            options.base_dir = parent.join(&options.base_dir);
        }
        Ok(options)
    }

    /// The text resource root, resolved against `base_dir`.
    pub fn source_root(&self) -> PathBuf {
        self.base_dir.join(&self.source_dir)
    }

    /// The output directory, resolved against `base_dir`.
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.out_dir)
    }

    /// Root namespace split into segments.
    pub fn namespace_segments(&self) -> Vec<String> {
        self.namespace
            .split("::")
            .flat_map(|part| part.split('.'))
            .map(|segment| segment.trim().to_string())
            .collect()
    }

    /// The fallback language in canonical form (`en_us` → `en-US`).
    pub fn fallback_language_tag(&self) -> Result<String, Error> {
        canonical_language(&self.fallback_language).ok_or_else(|| {
            Error::config(format!(
                "`{}` is not a valid fallback language tag",
                self.fallback_language
            ))
        })
    }

    /// Checks the namespace and fallback language.
    pub fn validate(&self) -> Result<(), Error> {
        if self.namespace.trim().is_empty() {
            return Err(Error::config("the namespace must not be empty"));
        }
        if let Some(segment) = self
            .namespace_segments()
            .into_iter()
            .find(|segment| !is_identifier(segment))
        {
            return Err(Error::config(format!(
                "namespace `{}` has an invalid segment `{segment}`",
                self.namespace
            )));
        }
        self.fallback_language_tag()?;
        Ok(())
    }
}
