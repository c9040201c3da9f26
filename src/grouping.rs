//! Classifies source files into resource types by name and language.
//!
//! File names follow `<Segments...>.<BaseName>.<language>.<ext>`, e.g.
//! `Greeting.en.json` or `Admin.Menu.fr-CA.csv`. Directories below the source
//! root contribute namespace segments unless sub-namespacing is disabled.

use std::{
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
    str::FromStr,
};

use lazy_static::lazy_static;
use regex::Regex;
use unic_langid::LanguageIdentifier;

use crate::{
    config::CompileOptions,
    error::Error,
    ident::{is_identifier, sanitize},
    source::SourceFile,
    types::{ResourceType, full_name},
};

lazy_static! {
    static ref LANGUAGE_TAG: Regex =
        Regex::new(r"^[A-Za-z]{2,3}(?:[-_][A-Za-z0-9]{1,8})*$").unwrap();
}

/// Validates a language tag and returns its canonical spelling
/// (`en_us` → `en-US`, `ZH-hans` → `zh-Hans`).
pub fn canonical_language(tag: &str) -> Option<String> {
    if !LANGUAGE_TAG.is_match(tag) {
        return None;
    }
    LanguageIdentifier::from_str(&tag.replace('_', "-"))
        .ok()
        .map(|id| id.to_string())
}

/// The grouper's output: resource types by full name, plus the errors for
/// files that were excluded.
#[derive(Debug, Default)]
pub struct Grouping {
    pub types: BTreeMap<String, ResourceType>,
    pub errors: Vec<Error>,
}

/// Where a single file belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Placement {
    namespace: Vec<String>,
    base_name: String,
    language: String,
}

/// Groups `files` into resource types.
///
/// Files are considered in the given order; when two files claim the same
/// (type, language) pair the first one wins and the second is reported.
pub fn group(files: Vec<SourceFile>, options: &CompileOptions) -> Grouping {
    let root_namespace = options.namespace_segments();
    let source_root = options.source_root();
    let mut grouping = Grouping::default();

    for file in files {
        let placement = match place(&file, &source_root, &root_namespace, options) {
            Ok(placement) => placement,
            Err(err) => {
                grouping.errors.push(err);
                continue;
            }
        };

        let type_name = full_name(&placement.namespace, &placement.base_name);
        let resource_type = grouping
            .types
            .entry(type_name.clone())
            .or_insert_with(|| ResourceType {
                namespace: placement.namespace.clone(),
                base_name: placement.base_name.clone(),
                files: BTreeMap::new(),
                sub_namespace: !options.disable_sub_namespace,
            });

        if let Some(first) = resource_type.files.get(&placement.language) {
            grouping.errors.push(Error::DuplicateLanguage {
                path: file.path.clone(),
                type_name,
                language: placement.language,
                first: first.path.clone(),
            });
            continue;
        }
        tracing::debug!(
            path = %file.path.display(),
            type_name = %type_name,
            language = %placement.language,
            "grouped text resource"
        );
        resource_type.files.insert(placement.language, file);
    }

    exclude_namespace_conflicts(&mut grouping);
    grouping
}

/// Drops every type whose full name is also a namespace of another type, as
/// both would be emitted as items with the same name.
fn exclude_namespace_conflicts(grouping: &mut Grouping) {
    let mut namespaces: BTreeMap<String, &str> = BTreeMap::new();
    for (name, resource_type) in &grouping.types {
        for end in 1..=resource_type.namespace.len() {
            namespaces
                .entry(resource_type.namespace[..end].join("."))
                .or_insert(name.as_str());
        }
    }
    let conflicts: Vec<(String, String)> = grouping
        .types
        .keys()
        .filter_map(|name| {
            namespaces
                .get(name)
                .map(|other| (name.clone(), other.to_string()))
        })
        .collect();

    for (type_name, other) in conflicts {
        let Some(resource_type) = grouping.types.remove(&type_name) else {
            continue;
        };
        let Some(path) = resource_type.files.values().next().map(|file| file.path.clone()) else {
            continue;
        };
        grouping.errors.push(Error::NamespaceConflict {
            path,
            type_name,
            other,
        });
    }
}

fn place(
    file: &SourceFile,
    source_root: &Path,
    root_namespace: &[String],
    options: &CompileOptions,
) -> Result<Placement, Error> {
    let path = resolve(options, &file.path);
    let relative = path.strip_prefix(source_root).map_err(|_| {
        Error::unrecognized(
            &file.path,
            format!("not below the source directory `{}`", source_root.display()),
        )
    })?;

    let mut namespace = root_namespace.to_vec();
    if !options.disable_sub_namespace {
        namespace.extend(directory_segments(relative));
    }

    let stem = relative
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| Error::unrecognized(&file.path, "the file name is not valid UTF-8"))?;
    let mut parts: Vec<&str> = stem.split('.').collect();

    let language = match &file.language {
        Some(declared) => {
            let language = canonical_language(declared).ok_or_else(|| {
                Error::unrecognized(
                    &file.path,
                    format!("declared language `{declared}` is not a language code"),
                )
            })?;
            // The name may still carry the same language, e.g. `Greeting.en`.
            if parts.len() > 1
                && parts.last().and_then(|l| canonical_language(l)).as_ref() == Some(&language)
            {
                parts.pop();
            }
            language
        }
        None => {
            if parts.len() < 2 {
                return Err(Error::unrecognized(
                    &file.path,
                    "expected `<Name>.<language>.<extension>`",
                ));
            }
            let last = parts.pop().unwrap_or_default();
            canonical_language(last).ok_or_else(|| {
                Error::unrecognized(&file.path, format!("`{last}` is not a language code"))
            })?
        }
    };

    if let Some(invalid) = parts.iter().find(|part| !is_identifier(part)) {
        return Err(Error::unrecognized(
            &file.path,
            format!("`{invalid}` is not a valid type name segment"),
        ));
    }
    let base_name = parts
        .pop()
        .map(str::to_string)
        .ok_or_else(|| Error::unrecognized(&file.path, "the type name is empty"))?;
    namespace.extend(parts.into_iter().map(str::to_string));

    Ok(Placement {
        namespace,
        base_name,
        language,
    })
}

/// Directory components between the source root and the file, as
/// identifiers.
fn directory_segments(relative: &Path) -> Vec<String> {
    relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|component| match component {
                    Component::Normal(name) => Some(sanitize(&name.to_string_lossy())),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Resolves a host path against the base directory.
pub(crate) fn resolve(options: &CompileOptions, path: &Path) -> PathBuf {
    options.base_dir.join(path)
}
