//! Merges per-language key sets of one resource type against the fallback
//! language.
//!
//! Rules:
//! - The fallback language's keys, in its document order, come first.
//! - Keys only other languages define are appended after them. Languages are
//!   visited in code order and each contributes its new keys in document
//!   order, so the result does not depend on discovery order.
//! - A language missing a fallback key gets the fallback text and a
//!   [`DiagnosticCode::FallbackSubstituted`] warning.
//! - A language missing a key the fallback language lacks too gets an empty
//!   text and a [`DiagnosticCode::MissingFallbackKey`] warning.
//!
//! [`DiagnosticCode::FallbackSubstituted`]: crate::diagnostics::DiagnosticCode::FallbackSubstituted
//! [`DiagnosticCode::MissingFallbackKey`]: crate::diagnostics::DiagnosticCode::MissingFallbackKey

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    diagnostics::Diagnostic,
    error::Error,
    types::{LocaleEntry, MergedResource},
};

/// A merged resource together with the warnings produced while merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub merged: MergedResource,
    pub warnings: Vec<Diagnostic>,
}

/// Resolves the per-language entries of `type_name` against
/// `fallback_language`.
pub fn resolve(
    type_name: &str,
    parsed: &BTreeMap<String, Vec<LocaleEntry>>,
    fallback_language: &str,
) -> Result<Resolution, Error> {
    let fallback = parsed
        .get(fallback_language)
        .ok_or_else(|| Error::MissingFallbackLanguage {
            type_name: type_name.to_string(),
            language: fallback_language.to_string(),
        })?;

    let mut keys: Vec<String> = fallback.iter().map(|entry| entry.key.clone()).collect();
    let mut known: HashSet<&str> = fallback.iter().map(|entry| entry.key.as_str()).collect();
    for (language, entries) in parsed {
        if language == fallback_language {
            continue;
        }
        for entry in entries {
            if known.insert(entry.key.as_str()) {
                keys.push(entry.key.clone());
            }
        }
    }

    let fallback_texts = texts_by_key(fallback);
    let mut values = BTreeMap::new();
    let mut warnings = Vec::new();
    for (language, entries) in parsed {
        let texts = texts_by_key(entries);
        let row = keys
            .iter()
            .map(|key| {
                if let Some(text) = texts.get(key.as_str()) {
                    return text.to_string();
                }
                match fallback_texts.get(key.as_str()) {
                    Some(text) => {
                        warnings.push(Diagnostic::fallback_substituted(type_name, language, key));
                        text.to_string()
                    }
                    None => {
                        warnings.push(Diagnostic::missing_fallback_key(type_name, language, key));
                        String::new()
                    }
                }
            })
            .collect();
        values.insert(language.clone(), row);
    }

    Ok(Resolution {
        merged: MergedResource {
            fallback_language: fallback_language.to_string(),
            keys,
            values,
        },
        warnings,
    })
}

fn texts_by_key(entries: &[LocaleEntry]) -> HashMap<&str, &str> {
    entries
        .iter()
        .map(|entry| (entry.key.as_str(), entry.value.as_str()))
        .collect()
}
