//! Renders one merged resource type as Rust source.
//!
//! Keys are bound at compile time (one `&'static str` field per key) while
//! values are selected at run time: every language's value row is embedded
//! and [`crate::runtime::TextTable`] picks one when the active language is
//! known. The output only depends on its inputs, so repeated runs produce
//! byte-identical units.

use std::{fmt::Write, path::Path};

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    config::CompileOptions,
    error::Error,
    grouping::resolve,
    ident::{IdentifierAllocator, render},
    types::{GeneratedUnit, MergedResource, ResourceType, TextTableAsset},
};

/// Path of the runtime support module referenced by generated code.
const RUNTIME: &str = "::i18ntext::runtime";

/// Generates the unit for `resource_type` from its merged texts.
pub fn generate(
    merged: &MergedResource,
    resource_type: &ResourceType,
    options: &CompileOptions,
) -> Result<GeneratedUnit, Error> {
    let source = render_source(merged, resource_type, options)
        .map_err(|err| Error::Internal(format!("formatting generated code failed: {err}")))?;
    let text_tables = merged
        .values
        .iter()
        .map(|(language, row)| text_table(resource_type, language, &merged.keys, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GeneratedUnit {
        hint_name: resource_type.hint_name(),
        type_name: resource_type.full_name(),
        namespace: resource_type.namespace.clone(),
        source,
        text_tables,
    })
}

/// Field names for `keys`, sanitised and disambiguated in key order.
pub fn field_names(keys: &[String]) -> Vec<String> {
    let mut allocator = IdentifierAllocator::new();
    keys.iter().map(|key| allocator.allocate(key)).collect()
}

fn render_source(
    merged: &MergedResource,
    resource_type: &ResourceType,
    options: &CompileOptions,
) -> Result<String, std::fmt::Error> {
    let type_ident = render(&resource_type.base_name);
    let fields = field_names(&merged.keys);
    let fallback_row = merged.values.get(&merged.fallback_language);
    let mut out = String::new();

    writeln!(out, "// <auto-generated>")?;
    writeln!(out, "//     Generated by i18ntext from:")?;
    for (language, path) in resource_type.source_paths() {
        writeln!(out, "//       {language}: {}", display_path(options, path))?;
    }
    writeln!(
        out,
        "//     Changes to this file will be lost when it is regenerated."
    )?;
    writeln!(out, "// </auto-generated>")?;
    writeln!(out)?;

    writeln!(out, "#[doc = {:?}]", format!("Text table `{}`.", resource_type.full_name()))?;
    writeln!(out, "#[allow(non_snake_case, non_camel_case_types, dead_code)]")?;
    writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]")?;
    writeln!(out, "pub struct {type_ident} {{")?;
    for (index, field) in fields.iter().enumerate() {
        if let Some(text) = fallback_row.and_then(|row| row.get(index)) {
            writeln!(out, "    #[doc = {text:?}]")?;
        }
        writeln!(out, "    pub {field}: &'static str,")?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "#[allow(dead_code)]")?;
    writeln!(out, "impl {type_ident} {{")?;
    writeln!(
        out,
        "    pub const NAMESPACE: &'static str = {:?};",
        resource_type.namespace_name()
    )?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl {RUNTIME}::TextTable for {type_ident} {{")?;
    writeln!(
        out,
        "    const TYPE_NAME: &'static str = {:?};",
        resource_type.full_name()
    )?;
    writeln!(
        out,
        "    const FALLBACK_LANGUAGE: &'static str = {:?};",
        merged.fallback_language
    )?;
    writeln!(
        out,
        "    const LANGUAGES: &'static [&'static str] = &[{}];",
        literal_list(merged.values.keys())
    )?;
    writeln!(
        out,
        "    const KEYS: &'static [&'static str] = &[{}];",
        literal_list(merged.keys.iter())
    )?;
    writeln!(out, "    const VALUES: &'static [&'static [&'static str]] = &[")?;
    for (language, row) in &merged.values {
        writeln!(out, "        // {language}")?;
        writeln!(out, "        &[{}],", literal_list(row.iter()))?;
    }
    writeln!(out, "    ];")?;
    writeln!(out)?;
    writeln!(out, "    #[allow(unused_variables)]")?;
    writeln!(
        out,
        "    fn from_values(values: &'static [&'static str]) -> Self {{"
    )?;
    writeln!(out, "        {type_ident} {{")?;
    for (index, field) in fields.iter().enumerate() {
        writeln!(out, "            {field}: values[{index}],")?;
    }
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl ::core::default::Default for {type_ident} {{")?;
    writeln!(out, "    fn default() -> Self {{")?;
    writeln!(out, "        <Self as {RUNTIME}::TextTable>::fallback()")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;

    Ok(out)
}

fn literal_list<'a>(items: impl Iterator<Item = &'a String>) -> String {
    items
        .map(|item| format!("{item:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Source path relative to the base directory, `/`-separated.
fn display_path(options: &CompileOptions, path: &Path) -> String {
    let resolved = resolve(options, path);
    let relative = resolved.strip_prefix(&options.base_dir).unwrap_or(&resolved);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// A language's texts as a JSON object in canonical key order.
struct OrderedTable<'a> {
    keys: &'a [String],
    values: &'a [String],
}

impl Serialize for OrderedTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for (key, value) in self.keys.iter().zip(self.values) {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn text_table(
    resource_type: &ResourceType,
    language: &str,
    keys: &[String],
    values: &[String],
) -> Result<TextTableAsset, Error> {
    let content = serde_json::to_string_pretty(&OrderedTable { keys, values })
        .map_err(|err| Error::Internal(format!("serializing text table failed: {err}")))?;
    Ok(TextTableAsset {
        language: language.to_string(),
        file_name: format!("{}.{}.json", resource_type.full_name(), language),
        content,
    })
}
