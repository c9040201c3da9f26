//! Sinks that receive generated units.
//!
//! The compiler never writes files itself; it hands every complete unit to a
//! [`UnitSink`]. [`UnitCollector`] keeps units in memory and
//! [`OutputDirSink`] persists them for `include!`.

use std::{
    collections::BTreeMap,
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use crate::{
    config::CompileOptions,
    error::Error,
    ident::render,
    types::{GeneratedUnit, ResourceType},
};

/// File name of the module index written by [`OutputDirSink::write_index`].
pub const INDEX_FILE_NAME: &str = "i18ntext.g.rs";

/// Receives generated units. Called concurrently from worker threads.
pub trait UnitSink: Send + Sync {
    fn save(
        &self,
        options: &CompileOptions,
        resource_type: &ResourceType,
        unit: GeneratedUnit,
    ) -> Result<(), Error>;
}

impl<F> UnitSink for F
where
    F: Fn(&CompileOptions, &ResourceType, GeneratedUnit) -> Result<(), Error> + Send + Sync,
{
    fn save(
        &self,
        options: &CompileOptions,
        resource_type: &ResourceType,
        unit: GeneratedUnit,
    ) -> Result<(), Error> {
        self(options, resource_type, unit)
    }
}

/// Collects units in memory.
#[derive(Debug, Default)]
pub struct UnitCollector {
    units: Mutex<Vec<GeneratedUnit>>,
}

impl UnitCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The collected units, sorted by hint name.
    pub fn into_units(self) -> Vec<GeneratedUnit> {
        let mut units = self
            .units
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        units.sort_by(|a, b| a.hint_name.cmp(&b.hint_name));
        units
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<GeneratedUnit>> {
        self.units.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UnitSink for UnitCollector {
    fn save(&self, _: &CompileOptions, _: &ResourceType, unit: GeneratedUnit) -> Result<(), Error> {
        self.lock().push(unit);
        Ok(())
    }
}

/// Writes units and their text tables into a directory.
///
/// Files whose content is unchanged are left alone so their modification
/// times stay stable across builds.
#[derive(Debug)]
pub struct OutputDirSink {
    dir: PathBuf,
    saved: Mutex<BTreeMap<String, Vec<String>>>,
}

impl OutputDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        OutputDirSink {
            dir: dir.into(),
            saved: Mutex::new(BTreeMap::new()),
        }
    }

    /// A sink writing into the options' output directory.
    pub fn for_options(options: &CompileOptions) -> Self {
        Self::new(options.output_dir())
    }

    /// The directory units, text tables and the index are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `i18ntext.g.rs`, a module tree that includes every unit saved
    /// so far at its namespace. Returns the index path.
    pub fn write_index(&self) -> Result<PathBuf, Error> {
        let saved = self.saved.lock().unwrap_or_else(PoisonError::into_inner);
        let mut root = ModuleNode::default();
        for (hint_name, namespace) in saved.iter() {
            let node = namespace
                .iter()
                .fold(&mut root, |node, segment| {
                    node.children.entry(segment.clone()).or_default()
                });
            node.includes.push(hint_name.clone());
        }

        let mut content =
            String::from("// <auto-generated>\n//     Generated by i18ntext.\n// </auto-generated>\n\n");
        root.render(&mut content, 0)
            .map_err(|err| Error::Internal(format!("formatting module index failed: {err}")))?;

        let path = self.dir.join(INDEX_FILE_NAME);
        write_if_changed(&path, &content)?;
        Ok(path)
    }
}

impl UnitSink for OutputDirSink {
    fn save(&self, _: &CompileOptions, _: &ResourceType, unit: GeneratedUnit) -> Result<(), Error> {
        fs::create_dir_all(&self.dir).map_err(|source| Error::Write {
            path: self.dir.clone(),
            source,
        })?;
        write_if_changed(&self.dir.join(&unit.hint_name), &unit.source)?;
        for table in &unit.text_tables {
            write_if_changed(&self.dir.join(&table.file_name), &table.content)?;
        }
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(unit.hint_name, unit.namespace);
        Ok(())
    }
}

/// Writes `content` unless the file already holds exactly that. Returns
/// whether the file was written.
fn write_if_changed(path: &Path, content: &str) -> Result<bool, Error> {
    if fs::read(path).is_ok_and(|existing| existing == content.as_bytes()) {
        tracing::debug!(path = %path.display(), "unchanged, skipped");
        return Ok(false);
    }
    fs::write(path, content).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "written");
    Ok(true)
}

#[derive(Debug, Default)]
struct ModuleNode {
    children: BTreeMap<String, ModuleNode>,
    includes: Vec<String>,
}

impl ModuleNode {
    fn render(&self, out: &mut String, depth: usize) -> std::fmt::Result {
        let indent = "    ".repeat(depth);
        for file in &self.includes {
            writeln!(out, "{indent}include!({file:?});")?;
        }
        for (name, child) in &self.children {
            writeln!(out, "{indent}#[allow(non_snake_case)]")?;
            writeln!(out, "{indent}pub mod {} {{", render(name))?;
            child.render(out, depth + 1)?;
            writeln!(out, "{indent}}}")?;
        }
        Ok(())
    }
}
