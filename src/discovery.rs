//! Finds text resource files below a directory.
//!
//! The compiler itself never traverses the file system; build scripts and
//! tests use this to produce its input.

use std::{io, path::Path};

use ignore::WalkBuilder;

use crate::{
    error::Error,
    source::{SourceFile, Syntax},
};

/// Reads every `.json` and `.csv` file below `source_dir`, sorted by path.
///
/// Ignore files are not honoured: every text resource in the tree counts.
pub fn discover_source_files<P: AsRef<Path>>(source_dir: P) -> Result<Vec<SourceFile>, Error> {
    let source_dir = source_dir.as_ref();
    let walker = WalkBuilder::new(source_dir)
        .standard_filters(false)
        .follow_links(true)
        .build();

    let mut paths = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| {
            let message = err.to_string();
            Error::Io {
                path: source_dir.to_path_buf(),
                source: err.into_io_error().unwrap_or_else(|| io::Error::other(message)),
            }
        })?;
        if !entry.file_type().is_some_and(|kind| kind.is_file()) {
            continue;
        }
        if Syntax::from_path(entry.path()).is_some() {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    tracing::debug!(
        dir = %source_dir.display(),
        count = paths.len(),
        "discovered text resource files"
    );
    paths.into_iter().map(SourceFile::read).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::PathBuf};

    #[test]
    fn test_discovers_sorted_json_and_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("admin")).unwrap();
        fs::write(dir.path().join("Greeting.fr.csv"), "hello,Bonjour\n").unwrap();
        fs::write(dir.path().join("Greeting.en.json"), "{}").unwrap();
        fs::write(dir.path().join("admin/Menu.en.JSON"), "{}").unwrap();
        fs::write(dir.path().join("README.md"), "# texts").unwrap();
        fs::write(dir.path().join(".gitignore"), "*.csv\n").unwrap();

        let files = discover_source_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("Greeting.en.json"),
                PathBuf::from("Greeting.fr.csv"),
                PathBuf::from("admin/Menu.en.JSON"),
            ]
        );
        assert_eq!(files[1].content, b"hello,Bonjour\n");
        assert_eq!(files[2].syntax, Syntax::Json);
    }

    #[test]
    fn test_missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_source_files(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
