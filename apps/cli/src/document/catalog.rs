//! Named-document catalogs — the variant and cover-letter directories.

use std::path::PathBuf;

use crate::errors::BuildError;

/// A directory of named `.yaml` overlay documents.
///
/// Names are file stems; `resolve` turns a name into the backing path and a
/// failed lookup carries the full listing so the caller can print what would
/// have been valid.
#[derive(Debug, Clone)]
pub struct Catalog {
    dir: PathBuf,
}

impl Catalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Catalog { dir: dir.into() }
    }

    /// Enumerates available names, sorted. A missing directory is an empty
    /// catalog, not an error.
    pub fn names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "yaml") {
                    path.file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned())
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        names
    }

    /// Resolves `name` to its backing file, or `InputNotFound` carrying the
    /// catalog listing for the diagnostic.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, BuildError> {
        let path = self.dir.join(format!("{name}.yaml"));
        if path.exists() {
            Ok(path)
        } else {
            Err(BuildError::InputNotFound {
                path,
                alternatives: self.names(),
            })
        }
    }
}
