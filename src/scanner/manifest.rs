use crate::error::ScanError;
use crate::model::Dependency;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The `dependencies` table of a `package.json`.
///
/// Every other top-level key is ignored. Entries iterate in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    pub dependencies: BTreeMap<String, String>,
}

impl Manifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|source| ScanError::ManifestNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_slice(&content).map_err(|source| ScanError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    pub fn into_dependencies(self) -> Vec<Dependency> {
        self.dependencies
            .into_iter()
            .map(|(name, range)| Dependency::declared(name, range))
            .collect()
    }
}
