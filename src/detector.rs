use std::path::{Path, PathBuf};

use crate::error::InventoryError;
use crate::models::Ecosystem;

/// A manifest located in the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub ecosystem: Ecosystem,
    pub path: PathBuf,
}

/// Locate the project's manifest. `package.json` wins when both are present.
pub fn detect_manifest(path: &Path) -> Result<Manifest, InventoryError> {
    for ecosystem in [Ecosystem::Npm, Ecosystem::GoModule] {
        let candidate = path.join(ecosystem.manifest_file());
        if candidate.is_file() {
            return Ok(Manifest {
                ecosystem,
                path: candidate,
            });
        }
    }

    Err(InventoryError::NoManifestFound {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_package_json_takes_precedence() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();
        std::fs::write(dir.path().join("go.mod"), "module x\n").unwrap();

        let manifest = detect_manifest(dir.path()).unwrap();
        assert_eq!(manifest.ecosystem, Ecosystem::Npm);
        assert_eq!(manifest.path, dir.path().join("package.json"));
    }

    #[test]
    fn test_go_mod_only() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("go.mod"), "module x\n").unwrap();

        let manifest = detect_manifest(dir.path()).unwrap();
        assert_eq!(manifest.ecosystem, Ecosystem::GoModule);
    }

    #[test]
    fn test_no_manifest() {
        let dir = TempDir::new().unwrap();
        let err = detect_manifest(dir.path()).unwrap_err();
        assert!(matches!(err, InventoryError::NoManifestFound { .. }));
    }
}
