use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors for a run. Per-dependency lookup failures never surface here;
/// the resolver degrades them to placeholders.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("No package.json or go.mod found in {path}")]
    NoManifestFound { path: PathBuf },

    #[error("Failed to parse manifest {path}: {details}")]
    ManifestParse { path: PathBuf, details: String },

    #[error("Failed to load config {path}: {details}")]
    Config { path: PathBuf, details: String },

    #[error("Failed to write report {path}: {details}")]
    ReportWrite { path: PathBuf, details: String },
}

impl InventoryError {
    pub fn manifest_parse(path: impl Into<PathBuf>, details: impl ToString) -> Self {
        InventoryError::ManifestParse {
            path: path.into(),
            details: details.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = InventoryError::NoManifestFound {
            path: PathBuf::from("/work/app"),
        };
        assert_eq!(err.to_string(), "No package.json or go.mod found in /work/app");

        let err = InventoryError::manifest_parse("/work/app/package.json", "expected value");
        assert!(err.to_string().contains("/work/app/package.json"));
        assert!(err.to_string().contains("expected value"));
    }
}
