use std::path::Path;

use crate::detector::Manifest;
use crate::error::InventoryError;
use crate::models::{DependencyRef, Ecosystem};

pub mod go_mod;
pub mod package_json;

pub trait ManifestParser {
    fn parse(&self, path: &Path) -> Result<Vec<DependencyRef>, InventoryError>;
}

/// Parse the detected manifest with the parser for its ecosystem.
pub fn parse_manifest(
    manifest: &Manifest,
    include_dev: bool,
) -> Result<Vec<DependencyRef>, InventoryError> {
    match manifest.ecosystem {
        Ecosystem::Npm => package_json::PackageJsonParser::new(include_dev).parse(&manifest.path),
        Ecosystem::GoModule => go_mod::GoModParser::new().parse(&manifest.path),
    }
}

fn read_manifest(path: &Path) -> Result<String, InventoryError> {
    std::fs::read_to_string(path).map_err(|e| InventoryError::manifest_parse(path, e))
}
