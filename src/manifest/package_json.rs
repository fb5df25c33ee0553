use std::path::Path;

use serde_json::{Map, Value};

use crate::error::InventoryError;
use crate::models::DependencyRef;

/// Parser for npm `package.json` manifests.
///
/// Only the `dependencies` map is read unless `include_dev` is set, in which
/// case `devDependencies` are appended after it.
pub struct PackageJsonParser {
    include_dev: bool,
}

impl PackageJsonParser {
    pub fn new(include_dev: bool) -> Self {
        Self { include_dev }
    }

    pub fn parse_str(&self, content: &str) -> Result<Vec<DependencyRef>, String> {
        let json: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
        let root = json
            .as_object()
            .ok_or_else(|| "manifest root is not a JSON object".to_string())?;

        let mut deps = Vec::new();
        collect_section(root, "dependencies", &mut deps);
        if self.include_dev {
            collect_section(root, "devDependencies", &mut deps);
        }

        Ok(deps)
    }
}

impl super::ManifestParser for PackageJsonParser {
    fn parse(&self, path: &Path) -> Result<Vec<DependencyRef>, InventoryError> {
        let content = super::read_manifest(path)?;
        self.parse_str(&content)
            .map_err(|details| InventoryError::manifest_parse(path, details))
    }
}

fn collect_section(root: &Map<String, Value>, section: &str, deps: &mut Vec<DependencyRef>) {
    let Some(pkgs) = root.get(section).and_then(Value::as_object) else {
        return;
    };

    for (name, spec) in pkgs {
        match spec.as_str() {
            Some(spec) => deps.push(DependencyRef::new(name.clone(), strip_caret(spec))),
            None => tracing::warn!(%name, section, "skipping dependency with non-string version"),
        }
    }
}

/// Drop a single leading `^`; every other range operator is kept.
fn strip_caret(spec: &str) -> &str {
    spec.strip_prefix('^').unwrap_or(spec)
}
