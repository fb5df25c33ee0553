use serde::Serialize;

/// Identifier used when no license label could be located.
pub const UNKNOWN_LICENSE: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ecosystem {
    /// `package.json` projects, resolved against npmjs.com.
    Npm,
    /// `go.mod` projects, resolved against pkg.go.dev.
    GoModule,
}

impl Ecosystem {
    /// File name of the manifest this ecosystem is detected by.
    pub fn manifest_file(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "package.json",
            Ecosystem::GoModule => "go.mod",
        }
    }

    /// Canonical reference page for a dependency: the npm registry page or the
    /// versioned pkg.go.dev documentation page.
    pub fn reference_url(&self, dep: &DependencyRef) -> String {
        match self {
            Ecosystem::Npm => format!("https://www.npmjs.com/package/{}", dep.name),
            Ecosystem::GoModule => format!("https://pkg.go.dev/{}@{}", dep.name, dep.version),
        }
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ecosystem::Npm => write!(f, "npm"),
            Ecosystem::GoModule => write!(f, "Go modules"),
        }
    }
}

/// One dependency as declared in a manifest. `version` is the caret-stripped
/// range for npm and the literal (often pseudo-) version for Go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRef {
    pub name: String,
    pub version: String,
}

impl DependencyRef {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseResult {
    /// Short license label, or [`UNKNOWN_LICENSE`].
    pub identifier: String,
    /// Verbatim license document, empty when unavailable.
    pub full_text: String,
}

impl LicenseResult {
    pub fn new(identifier: impl Into<String>, full_text: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            full_text: full_text.into(),
        }
    }

    /// Placeholder used whenever every lookup for a dependency failed.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_LICENSE, "")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// 1-based position in manifest declaration order.
    pub sequence_number: usize,
    pub name: String,
    pub url: String,
    pub version: String,
    pub identifier: String,
    pub full_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_urls() {
        let dep = DependencyRef::new("left-pad", "1.3.0");
        assert_eq!(
            Ecosystem::Npm.reference_url(&dep),
            "https://www.npmjs.com/package/left-pad"
        );

        let dep = DependencyRef::new("golang.org/x/text", "v0.14.0");
        assert_eq!(
            Ecosystem::GoModule.reference_url(&dep),
            "https://pkg.go.dev/golang.org/x/text@v0.14.0"
        );
    }

    #[test]
    fn test_unknown_placeholder() {
        let result = LicenseResult::unknown();
        assert_eq!(result.identifier, "unknown");
        assert!(result.full_text.is_empty());
    }
}
