use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::InventoryError;
use crate::report::{Locale, ReportFormat};

/// Root configuration structure, deserialized from `.oss-list/config.toml`.
/// Every field is optional; missing values fall back to [`Default`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub resolver: ResolverConfig,
    pub manifest: ManifestConfig,
    pub report: ReportConfig,
}

/// How external license lookups are performed.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Dependencies resolved at the same time.
    pub concurrency: usize,
    /// Minimum spacing between two requests to the same host.
    pub delay_ms: u64,
    /// Per-request deadline; a request that exceeds it counts as a failed lookup.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            delay_ms: 500,
            timeout_secs: 20,
            user_agent: format!("oss-list/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ResolverConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Never zero: a zero deadline would fail every request.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Also list `devDependencies` from `package.json`.
    pub include_dev_dependencies: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub format: ReportFormat,
    pub locale: Locale,
    /// File name inside the project directory; defaults per format. The
    /// extension always follows `format`.
    pub file_name: Option<String>,
}

impl ReportConfig {
    pub fn file_name(&self) -> PathBuf {
        let Some(name) = self.file_name.as_deref() else {
            return PathBuf::from(self.format.default_file_name());
        };

        let path = Path::new(name);
        let extension = self.format.extension();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            tracing::warn!(file_name = name, format = extension, "report file name does not match format; using .{extension}");
        }
        path.with_extension(extension)
    }
}

impl Config {
    /// Command-line flags take precedence over file values.
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(concurrency) = cli.concurrency {
            self.resolver.concurrency = concurrency;
        }
        if let Some(delay_ms) = cli.delay_ms {
            self.resolver.delay_ms = delay_ms;
        }
        if let Some(timeout_secs) = cli.timeout_secs {
            self.resolver.timeout_secs = timeout_secs;
        }
        if cli.include_dev {
            self.manifest.include_dev_dependencies = true;
        }
        if let Some(format) = cli.format {
            self.report.format = format;
        }
        if let Some(locale) = cli.locale {
            self.report.locale = locale;
        }
        self
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<project_path>/.oss-list/config.toml`
/// 3. `~/.config/oss-list/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config, InventoryError> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".oss-list").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("oss-list").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config, InventoryError> {
    let config_error = |details: String| InventoryError::Config {
        path: path.to_path_buf(),
        details,
    };

    let content = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
    let config = toml::from_str(&content).map_err(|e| config_error(e.to_string()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
