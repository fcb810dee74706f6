//! Configuration file handling.
//!
//! This module provides loading and saving of cvescan configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/cvescan/config.toml`
//! - macOS: `~/Library/Application Support/cvescan/config.toml`
//! - Windows: `%APPDATA%\cvescan\config.toml`
//!
//! A different file can be passed with `--config`.
//!
//! # Example Configuration
//!
//! ```toml
//! log_level = "info"
//! version_ordering = "lexicographic"
//!
//! [registry]
//! base_url = "https://registry.npmjs.org"
//!
//! [nvd]
//! base_url = "https://services.nvd.nist.gov/rest/json/cves/2.0"
//! api_key = "00000000-0000-0000-0000-000000000000"
//!
//! [runtime]
//! enabled = true
//! name = "node"
//! binary = "node"
//! version_flag = "-v"
//!
//! [output]
//! log_file = "cve_scan.log"
//! results_file = "cve_scan_results.json"
//! write_results = false
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::checker::VersionOrdering;

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";
pub const DEFAULT_NVD_URL: &str = "https://services.nvd.nist.gov/rest/json/cves/2.0";

/// Application configuration.
///
/// # Example
///
/// ```no_run
/// use cvescan::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Registry: {}", config.registry.base_url);
/// println!("Probe runtime: {}", config.runtime.enabled);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default log filter when `RUST_LOG` is not set.
    ///
    /// Default: "info"
    pub log_level: String,

    /// How the registry's version list is ordered when picking the latest.
    ///
    /// Default: lexicographic string ordering
    pub version_ordering: VersionOrdering,

    pub registry: RegistryConfig,
    pub nvd: NvdConfig,
    pub runtime: RuntimeConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub base_url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NvdConfig {
    pub base_url: String,
    /// Sent as the `apiKey` header when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for NvdConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NVD_URL.to_string(),
            api_key: None,
        }
    }
}

/// The local runtime whose version is checked alongside the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub enabled: bool,
    /// Dependency name the probed version is recorded under.
    pub name: String,
    pub binary: String,
    pub version_flag: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "node".to_string(),
            binary: if cfg!(target_os = "windows") {
                "node.exe".to_string()
            } else {
                "node".to_string()
            },
            version_flag: "-v".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub log_file: PathBuf,
    pub results_file: PathBuf,
    /// Append one JSON line per run to the results file.
    pub write_results: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("cve_scan.log"),
            results_file: PathBuf::from("cve_scan_results.json"),
            write_results: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            version_ordering: VersionOrdering::default(),
            registry: RegistryConfig::default(),
            nvd: NvdConfig::default(),
            runtime: RuntimeConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`, falling back to defaults when the
    /// file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Saves the configuration to `path`.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the path to the default configuration file.
    ///
    /// # Example
    ///
    /// ```
    /// use cvescan::Config;
    ///
    /// let path = Config::config_path();
    /// assert!(path.ends_with("cvescan/config.toml"));
    /// ```
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cvescan")
            .join("config.toml")
    }

    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
