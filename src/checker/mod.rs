mod nvd;
mod registry;
mod version;

pub use nvd::{search_url, NvdChecker};
pub use registry::{package_url, NpmRegistry};
pub use version::{select_latest, VersionOrdering};

use crate::config::Config;
use crate::error::ScanError;
use crate::model::VulnerabilityReport;
use async_trait::async_trait;

/// Picks the version of a package that gets checked for CVEs.
#[async_trait]
pub trait VersionResolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns `Ok(None)` when the registry knows the package but lists no
    /// versions.
    async fn resolve(&self, package: &str) -> Result<Option<String>, ScanError>;
}

#[async_trait]
pub trait VulnerabilityChecker: Send + Sync {
    fn name(&self) -> &'static str;
    async fn lookup(&self, package: &str, version: &str) -> Result<VulnerabilityReport, ScanError>;
}

pub fn default_resolver(config: &Config) -> NpmRegistry {
    NpmRegistry::new(&config.registry.base_url, config.version_ordering)
}

pub fn default_checker(config: &Config) -> NvdChecker {
    NvdChecker::new(&config.nvd.base_url, config.nvd.api_key.clone())
}
