use super::version::{select_latest, VersionOrdering};
use crate::error::ScanError;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Resolves versions from an npm-compatible registry.
pub struct NpmRegistry {
    client: reqwest::Client,
    base_url: String,
    ordering: VersionOrdering,
}

impl NpmRegistry {
    pub fn new(base_url: &str, ordering: VersionOrdering) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            ordering,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Builds the metadata URL for `package`.
///
/// The registry addresses scoped packages as `@scope%2Fname`.
pub fn package_url(base_url: &str, package: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        package.replace('/', "%2F")
    )
}

/// Picks the latest version from a registry metadata document.
fn latest_from_body(
    package: &str,
    body: &[u8],
    ordering: VersionOrdering,
) -> Result<Option<String>, ScanError> {
    let data: Value = serde_json::from_slice(body).map_err(|source| ScanError::RegistryDecode {
        package: package.to_string(),
        source,
    })?;

    let Some(versions) = data.get("versions").and_then(Value::as_object) else {
        return Ok(None);
    };
    if tracing::enabled!(tracing::Level::DEBUG) {
        match serde_json::to_string_pretty(&data) {
            Ok(pretty) => debug!("NPM Package Data:\n{}", pretty),
            Err(e) => debug!("Error formatting npm JSON: {}", e),
        }
    }
    debug!(
        "npm registry lists {} versions for {}",
        versions.len(),
        package
    );

    Ok(select_latest(versions.keys().map(String::as_str), ordering))
}

#[async_trait]
impl super::VersionResolver for NpmRegistry {
    fn name(&self) -> &'static str {
        "npm registry"
    }

    async fn resolve(&self, package: &str) -> Result<Option<String>, ScanError> {
        let url = package_url(&self.base_url, package);
        debug!("Fetching npm package details from {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::RegistryStatus {
                package: package.to_string(),
                status,
            });
        }

        let body = response.bytes().await?;
        let version = latest_from_body(package, &body, self.ordering)?;

        match &version {
            Some(v) => {
                info!("Package Name: {}", package);
                info!("Package Version: {}", v);
            }
            None => warn!("Could not determine version for {}", package),
        }

        Ok(version)
    }
}
