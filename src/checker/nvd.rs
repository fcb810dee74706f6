use crate::error::ScanError;
use crate::model::VulnerabilityReport;
use async_trait::async_trait;
use reqwest::Url;
use tracing::info;

/// Keyword search against the NVD CVE API.
pub struct NvdChecker {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl NvdChecker {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            api_key,
        }
    }
}

/// Builds `<base>?keywordSearch=<package>+<version>`.
///
/// The query is form-encoded, so the separating space becomes `+` and
/// characters such as `@` and `/` in scoped names are escaped.
pub fn search_url(base_url: &str, package: &str, version: &str) -> Result<Url, ScanError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ScanError::Config(format!("invalid NVD URL {}: {}", base_url, e)))?;
    url.query_pairs_mut()
        .append_pair("keywordSearch", &format!("{} {}", package, version));
    Ok(url)
}

#[async_trait]
impl super::VulnerabilityChecker for NvdChecker {
    fn name(&self) -> &'static str {
        "NVD"
    }

    async fn lookup(&self, package: &str, version: &str) -> Result<VulnerabilityReport, ScanError> {
        let url = search_url(&self.base_url, package, version)?;

        info!("Querying NVD API for {}", package);
        info!("URL: {}", url);

        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("apiKey", key);
        }

        let response = request.send().await?;
        let body = response.bytes().await?;

        Ok(VulnerabilityReport::new(package, version, body.to_vec()))
    }
}
