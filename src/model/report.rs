use super::{Dependency, Origin};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw NVD response for one package/version pair.
///
/// The body is not parsed. Any non-empty body counts as a potential finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VulnerabilityReport {
    pub package: String,
    pub version: String,
    pub body: Vec<u8>,
}

impl VulnerabilityReport {
    pub fn new(package: impl Into<String>, version: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            package: package.into(),
            version: version.into(),
            body,
        }
    }

    pub fn has_findings(&self) -> bool {
        !self.body.is_empty()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    /// The registry gave no usable version, so NVD was not queried.
    VersionNotFound,
    /// The NVD request or body read failed.
    LookupFailed,
    /// No request could be built for the package, so none was sent.
    InvalidQuery,
    NoFindings,
    PotentialFindings { bytes: usize },
}

impl CheckStatus {
    pub fn from_report(report: &VulnerabilityReport) -> Self {
        if report.has_findings() {
            CheckStatus::PotentialFindings {
                bytes: report.body.len(),
            }
        } else {
            CheckStatus::NoFindings
        }
    }

    /// True when a request was sent to the vulnerability database.
    pub fn reached_database(&self) -> bool {
        !matches!(
            self,
            CheckStatus::VersionNotFound | CheckStatus::InvalidQuery
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyOutcome {
    pub name: String,
    pub origin: Origin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_version: Option<String>,
    #[serde(flatten)]
    pub status: CheckStatus,
}

impl DependencyOutcome {
    pub fn new(dependency: &Dependency, resolved_version: Option<String>, status: CheckStatus) -> Self {
        Self {
            name: dependency.name.clone(),
            origin: dependency.origin,
            resolved_version,
            status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub scan_time: DateTime<Utc>,
    pub manifest: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,
    pub outcomes: Vec<DependencyOutcome>,
}

impl ScanResult {
    pub fn new(manifest: impl Into<PathBuf>) -> Self {
        Self {
            scan_time: Utc::now(),
            manifest: manifest.into(),
            runtime_version: None,
            outcomes: Vec::new(),
        }
    }

    pub fn lookups_attempted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status.reached_database())
            .count()
    }

    pub fn with_findings(&self) -> impl Iterator<Item = &DependencyOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, CheckStatus::PotentialFindings { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_has_no_findings() {
        let report = VulnerabilityReport::new("lodash", "4.17.21", Vec::new());
        assert!(!report.has_findings());
        assert_eq!(CheckStatus::from_report(&report), CheckStatus::NoFindings);
    }

    #[test]
    fn test_empty_object_body_counts_as_finding() {
        let report = VulnerabilityReport::new("lodash", "4.17.21", b"{}".to_vec());
        assert!(report.has_findings());
        assert_eq!(
            CheckStatus::from_report(&report),
            CheckStatus::PotentialFindings { bytes: 2 }
        );
    }

    #[test]
    fn test_lookups_attempted_skips_unresolved() {
        let mut result = ScanResult::new("package.json");
        let a = Dependency::declared("a", "*");
        let b = Dependency::declared("b", "*");
        let c = Dependency::declared("c", "*");
        result
            .outcomes
            .push(DependencyOutcome::new(&a, None, CheckStatus::VersionNotFound));
        result.outcomes.push(DependencyOutcome::new(
            &b,
            Some("1.0.0".to_string()),
            CheckStatus::LookupFailed,
        ));
        result.outcomes.push(DependencyOutcome::new(
            &c,
            Some("2.0.0".to_string()),
            CheckStatus::PotentialFindings { bytes: 10 },
        ));

        assert_eq!(result.lookups_attempted(), 2);
        assert_eq!(result.with_findings().count(), 1);
    }

    #[test]
    fn test_invalid_query_never_reached_database() {
        assert!(!CheckStatus::InvalidQuery.reached_database());
        assert!(!CheckStatus::VersionNotFound.reached_database());
        assert!(CheckStatus::LookupFailed.reached_database());
        assert!(CheckStatus::NoFindings.reached_database());
    }

    #[test]
    fn test_outcome_serialization() {
        let dep = Dependency::declared("express", "^4.0.0");
        let outcome = DependencyOutcome::new(
            &dep,
            Some("4.9.9".to_string()),
            CheckStatus::PotentialFindings { bytes: 42 },
        );
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["name"], "express");
        assert_eq!(json["origin"], "manifest");
        assert_eq!(json["resolved_version"], "4.9.9");
        assert_eq!(json["status"], "potential_findings");
        assert_eq!(json["bytes"], 42);
    }
}
