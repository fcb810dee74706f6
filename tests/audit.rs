use async_trait::async_trait;
use cvescan::checker::{VersionResolver, VulnerabilityChecker};
use cvescan::model::CheckStatus;
use cvescan::{run_audit, Origin, RuntimeProbe, ScanError, VulnerabilityReport};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

enum Registry {
    Version(&'static str),
    NoVersions,
    NotFound,
}

struct FakeResolver {
    packages: HashMap<&'static str, Registry>,
    calls: Mutex<Vec<String>>,
}

impl FakeResolver {
    fn new(packages: Vec<(&'static str, Registry)>) -> Self {
        Self {
            packages: packages.into_iter().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VersionResolver for FakeResolver {
    fn name(&self) -> &'static str {
        "fake registry"
    }

    async fn resolve(&self, package: &str) -> Result<Option<String>, ScanError> {
        self.calls.lock().unwrap().push(package.to_string());
        match self.packages.get(package) {
            Some(Registry::Version(v)) => Ok(Some(v.to_string())),
            Some(Registry::NoVersions) => Ok(None),
            Some(Registry::NotFound) | None => Err(ScanError::RegistryStatus {
                package: package.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            }),
        }
    }
}

struct FakeChecker {
    bodies: HashMap<&'static str, &'static str>,
    fail: Vec<&'static str>,
    unbuildable: Vec<&'static str>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeChecker {
    fn new(bodies: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            bodies: bodies.into_iter().collect(),
            fail: Vec::new(),
            unbuildable: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing_for(mut self, package: &'static str) -> Self {
        self.fail.push(package);
        self
    }

    fn unbuildable_for(mut self, package: &'static str) -> Self {
        self.unbuildable.push(package);
        self
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VulnerabilityChecker for FakeChecker {
    fn name(&self) -> &'static str {
        "fake nvd"
    }

    async fn lookup(&self, package: &str, version: &str) -> Result<VulnerabilityReport, ScanError> {
        if self.unbuildable.iter().any(|f| *f == package) {
            return Err(ScanError::Config(format!("invalid NVD URL for {}", package)));
        }
        self.calls
            .lock()
            .unwrap()
            .push((package.to_string(), version.to_string()));
        if self.fail.iter().any(|f| *f == package) {
            return Err(ScanError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            )));
        }
        let body = self.bodies.get(package).copied().unwrap_or("");
        Ok(VulnerabilityReport::new(package, version, body.as_bytes().to_vec()))
    }
}

/// A console that rejects every write, like stdout piped into a closed reader.
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
    }
}

struct FakeProbe(Option<&'static str>);

impl RuntimeProbe for FakeProbe {
    fn runtime_name(&self) -> &str {
        "node"
    }

    fn probe(&self) -> Result<String, ScanError> {
        self.0
            .map(str::to_string)
            .ok_or_else(|| ScanError::ProbeUnavailable("node not installed".to_string()))
    }
}

fn manifest(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const TWO_DEPS: &str = r#"{
    "name": "demo",
    "dependencies": { "express": "^4.18.0", "lodash": "^4.17.0" }
}"#;

fn resolver_for_two_deps() -> FakeResolver {
    FakeResolver::new(vec![
        ("express", Registry::Version("4.9.9")),
        ("lodash", Registry::Version("4.17.21")),
        ("node", Registry::Version("9.9.9")),
    ])
}

#[tokio::test]
async fn test_successful_probe_adds_one_lookup() {
    let file = manifest(TWO_DEPS);
    let resolver = resolver_for_two_deps();
    let checker = FakeChecker::new(vec![]);
    let probe = FakeProbe(Some("v20.11.1"));
    let mut out = Vec::new();

    let result = run_audit(file.path(), Some(&probe), &resolver, &checker, &mut out)
        .await
        .unwrap();

    assert_eq!(checker.calls().len(), 3);
    assert_eq!(result.lookups_attempted(), 3);
    assert_eq!(result.runtime_version.as_deref(), Some("v20.11.1"));

    let runtime = result.outcomes.iter().find(|o| o.name == "node").unwrap();
    assert_eq!(runtime.origin, Origin::Runtime);
    assert_eq!(runtime.resolved_version.as_deref(), Some("9.9.9"));
}

#[tokio::test]
async fn test_failed_probe_adds_nothing() {
    let file = manifest(TWO_DEPS);
    let resolver = resolver_for_two_deps();
    let checker = FakeChecker::new(vec![]);
    let probe = FakeProbe(None);
    let mut out = Vec::new();

    let result = run_audit(file.path(), Some(&probe), &resolver, &checker, &mut out)
        .await
        .unwrap();

    assert_eq!(checker.calls().len(), 2);
    assert!(result.runtime_version.is_none());
    assert!(result.outcomes.iter().all(|o| o.origin == Origin::Manifest));
    assert!(!resolver.calls().contains(&"node".to_string()));
}

#[tokio::test]
async fn test_disabled_probe() {
    let file = manifest(TWO_DEPS);
    let resolver = resolver_for_two_deps();
    let checker = FakeChecker::new(vec![]);
    let mut out = Vec::new();

    let result = run_audit(file.path(), None, &resolver, &checker, &mut out)
        .await
        .unwrap();

    assert_eq!(checker.calls().len(), 2);
    assert_eq!(result.outcomes.len(), 2);
}

#[tokio::test]
async fn test_invalid_manifest_stops_before_network() {
    for content in [r#"{ "name": "demo" }"#, "{ not json"] {
        let file = manifest(content);
        let resolver = resolver_for_two_deps();
        let checker = FakeChecker::new(vec![]);
        let probe = FakeProbe(Some("v20.11.1"));
        let mut out = Vec::new();

        let err = run_audit(file.path(), Some(&probe), &resolver, &checker, &mut out)
            .await
            .unwrap_err();

        let scan_err = err.downcast_ref::<ScanError>().unwrap();
        assert!(matches!(scan_err, ScanError::ManifestParse { .. }));
        assert!(scan_err.is_fatal());
        assert!(resolver.calls().is_empty());
        assert!(checker.calls().is_empty());
        assert!(out.is_empty());
    }
}

#[tokio::test]
async fn test_missing_manifest_is_fatal() {
    let dir = tempfile::TempDir::new().unwrap();
    let resolver = resolver_for_two_deps();
    let checker = FakeChecker::new(vec![]);
    let mut out = Vec::new();

    let err = run_audit(
        &dir.path().join("package.json"),
        None,
        &resolver,
        &checker,
        &mut out,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ScanError>(),
        Some(ScanError::ManifestNotFound { .. })
    ));
    assert!(resolver.calls().is_empty());
}

#[tokio::test]
async fn test_unresolved_version_skips_lookup() {
    let file = manifest(r#"{ "dependencies": { "ghost": "1", "empty": "1", "lodash": "4" } }"#);
    let resolver = FakeResolver::new(vec![
        ("ghost", Registry::NotFound),
        ("empty", Registry::NoVersions),
        ("lodash", Registry::Version("4.17.21")),
    ]);
    let checker = FakeChecker::new(vec![]);
    let mut out = Vec::new();

    let result = run_audit(file.path(), None, &resolver, &checker, &mut out)
        .await
        .unwrap();

    assert_eq!(resolver.calls().len(), 3);
    assert_eq!(
        checker.calls(),
        vec![("lodash".to_string(), "4.17.21".to_string())]
    );

    let status = |name: &str| {
        result
            .outcomes
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.status.clone())
            .unwrap()
    };
    assert_eq!(status("ghost"), CheckStatus::VersionNotFound);
    assert_eq!(status("empty"), CheckStatus::VersionNotFound);
    assert_eq!(status("lodash"), CheckStatus::NoFindings);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Checking for CVEs for ghost...\nFinished checking for CVEs for ghost\n"));
}

#[tokio::test]
async fn test_report_classification_and_output() {
    let file = manifest(TWO_DEPS);
    let resolver = resolver_for_two_deps();
    let checker = FakeChecker::new(vec![("express", "{}")]);
    let mut out = Vec::new();

    let result = run_audit(file.path(), None, &resolver, &checker, &mut out)
        .await
        .unwrap();

    assert_eq!(result.with_findings().count(), 1);
    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "Checking for CVEs for express...\n\
         Found potential CVEs for express:\n\
         {}\n\
         Finished checking for CVEs for express\n\
         \n\
         Checking for CVEs for lodash...\n\
         No CVEs found for lodash\n\
         Finished checking for CVEs for lodash\n\
         \n"
    );
}

#[tokio::test]
async fn test_lookup_failure_is_not_fatal() {
    let file = manifest(TWO_DEPS);
    let resolver = resolver_for_two_deps();
    let checker = FakeChecker::new(vec![("lodash", "{\"totalResults\":1}")]).failing_for("express");
    let mut out = Vec::new();

    let result = run_audit(file.path(), None, &resolver, &checker, &mut out)
        .await
        .unwrap();

    assert_eq!(checker.calls().len(), 2);
    assert_eq!(result.outcomes[0].status, CheckStatus::LookupFailed);
    assert_eq!(
        result.outcomes[1].status,
        CheckStatus::PotentialFindings { bytes: 18 }
    );
}

#[tokio::test]
async fn test_probe_replaces_declared_runtime() {
    let file = manifest(r#"{ "dependencies": { "node": "^18.0.0", "lodash": "4" } }"#);
    let resolver = resolver_for_two_deps();
    let checker = FakeChecker::new(vec![]);
    let probe = FakeProbe(Some("v20.11.1"));
    let mut out = Vec::new();

    let result = run_audit(file.path(), Some(&probe), &resolver, &checker, &mut out)
        .await
        .unwrap();

    assert_eq!(result.outcomes.len(), 2);
    assert_eq!(checker.calls().len(), 2);
    let node = result.outcomes.iter().find(|o| o.name == "node").unwrap();
    assert_eq!(node.origin, Origin::Runtime);
}

#[tokio::test]
async fn test_console_write_errors_do_not_stop_scan() {
    let file = manifest(
        r#"{ "dependencies": { "express": "4", "lodash": "4", "react": "18" } }"#,
    );
    let resolver = FakeResolver::new(vec![
        ("express", Registry::Version("4.9.9")),
        ("lodash", Registry::Version("4.17.21")),
        ("react", Registry::Version("9.0.0")),
    ]);
    let checker = FakeChecker::new(vec![("react", "{\"totalResults\":2}")]);
    let mut out = ClosedPipe;

    let result = run_audit(file.path(), None, &resolver, &checker, &mut out)
        .await
        .unwrap();

    assert_eq!(checker.calls().len(), 3);
    assert_eq!(result.outcomes.len(), 3);
    assert_eq!(result.lookups_attempted(), 3);
    assert_eq!(result.with_findings().count(), 1);
}

#[tokio::test]
async fn test_unbuildable_query_is_not_counted_as_lookup() {
    let file = manifest(TWO_DEPS);
    let resolver = resolver_for_two_deps();
    let checker = FakeChecker::new(vec![]).unbuildable_for("express");
    let mut out = Vec::new();

    let result = run_audit(file.path(), None, &resolver, &checker, &mut out)
        .await
        .unwrap();

    assert_eq!(result.outcomes[0].status, CheckStatus::InvalidQuery);
    assert_eq!(result.outcomes[1].status, CheckStatus::NoFindings);
    assert_eq!(result.lookups_attempted(), 1);
}
