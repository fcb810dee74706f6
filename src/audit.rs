//! The scan pipeline: manifest, runtime probe, then one registry lookup and
//! one NVD query per dependency, strictly in sequence.

use crate::checker::{VersionResolver, VulnerabilityChecker};
use crate::error::ScanError;
use crate::model::{CheckStatus, Dependency, DependencyOutcome, ScanResult};
use crate::output::{print_checking, print_finished, print_report};
use crate::scanner::{Manifest, RuntimeProbe};
use anyhow::Result;
use std::io::Write;
use std::path::Path;
use tracing::{error, info, warn};

/// Checks every dependency in the manifest at `manifest_path`, plus the
/// runtime reported by `probe` when one is given.
///
/// Manifest errors are returned before anything else runs. Every other
/// failure is logged and only affects the dependency it happened on.
pub async fn run_audit(
    manifest_path: &Path,
    probe: Option<&dyn RuntimeProbe>,
    resolver: &dyn VersionResolver,
    checker: &dyn VulnerabilityChecker,
    out: &mut dyn Write,
) -> Result<ScanResult> {
    let manifest = Manifest::load(manifest_path).map_err(|e| {
        error!("{}", e);
        e
    })?;
    info!(
        "Loaded {} dependencies from {}",
        manifest.len(),
        manifest_path.display()
    );

    let mut result = ScanResult::new(manifest_path);
    let mut dependencies = manifest.into_dependencies();

    if let Some(probe) = probe {
        match probe.probe() {
            Ok(version) => {
                info!("Active {} version: {}", probe.runtime_name(), version);
                add_runtime(&mut dependencies, probe.runtime_name(), &version);
                result.runtime_version = Some(version);
            }
            Err(e) => warn!("Error checking {} version: {}", probe.runtime_name(), e),
        }
    }

    for dependency in &dependencies {
        console(print_checking(out, &dependency.name));
        let outcome = check_dependency(dependency, resolver, checker, out).await;
        console(print_finished(out, &dependency.name));
        result.outcomes.push(outcome);
    }

    info!(
        "Checked {} dependencies, {} NVD lookups, {} with potential CVEs",
        result.outcomes.len(),
        result.lookups_attempted(),
        result.with_findings().count()
    );

    Ok(result)
}

/// Adds the runtime entry, replacing a manifest entry of the same name.
fn add_runtime(dependencies: &mut Vec<Dependency>, name: &str, version: &str) {
    dependencies.retain(|d| d.name != name);
    dependencies.push(Dependency::runtime(name, version));
}

async fn check_dependency(
    dependency: &Dependency,
    resolver: &dyn VersionResolver,
    checker: &dyn VulnerabilityChecker,
    out: &mut dyn Write,
) -> DependencyOutcome {
    let name = &dependency.name;

    let version = match resolver.resolve(name).await {
        Ok(Some(version)) => Some(version),
        Ok(None) => None,
        Err(e) => {
            log_recoverable(&e, name, resolver.name());
            None
        }
    };

    let Some(version) = version else {
        info!("Skipping CVE check for {}: version not found.", name);
        return DependencyOutcome::new(dependency, None, CheckStatus::VersionNotFound);
    };

    let status = match checker.lookup(name, &version).await {
        Ok(report) => {
            console(print_report(out, &report));
            CheckStatus::from_report(&report)
        }
        Err(e @ ScanError::Config(_)) => {
            warn!("Not querying {} for {}: {}", checker.name(), name, e);
            CheckStatus::InvalidQuery
        }
        Err(e) => {
            log_recoverable(&e, name, checker.name());
            CheckStatus::LookupFailed
        }
    };

    DependencyOutcome::new(dependency, Some(version), status)
}

/// Console output is best effort. A closed stdout must not end the scan.
fn console(written: std::io::Result<()>) {
    if let Err(e) = written {
        warn!("Error writing scan output: {}", e);
    }
}

fn log_recoverable(err: &ScanError, package: &str, service: &str) {
    match err {
        ScanError::RegistryStatus { .. } | ScanError::RegistryDecode { .. } => {
            warn!("{}", err)
        }
        _ => warn!("Error querying {} for {}: {}", service, package, err),
    }
}
