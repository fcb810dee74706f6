//! Core data types for dependencies, vulnerability reports, and scan results.
//!
//! - [`Dependency`] - A package declared in the manifest, or the probed runtime
//! - [`Origin`] - Where a dependency entry came from
//! - [`VulnerabilityReport`] - The raw NVD response for one package/version pair
//! - [`ScanResult`] - Everything a single run checked
//!
//! # Example
//!
//! ```
//! use cvescan::model::{CheckStatus, Dependency, DependencyOutcome, ScanResult};
//!
//! let dep = Dependency::declared("lodash", "^4.17.0");
//! let mut result = ScanResult::new("package.json");
//! result.outcomes.push(DependencyOutcome::new(&dep, None, CheckStatus::VersionNotFound));
//!
//! assert_eq!(result.lookups_attempted(), 0);
//! ```

mod dependency;
mod report;

pub use dependency::*;
pub use report::*;
