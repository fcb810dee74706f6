//! Discovery of the dependencies a run should check.
//!
//! - [`Manifest`] reads the declared dependencies from a `package.json`
//! - [`RuntimeProbe`] asks a locally installed runtime for its version
//!
//! # Example
//!
//! ```no_run
//! use cvescan::scanner::{CommandProbe, Manifest, RuntimeProbe};
//!
//! let manifest = Manifest::load("package.json")?;
//! let probe = CommandProbe::new("node", "node", "-v");
//!
//! let mut dependencies = manifest.into_dependencies();
//! if let Ok(version) = probe.probe() {
//!     println!("node {}", version);
//!     dependencies.push(cvescan::Dependency::runtime(probe.runtime_name(), version));
//! }
//! # Ok::<(), cvescan::ScanError>(())
//! ```

mod manifest;
mod runtime;

pub use manifest::Manifest;
pub use runtime::{CommandProbe, RuntimeProbe};
