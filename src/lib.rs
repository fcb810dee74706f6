pub mod audit;
pub mod checker;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod scanner;

pub use audit::run_audit;
pub use config::Config;
pub use error::ScanError;
pub use model::{Dependency, Origin, ScanResult, VulnerabilityReport};
pub use scanner::{Manifest, RuntimeProbe};
