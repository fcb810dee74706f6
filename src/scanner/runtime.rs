use crate::error::ScanError;
use std::process::Command;

/// Reports the version of a locally installed runtime.
pub trait RuntimeProbe: Send + Sync {
    /// Dependency name the version is checked under.
    fn runtime_name(&self) -> &str;

    /// Returns the trimmed version string.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ProbeUnavailable`] if the binary can't be run,
    /// exits unsuccessfully, or prints nothing.
    fn probe(&self) -> Result<String, ScanError>;
}

/// Runs `<binary> <version_flag>` and reads the version from stdout.
pub struct CommandProbe {
    name: String,
    binary: String,
    version_flag: String,
}

impl CommandProbe {
    pub fn new(
        name: impl Into<String>,
        binary: impl Into<String>,
        version_flag: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            binary: binary.into(),
            version_flag: version_flag.into(),
        }
    }
}

impl RuntimeProbe for CommandProbe {
    fn runtime_name(&self) -> &str {
        &self.name
    }

    fn probe(&self) -> Result<String, ScanError> {
        let output = Command::new(&self.binary)
            .arg(&self.version_flag)
            .output()
            .map_err(|e| {
                ScanError::ProbeUnavailable(format!("failed to execute {}: {}", self.binary, e))
            })?;

        if !output.status.success() {
            return Err(ScanError::ProbeUnavailable(format!(
                "{} {} exited with {}",
                self.binary, self.version_flag, output.status
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if version.is_empty() {
            return Err(ScanError::ProbeUnavailable(format!(
                "{} {} printed no version",
                self.binary, self.version_flag
            )));
        }

        Ok(version)
    }
}
