use crate::model::ScanResult;
use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-mode handle on the results file, held for the whole run and
/// closed on drop.
pub struct ResultSink {
    path: PathBuf,
    file: File,
}

impl ResultSink {
    /// Opens `path` for reading and appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)
            .with_context(|| format!("error opening file: {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `result` as a single JSON line.
    pub fn record(&mut self, result: &ScanResult) -> Result<()> {
        let line = serde_json::to_string(result)?;
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }
}
