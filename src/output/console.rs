use crate::model::VulnerabilityReport;
use std::io::{self, Write};

pub fn print_checking(out: &mut dyn Write, package: &str) -> io::Result<()> {
    writeln!(out, "Checking for CVEs for {}...", package)
}

pub fn print_finished(out: &mut dyn Write, package: &str) -> io::Result<()> {
    writeln!(out, "Finished checking for CVEs for {}", package)?;
    writeln!(out)
}

/// Prints the raw NVD body when there is one.
pub fn print_report(out: &mut dyn Write, report: &VulnerabilityReport) -> io::Result<()> {
    if report.has_findings() {
        writeln!(out, "Found potential CVEs for {}:", report.package)?;
        out.write_all(&report.body)?;
        writeln!(out)
    } else {
        writeln!(out, "No CVEs found for {}", report.package)
    }
}
