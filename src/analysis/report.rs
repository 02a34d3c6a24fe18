use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::snapshot::AnalysisSnapshot;

pub const REPORT_FILE_NAME: &str = "fintra_report.json";

pub fn default_report_path(input: &Path) -> PathBuf {
    input
        .parent()
        .map(|dir| dir.join(REPORT_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(REPORT_FILE_NAME))
}

pub fn write_report(path: &Path, snapshot: &AnalysisSnapshot) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create report file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot).context("failed to serialize report")?;
    writer
        .flush()
        .with_context(|| format!("failed to write report file {}", path.display()))?;

    tracing::info!(path = %path.display(), "report written");
    Ok(())
}
