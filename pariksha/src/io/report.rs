//! Evaluation report export.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::error_csv::save_error_csv;
use super::tum::save_tum;
use crate::error::Result;
use crate::pipeline::{EvaluationReport, EvaluationSummary};

/// File name of the aligned estimate inside an output directory.
pub const ALIGNED_ESTIMATE_FILE: &str = "aligned_estimate.txt";
/// File name of the error table inside an output directory.
pub const ERROR_TABLE_FILE: &str = "errors.csv";
/// File name of the JSON summary inside an output directory.
pub const SUMMARY_FILE: &str = "summary.json";

/// Paths written by [`export_report`].
#[derive(Clone, Debug)]
pub struct ExportedFiles {
    /// Stitched estimate in TUM format
    pub aligned_estimate: PathBuf,
    /// Per-timestamp error table
    pub error_table: PathBuf,
    /// JSON summary
    pub summary: PathBuf,
}

/// Save a summary as pretty-printed JSON.
pub fn save_summary(summary: &EvaluationSummary, path: &Path) -> Result<()> {
    save_json(summary, path)
}

/// Save any serializable value as pretty-printed JSON.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write the aligned estimate, the error table and the summary into `dir`.
///
/// The directory is created if needed. The error table is written with short
/// RPE gaps interpolated.
pub fn export_report(report: &EvaluationReport, dir: &Path) -> Result<ExportedFiles> {
    fs::create_dir_all(dir)?;

    let files = ExportedFiles {
        aligned_estimate: dir.join(ALIGNED_ESTIMATE_FILE),
        error_table: dir.join(ERROR_TABLE_FILE),
        summary: dir.join(SUMMARY_FILE),
    };

    save_tum(&report.estimate, &files.aligned_estimate)?;
    save_error_csv(&report.interpolated_table(), &files.error_table)?;
    save_summary(&report.summary(), &files.summary)?;

    log::info!("Results written to {}", dir.display());
    Ok(files)
}
