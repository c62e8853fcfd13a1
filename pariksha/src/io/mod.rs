//! Trajectory and result files.
//!
//! - **TUM trajectories**: `timestamp tx ty tz qx qy qz qw`, space or comma delimited
//! - **Error table CSV**: `TimeStamp,APE,RPE` with empty RPE cells
//! - **JSON summary**: statistics, regions and per-segment outcomes
//!
//! ## Loading and Saving Trajectories
//!
//! ```rust,ignore
//! use pariksha::io::{load_tum, save_tum};
//! use std::path::Path;
//!
//! let reference = load_tum(Path::new("groundtruth.txt"))?;
//! save_tum(&reference, Path::new("copy.txt"))?;
//! ```
//!
//! ## Exporting an Evaluation
//!
//! ```rust,ignore
//! use pariksha::io::export_report;
//!
//! // Creates aligned_estimate.txt, errors.csv and summary.json
//! let files = export_report(&report, Path::new("results"))?;
//! ```

pub mod error_csv;
pub mod report;
pub mod tum;

pub use error_csv::{load_error_csv, read_error_csv, save_error_csv, write_error_csv};
pub use report::{
    ALIGNED_ESTIMATE_FILE, ERROR_TABLE_FILE, ExportedFiles, SUMMARY_FILE, export_report,
    save_json, save_summary,
};
pub use tum::{load_tum, read_tum, save_tum, write_tum};
