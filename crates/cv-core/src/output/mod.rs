//! Output Generation
//!
//! Per-step metric collection and run report writing.

pub mod report;
pub mod stats;

pub use report::{write_report, EVENTS_FILE_NAME, REPORT_FILE_NAME};
pub use stats::{compute_metrics, log_step_summary, record_step_metrics, DataCollector};
