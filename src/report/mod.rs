//! Scan report: the snapshot artifact and the console summary.

pub mod snapshot;
pub mod summary;

pub use snapshot::{emit, read_snapshot, write_snapshot, ScanSnapshot};
pub use summary::{format_summary, print_summary};
