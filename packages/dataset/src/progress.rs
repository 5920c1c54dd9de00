//! Load progress reporting.
//!
//! [`load`](crate::load) announces the expected row count, ticks once per
//! parsed row and finishes with a summary. Drawing is left to the caller:
//! binaries pass an `indicatif` bar from `car_map_cli_utils`, tests pass
//! [`null_progress`].

use std::sync::Arc;

/// Sink for loader progress. Shared behind an `Arc`, so every method takes
/// `&self`.
pub trait ProgressCallback: Send + Sync {
    /// Number of rows the loader expects to parse.
    fn set_total(&self, total: u64);

    /// `delta` more rows were parsed.
    fn inc(&self, delta: u64);

    /// Describes the current phase, e.g. the source being fetched.
    fn set_message(&self, msg: String);

    /// Loading is done.
    fn finish(&self, msg: String);
}

/// Discards all progress.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
