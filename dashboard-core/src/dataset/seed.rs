//! Embedded mock dataset
//!
//! The dashboard ships with a fixed dataset compiled into the binary.
//! Each call parses a fresh copy; local mutations never touch the source.

use super::Dataset;
use crate::error::Result;

const SEED_JSON: &str = include_str!("seed.json");

/// Parse the embedded dataset
pub fn seed_dataset() -> Result<Dataset> {
    let dataset = Dataset::from_json(SEED_JSON)?;
    tracing::debug!(
        "Parsed seed dataset: {} tasks, {} meetings, {} files",
        dataset.tasks.len(),
        dataset.meetings.len(),
        dataset.files.len()
    );
    Ok(dataset)
}
