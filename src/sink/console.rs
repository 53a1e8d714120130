//! Dry-run sink that prints datapoints instead of delivering them.

use chrono::Utc;
use error::ExportFailure;
use metric::Datapoint;
use sink::DatapointSink;
use std::io::{self, Write};
use std::time::Duration;

/// Console sink
///
/// Prints every datapoint it receives to stdout, one per line, and accepts
/// the batch. Used for dry runs.
pub struct Console {}

impl Console {
    /// Create a new Console sink
    pub fn new() -> Console {
        Console {}
    }
}

impl Default for Console {
    fn default() -> Console {
        Console::new()
    }
}

impl DatapointSink for Console {
    fn add_datapoints(
        &self,
        points: &[Datapoint],
        _timeout: Duration,
    ) -> Result<(), ExportFailure> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        // a closed stdout is not a delivery failure
        let _ = writeln!(out, "Flushing datapoints: {}", Utc::now().to_rfc3339());
        for dp in points {
            let _ = writeln!(out, "    {}", dp);
        }
        Ok(())
    }
}
