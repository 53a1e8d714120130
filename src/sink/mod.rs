//! A `DatapointSink` is where a flattened batch goes. The HTTP sink talks to
//! SignalFx, the others exist for dry runs and tests.
use error::ExportFailure;
use metric::Datapoint;
use std::time::Duration;

pub mod console;
pub mod http;
pub mod memory;

pub use self::console::Console;
pub use self::http::{Http, HttpConfig};
pub use self::memory::Memory;

/// Accepts whole batches of datapoints.
///
/// A sink call is all or nothing from the caller's point of view: either the
/// batch was accepted or an `ExportFailure` is returned. Implementations must
/// give up once `timeout` has elapsed and must be usable from several threads
/// at once.
pub trait DatapointSink: Send + Sync {
    /// Deliver `points`, blocking until they are accepted, rejected or
    /// `timeout` elapses.
    fn add_datapoints(
        &self,
        points: &[Datapoint],
        timeout: Duration,
    ) -> Result<(), ExportFailure>;
}
