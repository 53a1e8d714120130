//! An in-memory sink that records every batch it is handed.

use error::ExportFailure;
use metric::Datapoint;
use sink::DatapointSink;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Default)]
struct Recorded {
    batches: Vec<Vec<Datapoint>>,
    timeouts: Vec<Duration>,
}

/// Memory sink
///
/// Clones share the same recording, so a test can keep one handle and give
/// the other to an export session. A sink made with `Memory::failing` records
/// the call and then reports `ExportFailure::Timeout`.
#[derive(Clone, Default)]
pub struct Memory {
    recorded: Arc<Mutex<Recorded>>,
    fail: bool,
}

impl Memory {
    /// Create a new Memory sink that accepts everything
    pub fn new() -> Memory {
        Memory::default()
    }

    /// Create a new Memory sink that fails every call
    pub fn failing() -> Memory {
        Memory {
            recorded: Arc::default(),
            fail: true,
        }
    }

    /// Number of times `add_datapoints` was called
    pub fn calls(&self) -> usize {
        self.recorded().batches.len()
    }

    /// Every batch received, in call order
    pub fn batches(&self) -> Vec<Vec<Datapoint>> {
        self.recorded().batches.clone()
    }

    /// The timeout passed with each call, in call order
    pub fn timeouts(&self) -> Vec<Duration> {
        self.recorded().timeouts.clone()
    }

    // a writer that panicked still made its call
    fn recorded(&self) -> MutexGuard<Recorded> {
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DatapointSink for Memory {
    fn add_datapoints(
        &self,
        points: &[Datapoint],
        timeout: Duration,
    ) -> Result<(), ExportFailure> {
        {
            let mut r = self.recorded();
            r.batches.push(points.to_vec());
            r.timeouts.push(timeout);
        }
        if self.fail {
            Err(ExportFailure::Timeout)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::thread;

    #[test]
    fn records_through_poisoned_lock() {
        let sink = Memory::new();
        let held = sink.clone();
        let poisoner = thread::spawn(move || {
            let _guard = held.recorded.lock().unwrap();
            panic!("poison the recording");
        });
        assert!(poisoner.join().is_err());
        assert!(sink.recorded.is_poisoned());

        assert!(sink.add_datapoints(&[], Duration::from_secs(1)).is_ok());
        assert_eq!(1, sink.calls());
        assert_eq!(vec![Duration::from_secs(1)], sink.timeouts());
    }

    #[test]
    fn failing_still_records() {
        let sink = Memory::failing();
        match sink.add_datapoints(&[], Duration::from_secs(2)) {
            Err(ExportFailure::Timeout) => {}
            other => panic!("expected a timeout, got {:?}", other),
        }
        assert_eq!(1, sink.calls());
    }
}
