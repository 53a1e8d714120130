//! The SignalFx export session.
//!
//! A `SignalFx` is made by connecting a `SignalFxConfig`. From then on it
//! flattens every batch of measurements handed to `write` into gauge
//! datapoints and submits them to its sink in a single call bounded by the
//! configured timeout. Nothing is buffered between writes and nothing is
//! retried. A failed write is reported once, for the whole batch, and the
//! caller decides what to do about it.

use error::Error;
use metric::{coerce, Datapoint, Measurement, MetricType};
use sink::{DatapointSink, Http, HttpConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

/// Where datapoints go unless an endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "https://ingest.signalfx.com/v2/datapoint";

/// The timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Field key that names the measurement itself rather than a sub-metric.
pub const VALUE_FIELD: &str = "value";

const SAMPLE_CONFIG: &str = r#"
  ## SignalFx API Token
  token = "XYZ-ABC" # required.

  ## Connection timeout.
  # timeout = "5s"
  ## Endpoint
  # endpoint = "https://ingest.signalfx.com/v2/datapoint"
  ## Log the endpoint at startup, visible from warn level (-v) up.
  # debug = false
"#;

lazy_static! {
    /// Total writes that reached the sink
    pub static ref SFX_WRITES: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
    /// Total datapoints accepted by the sink
    pub static ref SFX_POINTS_SENT: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
    /// Total fields dropped because they had no numeric representation
    pub static ref SFX_FIELDS_DROPPED: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
    /// Total writes that failed
    pub static ref SFX_WRITE_FAILURES: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
}

/// Configuration for the SignalFx export session
#[derive(Debug, Clone, PartialEq)]
pub struct SignalFxConfig {
    /// The SignalFx API token. Required.
    pub token: String,
    /// Upper bound on a single write. Zero means `DEFAULT_TIMEOUT`.
    pub timeout: Duration,
    /// The ingest URL. Empty means `DEFAULT_ENDPOINT`.
    pub endpoint: String,
    /// When set, connect logs the endpoint it will write to at warn level.
    pub debug: bool,
}

impl Default for SignalFxConfig {
    fn default() -> SignalFxConfig {
        SignalFxConfig {
            token: String::new(),
            timeout: Duration::from_secs(0),
            endpoint: String::new(),
            debug: false,
        }
    }
}

/// The result of flattening a batch of measurements.
#[derive(Debug, Default, PartialEq)]
pub struct Flattened {
    /// One datapoint per representable field, in measurement order
    pub points: Vec<Datapoint>,
    /// How many fields were dropped by the log-and-drop policy
    pub dropped: usize,
}

/// Name of the datapoint made from field `key` of measurement `name`.
pub fn point_name(name: &str, key: &str) -> String {
    if key == VALUE_FIELD {
        name.to_string()
    } else {
        let mut s = String::with_capacity(name.len() + 1 + key.len());
        s.push_str(name);
        s.push('.');
        s.push_str(key);
        s
    }
}

/// Flatten `measurements` into gauge datapoints, one per field.
///
/// Fields whose value cannot be coerced are dropped and logged, they never
/// fail the batch. Tags and timestamp are copied from the measurement onto
/// every datapoint made from it.
pub fn flatten(measurements: &[Measurement]) -> Flattened {
    let mut flat = Flattened::default();
    for m in measurements {
        for &(ref key, ref val) in m.fields().iter() {
            match coerce(val) {
                Ok(value) => flat.points.push(Datapoint::new(
                    point_name(m.name(), key),
                    m.tags().clone(),
                    value,
                    MetricType::Gauge,
                    m.timestamp(),
                )),
                Err(e) => {
                    debug!("dropping field {} of {}: {} ({:?})", key, m.name(), e, val);
                    flat.dropped += 1;
                }
            }
        }
    }
    if flat.dropped > 0 {
        SFX_FIELDS_DROPPED.fetch_add(flat.dropped, Ordering::Relaxed);
    }
    flat
}

/// A connected SignalFx export session.
///
/// Configuration is fixed at connect. The session may be shared between
/// threads and written to concurrently.
pub struct SignalFx {
    timeout: Duration,
    endpoint: String,
    sink: Box<dyn DatapointSink>,
}

impl SignalFx {
    /// Connect to SignalFx over HTTP.
    ///
    /// Fails with `Error::MissingCredential` if no token is configured. A
    /// zero timeout becomes `DEFAULT_TIMEOUT` and an empty endpoint becomes
    /// `DEFAULT_ENDPOINT`. The endpoint is not checked here, a bad one shows
    /// up as an export failure on the first write.
    pub fn connect(config: SignalFxConfig) -> Result<SignalFx, Error> {
        let config = settle(config)?;
        let http = Http::new(HttpConfig {
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
            user_agent: user_agent(),
        })?;
        Ok(SignalFx::assemble(config, Box::new(http)))
    }

    /// Connect with `sink` standing in for the HTTP transport. Token checks
    /// and defaults are applied exactly as in `connect`.
    pub fn with_sink(
        config: SignalFxConfig,
        sink: Box<dyn DatapointSink>,
    ) -> Result<SignalFx, Error> {
        let config = settle(config)?;
        Ok(SignalFx::assemble(config, sink))
    }

    fn assemble(config: SignalFxConfig, sink: Box<dyn DatapointSink>) -> SignalFx {
        if config.debug {
            warn!("[signalfx] Write enabled to {}", config.endpoint);
        }
        SignalFx {
            timeout: config.timeout,
            endpoint: config.endpoint,
            sink: sink,
        }
    }

    /// Flatten `measurements` and submit them in one sink call.
    ///
    /// An empty batch returns immediately without touching the sink. The
    /// call blocks until the sink accepts or rejects the datapoints or the
    /// session timeout elapses.
    pub fn write(&self, measurements: &[Measurement]) -> Result<(), Error> {
        if measurements.is_empty() {
            return Ok(());
        }
        let flat = flatten(measurements);
        trace!(
            "flattened {} measurements into {} datapoints, dropped {} fields",
            measurements.len(),
            flat.points.len(),
            flat.dropped
        );

        SFX_WRITES.fetch_add(1, Ordering::Relaxed);
        match self.sink.add_datapoints(&flat.points, self.timeout) {
            Ok(()) => {
                SFX_POINTS_SENT.fetch_add(flat.points.len(), Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                SFX_WRITE_FAILURES.fetch_add(1, Ordering::Relaxed);
                Err(Error::Export(e))
            }
        }
    }

    /// Tear down the session. Nothing needs releasing, this always succeeds.
    pub fn close(self) -> Result<(), Error> {
        Ok(())
    }

    /// The timeout applied to every write.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The ingest URL datapoints are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One line describing this output.
    pub fn description() -> &'static str {
        "Configuration for SignalFx API to send metrics to."
    }

    /// The body of an example `[sinks.signalfx]` configuration table.
    pub fn sample_config() -> &'static str {
        SAMPLE_CONFIG
    }
}

fn settle(mut config: SignalFxConfig) -> Result<SignalFxConfig, Error> {
    if config.token.is_empty() {
        return Err(Error::MissingCredential);
    }
    if config.timeout == Duration::from_secs(0) {
        config.timeout = DEFAULT_TIMEOUT;
    }
    if config.endpoint.is_empty() {
        config.endpoint = DEFAULT_ENDPOINT.to_string();
    }
    Ok(config)
}

fn user_agent() -> String {
    format!("sfx-export/{}", VERSION.unwrap_or("unknown"))
}
