//! HTTP delivery to the SignalFx ingest API.

use error::ExportFailure;
use metric::Datapoint;
use protocols::signalfx;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use sink::DatapointSink;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

lazy_static! {
    /// Total requests made to the ingest API
    pub static ref SFX_HTTP_REQUESTS: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
    /// Total requests rejected by the ingest API
    pub static ref SFX_HTTP_REJECTED: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
}

/// The header SignalFx reads the API token from.
pub const TOKEN_HEADER: &str = "X-SF-Token";

/// Configuration for the `Http` sink
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// The full URL datapoint documents are POSTed to.
    pub endpoint: String,
    /// The SignalFx API token.
    pub token: String,
    /// Sent as the `User-Agent` header.
    pub user_agent: String,
}

/// The HTTP sink struct.
///
/// The underlying client pools connections and is shared freely between
/// threads. Refer to the documentation on `HttpConfig` for more details.
pub struct Http {
    client: Client,
    endpoint: String,
    token: String,
    user_agent: String,
}

impl Http {
    /// Construct a new Http sink. Fails only if the HTTP client cannot be
    /// initialized, for instance when no TLS backend is available.
    pub fn new(config: HttpConfig) -> Result<Http, ExportFailure> {
        let client = Client::builder().build()?;
        Ok(Http {
            client: client,
            endpoint: config.endpoint,
            token: config.token,
            user_agent: config.user_agent,
        })
    }
}

impl DatapointSink for Http {
    fn add_datapoints(
        &self,
        points: &[Datapoint],
        timeout: Duration,
    ) -> Result<(), ExportFailure> {
        if points.is_empty() {
            return Ok(());
        }
        let body = signalfx::encode(points)?;
        debug!(
            "sending {} datapoints to {} in {} bytes",
            points.len(),
            self.endpoint,
            body.len()
        );

        SFX_HTTP_REQUESTS.fetch_add(1, Ordering::Relaxed);
        let resp = self.client
            .post(&self.endpoint)
            .header(TOKEN_HEADER, self.token.as_str())
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, self.user_agent.as_str())
            .timeout(timeout)
            .body(body)
            .send()?;

        let status = resp.status();
        let text = resp.text()?;
        if status != StatusCode::OK {
            SFX_HTTP_REJECTED.fetch_add(1, Ordering::Relaxed);
            return Err(ExportFailure::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim() != "\"OK\"" {
            SFX_HTTP_REJECTED.fetch_add(1, Ordering::Relaxed);
            return Err(ExportFailure::UnexpectedResponse(text));
        }
        Ok(())
    }
}
