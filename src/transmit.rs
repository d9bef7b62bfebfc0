//! Delivery of readings to the ingestion endpoint.
//!
//! Delivery is at-most-once: each reading gets a single POST and the outcome is
//! classified, never retried.

use crate::config::EndpointConfig;
use crate::error::TransportError;
use crate::reading::Reading;
use async_trait::async_trait;
use tracing::debug;

const HTTP_OK: u16 = 200;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success,
    Failure(TransportError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn error(&self) -> Option<&TransportError> {
        match self {
            Outcome::Success => None,
            Outcome::Failure(error) => Some(error),
        }
    }
}

impl From<Result<(), TransportError>> for Outcome {
    fn from(result: Result<(), TransportError>) -> Self {
        match result {
            Ok(()) => Outcome::Success,
            Err(error) => Outcome::Failure(error),
        }
    }
}

#[async_trait]
pub trait Transmitter: Send + Sync {
    async fn send(&self, reading: &Reading) -> Outcome;
}

#[async_trait]
impl<T: Transmitter + ?Sized> Transmitter for std::sync::Arc<T> {
    async fn send(&self, reading: &Reading) -> Outcome {
        (**self).send(reading).await
    }
}

/// JSON-over-HTTP transmitter. The blocking request runs on tokio's blocking pool.
#[derive(Clone)]
pub struct HttpTransmitter {
    agent: ureq::Agent,
    url: String,
}

impl HttpTransmitter {
    pub fn new(config: &EndpointConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.request_timeout())
            .build();

        Self {
            agent,
            url: config.sensors_url(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Single synchronous POST. Only a 200 response counts as delivered.
    pub fn post_blocking(&self, reading: &Reading) -> Result<(), TransportError> {
        let body = reading
            .to_json()
            .map_err(|e| TransportError::Serialization(e.to_string()))?;

        debug!("POST {} {}", self.url, body);

        match self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .send_string(&body)
        {
            Ok(response) if response.status() == HTTP_OK => Ok(()),
            Ok(response) => Err(status_error(response)),
            Err(ureq::Error::Status(_, response)) => Err(status_error(response)),
            Err(ureq::Error::Transport(transport)) => Err(TransportError::Transport(transport.to_string())),
        }
    }
}

impl core::fmt::Debug for HttpTransmitter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HttpTransmitter").field("url", &self.url).finish()
    }
}

#[async_trait]
impl Transmitter for HttpTransmitter {
    async fn send(&self, reading: &Reading) -> Outcome {
        let transmitter = self.clone();
        let reading = *reading;

        match tokio::task::spawn_blocking(move || transmitter.post_blocking(&reading)).await {
            Ok(result) => result.into(),
            Err(join_error) => Outcome::Failure(TransportError::Transport(join_error.to_string())),
        }
    }
}

fn status_error(response: ureq::Response) -> TransportError {
    let status = response.status();
    let body = response.into_string().unwrap_or_default();
    TransportError::Status { status, body }
}
