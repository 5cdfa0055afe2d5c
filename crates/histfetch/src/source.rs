//! Where the history comes from
//!
//! [`HistorySource`] is the seam between the fetcher and the network. The
//! real implementation, [`HttpSource`], issues one blocking GET with a
//! bounded timeout; tests swap in canned responses.

use std::io::Read;
use std::time::Duration;
use thiserror::Error;

/// A response that made it back from the device, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RemoteResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The device could not be reached, or stopped talking mid-response
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to read response body: {0}")]
    Body(#[from] std::io::Error),
}

pub trait HistorySource {
    fn get(&self, url: &str) -> Result<RemoteResponse, SourceError>;
}

/// Blocking HTTP client
pub struct HttpSource {
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("histfetch/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl HistorySource for HttpSource {
    fn get(&self, url: &str) -> Result<RemoteResponse, SourceError> {
        tracing::debug!("GET {}", url);

        match self.agent.get(url).call() {
            Ok(response) => {
                let status = response.status();
                let mut body = Vec::new();
                response.into_reader().read_to_end(&mut body)?;
                Ok(RemoteResponse { status, body })
            }
            // ureq turns 4xx/5xx into errors; they are still answers
            Err(ureq::Error::Status(status, _)) => Ok(RemoteResponse::new(status, Vec::new())),
            Err(ureq::Error::Transport(t)) => Err(SourceError::Transport(t.to_string())),
        }
    }
}
