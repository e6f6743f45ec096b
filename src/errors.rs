//! Error types for the probe layer

use thiserror::Error;

/// Failure of a single HTTP probe.
///
/// A redirect is not an error; it comes back as a normal response and the
/// detector treats it as an empty reflection.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The URL could not be parsed or turned into a request
    #[error("invalid request URL {url}: {reason}")]
    Request { url: String, reason: String },

    /// Connect, DNS, TLS or deadline failure while sending
    #[error("network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read to the end
    #[error("failed to read response body from {url}: {source}")]
    Read {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("probe cancelled")]
    Cancelled,
}

impl ProbeError {
    pub fn request(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Request {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// True when the end-to-end request deadline expired
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Network { source, .. } | Self::Read { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
