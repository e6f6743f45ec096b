//! HTTP probe client with a fixed transport policy and cancellation support

use crate::errors::ProbeError;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use anyhow::Result;
use reqwest::header::HeaderMap;
use reqwest::{redirect::Policy, Client};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/80.0.3987.100 Safari/537.36";

/// Transport policy shared by every probe of a scan.
///
/// Certificate validation is off on purpose: targets under test routinely
/// run self-signed or mismatched certificates and a scanner that refused
/// them would miss most staging hosts.
#[derive(Debug, Clone)]
pub struct ProbePolicy {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub keep_alive: Duration,
    /// Deadline for the whole exchange, send plus body read
    pub request_timeout: Duration,
    pub accept_invalid_certs: bool,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(30),
            keep_alive: Duration::from_secs(1),
            request_timeout: Duration::from_secs(60),
            accept_invalid_certs: true,
        }
    }
}

#[derive(Clone)]
pub struct ProbeClient {
    client: Client,
    policy: ProbePolicy,
    cancel: CancellationToken,
}

impl ProbeClient {
    pub fn new(policy: ProbePolicy) -> Result<Self> {
        Self::with_cancellation(policy, CancellationToken::new())
    }

    /// Create a client whose in-flight probes abort when `cancel` fires
    pub fn with_cancellation(policy: ProbePolicy, cancel: CancellationToken) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(policy.accept_invalid_certs)
            .redirect(Policy::none())
            .user_agent(policy.user_agent.clone())
            .connect_timeout(policy.connect_timeout)
            .tcp_keepalive(policy.keep_alive)
            .timeout(policy.request_timeout)
            .build()?;

        Ok(Self {
            client,
            policy,
            cancel,
        })
    }

    pub fn policy(&self) -> &ProbePolicy {
        &self.policy
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// GET `url` and return the fully drained response.
    ///
    /// Redirects are returned as-is, never followed.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, ProbeError> {
        let parsed = Url::parse(url).map_err(|e| ProbeError::request(url, e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProbeError::request(
                url,
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }
        self.execute(HttpRequest::get(parsed)).await
    }

    pub async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ProbeError> {
        if self.cancel.is_cancelled() {
            return Err(ProbeError::Cancelled);
        }

        let url = req.url.to_string();
        let start = Instant::now();

        let request = self
            .client
            .request(req.method, req.url)
            .build()
            .map_err(|e| ProbeError::request(&url, e))?;

        tracing::trace!("GET {}", url);

        let response = tokio::select! {
            _ = self.cancel.cancelled() => return Err(ProbeError::Cancelled),
            res = self.client.execute(request) => res.map_err(|source| ProbeError::Network {
                url: url.clone(),
                source,
            })?,
        };

        let status = response.status().as_u16();

        let headers = collect_headers(response.headers());

        // Dropping the response on cancellation closes the connection
        let body = tokio::select! {
            _ = self.cancel.cancelled() => return Err(ProbeError::Cancelled),
            res = response.bytes() => res.map_err(|source| ProbeError::Read {
                url: url.clone(),
                source,
            })?,
        };

        let elapsed_ms = start.elapsed().as_millis();
        tracing::debug!(
            "{} -> status={} size={} time={}ms",
            url,
            status,
            body.len(),
            elapsed_ms
        );

        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
            elapsed_ms,
        })
    }
}

/// First value of each header, keyed by lowercase name.
///
/// Values that are not visible ASCII are kept lossily decoded rather than
/// blanked, so callers can tell them apart from an absent header.
fn collect_headers(map: &HeaderMap) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    for (k, v) in map.iter() {
        let value = match v.to_str() {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(v.as_bytes()).to_string(),
        };
        headers.entry(k.as_str().to_ascii_lowercase()).or_insert(value);
    }
    headers
}
