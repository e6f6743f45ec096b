// Reflection Detection
// Finds query parameters whose value comes back verbatim in the page

use crate::errors::ProbeError;
use crate::http::client::ProbeClient;
use url::Url;

/// Probe `url` and return the names of query parameters reflected in the body.
///
/// Redirects and non-HTML responses are not reflection surfaces and yield an
/// empty result. Names come back once each, in query order.
pub async fn detect_reflected(client: &ProbeClient, url: &str) -> Result<Vec<String>, ProbeError> {
    let parsed = Url::parse(url).map_err(|e| ProbeError::request(url, e))?;
    let response = client.get(url).await?;

    if response.is_redirect() {
        tracing::debug!("{} redirected (status {}), not inspected", url, response.status);
        return Ok(Vec::new());
    }

    if !response.is_html() {
        tracing::debug!(
            "{} is not HTML ({}), not inspected",
            url,
            response.content_type().unwrap_or_default()
        );
        return Ok(Vec::new());
    }

    Ok(reflected_params(&parsed, &response.body_text()))
}

/// Names of the parameters of `url` with at least one value contained in `body`.
///
/// An empty value is always contained, so valueless parameters are reported
/// here and left to marker confirmation to sort out.
pub fn reflected_params(url: &Url, body: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    for (key, value) in url.query_pairs() {
        if !body.contains(value.as_ref()) {
            continue;
        }
        if !out.iter().any(|k| k == key.as_ref()) {
            out.push(key.into_owned());
        }
    }

    out
}
