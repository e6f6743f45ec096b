use crate::errors::ProbeError;
use crate::http::client::ProbeClient;
use crate::payload::injector::set_query_param;
use crate::xss::reflect::detect_reflected;
use url::Url;

/// Set `param` to `payload` in `url` and report whether the payload reflects.
///
/// `param` does not need to exist in `url` beforehand.
pub async fn check_append(
    client: &ProbeClient,
    url: &str,
    param: &str,
    payload: &str,
) -> Result<bool, ProbeError> {
    let base = Url::parse(url).map_err(|e| ProbeError::request(url, e))?;
    let mutated = set_query_param(&base, param, payload);

    let reflected = detect_reflected(client, mutated.as_str()).await?;
    Ok(reflected.iter().any(|r| r == param))
}
