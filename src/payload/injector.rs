use url::Url;

/// Rebuild `base` with `param` set to `payload`.
///
/// Every existing value of `param` collapses into one pair at the position of
/// the first occurrence; the pair is appended when `param` is absent. The
/// query is re-serialized with form encoding, so payloads containing `&`,
/// `=`, `#` or spaces cannot bleed into neighbouring pairs.
pub fn set_query_param(base: &Url, param: &str, payload: &str) -> Url {
    let mut url = base.clone();
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut found = false;

    for (k, v) in base.query_pairs() {
        if k == param {
            if !found {
                pairs.push((k.into_owned(), payload.to_string()));
                found = true;
            }
        } else {
            pairs.push((k.into_owned(), v.into_owned()));
        }
    }

    if !found {
        pairs.push((param.to_string(), payload.to_string()));
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
    url
}
