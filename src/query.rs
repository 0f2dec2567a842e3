use std::collections::HashMap;

use percent_encoding::percent_decode_str;

use crate::signer::percent_encode;

/// Encodes parameters as `k1=v1&k2=v2&...` with OAuth percent-encoding on
/// both sides, suitable for a request query string or form body.
pub fn encode(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<String>>()
        .join("&")
}

/// Decodes a query-string-shaped body into a map.
///
/// Pairs split on the first `=` only, so values containing `=` survive
/// intact; pairs without a `=` decode to an empty value.
pub fn decode(text: &str) -> HashMap<String, String> {
    text.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut iter = pair.splitn(2, '=');
            (
                unescape(iter.next().unwrap_or_default()),
                unescape(iter.next().unwrap_or_default()),
            )
        })
        .collect()
}

fn unescape(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}
