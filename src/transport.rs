use http::Method;
use url::Url;

use crate::error::{TransportError, TransportResult};
use crate::query;

/// HTTP capability consumed by [`OAuthClient`](crate::OAuthClient).
///
/// `GET` appends `params` to the URL query (merging with any query the URL
/// already carries); `POST` sends them as a form-encoded body.
/// Implementations return the response body on a success status, fail with
/// [`TransportError::Status`] otherwise and with
/// [`TransportError::Network`] on connection-level failure. Every call is
/// one attempt; retry policy, timeouts and cancellation live behind or
/// above this trait, never in the client.
pub trait Transport {
    fn perform(
        &self,
        method: Method,
        url: &Url,
        params: &[(String, String)],
    ) -> TransportResult<String>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn perform(
        &self,
        method: Method,
        url: &Url,
        params: &[(String, String)],
    ) -> TransportResult<String> {
        (**self).perform(method, url, params)
    }
}

/// [`Transport`] implementation over a blocking [`reqwest`] client.
#[derive(Debug, Default)]
pub struct ReqwestTransport {
    inner: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Default::default()
    }

    /// Wraps a preconfigured client, e.g. one with timeouts installed.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        ReqwestTransport { inner: client }
    }
}

impl Transport for ReqwestTransport {
    fn perform(
        &self,
        method: Method,
        url: &Url,
        params: &[(String, String)],
    ) -> TransportResult<String> {
        let request = if method == Method::GET {
            self.inner.get(with_query(url, params))
        } else {
            self.inner
                .post(url.clone())
                .header(
                    reqwest::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(query::encode(params))
        };
        let response = request
            .send()
            .map_err(|err| TransportError::Network(Box::new(err)))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|err| TransportError::Network(Box::new(err)))?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Merges `params` into whatever query `url` already carries.
pub(crate) fn with_query(url: &Url, params: &[(String, String)]) -> Url {
    let mut url = url.clone();
    if params.is_empty() {
        return url;
    }
    let appended = query::encode(params);
    let merged = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{}&{}", existing, appended),
        _ => appended,
    };
    url.set_query(Some(&merged));
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn with_query_appends_to_bare_url() {
        let url = Url::parse("https://api.example.com/v2/photos/").unwrap();
        let merged = with_query(&url, &pairs(&[("page", "1"), ("q", "a b")]));
        assert_eq!(
            merged.as_str(),
            "https://api.example.com/v2/photos/?page=1&q=a%20b"
        );
    }

    #[test]
    fn with_query_merges_existing_query() {
        let url = Url::parse("https://api.example.com/v2/photos/?size=large").unwrap();
        let merged = with_query(&url, &pairs(&[("page", "1")]));
        assert_eq!(
            merged.as_str(),
            "https://api.example.com/v2/photos/?size=large&page=1"
        );
    }

    #[test]
    fn with_query_no_params_is_identity() {
        let url = Url::parse("https://api.example.com/v2/photos/?size=large").unwrap();
        assert_eq!(with_query(&url, &[]), url);
    }
}
