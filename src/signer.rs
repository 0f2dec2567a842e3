use std::borrow::Cow;

use chrono::Utc;
use hmac::{Hmac, Mac};
use http::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet};
use sha1::Sha1;
use url::{Position, Url};
use uuid::Uuid;

use crate::error::{SignError, SignResult};
use crate::secrets::{Credentials, TokenPair};
use crate::{
    OAUTH_CALLBACK_KEY, OAUTH_CONSUMER_KEY, OAUTH_NONCE_KEY, OAUTH_SIGNATURE_KEY,
    OAUTH_SIGNATURE_METHOD_KEY, OAUTH_TIMESTAMP_KEY, OAUTH_TOKEN_KEY, OAUTH_VERIFIER_KEY,
    OAUTH_VERSION_KEY,
};

type HmacSha1 = Hmac<Sha1>;

// https://tools.ietf.org/html/rfc5849#section-3.6
// * ALPHA, DIGIT, '-', '.', '_', '~' MUST NOT be encoded.
// * All other characters MUST be encoded.
// * The two hexadecimal characters used to represent encoded
//   characters MUST be uppercase.
const OAUTH_ENCODE_SET: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const OAUTH_VERSION: &str = "1.0";

/// Percent-encodes `value` under the OAuth rules rather than the generic
/// form rules: space becomes `%20` (never `+`) and `~` stays as-is.
pub fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Canonical signature base string for `method`, `url` and `params`.
///
/// The method is uppercased, the URL is reduced to scheme, authority and
/// path (query and fragment excluded), and the parameters are
/// percent-encoded, sorted by name then value and serialized as
/// `name=value` pairs joined with `&`. The three parts are themselves
/// percent-encoded and joined with `&`, so identical inputs produce
/// identical output regardless of the parameter order given here.
pub fn signature_base(method: &str, url: &Url, params: &[(String, String)]) -> String {
    let mut pairs = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect::<Vec<(String, String)>>();
    pairs.sort();
    let param_str = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<String>>()
        .join("&");

    let endpoint = &url[..Position::AfterPath];
    let method = method.to_ascii_uppercase();
    format!(
        "{}&{}&{}",
        percent_encode(&method),
        percent_encode(endpoint),
        percent_encode(&param_str)
    )
}

/// Signature methods this crate can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMethod {
    HmacSha1,
}

impl SignatureMethod {
    /// Resolves a wire-format method name such as `HMAC-SHA1`.
    ///
    /// Anything else fails with
    /// [`SignError::UnsupportedSignatureMethod`] before any request is
    /// built; there is no silent fallback.
    pub fn from_name(name: &str) -> SignResult<Self> {
        match name {
            "HMAC-SHA1" => Ok(SignatureMethod::HmacSha1),
            other => Err(SignError::UnsupportedSignatureMethod(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignatureMethod::HmacSha1 => "HMAC-SHA1",
        }
    }
}

impl Default for SignatureMethod {
    fn default() -> Self {
        SignatureMethod::HmacSha1
    }
}

/// Optional per-request OAuth parameters.
///
/// The nonce and timestamp are normally generated fresh for every signed
/// request; setting them here pins the values, which makes the resulting
/// signature deterministic.
#[derive(Debug, Clone, Default)]
pub struct OAuthParameters<'a> {
    callback: Option<Cow<'a, str>>,
    nonce: Option<Cow<'a, str>>,
    timestamp: Option<i64>,
    verifier: Option<Cow<'a, str>>,
    signature_method: SignatureMethod,
}

impl<'a> OAuthParameters<'a> {
    pub fn new() -> Self {
        Default::default()
    }

    /// set the oauth_callback value
    pub fn callback<T>(self, callback: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            callback: Some(callback.into()),
            ..self
        }
    }

    /// set the oauth_nonce value
    pub fn nonce<T>(self, nonce: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    /// set the oauth_timestamp value
    pub fn timestamp<T>(self, timestamp: T) -> Self
    where
        T: Into<i64>,
    {
        OAuthParameters {
            timestamp: Some(timestamp.into()),
            ..self
        }
    }

    /// set the oauth_verifier value
    pub fn verifier<T>(self, verifier: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            verifier: Some(verifier.into()),
            ..self
        }
    }

    pub fn signature_method(self, signature_method: SignatureMethod) -> Self {
        OAuthParameters {
            signature_method,
            ..self
        }
    }
}

/// Assembles and signs the full parameter set for one request.
#[derive(Debug, Clone)]
pub struct Signer<'a> {
    credentials: &'a Credentials,
    token: Option<&'a TokenPair>,
    parameters: OAuthParameters<'a>,
}

impl<'a> Signer<'a> {
    pub fn new(
        credentials: &'a Credentials,
        token: Option<&'a TokenPair>,
        parameters: OAuthParameters<'a>,
    ) -> Self {
        Signer {
            credentials,
            token,
            parameters,
        }
    }

    /// Builds the complete parameter set for `method`/`url`: the caller's
    /// parameters merged with the `oauth_*` fields, with `oauth_signature`
    /// computed over everything else and appended last.
    ///
    /// The signature covers every parameter present at signing time, so
    /// mutating the result afterwards invalidates it; hand it straight to
    /// the transport.
    pub fn signed_params(
        &self,
        method: &Method,
        url: &Url,
        extra: &[(String, String)],
    ) -> Vec<(String, String)> {
        let mut params = extra.to_vec();
        params.push((
            OAUTH_CONSUMER_KEY.into(),
            self.credentials.consumer_key().into(),
        ));
        if let Some(token) = self.token {
            params.push((OAUTH_TOKEN_KEY.into(), token.token().into()));
        }
        let nonce = match self.parameters.nonce {
            Some(ref nonce) => nonce.to_string(),
            None => generate_nonce(),
        };
        params.push((OAUTH_NONCE_KEY.into(), nonce));
        let timestamp = self
            .parameters
            .timestamp
            .unwrap_or_else(|| Utc::now().timestamp());
        params.push((OAUTH_TIMESTAMP_KEY.into(), timestamp.to_string()));
        params.push((
            OAUTH_SIGNATURE_METHOD_KEY.into(),
            self.parameters.signature_method.as_str().into(),
        ));
        params.push((OAUTH_VERSION_KEY.into(), OAUTH_VERSION.into()));
        if let Some(ref callback) = self.parameters.callback {
            params.push((OAUTH_CALLBACK_KEY.into(), callback.to_string()));
        }
        if let Some(ref verifier) = self.parameters.verifier {
            params.push((OAUTH_VERIFIER_KEY.into(), verifier.to_string()));
        }

        let signature = self.sign(method, url, &params);
        params.push((OAUTH_SIGNATURE_KEY.into(), signature));
        params
    }

    /// Signs the base string derived from `method`, `url` and `params`
    /// with key `encode(consumer_secret) & encode(token_secret or "")`,
    /// returning the base64-encoded digest.
    pub fn sign(&self, method: &Method, url: &Url, params: &[(String, String)]) -> String {
        let base = signature_base(method.as_str(), url, params);
        let token_secret = self.token.map(TokenPair::secret).unwrap_or("");
        let key = format!(
            "{}&{}",
            percent_encode(self.credentials.consumer_secret()),
            percent_encode(token_secret)
        );
        match self.parameters.signature_method {
            SignatureMethod::HmacSha1 => {
                let mut mac = HmacSha1::new_from_slice(key.as_bytes())
                    .expect("HMAC-SHA1 accepts keys of any length");
                mac.update(base.as_bytes());
                base64::encode(mac.finalize().into_bytes())
            }
        }
    }
}

fn generate_nonce() -> String {
    Uuid::new_v4().to_string()
}
