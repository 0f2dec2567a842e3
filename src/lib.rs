/*!
oauth1-flow: three-legged OAuth 1.0a over a pluggable HTTP transport.

# Overview

This library implements the OAuth 1.0/1.0a authorization flow against a
single remote API: it obtains an unauthorized request token, builds the URL
the end user visits to grant access, exchanges the verified request token
for an access token, and signs subsequent GET/POST calls with it.

Signing is implemented here — canonical parameter normalization, the
signature base string and HMAC-SHA1 per [RFC 5849] — while the HTTP
transport is an injected capability ([`Transport`]), so the flow can run
over any HTTP client. A blocking [`reqwest`] adapter is bundled as
[`ReqwestTransport`].

[RFC 5849]: https://tools.ietf.org/html/rfc5849

# How to use

## Step 1 & 2 - request token & user authorization

```no_run
use oauth1_flow::{Credentials, Endpoints, OAuthClient, ReqwestTransport};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let credentials = Credentials::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]")?;
let endpoints = Endpoints::new(
    "https://api.example.com/v2/",
    "/v2/oauth/request_token/",
    "/v2/oauth/authorize/",
    "/v2/oauth/access_token/",
)?
.callback_url("https://consumer.example.com/ready");

let mut client = OAuthClient::new(credentials, endpoints, ReqwestTransport::new());

// acquire an unauthorized request token and send the user off to consent
let auth_url = client.request_authorization_url()?;
println!("please access to: {}", auth_url);

// persist client.token_secret() somewhere - the next step usually happens
// in a separate request or process
# Ok(())
# }
```

## Step 3 - access token exchange & signed calls

```no_run
# use oauth1_flow::{Credentials, Endpoints, OAuthClient, ReqwestTransport};
# fn main() -> Result<(), Box<dyn std::error::Error>> {
# let credentials = Credentials::new("ck", "cs")?;
# let endpoints = Endpoints::new(
#     "https://api.example.com/v2/",
#     "/v2/oauth/request_token/",
#     "/v2/oauth/authorize/",
#     "/v2/oauth/access_token/",
# )?;
let mut client = OAuthClient::new(credentials, endpoints, ReqwestTransport::new());

// the token and verifier arrive on the provider's redirect back to us;
// the token secret is the one persisted after step 1
let access = client.exchange_for_access_token(
    "[REQUEST_TOKEN]",
    "[REQUEST_TOKEN_SECRET]",
    Some("[VERIFIER]"),
)?;
println!(
    "your token and secret is: \n token: {}\n secret: {}",
    access.token(),
    access.secret()
);

// subsequent calls are signed with the access token
let body = client.get("photos/", &[("page".to_string(), "1".to_string())])?;
println!("{}", body);
# Ok(())
# }
```
*/
mod client;
mod error;
pub mod query;
mod secrets;
mod signer;
mod token_reader;
mod transport;

// exposed to external program
pub use client::{Endpoints, OAuthClient};
pub use error::{
    Error, ProtocolError, ProtocolResult, Result, SignError, SignResult, TransportError,
    TransportResult,
};
pub use secrets::{Credentials, TokenPair};
pub use signer::{percent_encode, signature_base, OAuthParameters, SignatureMethod, Signer};
pub use token_reader::{read_token_response, TokenResponse};
pub use transport::{ReqwestTransport, Transport};

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";

// crate-private constant variables
pub(crate) const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
pub(crate) const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
pub(crate) const OAUTH_TOKEN_KEY: &str = "oauth_token";
pub(crate) const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
pub(crate) const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
