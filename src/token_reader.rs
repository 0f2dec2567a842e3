use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{ProtocolError, ProtocolResult};
use crate::query;
use crate::{OAUTH_TOKEN_KEY, OAUTH_TOKEN_SECRET_KEY};

/// Represents response of token acquisition.
#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    /// OAuth Token
    pub oauth_token: String,
    /// OAuth Token Secret
    pub oauth_token_secret: String,
    /// Other contents
    #[serde(flatten)]
    pub remain: HashMap<String, String>,
}

/// Parses a provider's query-string-shaped token response.
///
/// Both `oauth_token` and `oauth_token_secret` must be present and
/// non-empty; anything else fails, naming the offending key, and no client
/// state is derived from the response.
pub fn read_token_response(text: &str) -> ProtocolResult<TokenResponse> {
    let mut destructured = query::decode(text);
    let oauth_token = destructured
        .remove(OAUTH_TOKEN_KEY)
        .filter(|token| !token.is_empty());
    let oauth_token_secret = destructured
        .remove(OAUTH_TOKEN_SECRET_KEY)
        .filter(|secret| !secret.is_empty());
    match (oauth_token, oauth_token_secret) {
        (Some(t), Some(s)) => Ok(TokenResponse {
            oauth_token: t,
            oauth_token_secret: s,
            remain: destructured,
        }),
        (None, _) => Err(ProtocolError::TokenKeyNotFound(
            OAUTH_TOKEN_KEY,
            text.to_string(),
        )),
        (_, _) => Err(ProtocolError::TokenKeyNotFound(
            OAUTH_TOKEN_SECRET_KEY,
            text.to_string(),
        )),
    }
}
