use crate::error::{Error, Result};

/// Consumer key and secret identifying the application to the provider.
///
/// Immutable for the lifetime of a client instance.
#[derive(Debug, Clone)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: String,
}

impl Credentials {
    /// Fails with [`Error::Configuration`] when either value is empty.
    pub fn new<TKey, TSecret>(consumer_key: TKey, consumer_secret: TSecret) -> Result<Self>
    where
        TKey: Into<String>,
        TSecret: Into<String>,
    {
        let consumer_key = consumer_key.into();
        let consumer_secret = consumer_secret.into();
        if consumer_key.is_empty() {
            return Err(Error::Configuration("consumer key is empty".into()));
        }
        if consumer_secret.is_empty() {
            return Err(Error::Configuration("consumer secret is empty".into()));
        }
        Ok(Credentials {
            consumer_key,
            consumer_secret,
        })
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }
}

/// Token and token secret, either the unauthorized request token or the
/// access token depending on where the flow currently stands.
///
/// The pair is an immutable value; [`OAuthClient`](crate::OAuthClient)
/// replaces it wholesale on each state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    token: String,
    secret: String,
}

impl TokenPair {
    pub fn new<TToken, TSecret>(token: TToken, secret: TSecret) -> Self
    where
        TToken: Into<String>,
        TSecret: Into<String>,
    {
        TokenPair {
            token: token.into(),
            secret: secret.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}
