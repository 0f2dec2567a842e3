use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type SignResult<T> = std::result::Result<T, SignError>;
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;
pub type TransportResult<T> = std::result::Result<T, TransportError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid client configuration : {0}")]
    Configuration(String),
    #[error("OAuth sign failed : {0}")]
    Signer(#[from] SignError),
    #[error("token acquisition failed : {0}")]
    Protocol(#[from] ProtocolError),
    #[error("request failed : {0}")]
    Transport(#[from] TransportError),
    #[error("invalid url : {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Error, Debug, Clone)]
pub enum SignError {
    #[error("unsupported signature method : {0}, only HMAC-SHA1 is available")]
    UnsupportedSignatureMethod(String),
}

#[derive(Error, Debug, Clone)]
pub enum ProtocolError {
    #[error("response has malformed format: not found or empty {0} in {1}")]
    TokenKeyNotFound(&'static str, String),
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("server returned status {status}")]
    Status { status: u16, body: String },
    #[error("network error : {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
}
