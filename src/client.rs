use http::Method;
use url::Url;

use crate::error::Result;
use crate::secrets::{Credentials, TokenPair};
use crate::signer::{OAuthParameters, SignatureMethod, Signer};
use crate::token_reader;
use crate::transport::Transport;
use crate::OAUTH_TOKEN_KEY;

/// Provider endpoint configuration.
///
/// `root_url` anchors plain API calls; the three token paths may be
/// absolute or relative to it. The callback URL, when configured, rides
/// along as `oauth_callback` on the request-token call.
#[derive(Debug, Clone)]
pub struct Endpoints {
    root_url: Url,
    request_token_path: String,
    authorize_path: String,
    access_token_path: String,
    callback_url: Option<String>,
}

impl Endpoints {
    pub fn new<TRequest, TAuthorize, TAccess>(
        root_url: &str,
        request_token_path: TRequest,
        authorize_path: TAuthorize,
        access_token_path: TAccess,
    ) -> Result<Self>
    where
        TRequest: Into<String>,
        TAuthorize: Into<String>,
        TAccess: Into<String>,
    {
        Ok(Endpoints {
            root_url: Url::parse(root_url)?,
            request_token_path: request_token_path.into(),
            authorize_path: authorize_path.into(),
            access_token_path: access_token_path.into(),
            callback_url: None,
        })
    }

    /// set the callback URL sent with the request-token call
    pub fn callback_url<T: Into<String>>(self, callback_url: T) -> Self {
        Endpoints {
            callback_url: Some(callback_url.into()),
            ..self
        }
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        Ok(self.root_url.join(path)?)
    }
}

/// Stateful three-legged OAuth 1.0a session against one provider.
///
/// The held token pair moves from absent, to the unauthorized request
/// token after [`request_authorization_url`](Self::request_authorization_url),
/// to the access token after
/// [`exchange_for_access_token`](Self::exchange_for_access_token). Each
/// method performs at most one blocking network call and the pair is only
/// replaced once a response has been fully validated, so a failed step
/// leaves the session where it was.
///
/// Instances are not meant for concurrent reuse; keep one per logical
/// user session.
pub struct OAuthClient<T: Transport> {
    credentials: Credentials,
    token: Option<TokenPair>,
    endpoints: Endpoints,
    signature_method: SignatureMethod,
    transport: T,
}

impl<T: Transport> OAuthClient<T> {
    pub fn new(credentials: Credentials, endpoints: Endpoints, transport: T) -> Self {
        OAuthClient {
            credentials,
            token: None,
            endpoints,
            signature_method: SignatureMethod::HmacSha1,
            transport,
        }
    }

    /// Resumes a session with an already-acquired token pair, skipping the
    /// authorization flow.
    pub fn with_token(
        credentials: Credentials,
        endpoints: Endpoints,
        transport: T,
        token: TokenPair,
    ) -> Self {
        OAuthClient {
            token: Some(token),
            ..OAuthClient::new(credentials, endpoints, transport)
        }
    }

    /// The currently held token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(TokenPair::token)
    }

    /// The currently held token secret, if any.
    ///
    /// After [`request_authorization_url`](Self::request_authorization_url)
    /// this is the *unauthorized* token secret. Persist it: the access
    /// token exchange usually happens in a separate request or process and
    /// needs it back.
    pub fn token_secret(&self) -> Option<&str> {
        self.token.as_ref().map(TokenPair::secret)
    }

    /// First leg: obtains an unauthorized request token and returns the
    /// URL the end user has to visit to grant access.
    ///
    /// Sends a signed POST to the request-token endpoint, including
    /// `oauth_callback` when one is configured. On success the client
    /// holds the unauthorized token pair and the returned URL carries the
    /// retrieved token as `oauth_token`. On failure the held pair is
    /// untouched.
    pub fn request_authorization_url(&mut self) -> Result<Url> {
        let url = self.endpoints.resolve(&self.endpoints.request_token_path)?;
        let mut parameters = OAuthParameters::new().signature_method(self.signature_method);
        if let Some(ref callback) = self.endpoints.callback_url {
            parameters = parameters.callback(callback.clone());
        }
        let body = self.perform_signed(Method::POST, &url, &[], None, parameters)?;
        let response = token_reader::read_token_response(&body)?;

        let mut authorize = self.endpoints.resolve(&self.endpoints.authorize_path)?;
        authorize
            .query_pairs_mut()
            .append_pair(OAUTH_TOKEN_KEY, &response.oauth_token);
        self.token = Some(TokenPair::new(
            response.oauth_token,
            response.oauth_token_secret,
        ));
        Ok(authorize)
    }

    /// Third leg: exchanges the verified request token for an access
    /// token.
    ///
    /// `token` is the request token echoed back on the provider's
    /// redirect, `token_secret` the secret persisted after
    /// [`request_authorization_url`](Self::request_authorization_url), and
    /// `verifier` the `oauth_verifier` value (OAuth 1.0a; omitted from the
    /// request when `None`). On success the client holds the authorized
    /// pair and returns it; on failure the held pair is untouched.
    pub fn exchange_for_access_token(
        &mut self,
        token: &str,
        token_secret: &str,
        verifier: Option<&str>,
    ) -> Result<&TokenPair> {
        let url = self.endpoints.resolve(&self.endpoints.access_token_path)?;
        let mut parameters = OAuthParameters::new().signature_method(self.signature_method);
        if let Some(verifier) = verifier {
            parameters = parameters.verifier(verifier.to_string());
        }
        // the unauthorized pair signs this call but is not committed as
        // client state; only a fully validated response moves the session
        let unauthorized = TokenPair::new(token, token_secret);
        let body = self.perform_signed(Method::POST, &url, &[], Some(&unauthorized), parameters)?;
        let response = token_reader::read_token_response(&body)?;

        let authorized = TokenPair::new(response.oauth_token, response.oauth_token_secret);
        Ok(self.token.insert(authorized))
    }

    /// Performs a signed `GET` to `path` resolved against the API root and
    /// returns the raw response body.
    ///
    /// Signs with the currently held token pair; a client that has not
    /// completed the flow simply signs without a token.
    pub fn get(&self, path: &str, params: &[(String, String)]) -> Result<String> {
        self.request(Method::GET, path, params)
    }

    /// Performs a signed `POST` to `path` resolved against the API root
    /// and returns the raw response body.
    pub fn post(&self, path: &str, params: &[(String, String)]) -> Result<String> {
        self.request(Method::POST, path, params)
    }

    fn request(&self, method: Method, path: &str, params: &[(String, String)]) -> Result<String> {
        let url = self.endpoints.resolve(path)?;
        let parameters = OAuthParameters::new().signature_method(self.signature_method);
        self.perform_signed(method, &url, params, self.token.as_ref(), parameters)
    }

    fn perform_signed(
        &self,
        method: Method,
        url: &Url,
        extra: &[(String, String)],
        token: Option<&TokenPair>,
        parameters: OAuthParameters,
    ) -> Result<String> {
        let signer = Signer::new(&self.credentials, token, parameters);
        let signed = signer.signed_params(&method, url, extra);
        Ok(self.transport.perform(method, url, &signed)?)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::{Error, TransportError, TransportResult};
    use crate::{OAUTH_CALLBACK_KEY, OAUTH_SIGNATURE_KEY, OAUTH_VERIFIER_KEY};

    struct Recorded {
        method: Method,
        url: Url,
        params: Vec<(String, String)>,
    }

    struct MockTransport {
        responses: RefCell<Vec<TransportResult<String>>>,
        calls: RefCell<Vec<Recorded>>,
    }

    impl MockTransport {
        fn new(responses: Vec<TransportResult<String>>) -> Self {
            MockTransport {
                responses: RefCell::new(responses),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn call(&self, index: usize) -> Recorded {
            self.calls.borrow_mut().remove(index)
        }
    }

    impl Transport for MockTransport {
        fn perform(
            &self,
            method: Method,
            url: &Url,
            params: &[(String, String)],
        ) -> TransportResult<String> {
            self.calls.borrow_mut().push(Recorded {
                method,
                url: url.clone(),
                params: params.to_vec(),
            });
            self.responses.borrow_mut().remove(0)
        }
    }

    fn credentials() -> Credentials {
        Credentials::new("ck", "cs").unwrap()
    }

    fn endpoints() -> Endpoints {
        Endpoints::new(
            "https://api.example.com/v2/",
            "/v2/oauth/request_token/",
            "/v2/oauth/authorize/",
            "/v2/oauth/access_token/",
        )
        .unwrap()
    }

    fn value_of<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn authorization_url_carries_retrieved_token() {
        let transport =
            MockTransport::new(vec![Ok("oauth_token=reqtok&oauth_token_secret=reqsec\
                                        &oauth_callback_confirmed=true"
                .to_string())]);
        let mut client = OAuthClient::new(
            credentials(),
            endpoints().callback_url("https://consumer.example.com/ready"),
            &transport,
        );

        let auth_url = client.request_authorization_url().unwrap();
        assert_eq!(
            auth_url.as_str(),
            "https://api.example.com/v2/oauth/authorize/?oauth_token=reqtok"
        );
        assert_eq!(client.token(), Some("reqtok"));
        assert_eq!(client.token_secret(), Some("reqsec"));

        let call = transport.call(0);
        assert_eq!(call.method, Method::POST);
        assert_eq!(
            call.url.as_str(),
            "https://api.example.com/v2/oauth/request_token/"
        );
        assert_eq!(value_of(&call.params, "oauth_consumer_key"), Some("ck"));
        assert_eq!(
            value_of(&call.params, OAUTH_CALLBACK_KEY),
            Some("https://consumer.example.com/ready")
        );
        // no token held yet, none may be signed in
        assert_eq!(value_of(&call.params, OAUTH_TOKEN_KEY), None);
        assert!(value_of(&call.params, OAUTH_SIGNATURE_KEY).is_some());
    }

    #[test]
    fn authorization_url_without_callback_omits_it() {
        let transport = MockTransport::new(vec![Ok(
            "oauth_token=reqtok&oauth_token_secret=reqsec".to_string()
        )]);
        let mut client = OAuthClient::new(credentials(), endpoints(), &transport);
        client.request_authorization_url().unwrap();
        let call = transport.call(0);
        assert_eq!(value_of(&call.params, OAUTH_CALLBACK_KEY), None);
    }

    #[test]
    fn missing_token_secret_leaves_client_unauthenticated() {
        let transport = MockTransport::new(vec![Ok("oauth_token=reqtok".to_string())]);
        let mut client = OAuthClient::new(credentials(), endpoints(), &transport);
        let result = client.request_authorization_url();
        assert!(matches!(result, Err(Error::Protocol(_))));
        assert_eq!(client.token(), None);
        assert_eq!(client.token_secret(), None);
    }

    #[test]
    fn transport_failure_propagates_unchanged() {
        let transport = MockTransport::new(vec![Err(TransportError::Status {
            status: 401,
            body: "unauthorized".to_string(),
        })]);
        let mut client = OAuthClient::new(credentials(), endpoints(), &transport);
        let result = client.request_authorization_url();
        match result {
            Err(Error::Transport(TransportError::Status { status, body })) => {
                assert_eq!(status, 401);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("expected transport error, got {:?}", other.map(|u| u.to_string())),
        }
        assert_eq!(client.token(), None);
    }

    #[test]
    fn exchange_includes_verifier_when_supplied() {
        let transport = MockTransport::new(vec![Ok(
            "oauth_token=acctok&oauth_token_secret=accsec".to_string()
        )]);
        let mut client = OAuthClient::new(credentials(), endpoints(), &transport);
        let pair = client
            .exchange_for_access_token("reqtok", "reqsec", Some("pin123"))
            .unwrap()
            .clone();
        assert_eq!(pair, TokenPair::new("acctok", "accsec"));
        assert_eq!(client.token(), Some("acctok"));
        assert_eq!(client.token_secret(), Some("accsec"));

        let call = transport.call(0);
        assert_eq!(call.method, Method::POST);
        assert_eq!(
            call.url.as_str(),
            "https://api.example.com/v2/oauth/access_token/"
        );
        assert_eq!(value_of(&call.params, OAUTH_VERIFIER_KEY), Some("pin123"));
        // the exchange signs with the unauthorized token
        assert_eq!(value_of(&call.params, OAUTH_TOKEN_KEY), Some("reqtok"));
    }

    #[test]
    fn exchange_without_verifier_omits_it() {
        let transport = MockTransport::new(vec![Ok(
            "oauth_token=acctok&oauth_token_secret=accsec".to_string()
        )]);
        let mut client = OAuthClient::new(credentials(), endpoints(), &transport);
        client
            .exchange_for_access_token("reqtok", "reqsec", None)
            .unwrap();
        let call = transport.call(0);
        assert_eq!(value_of(&call.params, OAUTH_VERIFIER_KEY), None);
    }

    #[test]
    fn failed_exchange_keeps_previous_state() {
        let transport = MockTransport::new(vec![Ok("oauth_token=acctok".to_string())]);
        let held = TokenPair::new("oldtok", "oldsec");
        let mut client =
            OAuthClient::with_token(credentials(), endpoints(), &transport, held);
        let result = client.exchange_for_access_token("reqtok", "reqsec", Some("pin123"));
        assert!(matches!(result, Err(Error::Protocol(_))));
        assert_eq!(client.token(), Some("oldtok"));
        assert_eq!(client.token_secret(), Some("oldsec"));
    }

    #[test]
    fn get_signs_with_held_token() {
        let transport = MockTransport::new(vec![Ok("body".to_string())]);
        let client = OAuthClient::with_token(
            credentials(),
            endpoints(),
            &transport,
            TokenPair::new("acctok", "accsec"),
        );
        let body = client
            .get(
                "photos/",
                &[("page".to_string(), "1".to_string())],
            )
            .unwrap();
        assert_eq!(body, "body");

        let call = transport.call(0);
        assert_eq!(call.method, Method::GET);
        assert_eq!(call.url.as_str(), "https://api.example.com/v2/photos/");
        assert_eq!(value_of(&call.params, "page"), Some("1"));
        assert_eq!(value_of(&call.params, OAUTH_TOKEN_KEY), Some("acctok"));
        assert!(value_of(&call.params, OAUTH_SIGNATURE_KEY).is_some());
    }

    #[test]
    fn post_without_token_signs_tokenless() {
        let transport = MockTransport::new(vec![Ok("body".to_string())]);
        let client = OAuthClient::new(credentials(), endpoints(), &transport);
        client.post("photos/", &[]).unwrap();
        let call = transport.call(0);
        assert_eq!(call.method, Method::POST);
        assert_eq!(value_of(&call.params, OAUTH_TOKEN_KEY), None);
        assert!(value_of(&call.params, OAUTH_SIGNATURE_KEY).is_some());
    }
}
