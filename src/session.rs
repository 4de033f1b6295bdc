//! OAuth 1.0a token lifecycle and signed batch dispatch.
//!
//! [`ApiManager`] owns the consumer, request and access token pairs and walks the three-legged
//! handshake: obtain a request token, send the user to the authorization URL, trade the
//! approved request token for an access token, then sign batches with the access pair. A
//! manager resumed with a stored access pair skips straight to the last step.
//!
//! Each phase performs exactly one HTTP round trip. A phase that fails (transport error,
//! rejected status, malformed body) leaves every stored pair as it was.

pub mod exchange;

pub use exchange::*;

// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	call::ApiCall,
	endpoints::ApiEndpoints,
	error::{ConfigError, SessionError, TransportError},
	http::{ApiHttpClient, HttpMethod, HttpRequest, HttpResponse},
	obs::{self, PhaseKind, PhaseOutcome, PhaseSpan},
	request::{ApiRequest, RequestError},
	signature::{self, OAuthParameters},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

const REQUEST_FIELD: &str = "request";

#[cfg(feature = "reqwest")]
/// Manager specialized for the crate's default reqwest transport.
pub type ReqwestApiManager = ApiManager<ReqwestHttpClient>;

/// Handshake progress, derived from the stored pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
	/// Only the consumer pair is known.
	Unauthenticated,
	/// A request token is stored; the authorization URL can be built.
	RequestTokenObtained,
	/// An access token is stored; batches can be sent.
	AccessTokenObtained,
}

/// Drives the OAuth 1.0a handshake and sends signed batches for one consumer key.
///
/// Phase methods take `&mut self`, so one manager never has two requests in flight.
pub struct ApiManager<C>
where
	C: ?Sized + ApiHttpClient,
{
	http_client: Arc<C>,
	endpoints: ApiEndpoints,
	consumer: TokenPair,
	request_token: Option<TokenPair>,
	access_token: Option<TokenPair>,
}
impl<C> ApiManager<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates an unauthenticated manager on top of a caller-provided transport.
	///
	/// Fails when either consumer credential is blank.
	pub fn with_http_client(
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<String>,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		let consumer = TokenPair::new(
			non_blank("consumer key", consumer_key.into())?,
			non_blank("consumer secret", consumer_secret.into())?,
		);

		Ok(Self {
			http_client: http_client.into(),
			endpoints: ApiEndpoints::default(),
			consumer,
			request_token: None,
			access_token: None,
		})
	}

	/// Replaces the endpoint set.
	pub fn with_endpoints(mut self, endpoints: ApiEndpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Restores a request token obtained earlier, e.g. one the user already approved.
	pub fn with_request_token(
		mut self,
		key: impl Into<String>,
		secret: impl Into<String>,
	) -> Result<Self> {
		self.request_token = Some(TokenPair::new(
			non_blank("request token key", key.into())?,
			non_blank("request token secret", secret.into())?,
		));

		Ok(self)
	}

	/// Restores an access token obtained earlier, skipping the handshake.
	pub fn with_access_token(
		mut self,
		key: impl Into<String>,
		secret: impl Into<String>,
	) -> Result<Self> {
		self.access_token = Some(TokenPair::new(
			non_blank("access token key", key.into())?,
			non_blank("access token secret", secret.into())?,
		));

		Ok(self)
	}

	/// Current handshake progress.
	pub fn state(&self) -> SessionState {
		if self.access_token.is_some() {
			SessionState::AccessTokenObtained
		} else if self.request_token.is_some() {
			SessionState::RequestTokenObtained
		} else {
			SessionState::Unauthenticated
		}
	}

	/// Whether a request token is stored, so an authorization URL can be produced.
	pub fn url_obtained(&self) -> bool {
		self.request_token.is_some()
	}

	/// Whether an access token is stored, so batches can be sent.
	pub fn access_token_obtained(&self) -> bool {
		self.access_token.is_some()
	}

	/// Consumer pair supplied at construction.
	pub fn consumer(&self) -> &TokenPair {
		&self.consumer
	}

	/// Stored request pair, if any.
	pub fn request_token_pair(&self) -> Option<&TokenPair> {
		self.request_token.as_ref()
	}

	/// Stored access pair, if any. Persist it to resume later with
	/// [`ApiManager::with_access_token`].
	pub fn access_token_pair(&self) -> Option<&TokenPair> {
		self.access_token.as_ref()
	}

	/// Endpoint set in use.
	pub fn endpoints(&self) -> &ApiEndpoints {
		&self.endpoints
	}

	/// Transport handle.
	pub fn http_client(&self) -> &Arc<C> {
		&self.http_client
	}

	/// Phase 1: obtains a request token and stores it.
	pub async fn request_token(&mut self) -> Result<Exchange<TokenPair>> {
		const KIND: PhaseKind = PhaseKind::RequestToken;

		let span = PhaseSpan::new(KIND, "request_token");

		obs::record_phase_outcome(KIND, PhaseOutcome::Attempt);

		let result = span
			.instrument(async move {
				let endpoint = self.endpoints.request_token.clone();
				let exchange = self.exchange_token(&endpoint, None).await?;

				if let Exchange::Success(pair) = &exchange {
					self.request_token = Some(pair.clone());
				}

				Ok(exchange)
			})
			.await;

		obs::finish_phase(KIND, &span, &result);

		result
	}

	/// Phase 2: signs the authorization page URL with the stored request token.
	///
	/// The URL is the normalized endpoint followed by the sorted protocol parameters, then
	/// `oauth_signature` and `oauth_callback`. Nothing is sent; the user opens it in a browser.
	pub fn authorize_url(&self) -> Result<Url> {
		PhaseSpan::new(PhaseKind::RequestToken, "authorize_url").in_scope(|| self.sign_authorize_url())
	}

	/// Phases 1 and 2 together: obtains a request token, then returns the authorization URL.
	///
	/// A rejected or malformed request-token exchange is returned as is, with nothing stored.
	pub async fn get_authorize_url(&mut self) -> Result<Exchange<Url>> {
		match self.request_token().await? {
			Exchange::Success(_) => Ok(Exchange::Success(self.authorize_url()?)),
			Exchange::Rejected { status, body } => Ok(Exchange::Rejected { status, body }),
			Exchange::Malformed { body } => Ok(Exchange::Malformed { body }),
		}
	}

	fn sign_authorize_url(&self) -> Result<Url> {
		let request_token =
			self.request_token.as_ref().ok_or(SessionError::RequestTokenMissing)?;
		let endpoint = &self.endpoints.authorize;
		let params =
			OAuthParameters::fresh(self.consumer.key.clone(), Some(request_token.key.clone()));
		let signature = signature::sign(
			HttpMethod::Post,
			endpoint,
			&params,
			&[],
			self.consumer.secret.expose(),
			Some(request_token),
		)?;
		let mut url = endpoint.clone();

		url.set_fragment(None);
		url.set_query(Some(&format!(
			"{}&oauth_signature={}&oauth_callback={}",
			signature.normalized_parameters,
			signature::percent_encode(&signature.value),
			signature::percent_encode(self.endpoints.callback.as_str()),
		)));

		Ok(url)
	}

	/// Phase 3: trades the approved request token for an access token and stores it.
	///
	/// Fails with [`SessionError::RequestTokenMissing`] before any I/O when no request token
	/// is stored.
	pub async fn get_access_token(&mut self) -> Result<Exchange<TokenPair>> {
		const KIND: PhaseKind = PhaseKind::AccessToken;

		let span = PhaseSpan::new(KIND, "get_access_token");

		obs::record_phase_outcome(KIND, PhaseOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request_token =
					self.request_token.clone().ok_or(SessionError::RequestTokenMissing)?;
				let endpoint = self.endpoints.access_token.clone();
				let exchange = self.exchange_token(&endpoint, Some(&request_token)).await?;

				if let Exchange::Success(pair) = &exchange {
					self.access_token = Some(pair.clone());
				}

				Ok(exchange)
			})
			.await;

		obs::finish_phase(KIND, &span, &result);

		result
	}

	/// Sends `request` as one signed batch and returns the raw response body.
	///
	/// Fails before any I/O with [`RequestError::Empty`] for an empty batch and with
	/// [`SessionError::AccessTokenMissing`] when no access token is stored. Compulsory
	/// parameters are not checked here; see [`ApiRequest::validate`].
	pub async fn send_request(&mut self, request: &ApiRequest) -> Result<Exchange<String>> {
		const KIND: PhaseKind = PhaseKind::Batch;

		let span = PhaseSpan::new(KIND, "send_request");

		obs::record_phase_outcome(KIND, PhaseOutcome::Attempt);

		let result = span
			.instrument(async move {
				if request.is_empty() {
					return Err(RequestError::Empty.into());
				}

				let access_token =
					self.access_token.as_ref().ok_or(SessionError::AccessTokenMissing)?;
				let form = vec![(REQUEST_FIELD.to_owned(), request.to_wire_fragment())];
				let response =
					self.dispatch(&self.endpoints.batch, form, Some(access_token)).await?;

				Ok(if response.is_ok() {
					Exchange::Success(response.body)
				} else {
					Exchange::Rejected { status: response.status, body: response.body }
				})
			})
			.await;

		obs::finish_phase(KIND, &span, &result);

		result
	}

	/// Sends a single call as its own batch.
	pub async fn send_call(&mut self, call: ApiCall) -> Result<Exchange<String>> {
		self.send_request(&ApiRequest::with_call(call)).await
	}

	async fn exchange_token(
		&self,
		endpoint: &Url,
		token: Option<&TokenPair>,
	) -> Result<Exchange<TokenPair>> {
		let response = self.dispatch(endpoint, Vec::new(), token).await?;

		if !response.is_ok() {
			return Ok(Exchange::Rejected { status: response.status, body: response.body });
		}

		Ok(match TokenPair::from_response_body(&response.body) {
			Some(pair) => Exchange::Success(pair),
			None => Exchange::Malformed { body: response.body },
		})
	}

	async fn dispatch(
		&self,
		endpoint: &Url,
		form: Vec<(String, String)>,
		token: Option<&TokenPair>,
	) -> Result<HttpResponse> {
		let params =
			OAuthParameters::fresh(self.consumer.key.clone(), token.map(|pair| pair.key.clone()));
		let signature = signature::sign(
			HttpMethod::Post,
			endpoint,
			&params,
			&form,
			self.consumer.secret.expose(),
			token,
		)?;
		let request = HttpRequest {
			method: HttpMethod::Post,
			url: endpoint.clone(),
			form,
			authorization: signature.authorization_header(&params),
		};

		self.http_client
			.execute(request)
			.await
			.map_err(|e| TransportError::network(endpoint, e).into())
	}
}
#[cfg(feature = "reqwest")]
impl ApiManager<ReqwestHttpClient> {
	/// Creates an unauthenticated manager backed by a default reqwest client.
	pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Result<Self> {
		Self::with_http_client(consumer_key, consumer_secret, ReqwestHttpClient::default())
	}

	/// Creates a manager that already holds an access token, ready to send batches.
	pub fn resume(
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<String>,
		access_key: impl Into<String>,
		access_secret: impl Into<String>,
	) -> Result<Self> {
		Self::new(consumer_key, consumer_secret)?.with_access_token(access_key, access_secret)
	}
}
impl<C> Debug for ApiManager<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiManager")
			.field("endpoints", &self.endpoints)
			.field("consumer", &self.consumer)
			.field("request_token", &self.request_token)
			.field("access_token", &self.access_token)
			.finish_non_exhaustive()
	}
}

fn non_blank(field: &'static str, value: String) -> Result<String, ConfigError> {
	if value.trim().is_empty() {
		return Err(ConfigError::BlankCredential { field });
	}

	Ok(value)
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	fn manager(reply: &Arc<RecordingHttpClient>) -> ApiManager<RecordingHttpClient> {
		ApiManager::<RecordingHttpClient>::with_http_client(
			TEST_CONSUMER_KEY,
			TEST_CONSUMER_SECRET,
			reply.clone(),
		)
		.expect("Test consumer credentials should be accepted.")
		.with_endpoints(test_endpoints("http://api.example.com"))
	}

	#[test]
	fn blank_consumer_credentials_are_rejected() {
		let client = Arc::new(RecordingHttpClient::replying(200, ""));
		let err = ApiManager::<RecordingHttpClient>::with_http_client(" ", "s", client.clone())
			.expect_err("Blank consumer key should be rejected.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::BlankCredential { field: "consumer key" })
		));

		let err = ApiManager::<RecordingHttpClient>::with_http_client("key", "", client)
			.expect_err("Blank consumer secret should be rejected.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::BlankCredential { field: "consumer secret" })
		));
	}

	#[test]
	fn state_follows_stored_pairs() {
		let client = Arc::new(RecordingHttpClient::replying(200, ""));
		let fresh = manager(&client);

		assert_eq!(fresh.state(), SessionState::Unauthenticated);
		assert!(!fresh.url_obtained());
		assert!(!fresh.access_token_obtained());

		let pending = manager(&client)
			.with_request_token("abc", "def")
			.expect("Request token should be accepted.");

		assert_eq!(pending.state(), SessionState::RequestTokenObtained);
		assert!(pending.url_obtained());

		let resumed =
			manager(&client).with_access_token("k", "s").expect("Access token should be accepted.");

		assert_eq!(resumed.state(), SessionState::AccessTokenObtained);
		assert!(resumed.access_token_obtained());
		assert!(!resumed.url_obtained());
	}

	#[test]
	fn authorize_url_requires_request_token() {
		let client = Arc::new(RecordingHttpClient::replying(200, ""));
		let err = manager(&client).authorize_url().expect_err("Missing request token should fail.");

		assert!(matches!(err, Error::Session(SessionError::RequestTokenMissing)));
		assert_eq!(client.calls(), 0);
	}

	#[test]
	fn authorize_url_carries_signature_and_callback_last() {
		let client = Arc::new(RecordingHttpClient::replying(200, ""));
		let manager = manager(&client)
			.with_request_token("abc123", "def456")
			.expect("Request token should be accepted.");
		let url = manager.authorize_url().expect("Authorization URL should be built.");
		let query = url.query().expect("Authorization URL should carry a query.");

		assert_eq!(url.path(), "/auth/authorize.php");
		assert!(query.starts_with("oauth_consumer_key=consumer-key&oauth_nonce="));
		assert!(query.contains("&oauth_token=abc123&oauth_version=1.0&oauth_signature="));
		assert!(query.ends_with("&oauth_callback=http%3A%2F%2Fapi.example.com%2F"));
		assert_eq!(client.calls(), 0);
	}

	#[tokio::test]
	async fn malformed_token_body_reports_teapot_and_stores_nothing() {
		let client = Arc::new(RecordingHttpClient::replying(200, "oauth_token=abc123"));
		let mut manager = manager(&client);
		let exchange = manager.get_authorize_url().await.expect("Exchange should complete.");

		assert_eq!(exchange.status(), MALFORMED_STATUS);
		assert!(!manager.url_obtained());
		assert_eq!(client.calls(), 1);
	}

	#[tokio::test]
	async fn authorize_url_phase_stores_request_pair() {
		let client = Arc::new(RecordingHttpClient::replying(
			200,
			"oauth_token=abc123&oauth_token_secret=def456",
		));
		let mut manager = manager(&client);
		let url = manager
			.get_authorize_url()
			.await
			.expect("Exchange should complete.")
			.ok()
			.expect("Request token phase should succeed.");

		assert!(manager.url_obtained());
		assert_eq!(manager.request_token_pair(), Some(&TokenPair::new("abc123", "def456")));
		assert!(url.as_str().starts_with("http://api.example.com/auth/authorize.php?"));
		assert!(url.query().is_some_and(|query| query.contains("oauth_token=abc123")));

		let requests = client.requests();

		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].url.as_str(), "http://api.example.com/auth/request_token.php");
		assert!(requests[0].form.is_empty());
		assert!(!requests[0].authorization.contains("oauth_token="));
	}

	#[tokio::test]
	async fn malformed_access_token_body_keeps_request_pair() {
		let client = Arc::new(RecordingHttpClient::replying(200, "oauth_token_secret=ddd444"));
		let mut manager = manager(&client)
			.with_request_token("aaa111", "bbb222")
			.expect("Request token should be accepted.");
		let exchange = manager.get_access_token().await.expect("Exchange should complete.");

		assert_eq!(exchange.status(), MALFORMED_STATUS);
		assert!(
			matches!(exchange, Exchange::Malformed { ref body } if body == "oauth_token_secret=ddd444")
		);
		assert!(!manager.access_token_obtained());
		assert_eq!(manager.access_token_pair(), None);
		assert_eq!(manager.request_token_pair(), Some(&TokenPair::new("aaa111", "bbb222")));
		assert_eq!(manager.state(), SessionState::RequestTokenObtained);

		let requests = client.requests();

		assert_eq!(requests[0].url.as_str(), "http://api.example.com/auth/access_token.php");
		assert!(requests[0].authorization.contains("oauth_token=\"aaa111\""));
	}

	#[tokio::test]
	async fn access_token_phase_requires_request_token() {
		let client = Arc::new(RecordingHttpClient::replying(200, ""));
		let mut manager = manager(&client);
		let err = manager.get_access_token().await.expect_err("Phase order should be enforced.");

		assert!(matches!(err, Error::Session(SessionError::RequestTokenMissing)));
		assert_eq!(client.calls(), 0);
	}

	#[tokio::test]
	async fn send_request_checks_preconditions_before_io() {
		let client = Arc::new(RecordingHttpClient::replying(200, "{}"));
		let mut unauthenticated = manager(&client);
		let call = ApiCall::new("general.getTips").expect("Call name should be accepted.");
		let err = unauthenticated
			.send_call(call)
			.await
			.expect_err("Missing access token should be reported.");

		assert!(matches!(err, Error::Session(SessionError::AccessTokenMissing)));

		let mut resumed =
			manager(&client).with_access_token("k", "s").expect("Access token should be accepted.");
		let err = resumed
			.send_request(&ApiRequest::new())
			.await
			.expect_err("Empty batch should be reported.");

		assert!(matches!(err, Error::Request(RequestError::Empty)));
		assert_eq!(client.calls(), 0);
	}

	#[tokio::test]
	async fn batch_is_posted_as_signed_request_field() {
		let client = Arc::new(RecordingHttpClient::replying(200, "{\"general.getTips\":{}}"));
		let mut manager =
			manager(&client).with_access_token("k", "s").expect("Access token should be accepted.");
		let call = ApiCall::new("general.getTips").expect("Call name should be accepted.");
		let exchange = manager.send_call(call).await.expect("Batch should be sent.");

		assert_eq!(exchange.ok().as_deref(), Some("{\"general.getTips\":{}}"));

		let requests = client.requests();
		let sent = &requests[0];

		assert_eq!(sent.method, HttpMethod::Post);
		assert_eq!(sent.url.as_str(), "http://api.example.com/");
		assert_eq!(
			sent.form,
			[(
				"request".to_owned(),
				r#"[{"call":"general.getTips","params":{},"itemsFilter":[],"contextFilter":[]}]"#
					.to_owned(),
			)],
		);
		assert!(sent.authorization.starts_with("OAuth oauth_consumer_key=\"consumer-key\""));
		assert!(sent.authorization.contains("oauth_token=\"k\""));
	}

	#[test]
	fn debug_output_redacts_secrets() {
		let client = Arc::new(RecordingHttpClient::replying(200, ""));
		let manager =
			manager(&client).with_access_token("k", "hunter2").expect("Access token should be accepted.");
		let rendered = format!("{manager:?}");

		assert!(!rendered.contains(TEST_CONSUMER_SECRET));
		assert!(!rendered.contains("hunter2"));
	}
}
