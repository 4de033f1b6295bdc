//! Transport primitives for signed API exchanges.
//!
//! The module exposes [`ApiHttpClient`] alongside the plain [`HttpRequest`] and
//! [`HttpResponse`] values it trades in, so downstream crates can plug in custom HTTP stacks
//! (or test doubles) without the transport ever learning about OAuth. The session layer
//! signs the request, renders the `Authorization` header, and hands the transport a fully
//! formed request; the transport hands back the status code and the raw body.

// self
use crate::_prelude::*;

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type TransportFuture<'a, E> = Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing one signed request.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared behind an
/// [`Arc`] across manager instances, and the futures they return must be `Send` so
/// callers can drive them on any executor. A transport performs exactly one round trip per
/// call: no retries, no redirects, no background work.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport when no HTTP status is available.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes `request` and resolves once the full response body has been read.
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError>;
}

/// HTTP methods used by the OAuth handshake and the batch endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
	/// `GET`.
	Get,
	#[default]
	/// `POST`.
	Post,
}
impl HttpMethod {
	/// Upper-case method name, as it appears in the signature base string.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// One outbound request, already signed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
	/// Request method.
	pub method: HttpMethod,
	/// Target URL.
	pub url: Url,
	/// Form parameters, sent url-encoded in the body (or the query string for `GET`).
	pub form: Vec<(String, String)>,
	/// Value of the `Authorization` header.
	pub authorization: String,
}
impl HttpRequest {
	/// Renders [`HttpRequest::form`] as an `application/x-www-form-urlencoded` string.
	pub fn encoded_form(&self) -> String {
		url::form_urlencoded::Serializer::new(String::new()).extend_pairs(&self.form).finish()
	}
}

/// Status code and raw body of one response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body decoded as UTF-8 (lossy).
	pub body: String,
}
impl HttpResponse {
	/// Whether the status is `200 OK`, the only success the API defines.
	pub fn is_ok(&self) -> bool {
		self.status == 200
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// OAuth endpoints answer directly; configure any custom [`ReqwestClient`] to disable
/// redirect following so a redirect surfaces as its own status code instead of a silently
/// re-targeted (and no longer correctly signed) request.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that never follows redirects and gives up after `timeout`.
	pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.timeout(timeout)
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl std::ops::Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let builder = match request.method {
				HttpMethod::Get => {
					let mut url = request.url.clone();

					url.query_pairs_mut().extend_pairs(&request.form);

					client.get(url)
				},
				HttpMethod::Post => client
					.post(request.url.clone())
					.header(
						reqwest::header::CONTENT_TYPE,
						"application/x-www-form-urlencoded",
					)
					.body(request.encoded_form()),
			};
			let response = builder
				.header(reqwest::header::AUTHORIZATION, request.authorization.as_str())
				.send()
				.await?;
			let status = response.status().as_u16();
			let bytes = response.bytes().await?;

			Ok::<_, ReqwestError>(HttpResponse {
				status,
				body: String::from_utf8_lossy(&bytes).into_owned(),
			})
		})
	}
}
