//! Client-level error types shared across calls, batches, sessions, and transports.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Every variant except [`Error::Transport`] is raised locally, before any network I/O.
/// Non-200 responses are not errors; they surface as [`Exchange`](crate::session::Exchange)
/// values so callers can branch on the raw status code.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS) where no HTTP status exists.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// OAuth phase invoked out of order.
	#[error(transparent)]
	Session(#[from] SessionError),
	/// Parameter contract violation on a single call.
	#[error(transparent)]
	Call(#[from] crate::call::CallError),
	/// Batch-level contract violation.
	#[error(transparent)]
	Request(#[from] crate::request::RequestError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] crate::response::DecodeError),
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A consumer credential was empty or whitespace.
	#[error("The {field} must not be blank.")]
	BlankCredential {
		/// Which credential failed validation.
		field: &'static str,
	},
	/// Endpoint set failed validation.
	#[error(transparent)]
	Endpoints(#[from] crate::endpoints::EndpointsError),
	/// HMAC rejected the signing key.
	#[error("HMAC-SHA1 signing key was rejected.")]
	SigningKey,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// Endpoint URL the request targeted.
		endpoint: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error raised while calling `endpoint`.
	pub fn network(endpoint: &Url, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { endpoint: endpoint.to_string(), source: Box::new(src) }
	}
}

/// OAuth state-machine precondition failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
pub enum SessionError {
	/// No request token has been obtained yet.
	#[error("There is no request token to authorize; obtain one first.")]
	RequestTokenMissing,
	/// No access token has been obtained yet.
	#[error("There is no access token; complete the authorization first.")]
	AccessTokenMissing,
}
