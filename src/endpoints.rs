//! Endpoint set used by the OAuth handshake and the batch API.

// std
use std::sync::LazyLock;
// self
use crate::_prelude::*;

const DEFAULT_BASE: &str = "http://www.urban-rivals.com/api/";
const REQUEST_TOKEN_PATH: &str = "auth/request_token.php";
const AUTHORIZE_PATH: &str = "auth/authorize.php";
const ACCESS_TOKEN_PATH: &str = "auth/access_token.php";

static DEFAULT_ENDPOINTS: LazyLock<ApiEndpoints> = LazyLock::new(|| {
	let base = Url::parse(DEFAULT_BASE).expect("Default API base should parse.");

	ApiEndpoints::from_base(base).expect("Default API endpoints should validate.")
});

/// Errors raised while constructing or validating endpoint sets.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum EndpointsError {
	/// A required endpoint was not supplied.
	#[error("Missing {endpoint} endpoint.")]
	Missing {
		/// Which endpoint is missing.
		endpoint: &'static str,
	},
	/// Endpoints must use HTTP or HTTPS.
	#[error("The {endpoint} endpoint must use HTTP or HTTPS: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// API endpoints must share the request-token endpoint's origin.
	#[error("The {endpoint} endpoint is not on the API origin: {url}.")]
	CrossOrigin {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// A standard path could not be joined onto the base URL.
	#[error("The base URL cannot hold API paths: {url}.")]
	InvalidBase {
		/// Base URL that was rejected.
		url: String,
	},
}

/// Endpoints the client talks to.
///
/// The four API endpoints must share one origin. The callback is where the browser lands after
/// the user approves the request token and is not contacted by the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpoints {
	/// Phase 1: request token issuance.
	pub request_token: Url,
	/// Phase 2: browser-visited authorization page.
	pub authorize: Url,
	/// Phase 3: access token exchange.
	pub access_token: Url,
	/// Signed batch endpoint.
	pub batch: Url,
	/// Callback appended to the authorization URL.
	pub callback: Url,
}
impl ApiEndpoints {
	/// Creates a new builder.
	pub fn builder() -> ApiEndpointsBuilder {
		ApiEndpointsBuilder::default()
	}

	/// Derives the standard endpoint layout under `base`.
	///
	/// `base` is treated as a directory: the token endpoints live under its `auth/` child
	/// (`auth/request_token.php`, `auth/authorize.php`, `auth/access_token.php`), the batch
	/// endpoint is `base` itself, and the callback is the origin root.
	pub fn from_base(mut base: Url) -> Result<Self, EndpointsError> {
		check_scheme("base", &base)?;

		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());

			base.set_path(&path);
		}

		base.set_query(None);
		base.set_fragment(None);

		let join = |path: &str| {
			base.join(path).map_err(|_| EndpointsError::InvalidBase { url: base.to_string() })
		};
		let endpoints = Self {
			request_token: join(REQUEST_TOKEN_PATH)?,
			authorize: join(AUTHORIZE_PATH)?,
			access_token: join(ACCESS_TOKEN_PATH)?,
			callback: join("/")?,
			batch: base.clone(),
		};

		endpoints.validate()?;

		Ok(endpoints)
	}

	/// Validates schemes and the shared origin.
	pub fn validate(&self) -> Result<(), EndpointsError> {
		for (endpoint, url) in self.labelled() {
			check_scheme(endpoint, url)?;
		}

		let origin = self.request_token.origin();

		for (endpoint, url) in self.labelled().into_iter().take(4) {
			if url.origin() != origin {
				return Err(EndpointsError::CrossOrigin { endpoint, url: url.to_string() });
			}
		}

		Ok(())
	}

	fn labelled(&self) -> [(&'static str, &Url); 5] {
		[
			("request_token", &self.request_token),
			("authorize", &self.authorize),
			("access_token", &self.access_token),
			("batch", &self.batch),
			("callback", &self.callback),
		]
	}
}
impl Default for ApiEndpoints {
	fn default() -> Self {
		DEFAULT_ENDPOINTS.clone()
	}
}

/// Builder for [`ApiEndpoints`] values.
#[derive(Clone, Debug, Default)]
pub struct ApiEndpointsBuilder {
	/// Request token endpoint.
	pub request_token: Option<Url>,
	/// Authorization page.
	pub authorize: Option<Url>,
	/// Access token endpoint.
	pub access_token: Option<Url>,
	/// Batch endpoint.
	pub batch: Option<Url>,
	/// Callback URL.
	pub callback: Option<Url>,
}
impl ApiEndpointsBuilder {
	/// Sets the request token endpoint.
	pub fn request_token(mut self, url: Url) -> Self {
		self.request_token = Some(url);

		self
	}

	/// Sets the authorization page.
	pub fn authorize(mut self, url: Url) -> Self {
		self.authorize = Some(url);

		self
	}

	/// Sets the access token endpoint.
	pub fn access_token(mut self, url: Url) -> Self {
		self.access_token = Some(url);

		self
	}

	/// Sets the batch endpoint.
	pub fn batch(mut self, url: Url) -> Self {
		self.batch = Some(url);

		self
	}

	/// Sets the callback URL.
	pub fn callback(mut self, url: Url) -> Self {
		self.callback = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting endpoint set.
	pub fn build(self) -> Result<ApiEndpoints, EndpointsError> {
		let endpoints = ApiEndpoints {
			request_token: self
				.request_token
				.ok_or(EndpointsError::Missing { endpoint: "request_token" })?,
			authorize: self.authorize.ok_or(EndpointsError::Missing { endpoint: "authorize" })?,
			access_token: self
				.access_token
				.ok_or(EndpointsError::Missing { endpoint: "access_token" })?,
			batch: self.batch.ok_or(EndpointsError::Missing { endpoint: "batch" })?,
			callback: self.callback.ok_or(EndpointsError::Missing { endpoint: "callback" })?,
		};

		endpoints.validate()?;

		Ok(endpoints)
	}
}

fn check_scheme(endpoint: &'static str, url: &Url) -> Result<(), EndpointsError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(EndpointsError::UnsupportedScheme { endpoint, url: url.to_string() }),
	}
}
