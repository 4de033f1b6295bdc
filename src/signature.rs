//! OAuth 1.0a HMAC-SHA1 request signing (RFC 5849 §3.4).
//!
//! Everything here is a pure function of its inputs. [`OAuthParameters::fresh`] is the only
//! entry point that reads the clock or the RNG; tests build parameters with a fixed nonce and
//! timestamp through [`OAuthParameters::new`] to get byte-identical signatures.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::{Rng, distr::Alphanumeric};
use sha1::Sha1;
use time::OffsetDateTime;
// self
use crate::{_prelude::*, auth::TokenPair, error::ConfigError, http::HttpMethod};

/// Value of `oauth_signature_method`.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
/// Value of `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";

const NONCE_LEN: usize = 32;
// RFC 5849 §3.6: everything but ALPHA, DIGIT, '-', '.', '_', '~' is escaped.
const OAUTH_ENCODE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

type HmacSha1 = Hmac<Sha1>;

/// Protocol parameters attached to every signed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthParameters {
	/// `oauth_consumer_key`.
	pub consumer_key: String,
	/// `oauth_token`; absent while requesting a request token.
	pub token: Option<String>,
	/// `oauth_nonce`.
	pub nonce: String,
	/// `oauth_timestamp`, Unix seconds.
	pub timestamp: i64,
}
impl OAuthParameters {
	/// Builds parameters with an explicit nonce and timestamp.
	pub fn new(
		consumer_key: impl Into<String>,
		token: Option<String>,
		nonce: impl Into<String>,
		timestamp: i64,
	) -> Self {
		Self { consumer_key: consumer_key.into(), token, nonce: nonce.into(), timestamp }
	}

	/// Builds parameters with a fresh nonce and the current timestamp.
	pub fn fresh(consumer_key: impl Into<String>, token: Option<String>) -> Self {
		Self::new(consumer_key, token, nonce(), timestamp())
	}

	/// Protocol parameters as unencoded name/value pairs, `oauth_signature` excluded.
	pub fn pairs(&self) -> Vec<(String, String)> {
		let mut pairs = vec![
			("oauth_consumer_key".to_owned(), self.consumer_key.clone()),
			("oauth_nonce".to_owned(), self.nonce.clone()),
			("oauth_signature_method".to_owned(), SIGNATURE_METHOD.to_owned()),
			("oauth_timestamp".to_owned(), self.timestamp.to_string()),
		];

		if let Some(token) = &self.token {
			pairs.push(("oauth_token".to_owned(), token.clone()));
		}

		pairs.push(("oauth_version".to_owned(), OAUTH_VERSION.to_owned()));

		pairs
	}
}

/// Result of signing one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
	/// Scheme, authority and path of the signed URL.
	pub normalized_url: String,
	/// Sorted, percent-encoded parameter string that went into the base string.
	pub normalized_parameters: String,
	/// Base64 HMAC-SHA1 digest.
	pub value: String,
}
impl Signature {
	/// Renders the `Authorization: OAuth ...` header value for `params`.
	pub fn authorization_header(&self, params: &OAuthParameters) -> String {
		let mut header = String::from("OAuth ");
		let mut pairs = params.pairs();

		pairs.push(("oauth_signature".to_owned(), self.value.clone()));
		pairs.sort();

		for (idx, (name, value)) in pairs.iter().enumerate() {
			if idx > 0 {
				header.push_str(", ");
			}

			header.push_str(&format!("{}=\"{}\"", percent_encode(name), percent_encode(value)));
		}

		header
	}
}

/// Unix timestamp in seconds.
pub fn timestamp() -> i64 {
	OffsetDateTime::now_utc().unix_timestamp()
}

/// Fresh random nonce, unique per request.
pub fn nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}

/// Percent-encodes `value` with the OAuth unreserved set.
pub fn percent_encode(value: &str) -> String {
	utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Scheme and host lowercased, default ports dropped, query and fragment removed.
pub fn normalize_url(url: &Url) -> String {
	let scheme = url.scheme().to_ascii_lowercase();
	let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

	match url.port() {
		Some(port) => format!("{scheme}://{host}:{port}{}", url.path()),
		None => format!("{scheme}://{host}{}", url.path()),
	}
}

/// Encodes every pair, sorts by name then value, and joins them with `&`.
pub fn normalize_parameters<'a, I>(params: I) -> String
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let mut encoded = params
		.into_iter()
		.map(|(name, value)| (percent_encode(name), percent_encode(value)))
		.collect::<Vec<_>>();

	encoded.sort();
	encoded.into_iter().map(|(name, value)| format!("{name}={value}")).collect::<Vec<_>>().join("&")
}

/// Joins method, normalized URL and normalized parameters into the signature base string.
pub fn base_string(method: HttpMethod, normalized_url: &str, normalized_parameters: &str) -> String {
	format!(
		"{}&{}&{}",
		method.as_str(),
		percent_encode(normalized_url),
		percent_encode(normalized_parameters)
	)
}

/// HMAC-SHA1 over `base`, keyed with `enc(consumer_secret)&enc(token_secret)`, base64 encoded.
pub fn hmac_sha1(base: &str, consumer_secret: &str, token_secret: &str) -> Result<String> {
	let key = format!("{}&{}", percent_encode(consumer_secret), percent_encode(token_secret));
	let mut mac = HmacSha1::new_from_slice(key.as_bytes()).map_err(|_| ConfigError::SigningKey)?;

	mac.update(base.as_bytes());

	Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Signs a request to `url`.
///
/// The parameter set is the protocol parameters, any query parameters already present on
/// `url`, and the form parameters in `extra`. `token` supplies the token secret and must match
/// `params.token`; pass `None` while requesting a request token.
pub fn sign(
	method: HttpMethod,
	url: &Url,
	params: &OAuthParameters,
	extra: &[(String, String)],
	consumer_secret: &str,
	token: Option<&TokenPair>,
) -> Result<Signature> {
	let protocol = params.pairs();
	let query = url.query_pairs().into_owned().collect::<Vec<_>>();
	let normalized_url = normalize_url(url);
	let normalized_parameters = normalize_parameters(
		protocol
			.iter()
			.chain(query.iter())
			.chain(extra.iter())
			.map(|(name, value)| (name.as_str(), value.as_str())),
	);
	let base = base_string(method, &normalized_url, &normalized_parameters);
	let token_secret = token.map(|pair| pair.secret.expose()).unwrap_or_default();
	let value = hmac_sha1(&base, consumer_secret, token_secret)?;

	Ok(Signature { normalized_url, normalized_parameters, value })
}
