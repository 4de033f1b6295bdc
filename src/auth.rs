//! OAuth 1.0a credentials: the consumer, request and access token pairs.

// std
use std::sync::LazyLock;
// crates.io
use regex::Regex;
// self
use crate::_prelude::*;

static TOKEN_PAIR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"oauth_token=(?P<token>[0-9a-f]+)&oauth_token_secret=(?P<token_secret>[0-9a-f]+)")
		.expect("Token pair pattern should compile.")
});

/// Secret half of a token pair.
///
/// Only the signing key derivation reads it; `Debug` and `Display` never print it.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a secret.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw secret, for signing only.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Whether the secret is empty or whitespace.
	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for TokenSecret {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenSecret(***)")
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("***")
	}
}

/// Public key plus secret issued for a consumer, a request token, or an access token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Public part, sent in clear as `oauth_consumer_key` or `oauth_token`.
	pub key: String,
	/// Secret part, only ever used to derive the signing key.
	pub secret: TokenSecret,
}
impl TokenPair {
	/// Creates a pair from its public and secret parts.
	pub fn new(key: impl Into<String>, secret: impl Into<TokenSecret>) -> Self {
		Self { key: key.into(), secret: secret.into() }
	}

	/// Extracts the pair from a token endpoint body shaped like
	/// `oauth_token=<hex>&oauth_token_secret=<hex>`.
	///
	/// Returns `None` when either part is missing, so a half-parsed body is never taken for a
	/// usable credential.
	pub fn from_response_body(body: &str) -> Option<Self> {
		let captures = TOKEN_PAIR_PATTERN.captures(body)?;

		Some(Self::new(&captures["token"], &captures["token_secret"]))
	}

	/// Whether either part is empty or whitespace.
	pub fn is_blank(&self) -> bool {
		self.key.trim().is_empty() || self.secret.is_blank()
	}
}
