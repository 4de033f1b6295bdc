//! OAuth 1.0a client with typed, batched API calls: drive the request/authorize/access token
//! dance and ship signed JSON call batches in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod call;
pub mod catalogue;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod obs;
pub mod request;
pub mod response;
pub mod session;
pub mod signature;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for unit and integration tests; enabled via
	//! `cfg(test)` or the `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use crate::{
		endpoints::ApiEndpoints,
		http::{ApiHttpClient, HttpRequest, HttpResponse, ReqwestHttpClient, TransportFuture},
		session::ApiManager,
	};

	/// Manager type alias used by reqwest-backed integration tests.
	pub type ReqwestTestManager = ApiManager<ReqwestHttpClient>;

	/// Consumer key shared by integration tests.
	pub const TEST_CONSUMER_KEY: &str = "consumer-key";
	/// Consumer secret shared by integration tests.
	pub const TEST_CONSUMER_SECRET: &str = "consumer-secret";

	/// Builds a reqwest transport that accepts the self-signed certificates `httpmock` serves.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Insecure reqwest client for tests should build.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds endpoints rooted at a mock server origin (e.g. `httpmock::MockServer::base_url`).
	pub fn test_endpoints(base: &str) -> ApiEndpoints {
		let base = Url::parse(&format!("{}/", base.trim_end_matches('/')))
			.expect("Mock server base URL should parse.");

		ApiEndpoints::from_base(base).expect("Endpoints derived from the mock server should be valid.")
	}

	/// Constructs an unauthenticated [`ApiManager`] pointed at the provided mock server origin.
	pub fn build_reqwest_test_manager(base: &str) -> ReqwestTestManager {
		ApiManager::<ReqwestHttpClient>::with_http_client(
			TEST_CONSUMER_KEY,
			TEST_CONSUMER_SECRET,
			test_reqwest_http_client(),
		)
		.expect("Test consumer credentials should be accepted.")
		.with_endpoints(test_endpoints(base))
	}

	/// Constructs an [`ApiManager`] that already holds an access token pair.
	pub fn build_reqwest_resumed_manager(
		base: &str,
		access_key: &str,
		access_secret: &str,
	) -> ReqwestTestManager {
		build_reqwest_test_manager(base)
			.with_access_token(access_key, access_secret)
			.expect("Test access token should be accepted.")
	}

	/// Transport double that records every request and replays a canned response.
	#[derive(Debug)]
	pub struct RecordingHttpClient {
		calls: AtomicUsize,
		requests: Mutex<Vec<HttpRequest>>,
		reply: HttpResponse,
	}
	impl RecordingHttpClient {
		/// Creates a client that answers every request with `status` and `body`.
		pub fn replying(status: u16, body: impl Into<String>) -> Self {
			Self {
				calls: AtomicUsize::new(0),
				requests: Default::default(),
				reply: HttpResponse { status, body: body.into() },
			}
		}

		/// Number of requests dispatched so far.
		pub fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}

		/// Snapshot of every request dispatched so far.
		pub fn requests(&self) -> Vec<HttpRequest> {
			self.requests.lock().clone()
		}
	}
	impl ApiHttpClient for RecordingHttpClient {
		type TransportError = std::io::Error;

		fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.requests.lock().push(request);

			let reply = self.reply.clone();

			Box::pin(async move { Ok(reply) })
		}
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
