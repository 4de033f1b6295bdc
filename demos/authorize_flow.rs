//! Walks the full OAuth 1.0a handshake against an in-process mock of the API, then sends a
//! signed batch and reads one section of the response.

// crates.io
use color_eyre::{Result, eyre::eyre};
use httpmock::prelude::*;
use serde::Deserialize;
use url::Url;
// self
use oauth1_batch::{
	catalogue,
	endpoints::ApiEndpoints,
	http::ReqwestHttpClient,
	request::ApiRequest,
	reqwest,
	response::BatchResponse,
	session::{ApiManager, Exchange},
};

#[derive(Debug, Deserialize)]
struct Clan {
	name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let request_token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/request_token.php");
			then.status(200).body("oauth_token=0a1b2c&oauth_token_secret=3d4e5f");
		})
		.await;
	let access_token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/access_token.php");
			then.status(200).body("oauth_token=a1a1a1&oauth_token_secret=b2b2b2");
		})
		.await;
	let batch_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/");
			then.status(200).header("content-type", "application/json").body(
				r#"{"characters.getClans":{"items":[{"name":"Bangers"},{"name":"Junkz"}],"context":{}}}"#,
			);
		})
		.await;
	let endpoints = ApiEndpoints::from_base(Url::parse(&server.url("/api/"))?)?;
	// The mock serves a self-signed certificate.
	let http_client = ReqwestHttpClient::with_client(
		reqwest::Client::builder()
			.danger_accept_invalid_certs(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()?,
	);
	let mut manager = ApiManager::<ReqwestHttpClient>::with_http_client(
		"demo-consumer",
		"demo-secret",
		http_client,
	)?
	.with_endpoints(endpoints);
	let authorize_url = match manager.get_authorize_url().await? {
		Exchange::Success(url) => url,
		other => return Err(eyre!("Request token refused with status {}.", other.status())),
	};

	println!("Send your user to {authorize_url}.");

	// The user approves in the browser; the mock approves immediately.
	let access = manager
		.get_access_token()
		.await?
		.ok()
		.ok_or_else(|| eyre!("Access token exchange failed."))?;

	println!("Persist this access token to skip the handshake next time: {}.", access.key);

	let mut clans = catalogue::GET_CLANS.instantiate()?;

	clans.set_items_filter(["name"]);

	let request = ApiRequest::with_call(clans);

	println!("Sending {}.", request.to_wire_fragment());

	let body = match manager.send_request(&request).await? {
		Exchange::Success(body) => body,
		other => return Err(eyre!("Batch refused with status {}.", other.status())),
	};
	let clans: Vec<Clan> = BatchResponse::parse(&body)?.items_as("characters.getClans")?;

	for clan in clans {
		println!("Clan: {}.", clan.name);
	}

	request_token_mock.assert_async().await;
	access_token_mock.assert_async().await;
	batch_mock.assert_async().await;

	Ok(())
}
