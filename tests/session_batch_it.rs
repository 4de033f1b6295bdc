// crates.io
use httpmock::prelude::*;
// self
use oauth1_batch::{
	_preludet::*,
	call::ApiCall,
	catalogue,
	error::SessionError,
	request::{ApiRequest, RequestError},
	response::BatchResponse,
	session::{ApiManager, Exchange},
};

const BATCH_PATH: &str = "/api/";

fn recording_resumed_manager(client: &Arc<RecordingHttpClient>) -> ApiManager<RecordingHttpClient> {
	ApiManager::<RecordingHttpClient>::with_http_client(
		TEST_CONSUMER_KEY,
		TEST_CONSUMER_SECRET,
		client.clone(),
	)
	.and_then(|manager| manager.with_access_token("ccc333", "ddd444"))
	.expect("Test credentials should be accepted.")
}

fn clans_call() -> ApiCall {
	let mut call = catalogue::GET_CLANS.instantiate().expect("Catalogue call should instantiate.");

	call.set_items_filter(["name"]);

	call
}

#[tokio::test]
async fn batch_is_sent_as_signed_form_field() {
	let server = MockServer::start_async().await;
	let mut manager = build_reqwest_resumed_manager(&server.url(BATCH_PATH), "ccc333", "ddd444");
	let mut request = ApiRequest::with_call(clans_call());
	let mut tips = catalogue::GET_TIPS.instantiate().expect("Catalogue call should instantiate.");

	tips.set_context_filter(["nbTips"]);
	request.enqueue(tips).expect("Distinct calls should be queued.");

	let payload = request.to_wire_fragment();
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(BATCH_PATH)
				.header("content-type", "application/x-www-form-urlencoded")
				.header_exists("authorization")
				.form_urlencoded_tuple("request", payload.as_str());
			then.status(200).header("content-type", "application/json").body(concat!(
				r#"{"characters.getClans":{"items":[{"name":"Bangers"}],"context":{}},"#,
				r#""general.getTips":{"items":[],"context":{"nbTips":0}}}"#,
			));
		})
		.await;
	let exchange = manager.send_request(&request).await.expect("Batch should be sent.");

	mock.assert_async().await;

	let body = exchange.ok().expect("Batch should succeed.");
	let response = BatchResponse::parse(&body).expect("Response envelope should decode.");

	let clans = response.items("characters.getClans").expect("Clan items should exist.");
	let tips = response.context("general.getTips").expect("Tip context should exist.");

	assert_eq!(clans[0]["name"], "Bangers");
	assert_eq!(tips["nbTips"], 0);
	assert_eq!(request.len(), 2);
	assert_eq!(request.to_wire_fragment(), payload);
}

#[tokio::test]
async fn missing_access_tier_surfaces_as_405() {
	let server = MockServer::start_async().await;
	let mut manager = build_reqwest_resumed_manager(&server.url(BATCH_PATH), "ccc333", "ddd444");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(BATCH_PATH);
			then.status(405).body("Method Not Allowed");
		})
		.await;
	let mut call =
		catalogue::SEND_GUILD_MSG.instantiate().expect("Catalogue call should instantiate.");

	call.set_value("msg", "hello").expect("Message should be accepted.");

	let exchange = manager
		.send_call(call)
		.await
		.expect("Batch should reach the server.");

	mock.assert_async().await;

	assert_eq!(exchange, Exchange::Rejected { status: 405, body: "Method Not Allowed".into() });
	assert_eq!(exchange.ok(), None);
}

#[tokio::test]
async fn batch_before_access_token_makes_no_request() {
	let server = MockServer::start_async().await;
	let mut manager = build_reqwest_test_manager(&server.url(BATCH_PATH));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(BATCH_PATH);
			then.status(200).body("{}");
		})
		.await;
	let err = manager
		.send_request(&ApiRequest::with_call(clans_call()))
		.await
		.expect_err("Missing access token should be reported.");

	assert!(matches!(err, Error::Session(SessionError::AccessTokenMissing)));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn empty_batch_is_rejected_before_io() {
	let client = Arc::new(RecordingHttpClient::replying(200, "{}"));
	let mut manager = recording_resumed_manager(&client);
	let err = manager
		.send_request(&ApiRequest::new())
		.await
		.expect_err("Empty batch should be reported.");

	assert!(matches!(err, Error::Request(RequestError::Empty)));
	assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn every_request_gets_a_fresh_nonce() {
	let client = Arc::new(RecordingHttpClient::replying(200, "{}"));
	let mut manager = recording_resumed_manager(&client);
	let request = ApiRequest::with_call(clans_call());

	manager.send_request(&request).await.expect("First batch should be sent.");
	manager.send_request(&request).await.expect("Second batch should be sent.");

	let requests = client.requests();

	assert_eq!(requests.len(), 2);
	assert_eq!(requests[0].form, requests[1].form);
	assert_ne!(requests[0].authorization, requests[1].authorization);
}
