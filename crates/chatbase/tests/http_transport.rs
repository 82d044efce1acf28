// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end tests for the reqwest transport against a local mock server.

use std::sync::Arc;
use std::time::Duration;

use chatbase::{
	ChatbaseError, Dispatcher, Endpoints, HttpTransport, JsonCodec, Message, MessageId,
	Transport, SDK_NAME,
};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dispatcher(server: &MockServer, transport: Arc<HttpTransport>) -> Dispatcher {
	Dispatcher::new(
		"api-key",
		Endpoints::from_base_url(&server.uri()),
		JsonCodec::default(),
		transport,
	)
}

fn http_transport() -> Arc<HttpTransport> {
	Arc::new(HttpTransport::new(Duration::from_secs(5)).unwrap())
}

#[tokio::test]
async fn test_post_sends_json_headers() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/api/message"))
		.and(header("content-type", "application/json"))
		.and(header("accept", "text/plain"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"message_id": "12345"})))
		.expect(1)
		.mount(&server)
		.await;

	let transport = http_transport();
	let response = transport
		.post(&format!("{}/api/message", server.uri()), b"{}".to_vec())
		.await
		.unwrap();

	assert_eq!(response.status, 200);
	let body: Value = serde_json::from_str(&response.body).unwrap();
	assert_eq!(body["message_id"], "12345");

	let requests = server.received_requests().await.unwrap();
	let agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
	assert!(agent.starts_with(SDK_NAME));
}

#[tokio::test]
async fn test_post_passes_error_statuses_through() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
		.mount(&server)
		.await;

	let response = http_transport()
		.post(&format!("{}/api/click", server.uri()), b"{}".to_vec())
		.await
		.unwrap();

	assert_eq!(response.status, 503);
	assert_eq!(response.body, "unavailable");
}

#[tokio::test]
async fn test_connection_failure_is_request_failed() {
	// Nothing listens on the discard port.
	let result = http_transport()
		.post("http://127.0.0.1:9/api/message", b"{}".to_vec())
		.await;

	assert!(matches!(result, Err(ChatbaseError::RequestFailed(_))));
}

#[tokio::test]
async fn test_close_is_idempotent_and_blocks_requests() {
	let transport = http_transport();
	transport.close().await;
	transport.close().await;

	assert!(transport.is_closed().await);
	let result = transport.post("http://127.0.0.1:9/", Vec::new()).await;
	assert!(matches!(result, Err(ChatbaseError::ClientShutdown)));
}

#[tokio::test]
async fn test_dispatcher_message_round_trip() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/api/message"))
		.and(body_partial_json(json!({
			"api_key": "api-key",
			"type": "user",
			"user_id": "123456",
			"platform": "Web",
			"intent": "greeting",
		})))
		.respond_with(
			ResponseTemplate::new(200).set_body_json(json!({"message_id": "12345", "status": 200})),
		)
		.expect(1)
		.mount(&server)
		.await;

	let dispatcher = dispatcher(&server, http_transport());
	let msg = Message::builder("123456", "Web").intent("greeting").build();

	let id = assert_ok!(dispatcher.send_message(&msg).await);
	assert_eq!(id, MessageId::from("12345"));
}

#[tokio::test]
async fn test_dispatcher_maps_bad_request() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/api/messages"))
		.respond_with(
			ResponseTemplate::new(400).set_body_json(json!({"reason": "bad", "status": 400})),
		)
		.mount(&server)
		.await;

	let dispatcher = dispatcher(&server, http_transport());
	let msgs = vec![Message::builder("1", "Web").build()];

	let err = assert_err!(dispatcher.send_messages(&msgs).await);
	match err {
		ChatbaseError::RemoteRejected { reason } => assert_eq!(reason, "bad"),
		other => panic!("expected RemoteRejected, got {other:?}"),
	}
}

#[tokio::test]
async fn test_dispatcher_maps_server_error() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/apis/v1/events/insert"))
		.respond_with(ResponseTemplate::new(500))
		.mount(&server)
		.await;

	let dispatcher = dispatcher(&server, http_transport());
	let event = chatbase::Event::builder("1", "signup").build();

	let err = assert_err!(dispatcher.send_event(&event).await);
	assert!(matches!(err, ChatbaseError::RemoteUnknown { status: 500 }));
}
