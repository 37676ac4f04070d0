use std::time::Duration;

use common::prelude::FutureTimeout;
use hyper::StatusCode;
use serde_json::{json, Value};
use serial_test::serial;

use crate::api::run;
use crate::config::{ApiConfig, AppConfig};
use crate::tests::global::mock_global_state;

mod v1;

pub fn config_on_free_port() -> (AppConfig, u16) {
	let port = portpicker::pick_unused_port().expect("failed to pick port");

	let config = AppConfig {
		api: ApiConfig {
			bind_address: format!("127.0.0.1:{port}").parse().unwrap(),
			..Default::default()
		},
		..Default::default()
	};

	(config, port)
}

#[serial]
#[tokio::test]
async fn test_serial_health() {
	let (config, port) = config_on_free_port();
	let (global, handler) = mock_global_state(config);

	let handle = tokio::spawn(run(global));

	// We need to wait for the server to start
	tokio::time::sleep(Duration::from_millis(300)).await;

	let client = reqwest::Client::new();
	let resp = client
		.get(format!("http://localhost:{port}/v1/health"))
		.send()
		.await
		.expect("failed to get health");

	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = resp.json().await.expect("failed to read body");
	assert_eq!(body, json!({ "status": "ok" }));

	let resp = client
		.get(format!("http://localhost:{port}/v2/missing"))
		.send()
		.await
		.expect("failed to get missing route");

	assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	let body: Value = resp.json().await.expect("failed to read body");
	assert_eq!(body, json!({ "success": false, "message": "not found" }));

	// The client uses Keep-Alive, so we need to drop it to release the global context
	drop(client);

	handler
		.cancel()
		.timeout(Duration::from_secs(1))
		.await
		.expect("failed to cancel context");
	handle
		.timeout(Duration::from_secs(1))
		.await
		.expect("failed to cancel api")
		.expect("api failed")
		.expect("api failed");
}

#[serial]
#[tokio::test]
async fn test_serial_cors_preflight() {
	let (config, port) = config_on_free_port();
	let (global, handler) = mock_global_state(config);

	let handle = tokio::spawn(run(global));

	tokio::time::sleep(Duration::from_millis(300)).await;

	let client = reqwest::Client::new();
	let resp = client
		.request(reqwest::Method::OPTIONS, format!("http://localhost:{port}/v1/gql"))
		.header("Origin", "http://localhost:3000")
		.header("Access-Control-Request-Method", "POST")
		.send()
		.await
		.expect("failed to send preflight");

	assert!(resp.status().is_success());
	assert_eq!(
		resp.headers()
			.get("access-control-allow-origin")
			.and_then(|value| value.to_str().ok()),
		Some("http://localhost:3000")
	);

	drop(client);

	handler
		.cancel()
		.timeout(Duration::from_secs(1))
		.await
		.expect("failed to cancel context");
	handle
		.timeout(Duration::from_secs(1))
		.await
		.expect("failed to cancel api")
		.expect("api failed")
		.expect("api failed");
}
