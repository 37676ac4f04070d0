use std::time::Duration;

use async_graphql::Request;
use common::prelude::FutureTimeout;
use serde_json::json;
use serial_test::serial;

use crate::api;
use crate::api::request_context::RequestContext;
use crate::api::v1::gql::ext::RequestExt;
use crate::api::v1::gql::schema;
use crate::config::AppConfig;
use crate::tests::api::config_on_free_port;
use crate::tests::global::mock_global_state;

mod scenarios;

#[tokio::test]
async fn test_anonymous_viewer_must_login() {
	let (global, handler) = mock_global_state(AppConfig::default());

	let query = r#"
		query {
			me {
				id
			}
		}
	"#;

	let res = schema()
		.execute(
			Request::from(query)
				.provide_global(global.clone())
				.provide_context(RequestContext::default()),
		)
		.timeout(Duration::from_secs(5))
		.await
		.unwrap();

	assert_eq!(res.errors.len(), 1);
	assert_eq!(res.errors[0].message, "please login");

	drop(global);
	handler
		.cancel()
		.timeout(Duration::from_secs(1))
		.await
		.expect("failed to cancel context");
}

#[tokio::test]
async fn test_mutations_require_login() {
	let (global, handler) = mock_global_state(AppConfig::default());

	let query = r#"
		mutation {
			createCollection(title: "work", visibility: "public") {
				error {
					property
				}
			}
		}
	"#;

	let res = schema()
		.execute(
			Request::from(query)
				.provide_global(global.clone())
				.provide_context(RequestContext::default()),
		)
		.timeout(Duration::from_secs(5))
		.await
		.unwrap();

	assert_eq!(res.errors.len(), 1);
	assert_eq!(res.errors[0].message, "please login");
	assert_eq!(res.data.into_json().unwrap(), json!(null));

	drop(global);
	handler
		.cancel()
		.timeout(Duration::from_secs(1))
		.await
		.expect("failed to cancel context");
}

#[tokio::test]
async fn test_short_password_is_an_inline_error() {
	let (global, handler) = mock_global_state(AppConfig::default());

	let query = r#"
		mutation {
			resetPassword(userId: "01HGW2F6BVH8M4X7Y1XQ2K3J9Z", token: "token", newPassword: "pw") {
				errors {
					field
					message
				}
				user {
					id
				}
			}
		}
	"#;

	let res = schema()
		.execute(
			Request::from(query)
				.provide_global(global.clone())
				.provide_context(RequestContext::default()),
		)
		.timeout(Duration::from_secs(5))
		.await
		.unwrap();

	assert!(res.errors.is_empty(), "{:?}", res.errors);
	assert_eq!(
		res.data.into_json().unwrap(),
		json!({
			"resetPassword": {
				"errors": [{ "field": "newPassword", "message": "Password must be at least 3 characters long" }],
				"user": null,
			}
		})
	);

	drop(global);
	handler
		.cancel()
		.timeout(Duration::from_secs(1))
		.await
		.expect("failed to cancel context");
}

#[test]
fn test_schema_exports_core_types() {
	let sdl = schema().sdl();

	for name in [
		"type Collection",
		"type NotesList",
		"type ChatRoom",
		"type ChatPrivate",
		"type Message",
		"type Error",
		"enum Activity",
		"messageSent(args: ChatSubscriptionArgs!): Message!",
	] {
		assert!(sdl.contains(name), "missing {name}");
	}
}

#[serial]
#[tokio::test]
async fn test_serial_query_via_http() {
	let (config, port) = config_on_free_port();
	let (global, handler) = mock_global_state(config);

	let h = tokio::spawn(api::run(global));

	tokio::time::sleep(Duration::from_millis(300)).await;

	let client = reqwest::Client::new();
	let res = client
		.post(format!("http://localhost:{port}/v1/gql"))
		.json(&json!({
			"query": "query { me { id } }",
		}))
		.send()
		.await
		.unwrap();

	assert_eq!(res.status(), 200);
	let body: serde_json::Value = res.json().await.unwrap();
	assert_eq!(body["errors"][0]["message"], json!("please login"));
	assert_eq!(body["errors"][0]["extensions"]["kind"], json!("Auth(NotLoggedIn)"));

	let res = client
		.get(format!("http://localhost:{port}/v1/gql"))
		.query(&[("query", "query { __typename }")])
		.send()
		.await
		.unwrap();

	assert_eq!(res.status(), 200);
	let body: serde_json::Value = res.json().await.unwrap();
	assert_eq!(body["data"], json!({ "__typename": "Query" }));

	let res = client
		.get(format!("http://localhost:{port}/v1/gql/playground"))
		.send()
		.await
		.unwrap();

	assert_eq!(res.status(), 200);
	assert_eq!(
		res.headers().get("content-type").unwrap().to_str().unwrap(),
		"text/html"
	);

	drop(client);

	handler
		.cancel()
		.timeout(Duration::from_secs(1))
		.await
		.expect("failed to cancel context");
	h.timeout(Duration::from_secs(1))
		.await
		.unwrap()
		.unwrap()
		.unwrap();
}
