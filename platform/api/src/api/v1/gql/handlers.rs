use std::future;
use std::str::FromStr;
use std::sync::Arc;

use async_graphql::http::{WebSocketProtocols, WsMessage};
use async_graphql::Data;
use common::http::ext::{OptionExt, ResultExt};
use futures_util::{SinkExt, StreamExt};
use hyper::{header, Body, Request, Response, StatusCode};
use hyper_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use hyper_tungstenite::tungstenite::protocol::CloseFrame;
use hyper_tungstenite::tungstenite::Message;
use hyper_tungstenite::HyperWebsocket;
use routerify::prelude::RequestExt;
use serde_json::json;
use tokio::select;

use super::error::GqlError;
use super::ext::RequestExt as _;
use super::MySchema;
use crate::api::auth::{AuthData, AuthError};
use crate::api::error::Result;
use crate::api::ext::RequestExt as _;
use crate::api::jwt::{AuthJwtPayload, JwtState};
use crate::api::request_context::RequestContext;
use crate::global::GlobalState;

async fn websocket_handler(
	ws: HyperWebsocket,
	schema: MySchema,
	global: Arc<GlobalState>,
	protocol: WebSocketProtocols,
	request_context: RequestContext,
) {
	let ws = match ws.await {
		Ok(ws) => ws,
		Err(e) => {
			tracing::error!(err = %e, "failed to upgrade websocket request");
			return;
		}
	};

	let (mut tx, rx) = ws.split();

	let input = rx
		.take_while(|res| future::ready(res.is_ok()))
		.filter_map(|msg| {
			future::ready(match msg {
				Ok(msg @ (Message::Text(_) | Message::Binary(_))) => Some(msg.into_data()),
				_ => None,
			})
		});

	request_context.websocket().await;

	let data = Data::default()
		.provide_context(request_context.clone())
		.provide_global(global.clone());

	let stream = {
		let global = global.clone();

		async_graphql::http::WebSocket::new(schema, input, protocol)
			.on_connection_init(|params| async move {
				// A token in the connection params replaces the cookie session.
				// An unusable token closes the connection.
				if let Some(token) = params.get("sessionToken").and_then(|v| v.as_str()) {
					let Some(jwt) = AuthJwtPayload::verify(&global.config.jwt, token) else {
						return Err(GqlError::Auth(AuthError::InvalidToken).into());
					};

					let auth = AuthData::from_session_id(&global, jwt.session_id)
						.await
						.map_err(GqlError::Auth)?;

					request_context.set_auth(auth).await;
				}

				Ok(data)
			})
			.map(|msg| match msg {
				WsMessage::Text(text) => Message::Text(text),
				WsMessage::Close(code, status) => Message::Close(Some(CloseFrame {
					code: code.into(),
					reason: status.into(),
				})),
			})
			.map(Ok)
	};

	select! {
		_ = stream.forward(&mut tx) => {}
		_ = global.ctx.done() => {
			tx.send(Message::Close(Some(CloseFrame { code: CloseCode::Restart, reason: "server is restarting".into() }))).await.ok();
		}
	}
}

/// Serves queries and mutations over `GET`/`POST` and subscriptions over a
/// websocket upgrade on the same path.
pub async fn graphql_handler(mut req: Request<Body>) -> Result<Response<Body>> {
	if req.method() == hyper::Method::OPTIONS {
		return Ok(Response::builder()
			.status(StatusCode::OK)
			.body(Body::empty())
			.map_ignore_err_route("failed to build response")?);
	}

	let schema = req
		.data::<MySchema>()
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "missing schema"))?
		.clone();

	let global = req.get_global()?;

	let context = req
		.context::<RequestContext>()
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "missing request context"))?;

	if hyper_tungstenite::is_upgrade_request(&req) {
		let protocol = req
			.headers()
			.get(header::SEC_WEBSOCKET_PROTOCOL)
			.and_then(|val| val.to_str().ok())
			.and_then(|protocols| protocols.split(',').find_map(|p| WebSocketProtocols::from_str(p.trim()).ok()))
			.map_err_route((StatusCode::BAD_REQUEST, "invalid websocket protocol"))?;

		let (mut response, websocket) =
			hyper_tungstenite::upgrade(&mut req, None).map_err_route("failed to upgrade request")?;

		response.headers_mut().insert(
			header::SEC_WEBSOCKET_PROTOCOL,
			protocol
				.sec_websocket_protocol()
				.parse()
				.map_ignore_err_route("failed to set websocket protocol")?,
		);

		tokio::spawn(websocket_handler(websocket, schema, global, protocol, context));

		return Ok(response);
	}

	let request = match *req.method() {
		hyper::Method::POST => {
			let content_type = req
				.headers()
				.get(header::CONTENT_TYPE)
				.and_then(|val| val.to_str().ok())
				.map(str::to_string);

			let body = hyper::body::to_bytes(req.body_mut())
				.await
				.map_err_route((StatusCode::BAD_REQUEST, "failed to read body"))?;

			async_graphql::http::receive_body(content_type, &*body, Default::default())
				.await
				.map_err_route((StatusCode::BAD_REQUEST, "failed to parse body"))?
		}
		hyper::Method::GET => {
			let query = req
				.uri()
				.query()
				.map_err_route((StatusCode::BAD_REQUEST, "missing query string"))?;
			async_graphql::http::parse_query_string(query)
				.map_err_route((StatusCode::BAD_REQUEST, "failed to parse query string"))?
		}
		_ => {
			return Err((StatusCode::METHOD_NOT_ALLOWED, "method not allowed").into());
		}
	}
	.provide_global(global)
	.provide_context(context);

	let response = schema.execute(request).await;

	let mut resp = Response::builder()
		.status(StatusCode::OK)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(
			json!({
				"data": response.data,
				"errors": if response.errors.is_empty() {
					None
				} else {
					Some(response.errors)
				},
				"extensions": response.extensions,
			})
			.to_string(),
		))
		.map_ignore_err_route("failed to build response")?;

	// Several cookies may be set by one request.
	for (key, value) in &response.http_headers {
		resp.headers_mut().append(key, value.clone());
	}

	Ok(resp)
}
