use std::sync::Arc;

use common::http::RouteError;
use common::make_response;
use hyper::server::conn::Http;
use hyper::Body;
use routerify::{RequestServiceBuilder, Router};
use serde_json::json;
use tokio::net::TcpSocket;
use tokio::select;

use self::error::ApiError;
use crate::global::GlobalState;

pub mod auth;
pub mod cookie;
pub mod error;
pub mod ext;
pub mod jwt;
pub mod middleware;
pub mod request_context;
pub mod v1;

pub fn routes(global: &Arc<GlobalState>) -> routerify::Result<Router<Body, RouteError<ApiError>>> {
	let weak = Arc::downgrade(global);
	Router::builder()
		.data(weak)
		// Answers preflight requests and adds the CORS headers to every response.
		.middleware(middleware::cors::cors_middleware(global))
		// Resolves the session cookie, anonymous requests pass through.
		.middleware(middleware::auth::auth_middleware(global))
		.scope("/v1", v1::routes(global)?)
		.any(|_| async move {
			Ok(make_response!(
				hyper::StatusCode::NOT_FOUND,
				json!({
					"success": false,
					"message": "not found",
				})
			))
		})
		.err_handler_with_info(common::http::error_handler::<ApiError>)
		.build()
}

pub async fn run(global: Arc<GlobalState>) -> anyhow::Result<()> {
	let config = &global.config.api;

	tracing::info!("Listening on {}", config.bind_address);
	let socket = if config.bind_address.is_ipv6() {
		TcpSocket::new_v6()?
	} else {
		TcpSocket::new_v4()?
	};

	socket.set_reuseaddr(true)?;
	socket.bind(config.bind_address)?;
	let listener = socket.listen(1024)?;

	let request_service =
		RequestServiceBuilder::new(routes(&global).map_err(|err| anyhow::anyhow!("failed to build router: {err}"))?)
			.map_err(|err| anyhow::anyhow!("failed to build request service: {err}"))?;

	loop {
		select! {
			_ = global.ctx.done() => {
				return Ok(());
			},
			r = listener.accept() => {
				let (socket, addr) = r?;

				let service = request_service.build(addr);

				tracing::debug!("Accepted connection from {}", addr);

				tokio::spawn(async move {
					Http::new().serve_connection(socket, service).with_upgrades().await.ok();
				});
			},
		}
	}
}
