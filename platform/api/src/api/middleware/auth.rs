use std::sync::Arc;

use common::http::RouteError;
use hyper::Body;
use routerify::prelude::RequestExt;
use routerify::Middleware;

use crate::api::auth::AuthData;
use crate::api::cookie::read_cookie;
use crate::api::error::ApiError;
use crate::api::ext::RequestExt as _;
use crate::api::jwt::{AuthJwtPayload, JwtState};
use crate::api::request_context::RequestContext;
use crate::global::GlobalState;

/// Attaches a [`RequestContext`] to every request and authenticates it from
/// the session cookie. A missing or unusable cookie leaves the request
/// anonymous, only server side failures reject it.
pub fn auth_middleware(_: &Arc<GlobalState>) -> Middleware<Body, RouteError<ApiError>> {
	Middleware::pre(|req| async move {
		let context = RequestContext::default();
		req.set_context(context.clone());

		let global = req.get_global()?;

		let Some(token) = read_cookie(req.headers(), &global.config.api.cookie.name) else {
			return Ok(req);
		};

		let Some(jwt) = AuthJwtPayload::verify(&global.config.jwt, token) else {
			tracing::debug!("ignoring invalid session cookie");
			return Ok(req);
		};

		match AuthData::from_session_id(&global, jwt.session_id).await {
			Ok(data) => context.set_auth(data).await,
			Err(err) if err.is_internal() => return Err(err.into()),
			Err(err) => tracing::debug!(err = %err, "ignoring session cookie"),
		}

		Ok(req)
	})
}
