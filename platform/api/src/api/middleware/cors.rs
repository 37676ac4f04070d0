use std::sync::Arc;

use common::http::RouteError;
use hyper::header::{self, HeaderValue};
use hyper::Body;
use routerify::Middleware;

use crate::api::error::ApiError;
use crate::global::GlobalState;

/// Allows credentialed requests from the configured origins.
pub fn cors_middleware(global: &Arc<GlobalState>) -> Middleware<Body, RouteError<ApiError>> {
	let allowed_origins = Arc::new(global.config.api.allowed_origins.clone());

	Middleware::post_with_info(move |mut resp, info| {
		let allowed_origins = allowed_origins.clone();

		async move {
			let origin = info
				.headers()
				.get(header::ORIGIN)
				.filter(|origin| is_allowed(&allowed_origins, origin))
				.cloned();

			let Some(origin) = origin else {
				return Ok(resp);
			};

			let headers = resp.headers_mut();
			headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
			headers.insert(header::ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
			headers.insert(
				header::ACCESS_CONTROL_ALLOW_METHODS,
				HeaderValue::from_static("GET, POST, OPTIONS"),
			);
			headers.insert(
				header::ACCESS_CONTROL_ALLOW_HEADERS,
				HeaderValue::from_static("Content-Type, Authorization"),
			);
			headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
			headers.append(header::VARY, HeaderValue::from_static("Origin"));

			Ok(resp)
		}
	})
}

fn is_allowed(allowed_origins: &[String], origin: &HeaderValue) -> bool {
	origin
		.to_str()
		.is_ok_and(|origin| allowed_origins.iter().any(|allowed| allowed == "*" || allowed == origin))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_is_allowed() {
		let allowed = vec!["http://localhost:3000".to_string()];

		assert!(is_allowed(&allowed, &HeaderValue::from_static("http://localhost:3000")));
		assert!(!is_allowed(&allowed, &HeaderValue::from_static("http://evil.example")));
		assert!(is_allowed(&["*".to_string()], &HeaderValue::from_static("http://evil.example")));
	}
}
