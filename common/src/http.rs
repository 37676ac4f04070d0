use std::fmt::{Debug, Display};
use std::panic::Location;

use hyper::{Body, Response, StatusCode};
use routerify::RequestInfo;
use serde_json::json;

#[macro_export]
macro_rules! make_response {
	($status:expr, $body:expr) => {
		::hyper::Response::builder()
			.status($status)
			.header("Content-Type", "application/json")
			.body(::hyper::Body::from($body.to_string()))
			.expect("failed to build response")
	};
}

/// Renders a [`RouteError`] into its response, logging it according to its
/// status. Errors of any other type become a generic 500.
pub async fn error_handler<E: std::error::Error + 'static>(
	err: Box<(dyn std::error::Error + Send + Sync + 'static)>,
	info: RequestInfo,
) -> Response<Body> {
	match err.downcast::<RouteError<E>>() {
		Ok(err) => {
			let location = err.location();

			err.span().in_scope(|| match err.should_log() {
				ShouldLog::Yes => {
					tracing::error!(path = %info.uri(), method = %info.method(), location = %location, error = ?err, "http error")
				}
				ShouldLog::Debug => {
					tracing::debug!(path = %info.uri(), method = %info.method(), location = %location, error = ?err, "http error")
				}
				ShouldLog::No => (),
			});

			err.response()
		}
		Err(err) => {
			tracing::error!(path = %info.uri(), method = %info.method(), error = ?err, "unhandled http error");
			make_response!(
				StatusCode::INTERNAL_SERVER_ERROR,
				json!({ "message": "Internal Server Error", "success": false })
			)
		}
	}
}

/// An error returned from a route handler or middleware. It carries the
/// response sent to the client, plus where and under which span it was raised.
pub struct RouteError<E> {
	source: Option<E>,
	location: &'static Location<'static>,
	span: tracing::Span,
	response: Response<Body>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShouldLog {
	Yes,
	Debug,
	No,
}

impl<E> RouteError<E> {
	#[track_caller]
	pub fn new(status: StatusCode, message: impl AsRef<str>) -> Self {
		Self {
			source: None,
			span: tracing::Span::current(),
			location: Location::caller(),
			response: make_response!(status, json!({ "message": message.as_ref(), "success": false })),
		}
	}

	pub fn span(&self) -> &tracing::Span {
		&self.span
	}

	pub fn location(&self) -> &'static Location<'static> {
		self.location
	}

	pub fn status(&self) -> StatusCode {
		self.response.status()
	}

	pub fn response(self) -> Response<Body> {
		self.response
	}

	pub fn should_log(&self) -> ShouldLog {
		if self.response.status().is_server_error() {
			ShouldLog::Yes
		} else if self.source.is_some() {
			ShouldLog::Debug
		} else {
			ShouldLog::No
		}
	}

	pub fn with_source(mut self, source: Option<E>) -> Self {
		self.source = source;
		self
	}

	pub fn with_location(mut self, location: &'static Location<'static>) -> Self {
		self.location = location;
		self
	}
}

impl<E> From<Response<Body>> for RouteError<E> {
	#[track_caller]
	fn from(response: Response<Body>) -> Self {
		Self {
			source: None,
			span: tracing::Span::current(),
			location: Location::caller(),
			response,
		}
	}
}

impl<E, S: AsRef<str>> From<(StatusCode, S)> for RouteError<E> {
	#[track_caller]
	fn from((status, message): (StatusCode, S)) -> Self {
		Self::new(status, message)
	}
}

impl<E, S: AsRef<str>, T: Into<E>> From<(StatusCode, S, T)> for RouteError<E> {
	#[track_caller]
	fn from((status, message, source): (StatusCode, S, T)) -> Self {
		Self::new(status, message).with_source(Some(source.into()))
	}
}

impl<E> From<&'_ str> for RouteError<E> {
	#[track_caller]
	fn from(message: &'_ str) -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
	}
}

impl<E: Debug> Debug for RouteError<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.source {
			Some(err) => write!(f, "RouteError({}): {:?}", self.status(), err),
			None => write!(f, "RouteError({})", self.status()),
		}
	}
}

impl<E: Display> Display for RouteError<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.source {
			Some(err) => write!(f, "{}: {}", self.status(), err),
			None => write!(f, "{}", self.status()),
		}
	}
}

impl<E: std::error::Error + 'static> std::error::Error for RouteError<E> {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
	}
}

pub mod ext {
	use std::panic::Location;
	use std::sync::{Arc, Weak};

	use hyper::StatusCode;

	use super::RouteError;

	pub trait ResultExt<T, E, E2>: Sized {
		/// Replaces the error with `ctx`, keeping the original as the source.
		fn map_err_route<C>(self, ctx: C) -> Result<T, RouteError<E2>>
		where
			RouteError<E2>: From<C>,
			E2: From<E>;

		/// Replaces the error with `ctx` and drops the original.
		fn map_ignore_err_route<C>(self, ctx: C) -> Result<T, RouteError<E2>>
		where
			RouteError<E2>: From<C>;
	}

	impl<T, E, E2> ResultExt<T, E, E2> for Result<T, E> {
		#[track_caller]
		fn map_err_route<C>(self, ctx: C) -> Result<T, RouteError<E2>>
		where
			RouteError<E2>: From<C>,
			E2: From<E>,
		{
			let location = Location::caller();
			self.map_err(|err| {
				RouteError::from(ctx)
					.with_source(Some(err.into()))
					.with_location(location)
			})
		}

		#[track_caller]
		fn map_ignore_err_route<C>(self, ctx: C) -> Result<T, RouteError<E2>>
		where
			RouteError<E2>: From<C>,
		{
			let location = Location::caller();
			self.map_err(|_| RouteError::from(ctx).with_location(location))
		}
	}

	pub trait OptionExt<T, E>: Sized {
		fn map_err_route<C>(self, ctx: C) -> Result<T, RouteError<E>>
		where
			RouteError<E>: From<C>;
	}

	impl<T, E> OptionExt<T, E> for Option<T> {
		#[track_caller]
		fn map_err_route<C>(self, ctx: C) -> Result<T, RouteError<E>>
		where
			RouteError<E>: From<C>,
		{
			let location = Location::caller();
			self.ok_or_else(|| RouteError::from(ctx).with_location(location))
		}
	}

	/// Routers hold a [`Weak`] to the global state so open keep-alive
	/// connections do not keep it alive during shutdown.
	pub trait RequestGlobalExt<E> {
		fn get_global<G: Sync + Send + 'static>(&self) -> Result<Arc<G>, RouteError<E>>;
	}

	impl<E, B> RequestGlobalExt<E> for hyper::Request<B>
	where
		Self: routerify::ext::RequestExt,
	{
		#[track_caller]
		fn get_global<G: Sync + Send + 'static>(&self) -> Result<Arc<G>, RouteError<E>> {
			use routerify::ext::RequestExt;

			self.data::<Weak<G>>()
				.and_then(Weak::upgrade)
				.ok_or_else(|| RouteError::new(StatusCode::SERVICE_UNAVAILABLE, "server is shutting down"))
		}
	}
}
