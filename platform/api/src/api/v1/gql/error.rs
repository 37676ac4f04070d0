use std::panic::Location;
use std::sync::Arc;

use async_graphql::ErrorExtensions;

use crate::api::auth::AuthError;
use crate::subscription::SubscriptionManagerError;

pub type Result<T, E = GqlErrorInterface> = std::result::Result<T, E>;

/// A [`GqlError`] plus where it was raised.
#[derive(Clone)]
pub struct GqlErrorInterface {
	error: GqlError,
	source: Option<String>,
	span: tracing::Span,
	location: &'static Location<'static>,
}

impl GqlErrorInterface {
	fn with_location(self, location: &'static Location<'static>) -> Self {
		Self { location, ..self }
	}

	fn with_source(self, source: String) -> Self {
		Self {
			source: Some(source),
			..self
		}
	}

	pub fn error(&self) -> &GqlError {
		&self.error
	}
}

impl std::fmt::Debug for GqlErrorInterface {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?} at {}", self.error, self.location)
	}
}

#[derive(Clone, Debug, thiserror::Error)]
pub enum GqlError {
	/// An internal server error occurred.
	#[error("internal server error: {0}")]
	InternalServerError(&'static str),
	/// A database error occurred.
	#[error("database error: {0}")]
	Sqlx(Arc<sqlx::Error>),
	/// The input was invalid.
	#[error("invalid input for {fields:?}: {message}")]
	InvalidInput {
		fields: Vec<&'static str>,
		message: &'static str,
	},
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Unauthorized
	#[error("unauthorized to see this field: {field}")]
	Unauthorized { field: &'static str },
	/// Not Found
	#[error("{0} not found")]
	NotFound(&'static str),
	#[error("subscription error: {0}")]
	Subscription(Arc<SubscriptionManagerError>),
}

impl From<sqlx::Error> for GqlError {
	fn from(err: sqlx::Error) -> Self {
		Self::Sqlx(Arc::new(err))
	}
}

impl From<Arc<sqlx::Error>> for GqlError {
	fn from(err: Arc<sqlx::Error>) -> Self {
		Self::Sqlx(err)
	}
}

impl From<SubscriptionManagerError> for GqlError {
	fn from(err: SubscriptionManagerError) -> Self {
		Self::Subscription(Arc::new(err))
	}
}

impl GqlError {
	pub fn kind(&self) -> &'static str {
		match self {
			GqlError::InternalServerError(_) => "InternalServerError",
			GqlError::Sqlx(_) => "Sqlx",
			GqlError::InvalidInput { .. } => "InvalidInput",
			GqlError::Auth(AuthError::NotLoggedIn) => "Auth(NotLoggedIn)",
			GqlError::Auth(AuthError::InvalidToken) => "Auth(InvalidToken)",
			GqlError::Auth(AuthError::SessionExpired) => "Auth(SessionExpired)",
			GqlError::Auth(AuthError::FetchUser) => "Auth(FetchUser)",
			GqlError::Auth(AuthError::FetchSession) => "Auth(FetchSession)",
			GqlError::Auth(AuthError::UserNotFound) => "Auth(UserNotFound)",
			GqlError::Unauthorized { .. } => "Unauthorized",
			GqlError::NotFound(_) => "NotFound",
			GqlError::Subscription(_) => "Subscription",
		}
	}

	pub fn message(&self) -> String {
		match self {
			GqlError::InternalServerError(msg) => msg.to_string(),
			GqlError::InvalidInput { message, .. } => message.to_string(),
			_ => self.to_string(),
		}
	}

	pub fn fields(&self) -> Vec<&'static str> {
		match self {
			GqlError::InvalidInput { fields, .. } => fields.to_vec(),
			_ => Vec::new(),
		}
	}

	fn is_internal(&self) -> bool {
		match self {
			GqlError::InternalServerError(_) | GqlError::Sqlx(_) | GqlError::Subscription(_) => true,
			GqlError::Auth(err) => err.is_internal(),
			_ => false,
		}
	}
}

impl ErrorExtensions for GqlErrorInterface {
	fn extend(&self) -> async_graphql::Error {
		let err = async_graphql::Error::new(self.error.to_string()).extend_with(|_, e| {
			e.set("kind", self.error.kind());
			e.set("reason", self.error.message());
			e.set("fields", self.error.fields());
		});

		let source = self.source.as_deref().unwrap_or_default();

		self.span.in_scope(|| {
			if self.error.is_internal() {
				tracing::error!(error = %self.error, source, location = %self.location, "gql error");
			} else {
				tracing::debug!(error = %self.error, source, location = %self.location, "gql error");
			}
		});

		err
	}
}

impl<T> From<T> for GqlErrorInterface
where
	GqlError: From<T>,
{
	#[track_caller]
	fn from(value: T) -> Self {
		Self {
			error: GqlError::from(value),
			source: None,
			span: tracing::Span::current(),
			location: Location::caller(),
		}
	}
}

impl From<&'static str> for GqlErrorInterface {
	#[track_caller]
	fn from(msg: &'static str) -> Self {
		Self {
			error: GqlError::InternalServerError(msg),
			source: None,
			span: tracing::Span::current(),
			location: Location::caller(),
		}
	}
}

impl From<GqlErrorInterface> for async_graphql::Error {
	fn from(err: GqlErrorInterface) -> Self {
		err.extend()
	}
}

pub mod ext {
	use std::panic::Location;

	use super::{GqlErrorInterface, Result};

	pub trait ResultExt<T, E>: Sized {
		/// Replaces the error with `ctx`, the original is kept for the logs.
		fn map_err_gql<C>(self, ctx: C) -> Result<T>
		where
			GqlErrorInterface: From<C>;

		/// Replaces the error with `ctx` and drops the original.
		fn map_err_ignored_gql<C>(self, ctx: C) -> Result<T>
		where
			GqlErrorInterface: From<C>;
	}

	impl<T, E: std::fmt::Display> ResultExt<T, E> for std::result::Result<T, E> {
		#[track_caller]
		fn map_err_gql<C>(self, ctx: C) -> Result<T>
		where
			GqlErrorInterface: From<C>,
		{
			let location = Location::caller();
			self.map_err(|err| {
				GqlErrorInterface::from(ctx)
					.with_source(err.to_string())
					.with_location(location)
			})
		}

		#[track_caller]
		fn map_err_ignored_gql<C>(self, ctx: C) -> Result<T>
		where
			GqlErrorInterface: From<C>,
		{
			let location = Location::caller();
			self.map_err(|_| GqlErrorInterface::from(ctx).with_location(location))
		}
	}

	pub trait OptionExt<T>: Sized {
		fn map_err_gql<C>(self, ctx: C) -> Result<T>
		where
			GqlErrorInterface: From<C>;
	}

	impl<T> OptionExt<T> for Option<T> {
		#[track_caller]
		fn map_err_gql<C>(self, ctx: C) -> Result<T>
		where
			GqlErrorInterface: From<C>,
		{
			let location = Location::caller();
			self.ok_or_else(|| GqlErrorInterface::from(ctx).with_location(location))
		}
	}
}
