use std::sync::Arc;

use common::http::RouteError;
use hyper::StatusCode;

use super::error::ApiError;
use crate::database::{Session, Ulid, User};
use crate::global::GlobalState;

#[derive(thiserror::Error, Debug, Clone)]
pub enum AuthError {
	#[error("please login")]
	NotLoggedIn,
	#[error("invalid token")]
	InvalidToken,
	#[error("session expired")]
	SessionExpired,
	#[error("failed to fetch user")]
	FetchUser,
	#[error("failed to fetch session")]
	FetchSession,
	#[error("user not found")]
	UserNotFound,
}

impl AuthError {
	/// Failures that come from the server rather than from the client's
	/// credentials.
	pub fn is_internal(&self) -> bool {
		matches!(self, Self::FetchUser | Self::FetchSession)
	}
}

impl From<AuthError> for RouteError<ApiError> {
	fn from(value: AuthError) -> Self {
		RouteError::from(match &value {
			AuthError::NotLoggedIn => (StatusCode::UNAUTHORIZED, "please login"),
			AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid token"),
			AuthError::SessionExpired => (StatusCode::UNAUTHORIZED, "session expired"),
			AuthError::FetchUser => (StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch user"),
			AuthError::FetchSession => (StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch session"),
			AuthError::UserNotFound => (StatusCode::UNAUTHORIZED, "user not found"),
		})
		.with_source(Some(ApiError::Auth(value)))
	}
}

/// The authenticated side of a request.
#[derive(Debug, Clone)]
pub struct AuthData {
	pub session: Session,
	pub user: User,
}

impl AuthData {
	pub fn user_id(&self) -> Ulid {
		self.session.user_id
	}

	pub async fn from_session(global: &Arc<GlobalState>, session: Session) -> Result<Self, AuthError> {
		let user = global
			.user_by_id_loader
			.load_one(session.user_id)
			.await
			.map_err(|_| AuthError::FetchUser)?
			.ok_or(AuthError::UserNotFound)?;

		Ok(Self { session, user })
	}

	pub async fn from_session_id(global: &Arc<GlobalState>, session_id: Ulid) -> Result<Self, AuthError> {
		let session = global
			.session_by_id_loader
			.load_one(session_id)
			.await
			.map_err(|_| AuthError::FetchSession)?
			.and_then(|s| s.is_valid().then_some(s))
			.ok_or(AuthError::SessionExpired)?;

		Self::from_session(global, session).await
	}
}
