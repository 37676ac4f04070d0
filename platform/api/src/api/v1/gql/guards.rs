use async_graphql::Context;

use super::error::{GqlError, Result};
use super::ext::ContextExt;
use crate::api::auth::{AuthData, AuthError};
use crate::database::Ulid;

/// The viewer of the request. Anything that is not a server side failure is
/// reported as "please login".
pub async fn require_auth(ctx: &Context<'_>) -> Result<AuthData> {
	let global = ctx.get_global();

	match ctx.get_req_context().auth(global).await {
		Ok(Some(auth)) => Ok(auth),
		Ok(None) => Err(GqlError::Auth(AuthError::NotLoggedIn).into()),
		Err(err) if err.is_internal() => Err(GqlError::Auth(err).into()),
		Err(_) => Err(GqlError::Auth(AuthError::NotLoggedIn).into()),
	}
}

/// The viewer, or `None` for anonymous requests.
pub async fn optional_auth(ctx: &Context<'_>) -> Result<Option<AuthData>> {
	let global = ctx.get_global();

	match ctx.get_req_context().auth(global).await {
		Ok(auth) => Ok(auth),
		Err(err) if err.is_internal() => Err(GqlError::Auth(err).into()),
		Err(_) => Ok(None),
	}
}

// Field guards in async-graphql cannot see the parent object, so fields only
// visible to their owner go through this instead.
pub async fn auth_guard<T>(ctx: &Context<'_>, field_name: &'static str, field_value: T, user_id: Ulid) -> Result<T> {
	if let Some(auth) = optional_auth(ctx).await? {
		if auth.user_id() == user_id {
			return Ok(field_value);
		}
	}

	Err(GqlError::Unauthorized { field: field_name }.into())
}
