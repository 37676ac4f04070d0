use async_graphql::{Context, Object};

use crate::api::auth::AuthError;
use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::{GqlError, Result};
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::require_auth;
use crate::api::v1::gql::models::response::{field_errors, UserResponse};
use crate::api::v1::gql::models::ulid::GqlUlid;
use crate::database;

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
	/// Changes the viewer's username, password or both.
	async fn update_user(
		&self,
		ctx: &Context<'_>,
		username: Option<String>,
		password: Option<String>,
	) -> Result<UserResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		if username.is_none() && password.is_none() {
			return Ok(UserResponse::field_error(
				"username & password",
				"Requires either username or password or both.",
			));
		}

		let errors = field_errors([
			("username", username.as_deref().map_or(Ok(()), database::User::validate_username)),
			("password", password.as_deref().map_or(Ok(()), database::User::validate_password)),
		]);
		if !errors.is_empty() {
			return Ok(UserResponse::with_errors(errors));
		}

		// The session snapshot can be stale once an earlier mutation in the
		// same request changed the row.
		let mut user = global
			.user_by_id_loader
			.load_one(auth.user_id())
			.await
			.map_err_gql("failed to fetch user")?
			.ok_or(GqlError::Auth(AuthError::UserNotFound))?;

		if let Some(username) = username {
			if database::User::username_taken(&global.db, &username)
				.await
				.map_err_gql("failed to fetch user")?
			{
				return Ok(UserResponse::field_error(
					"username",
					format!("A user with the username \"{username}\" already exists."),
				));
			}

			user.username = username;
		}

		if let Some(password) = password {
			user.password_hash = database::User::hash_password(&password).map_err_gql("failed to hash password")?;
		}

		let user = user
			.save_credentials(&global.db)
			.await
			.map_err_gql("failed to update user")?;

		Ok(UserResponse::ok(user))
	}

	/// Follows a user, or unfollows them when already following. Returns
	/// whether the viewer now follows them, null when targeting yourself.
	async fn follow(&self, ctx: &Context<'_>, target_user_id: GqlUlid) -> Result<Option<bool>> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		if auth.user_id() == target_user_id.to_db() {
			return Ok(None);
		}

		let mut users = global
			.user_by_id_loader
			.load_many([auth.user_id(), target_user_id.into()])
			.await
			.map_err_gql("failed to fetch users")?;

		let (Some(mut me), Some(mut target)) = (users.remove(&auth.user_id()), users.remove(&target_user_id.to_db())) else {
			return Ok(Some(false));
		};

		let following = me.toggle_follow(&mut target);

		me.save_follows(&global.db).await.map_err_gql("failed to update user")?;
		target.save_follows(&global.db).await.map_err_gql("failed to update user")?;

		Ok(Some(following))
	}
}
