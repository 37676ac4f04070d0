use async_graphql::{Context, Object};
use chrono::Duration;
use hyper::header;

use crate::api::auth::AuthData;
use crate::api::cookie::{clear_session_cookie, session_cookie};
use crate::api::jwt::{AuthJwtPayload, JwtState, ResetPasswordPayload};
use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::{GqlError, Result};
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::optional_auth;
use crate::api::v1::gql::models::input::RegisterInput;
use crate::api::v1::gql::models::response::{field_errors, FieldError, UserResponse};
use crate::api::v1::gql::models::ulid::GqlUlid;
use crate::api::v1::gql::models::user::User;
use crate::database;
use crate::mailer::password_reset_mail;

/// Creates a session for `user`, hands its token to the client as a cookie
/// and authenticates the current connection with it.
async fn start_session(ctx: &Context<'_>, user: database::User) -> Result<()> {
	let global = ctx.get_global();
	let validity = Duration::seconds(global.config.api.cookie.max_age_secs);

	let session = database::Session::create(&global.db, user.id, validity)
		.await
		.map_err_gql("failed to create session")?;

	let token = AuthJwtPayload::from(&session)
		.serialize(&global.config.jwt)
		.ok_or(GqlError::InternalServerError("failed to serialize JWT"))?;

	ctx.insert_http_header(header::SET_COOKIE, session_cookie(&global.config.api.cookie, &token));
	ctx.get_req_context().set_auth(AuthData { session, user }).await;

	Ok(())
}

fn register_errors(input: &RegisterInput) -> Vec<FieldError> {
	field_errors([
		("email", database::User::validate_email(&input.email)),
		("username", database::User::validate_username(&input.username)),
		("password", database::User::validate_password(&input.password)),
	])
}

#[derive(Default)]
pub struct AuthMutation;

#[Object]
/// The mutation object for authentication
impl AuthMutation {
	/// Creates an account and logs it in.
	async fn register(&self, ctx: &Context<'_>, register_input: RegisterInput) -> Result<UserResponse> {
		let global = ctx.get_global();

		let errors = register_errors(&register_input);
		if !errors.is_empty() {
			return Ok(UserResponse::with_errors(errors));
		}

		if database::User::is_registered(&global.db, &register_input.username, &register_input.email)
			.await
			.map_err_gql("failed to fetch user")?
		{
			return Ok(UserResponse::field_error("registerInput", "Already registered"));
		}

		let password_hash =
			database::User::hash_password(&register_input.password).map_err_gql("failed to hash password")?;

		let user = database::User::create(
			&global.db,
			&register_input.email,
			&register_input.username,
			&password_hash,
		)
		.await
		.map_err_gql("failed to create user")?;

		start_session(ctx, user.clone()).await?;

		Ok(UserResponse::ok(user))
	}

	/// Login with a username or an email. If via websocket this will
	/// authenticate the websocket connection.
	async fn login(
		&self,
		ctx: &Context<'_>,
		#[graphql(desc = "Treated as an email when it contains an @.")] username_or_email: String,
		password: String,
	) -> Result<UserResponse> {
		let global = ctx.get_global();
		let is_email = username_or_email.contains('@');

		let user = if is_email {
			database::User::by_email(&global.db, &username_or_email)
				.await
				.map_err_gql("failed to fetch user")?
		} else {
			global
				.user_by_username_loader
				.load_one(username_or_email)
				.await
				.map_err_gql("failed to fetch user")?
		};

		let Some(user) = user else {
			let message = if is_email {
				"Email does not exist."
			} else {
				"Username does not exist."
			};
			return Ok(UserResponse::field_error("usernameOrEmail", message));
		};

		if !user.verify_password(&password) {
			return Ok(UserResponse::field_error("password", "Incorrect Password."));
		}

		start_session(ctx, user.clone()).await?;

		Ok(UserResponse::ok(user))
	}

	/// Ends the current session and returns the user it belonged to.
	async fn logout(&self, ctx: &Context<'_>) -> Result<Option<User>> {
		let global = ctx.get_global();
		let request_context = ctx.get_req_context();

		ctx.insert_http_header(header::SET_COOKIE, clear_session_cookie(&global.config.api.cookie));

		let Some(auth) = optional_auth(ctx).await? else {
			return Ok(None);
		};

		database::Session::delete(&global.db, auth.session.id)
			.await
			.map_err_gql("failed to delete session")?;

		request_context.reset_auth().await;

		Ok(Some(auth.user.into()))
	}

	/// Sends a password reset link to the given email.
	async fn forgot_password(&self, ctx: &Context<'_>, email: String) -> Result<UserResponse> {
		let global = ctx.get_global();

		let Some(user) = database::User::by_email(&global.db, &email)
			.await
			.map_err_gql("failed to fetch user")?
		else {
			return Ok(UserResponse::field_error("email", "User not registered."));
		};

		let token = ResetPasswordPayload::new(&user)
			.serialize_with_key(
				&global.config.jwt,
				&ResetPasswordPayload::secret(&global.config.jwt, &user),
			)
			.ok_or(GqlError::InternalServerError("failed to serialize JWT"))?;

		let link = format!(
			"{}/account/reset-password/?id={}&token={}",
			global.config.client_domain, user.id, token
		);

		global
			.mailer
			.send(password_reset_mail(&user.email, &link))
			.await
			.map_err_gql("failed to send password reset mail")?;

		Ok(UserResponse::ok(user))
	}

	/// Sets a new password using a link from `forgotPassword`.
	async fn reset_password(
		&self,
		ctx: &Context<'_>,
		user_id: GqlUlid,
		token: String,
		new_password: String,
	) -> Result<UserResponse> {
		let global = ctx.get_global();

		let errors = field_errors([("newPassword", database::User::validate_password(&new_password))]);
		if !errors.is_empty() {
			return Ok(UserResponse::with_errors(errors));
		}

		let Some(mut user) = global
			.user_by_id_loader
			.load_one(user_id.into())
			.await
			.map_err_gql("failed to fetch user")?
		else {
			return Ok(UserResponse::field_error("email", "User not registered."));
		};

		let secret = ResetPasswordPayload::secret(&global.config.jwt, &user);
		let verified = ResetPasswordPayload::verify_with_key(&global.config.jwt, &secret, &token)
			.is_some_and(|payload| payload.user_id == user.id);

		if !verified {
			return Ok(UserResponse::field_error("token", "Unable to verify token"));
		}

		user.password_hash = database::User::hash_password(&new_password).map_err_gql("failed to hash password")?;

		let user = user
			.save_credentials(&global.db)
			.await
			.map_err_gql("failed to update user")?;

		Ok(UserResponse::ok(user))
	}
}
