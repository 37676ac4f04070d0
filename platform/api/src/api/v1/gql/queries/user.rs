use async_graphql::{Context, Object};
use chrono::Utc;

use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::require_auth;
use crate::api::v1::gql::models::collection::Collection;
use crate::api::v1::gql::models::response::ActivityFeedItem;
use crate::api::v1::gql::models::ulid::GqlUlid;
use crate::api::v1::gql::models::user::User;
use crate::database::{self, classify_activity, Ulid};
use crate::global::GlobalState;

/// Loads `ids` in order, ids that no longer resolve are skipped.
pub(crate) async fn users_by_ids(global: &GlobalState, ids: &[Ulid]) -> Result<Vec<User>> {
	let mut users = global
		.user_by_id_loader
		.load_many(ids.iter().copied())
		.await
		.map_err_gql("failed to fetch users")?;

	Ok(ids.iter().filter_map(|id| users.remove(id)).map(User::from).collect())
}

async fn collections_by_ids(global: &GlobalState, ids: &[Ulid]) -> Result<Vec<Collection>> {
	let mut collections = global
		.collection_by_id_loader
		.load_many(ids.iter().copied())
		.await
		.map_err_gql("failed to fetch collections")?;

	Ok(ids
		.iter()
		.filter_map(|id| collections.remove(id))
		.map(Collection::from)
		.collect())
}

async fn load_user(global: &GlobalState, id: Ulid) -> Result<Option<database::User>> {
	global
		.user_by_id_loader
		.load_one(id)
		.await
		.map_err_gql("failed to fetch user")
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
	/// The logged in user.
	async fn me(&self, ctx: &Context<'_>) -> Result<Option<User>> {
		let auth = require_auth(ctx).await?;
		let user = load_user(ctx.get_global(), auth.user_id()).await?;

		Ok(user.map(User::from))
	}

	/// Get a user by their username.
	async fn user(
		&self,
		ctx: &Context<'_>,
		#[graphql(desc = "The username of the user.")] username: String,
	) -> Result<Option<User>> {
		require_auth(ctx).await?;

		let user = ctx
			.get_global()
			.user_by_username_loader
			.load_one(username)
			.await
			.map_err_gql("failed to fetch user")?;

		Ok(user.map(User::from))
	}

	/// Users the logged in user follows.
	async fn following(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		match load_user(global, auth.user_id()).await? {
			Some(me) => users_by_ids(global, &me.following).await,
			None => Ok(Vec::new()),
		}
	}

	/// Users following the logged in user.
	async fn followers(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		match load_user(global, auth.user_id()).await? {
			Some(me) => users_by_ids(global, &me.followers).await,
			None => Ok(Vec::new()),
		}
	}

	/// Users the given user follows, null if there is no such user.
	async fn user_following(&self, ctx: &Context<'_>, user_id: GqlUlid) -> Result<Option<Vec<User>>> {
		require_auth(ctx).await?;
		let global = ctx.get_global();

		match load_user(global, user_id.into()).await? {
			Some(user) => Ok(Some(users_by_ids(global, &user.following).await?)),
			None => Ok(None),
		}
	}

	/// Users following the given user, null if there is no such user.
	async fn user_followers(&self, ctx: &Context<'_>, user_id: GqlUlid) -> Result<Option<Vec<User>>> {
		require_auth(ctx).await?;
		let global = ctx.get_global();

		match load_user(global, user_id.into()).await? {
			Some(user) => Ok(Some(users_by_ids(global, &user.followers).await?)),
			None => Ok(None),
		}
	}

	/// Collections the given user upvoted, null if there is no such user.
	async fn user_votes(&self, ctx: &Context<'_>, user_id: GqlUlid) -> Result<Option<Vec<Collection>>> {
		require_auth(ctx).await?;
		let global = ctx.get_global();

		match load_user(global, user_id.into()).await? {
			Some(user) => Ok(Some(collections_by_ids(global, &user.upvoted).await?)),
			None => Ok(None),
		}
	}

	/// A user's collections. Only the owner sees private ones, null if there
	/// is no such user.
	async fn public_notes(&self, ctx: &Context<'_>, username: String) -> Result<Option<Vec<Collection>>> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let Some(user) = global
			.user_by_username_loader
			.load_one(username)
			.await
			.map_err_gql("failed to fetch user")?
		else {
			return Ok(None);
		};

		let collections = if user.id == auth.user_id() {
			database::Collection::by_owner(&global.db, user.id).await
		} else {
			database::Collection::public_by_owner(&global.db, user.id).await
		}
		.map_err_gql("failed to fetch collections")?;

		Ok(Some(collections.into_iter().map(Collection::from).collect()))
	}

	/// Recent public collection activity of the users the viewer follows.
	async fn activity_feed(&self, ctx: &Context<'_>) -> Result<Option<Vec<ActivityFeedItem>>> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let Some(me) = load_user(global, auth.user_id()).await? else {
			return Ok(None);
		};

		let now = Utc::now();
		let mut feed = Vec::new();

		for user in users_by_ids(global, &me.following).await? {
			let collections = database::Collection::public_by_owner(&global.db, user.id.into())
				.await
				.map_err_gql("failed to fetch collections")?;

			feed.extend(collections.into_iter().filter_map(|collection| {
				let activity = classify_activity(collection.created_at, collection.updated_at, now)?;
				Some(ActivityFeedItem {
					activity: activity.into(),
					collection: collection.into(),
				})
			}));
		}

		Ok(Some(feed))
	}
}
