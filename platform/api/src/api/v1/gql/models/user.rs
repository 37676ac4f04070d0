use async_graphql::{ComplexObject, Context, SimpleObject};

use super::chat::{ChatPrivate, ChatRoom};
use super::collection::Collection;
use super::date::DateRFC3339;
use super::ulid::{ids, GqlUlid};
use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::{auth_guard, optional_auth};
use crate::database;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct User {
	pub id: GqlUlid,
	pub username: String,
	pub following: Vec<GqlUlid>,
	pub followers: Vec<GqlUlid>,
	pub upvoted: Vec<GqlUlid>,
	pub created_at: DateRFC3339,
	pub updated_at: DateRFC3339,

	// Private fields
	#[graphql(skip)]
	pub email_: String,
}

#[ComplexObject]
impl User {
	async fn email(&self, ctx: &Context<'_>) -> Result<&str> {
		auth_guard(ctx, "email", self.email_.as_str(), self.id.into()).await
	}

	/// Every collection for the user themselves, only the public ones for
	/// anyone else.
	async fn collections(&self, ctx: &Context<'_>) -> Result<Vec<Collection>> {
		let global = ctx.get_global();
		let viewer = optional_auth(ctx).await?.map(|auth| auth.user_id());

		let collections = if viewer == Some(self.id.to_db()) {
			database::Collection::by_owner(&global.db, self.id.into()).await
		} else {
			database::Collection::public_by_owner(&global.db, self.id.into()).await
		}
		.map_err_gql("failed to fetch collections")?;

		Ok(collections.into_iter().map(Collection::from).collect())
	}

	async fn chat_privates(&self, ctx: &Context<'_>) -> Result<Vec<ChatPrivate>> {
		auth_guard(ctx, "chatPrivates", (), self.id.into()).await?;

		let chats = database::Chat::for_member(&ctx.get_global().db, self.id.into(), "private")
			.await
			.map_err_gql("failed to fetch private chats")?;

		Ok(chats.into_iter().filter_map(ChatPrivate::from_chat).collect())
	}

	async fn chat_rooms(&self, ctx: &Context<'_>) -> Result<Vec<ChatRoom>> {
		auth_guard(ctx, "chatRooms", (), self.id.into()).await?;

		let chats = database::Chat::for_member(&ctx.get_global().db, self.id.into(), "room")
			.await
			.map_err_gql("failed to fetch chat rooms")?;

		Ok(chats.into_iter().filter_map(ChatRoom::from_chat).collect())
	}
}

impl From<database::User> for User {
	fn from(value: database::User) -> Self {
		Self {
			id: value.id.into(),
			username: value.username,
			following: ids(&value.following),
			followers: ids(&value.followers),
			upvoted: ids(&value.upvoted),
			created_at: value.created_at.into(),
			updated_at: value.updated_at.into(),
			email_: value.email,
		}
	}
}
