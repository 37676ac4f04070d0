use async_graphql::{ComplexObject, Context, SimpleObject};

use super::chat::Chat;
use super::date::DateRFC3339;
use super::ulid::GqlUlid;
use super::user::User;
use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::database;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Message {
	pub id: GqlUlid,
	pub chat_id: GqlUlid,
	pub sender_id: GqlUlid,
	pub content: String,
	pub created_at: DateRFC3339,
	pub updated_at: DateRFC3339,
}

#[ComplexObject]
impl Message {
	async fn sender(&self, ctx: &Context<'_>) -> Result<Option<User>> {
		let user = ctx
			.get_global()
			.user_by_id_loader
			.load_one(self.sender_id.into())
			.await
			.map_err_gql("failed to fetch user")?;

		Ok(user.map(User::from))
	}

	async fn chat(&self, ctx: &Context<'_>) -> Result<Option<Chat>> {
		let chat = database::Chat::by_id(&ctx.get_global().db, self.chat_id.into())
			.await
			.map_err_gql("failed to fetch chat")?;

		Ok(chat.map(Chat::from))
	}
}

impl From<database::Message> for Message {
	fn from(value: database::Message) -> Self {
		Self {
			id: value.id.into(),
			chat_id: value.chat_id.into(),
			sender_id: value.sender_id.into(),
			content: value.content,
			created_at: value.created_at.into(),
			updated_at: value.updated_at.into(),
		}
	}
}
