use async_graphql::{ComplexObject, Context, SimpleObject, Union};

use super::date::DateRFC3339;
use super::message::Message;
use super::input::PaginationInput;
use super::ulid::{ids, GqlUlid};
use super::user::User;
use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::database::{self, ChatKind};

async fn load_users(ctx: &Context<'_>, members: &[GqlUlid]) -> Result<Vec<User>> {
	let keys = members.iter().copied().map(database::Ulid::from);
	let mut users = ctx
		.get_global()
		.user_by_id_loader
		.load_many(keys)
		.await
		.map_err_gql("failed to fetch users")?;

	Ok(members
		.iter()
		.filter_map(|id| users.remove(&database::Ulid::from(*id)))
		.map(User::from)
		.collect())
}

async fn load_messages(ctx: &Context<'_>, chat_id: GqlUlid, pagination: Option<PaginationInput>) -> Result<Vec<Message>> {
	let (offset, limit) = PaginationInput::bounds(pagination);

	let messages = database::Message::in_chat(&ctx.get_global().db, chat_id.into(), offset, limit)
		.await
		.map_err_gql("failed to fetch messages")?;

	Ok(messages.into_iter().map(Message::from).collect())
}

/// A chat between exactly two users.
#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct ChatPrivate {
	pub id: GqlUlid,
	pub participants: Vec<GqlUlid>,
	pub created_at: DateRFC3339,
	pub updated_at: DateRFC3339,
}

#[ComplexObject]
impl ChatPrivate {
	async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
		load_users(ctx, &self.participants).await
	}

	async fn messages(&self, ctx: &Context<'_>, pagination: Option<PaginationInput>) -> Result<Vec<Message>> {
		load_messages(ctx, self.id, pagination).await
	}
}

impl ChatPrivate {
	pub fn from_chat(chat: database::Chat) -> Option<Self> {
		match Chat::from(chat) {
			Chat::Private(chat) => Some(chat),
			Chat::Room(_) => None,
		}
	}
}

/// A named chat with any number of members.
#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct ChatRoom {
	pub id: GqlUlid,
	pub name: String,
	pub members: Vec<GqlUlid>,
	pub created_at: DateRFC3339,
	pub updated_at: DateRFC3339,
}

#[ComplexObject]
impl ChatRoom {
	async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
		load_users(ctx, &self.members).await
	}

	async fn messages(&self, ctx: &Context<'_>, pagination: Option<PaginationInput>) -> Result<Vec<Message>> {
		load_messages(ctx, self.id, pagination).await
	}
}

impl ChatRoom {
	pub fn from_chat(chat: database::Chat) -> Option<Self> {
		match Chat::from(chat) {
			Chat::Room(chat) => Some(chat),
			Chat::Private(_) => None,
		}
	}
}

#[derive(Union, Clone)]
pub enum Chat {
	Private(ChatPrivate),
	Room(ChatRoom),
}

impl From<database::Chat> for Chat {
	fn from(chat: database::Chat) -> Self {
		let id = chat.id.into();
		let created_at = chat.created_at.into();
		let updated_at = chat.updated_at.into();

		match chat.kind {
			ChatKind::Private { participants } => Self::Private(ChatPrivate {
				id,
				participants: ids(&participants),
				created_at,
				updated_at,
			}),
			ChatKind::Room { name, members } => Self::Room(ChatRoom {
				id,
				name,
				members: ids(&members),
				created_at,
				updated_at,
			}),
		}
	}
}
