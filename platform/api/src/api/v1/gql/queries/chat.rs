use async_graphql::{Context, Object};

use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::require_auth;
use crate::api::v1::gql::models::chat::{ChatPrivate, ChatRoom};
use crate::api::v1::gql::models::input::PaginationInput;
use crate::api::v1::gql::models::message::Message;
use crate::api::v1::gql::models::response::{ChatPrivateResponse, ChatRoomResponse, InputError};
use crate::api::v1::gql::models::ulid::GqlUlid;
use crate::database;

#[derive(Default)]
pub struct ChatQuery;

#[Object]
impl ChatQuery {
	/// A private chat the viewer takes part in.
	async fn chat_private(&self, ctx: &Context<'_>, chat_private_id: GqlUlid) -> Result<ChatPrivateResponse> {
		let auth = require_auth(ctx).await?;

		let chat = database::Chat::by_id(&ctx.get_global().db, chat_private_id.into())
			.await
			.map_err_gql("failed to fetch chat")?
			.filter(|chat| chat.is_member(auth.user_id()))
			.and_then(ChatPrivate::from_chat);

		Ok(match chat {
			Some(chat) => ChatPrivateResponse::ok(chat),
			None => ChatPrivateResponse::invalid(InputError::new("chatPrivate", "ChatPrivate does not exist.")),
		})
	}

	async fn chat_privates(&self, ctx: &Context<'_>) -> Result<Vec<ChatPrivate>> {
		let auth = require_auth(ctx).await?;

		let chats = database::Chat::for_member(&ctx.get_global().db, auth.user_id(), "private")
			.await
			.map_err_gql("failed to fetch private chats")?;

		Ok(chats.into_iter().filter_map(ChatPrivate::from_chat).collect())
	}

	async fn chat_room(&self, ctx: &Context<'_>, chat_room_id: GqlUlid) -> Result<ChatRoomResponse> {
		let auth = require_auth(ctx).await?;

		let chat = database::Chat::by_id(&ctx.get_global().db, chat_room_id.into())
			.await
			.map_err_gql("failed to fetch chat")?
			.filter(database::Chat::is_room);

		let Some(chat) = chat else {
			return Ok(ChatRoomResponse::invalid(InputError::new("chatRoom", "ChatRoom does not exist.")));
		};

		if !chat.is_member(auth.user_id()) {
			return Ok(ChatRoomResponse::invalid(InputError::new(
				"chatRoom.members",
				"You are not a member of this chat room.",
			)));
		}

		Ok(ChatRoom::from_chat(chat).map_or_else(
			|| ChatRoomResponse::invalid(InputError::new("chatRoom", "ChatRoom does not exist.")),
			ChatRoomResponse::ok,
		))
	}

	async fn chat_rooms(&self, ctx: &Context<'_>) -> Result<Vec<ChatRoom>> {
		let auth = require_auth(ctx).await?;

		let chats = database::Chat::for_member(&ctx.get_global().db, auth.user_id(), "room")
			.await
			.map_err_gql("failed to fetch chat rooms")?;

		Ok(chats.into_iter().filter_map(ChatRoom::from_chat).collect())
	}

	/// Messages of a chat the viewer belongs to, oldest first. Empty for
	/// chats the viewer is not part of.
	async fn messages(
		&self,
		ctx: &Context<'_>,
		chat_id: GqlUlid,
		pagination: Option<PaginationInput>,
	) -> Result<Vec<Message>> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let chat = database::Chat::by_id(&global.db, chat_id.into())
			.await
			.map_err_gql("failed to fetch chat")?;

		if !chat.is_some_and(|chat| chat.is_member(auth.user_id())) {
			return Ok(Vec::new());
		}

		let (offset, limit) = PaginationInput::bounds(pagination);
		let messages = database::Message::in_chat(&global.db, chat_id.into(), offset, limit)
			.await
			.map_err_gql("failed to fetch messages")?;

		Ok(messages.into_iter().map(Message::from).collect())
	}
}
