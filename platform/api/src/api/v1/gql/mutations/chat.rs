use async_graphql::{Context, Object};

use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::require_auth;
use crate::api::v1::gql::models::chat::{ChatPrivate, ChatRoom};
use crate::api::v1::gql::models::input::{ChatPrivateInput, ChatRoomInput};
use crate::api::v1::gql::models::response::{ChatPrivateResponse, ChatRoomResponse, InputError};
use crate::api::v1::gql::models::ulid::GqlUlid;
use crate::database::{self, ChatKind, Ulid};
use crate::global::GlobalState;
use crate::subscription::{ChatEvent, ChatEventKind, SubscriptionTopic};

/// Fans `kind` out to the subscribers of `topic`. A failed publish does not
/// fail the mutation that caused it.
pub(super) fn publish(global: &GlobalState, topic: SubscriptionTopic, chat: &database::Chat, kind: ChatEventKind) {
	let event = ChatEvent {
		chat_id: chat.id,
		members: chat.members().to_vec(),
		kind,
	};

	if let Err(err) = global.subscription_manager.publish(topic, event) {
		tracing::warn!(error = %err, %topic, "failed to publish chat event");
	}
}

fn room_not_found() -> ChatRoomResponse {
	ChatRoomResponse::invalid(InputError::new("chatRoom", "ChatRoom does not exist."))
}

fn not_a_member() -> ChatRoomResponse {
	ChatRoomResponse::invalid(InputError::new(
		"chatRoom.members",
		"You are not a member of this chat room.",
	))
}

async fn fetch_room(global: &GlobalState, id: Ulid) -> Result<Option<database::Chat>> {
	let chat = database::Chat::by_id(&global.db, id)
		.await
		.map_err_gql("failed to fetch chat")?;

	Ok(chat.filter(database::Chat::is_room))
}

/// The room as it is stored now.
async fn refetch_room(global: &GlobalState, id: Ulid) -> Result<ChatRoomResponse> {
	Ok(fetch_room(global, id)
		.await?
		.and_then(ChatRoom::from_chat)
		.map_or_else(room_not_found, ChatRoomResponse::ok))
}

#[derive(Default)]
pub struct ChatMutation;

#[Object]
impl ChatMutation {
	/// Starts a private chat between the viewer and another user.
	async fn create_chat_private(
		&self,
		ctx: &Context<'_>,
		chat_private_input: ChatPrivateInput,
	) -> Result<ChatPrivateResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let user_id = chat_private_input.user_id.to_db();

		let user = if user_id == auth.user_id() {
			None
		} else {
			global
				.user_by_id_loader
				.load_one(user_id)
				.await
				.map_err_gql("failed to fetch user")?
		};

		let Some(user) = user else {
			return Ok(ChatPrivateResponse::invalid(InputError::new(
				"chatPrivateInput.userId",
				"Cannot find a user for userA.",
			)));
		};

		let existing = database::Chat::private_between(&global.db, auth.user_id(), user.id)
			.await
			.map_err_gql("failed to fetch chat")?;
		if existing.is_some() {
			return Ok(ChatPrivateResponse::invalid(InputError::new(
				"chatPrivates[].participants",
				"Already have a private chat with the given user.",
			)));
		}

		let chat = database::Chat::create(
			&global.db,
			ChatKind::Private {
				participants: [auth.user_id(), user.id],
			},
		)
		.await
		.map_err_gql("failed to create chat")?;

		Ok(ChatPrivate::from_chat(chat).map_or_else(
			|| ChatPrivateResponse::invalid(InputError::new("chatPrivate", "ChatPrivate does not exist.")),
			ChatPrivateResponse::ok,
		))
	}

	/// Creates a room holding the viewer and every existing user in `userIds`.
	async fn create_chat_room(&self, ctx: &Context<'_>, chat_room_input: ChatRoomInput) -> Result<ChatRoomResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		if chat_room_input.user_ids.is_empty() {
			return Ok(ChatRoomResponse::invalid(InputError::new(
				"chatRoomInput.userIds",
				"At least 1 userId must be provided.",
			)));
		}

		let requested: Vec<Ulid> = chat_room_input.user_ids.iter().map(|id| id.to_db()).collect();
		let found = global
			.user_by_id_loader
			.load_many(requested.iter().copied())
			.await
			.map_err_gql("failed to fetch users")?;

		if found.is_empty() {
			return Ok(ChatRoomResponse::invalid(InputError::new(
				"chatRoomInput.userIds",
				"Cannot find any users to add to chat room.",
			)));
		}

		let mut members = vec![auth.user_id()];
		for id in requested {
			if found.contains_key(&id) && !members.contains(&id) {
				members.push(id);
			}
		}

		let chat = database::Chat::create(
			&global.db,
			ChatKind::Room {
				name: chat_room_input.name,
				members,
			},
		)
		.await
		.map_err_gql("failed to create chat")?;

		Ok(ChatRoom::from_chat(chat).map_or_else(room_not_found, ChatRoomResponse::ok))
	}

	async fn update_chat_room(&self, ctx: &Context<'_>, chat_room_id: GqlUlid, name: String) -> Result<ChatRoomResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let Some(chat) = fetch_room(global, chat_room_id.into()).await? else {
			return Ok(room_not_found());
		};

		if !chat.is_member(auth.user_id()) {
			return Ok(not_a_member());
		}

		database::Chat::rename(&global.db, chat.id, &name)
			.await
			.map_err_gql("failed to update chat")?;

		refetch_room(global, chat.id).await
	}

	async fn join_chat_room(&self, ctx: &Context<'_>, chat_room_id: GqlUlid) -> Result<ChatRoomResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let Some(chat) = fetch_room(global, chat_room_id.into()).await? else {
			return Ok(room_not_found());
		};

		if chat.is_member(auth.user_id()) {
			return Ok(ChatRoomResponse::invalid(InputError::new(
				"chatRoom.members",
				"You are already a member of this chat room.",
			)));
		}

		database::Chat::add_member(&global.db, chat.id, auth.user_id())
			.await
			.map_err_gql("failed to join chat")?;

		let Some(chat) = fetch_room(global, chat.id).await? else {
			return Ok(room_not_found());
		};

		publish(
			global,
			SubscriptionTopic::ChatMembers(chat.id),
			&chat,
			ChatEventKind::UserJoined(auth.user_id()),
		);

		Ok(ChatRoom::from_chat(chat).map_or_else(room_not_found, ChatRoomResponse::ok))
	}

	/// Removes the viewer from a room. The other members are told through
	/// `userLeftChatRoom`.
	async fn leave_chat_room(&self, ctx: &Context<'_>, chat_room_id: GqlUlid) -> Result<ChatRoomResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let Some(chat) = fetch_room(global, chat_room_id.into()).await? else {
			return Ok(room_not_found());
		};

		if !chat.is_member(auth.user_id()) {
			return Ok(not_a_member());
		}

		database::Chat::remove_member(&global.db, chat.id, auth.user_id())
			.await
			.map_err_gql("failed to leave chat")?;

		let Some(chat) = fetch_room(global, chat.id).await? else {
			return Ok(room_not_found());
		};

		publish(
			global,
			SubscriptionTopic::ChatMembers(chat.id),
			&chat,
			ChatEventKind::UserLeft(auth.user_id()),
		);

		Ok(ChatRoom::from_chat(chat).map_or_else(room_not_found, ChatRoomResponse::ok))
	}
}
