use async_graphql::{Context, Object};

use super::chat::publish;
use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::require_auth;
use crate::api::v1::gql::models::input::{CreateMessageInput, MessageUpdateInput};
use crate::api::v1::gql::models::response::{InputError, MessageDeleteResponse, MessageResponse};
use crate::api::v1::gql::models::ulid::GqlUlid;
use crate::database::{self, validate_content, Ulid};
use crate::global::GlobalState;
use crate::subscription::{ChatEventKind, SubscriptionTopic};

/// A message the viewer sent, together with its chat.
async fn own_message(
	global: &GlobalState,
	sender_id: Ulid,
	id: Ulid,
) -> Result<Result<(database::Message, database::Chat), InputError>> {
	let message = database::Message::by_id(&global.db, id)
		.await
		.map_err_gql("failed to fetch message")?;

	let Some(message) = message.filter(|message| message.sender_id == sender_id) else {
		return Ok(Err(InputError::new("message", "Message does not exist.")));
	};

	let chat = database::Chat::by_id(&global.db, message.chat_id)
		.await
		.map_err_gql("failed to fetch chat")?;

	let Some(chat) = chat else {
		return Ok(Err(InputError::new("chat", "Chat does not exist.")));
	};

	Ok(Ok((message, chat)))
}

#[derive(Default)]
pub struct MessageMutation;

#[Object]
impl MessageMutation {
	/// Sends a message to a chat the viewer is a member of.
	async fn create_message(
		&self,
		ctx: &Context<'_>,
		create_message_input: CreateMessageInput,
	) -> Result<MessageResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		if let Err(err) = validate_content(&create_message_input.content) {
			return Ok(MessageResponse::invalid(err));
		}

		let chat = database::Chat::by_id(&global.db, create_message_input.chat_id.into())
			.await
			.map_err_gql("failed to fetch chat")?;

		let Some(chat) = chat.filter(|chat| chat.is_member(auth.user_id())) else {
			return Ok(MessageResponse::invalid(InputError::new("chat", "Chat does not exist.")));
		};

		let message = database::Message::create(&global.db, chat.id, auth.user_id(), &create_message_input.content)
			.await
			.map_err_gql("failed to create message")?;

		publish(
			global,
			SubscriptionTopic::ChatMessages(chat.id),
			&chat,
			ChatEventKind::MessageSent(message.clone()),
		);

		Ok(MessageResponse::ok(message))
	}

	async fn update_message(
		&self,
		ctx: &Context<'_>,
		message_id: GqlUlid,
		message_update_input: MessageUpdateInput,
	) -> Result<MessageResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		if let Err(err) = validate_content(&message_update_input.content) {
			return Ok(MessageResponse::invalid(err));
		}

		let (message, chat) = match own_message(global, auth.user_id(), message_id.into()).await? {
			Ok(found) => found,
			Err(err) => return Ok(MessageResponse::invalid(err)),
		};

		let message = message
			.update_content(&global.db, &message_update_input.content)
			.await
			.map_err_gql("failed to update message")?;

		publish(
			global,
			SubscriptionTopic::ChatMessages(chat.id),
			&chat,
			ChatEventKind::MessageUpdated(message.clone()),
		);

		Ok(MessageResponse::ok(message))
	}

	async fn delete_message(&self, ctx: &Context<'_>, message_id: GqlUlid) -> Result<MessageDeleteResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let (message, chat) = match own_message(global, auth.user_id(), message_id.into()).await? {
			Ok(found) => found,
			Err(err) => return Ok(MessageDeleteResponse::invalid(err)),
		};

		message.delete(&global.db).await.map_err_gql("failed to delete message")?;

		let id = message.id;
		publish(
			global,
			SubscriptionTopic::ChatMessages(chat.id),
			&chat,
			ChatEventKind::MessageDeleted(message),
		);

		Ok(MessageDeleteResponse::ok(id))
	}
}
