use async_graphql::{Context, Subscription};
use async_stream::stream;
use futures_util::Stream;

use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::{GqlError, Result};
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::require_auth;
use crate::api::v1::gql::models::input::ChatSubscriptionArgs;
use crate::api::v1::gql::models::message::Message;
use crate::api::v1::gql::models::response::ChatRoomMemberEvent;
use crate::database::Ulid;
use crate::subscription::{ChatEvent, ChatEventKind, SubscriptionTopic};

/// The user a subscription delivers for. Only the viewer may be named.
fn subscriber_id(viewer: Ulid, requested: Option<Ulid>) -> Result<Ulid, GqlError> {
	match requested {
		Some(id) if id != viewer => Err(GqlError::InvalidInput {
			fields: vec!["args.userId"],
			message: "userId must be the authenticated user",
		}),
		_ => Ok(viewer),
	}
}

fn message_sent(event: ChatEvent) -> Option<Message> {
	match event.kind {
		ChatEventKind::MessageSent(message) => Some(message.into()),
		_ => None,
	}
}

fn message_updated(event: ChatEvent) -> Option<Message> {
	match event.kind {
		ChatEventKind::MessageUpdated(message) => Some(message.into()),
		_ => None,
	}
}

fn message_deleted(event: ChatEvent) -> Option<Message> {
	match event.kind {
		ChatEventKind::MessageDeleted(message) => Some(message.into()),
		_ => None,
	}
}

fn user_joined(event: ChatEvent) -> Option<ChatRoomMemberEvent> {
	match event.kind {
		ChatEventKind::UserJoined(user_id) => Some(ChatRoomMemberEvent {
			chat_room_id: event.chat_id.into(),
			user_id: user_id.into(),
		}),
		_ => None,
	}
}

fn user_left(event: ChatEvent) -> Option<ChatRoomMemberEvent> {
	match event.kind {
		ChatEventKind::UserLeft(user_id) => Some(ChatRoomMemberEvent {
			chat_room_id: event.chat_id.into(),
			user_id: user_id.into(),
		}),
		_ => None,
	}
}

/// Streams the events on `topic` that `args` may see, mapped through `pick`.
async fn watch<'ctx, T: Send + 'ctx>(
	ctx: &'ctx Context<'_>,
	args: ChatSubscriptionArgs,
	topic: fn(Ulid) -> SubscriptionTopic,
	pick: fn(ChatEvent) -> Option<T>,
) -> Result<impl Stream<Item = T> + 'ctx> {
	let auth = require_auth(ctx).await?;
	let viewer = subscriber_id(auth.user_id(), args.user_id.map(|id| id.to_db()))?;
	let chat_id = args.chat_id.to_db();

	let mut events = ctx
		.get_global()
		.subscription_manager
		.subscribe(topic(chat_id))
		.await
		.map_err_gql("failed to subscribe to chat")?;

	Ok(stream!({
		while let Some(event) = events.next_event().await {
			if !event.should_deliver(chat_id, viewer) {
				continue;
			}

			if let Some(item) = pick(event) {
				yield item;
			}
		}
	}))
}

#[derive(Default)]
pub struct ChatSubscription;

#[Subscription]
impl ChatSubscription {
	/// Messages sent to a chat the subscriber is a member of.
	async fn message_sent<'ctx>(
		&self,
		ctx: &'ctx Context<'_>,
		args: ChatSubscriptionArgs,
	) -> Result<impl Stream<Item = Message> + 'ctx> {
		watch(ctx, args, SubscriptionTopic::ChatMessages, message_sent).await
	}

	async fn message_updated<'ctx>(
		&self,
		ctx: &'ctx Context<'_>,
		args: ChatSubscriptionArgs,
	) -> Result<impl Stream<Item = Message> + 'ctx> {
		watch(ctx, args, SubscriptionTopic::ChatMessages, message_updated).await
	}

	async fn message_deleted<'ctx>(
		&self,
		ctx: &'ctx Context<'_>,
		args: ChatSubscriptionArgs,
	) -> Result<impl Stream<Item = Message> + 'ctx> {
		watch(ctx, args, SubscriptionTopic::ChatMessages, message_deleted).await
	}

	async fn user_joined_chat_room<'ctx>(
		&self,
		ctx: &'ctx Context<'_>,
		args: ChatSubscriptionArgs,
	) -> Result<impl Stream<Item = ChatRoomMemberEvent> + 'ctx> {
		watch(ctx, args, SubscriptionTopic::ChatMembers, user_joined).await
	}

	/// Members leaving a room. The member who left is not told.
	async fn user_left_chat_room<'ctx>(
		&self,
		ctx: &'ctx Context<'_>,
		args: ChatSubscriptionArgs,
	) -> Result<impl Stream<Item = ChatRoomMemberEvent> + 'ctx> {
		watch(ctx, args, SubscriptionTopic::ChatMembers, user_left).await
	}
}
