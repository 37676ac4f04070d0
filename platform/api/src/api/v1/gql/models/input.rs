use async_graphql::InputObject;

use super::ulid::GqlUlid;

#[derive(InputObject)]
pub struct RegisterInput {
	pub email: String,
	pub username: String,
	pub password: String,
}

#[derive(InputObject)]
pub struct CollectionInput {
	pub title: Option<String>,
	pub visibility: Option<String>,
}

/// Where a notes list lives.
#[derive(InputObject, Clone, Copy)]
pub struct ListLocationInput {
	pub collection_id: GqlUlid,
	pub list_id: GqlUlid,
}

/// Where a note lives.
#[derive(InputObject, Clone, Copy)]
pub struct NoteLocationInput {
	pub collection_id: GqlUlid,
	pub list_id: GqlUlid,
	pub note_id: GqlUlid,
}

#[derive(InputObject)]
pub struct NotesListInput {
	pub title: String,
}

#[derive(InputObject)]
pub struct NoteInput {
	pub title: String,
	pub body: String,
}

#[derive(InputObject)]
pub struct ChatPrivateInput {
	/// The user to chat with.
	pub user_id: GqlUlid,
}

#[derive(InputObject)]
pub struct ChatRoomInput {
	pub name: String,
	/// Users added next to the creator.
	pub user_ids: Vec<GqlUlid>,
}

#[derive(InputObject)]
pub struct CreateMessageInput {
	pub content: String,
	pub chat_id: GqlUlid,
}

#[derive(InputObject)]
pub struct MessageUpdateInput {
	pub content: String,
}

/// Offset based paging. `cursor` is the number of items to skip.
#[derive(InputObject, Clone, Copy, Default)]
pub struct PaginationInput {
	pub cursor: Option<i64>,
	pub limit: Option<i64>,
}

impl PaginationInput {
	pub const DEFAULT_LIMIT: i64 = 50;
	pub const MAX_LIMIT: i64 = 100;

	/// The `(offset, limit)` to query with.
	pub fn bounds(pagination: Option<Self>) -> (i64, i64) {
		let pagination = pagination.unwrap_or_default();
		let offset = pagination.cursor.unwrap_or(0).max(0);
		let limit = pagination.limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT);

		(offset, limit)
	}
}

/// The chat a subscription listens to.
#[derive(InputObject)]
pub struct ChatSubscriptionArgs {
	pub chat_id: GqlUlid,
	/// Defaults to the authenticated user.
	pub user_id: Option<GqlUlid>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_pagination_bounds() {
		assert_eq!(PaginationInput::bounds(None), (0, PaginationInput::DEFAULT_LIMIT));

		let pagination = PaginationInput {
			cursor: Some(20),
			limit: Some(10),
		};
		assert_eq!(PaginationInput::bounds(Some(pagination)), (20, 10));

		let pagination = PaginationInput {
			cursor: Some(-5),
			limit: Some(10_000),
		};
		assert_eq!(PaginationInput::bounds(Some(pagination)), (0, PaginationInput::MAX_LIMIT));
	}
}
