use async_graphql::{Enum, SimpleObject};

use super::chat::{ChatPrivate, ChatRoom};
use super::collection::Collection;
use super::message::Message;
use super::notes_list::{Note, NotesList};
use super::ulid::GqlUlid;
use super::user::User;
use crate::database::{self, Invalid};

/// A rejected user field.
#[derive(SimpleObject, Clone, Debug, PartialEq)]
pub struct FieldError {
	pub field: String,
	pub message: String,
}

/// Collects the failed checks, in order.
pub fn field_errors<'a>(checks: impl IntoIterator<Item = (&'a str, Result<(), &'static str>)>) -> Vec<FieldError> {
	checks
		.into_iter()
		.filter_map(|(field, result)| {
			result.err().map(|message| FieldError {
				field: field.to_string(),
				message: message.to_string(),
			})
		})
		.collect()
}

/// A rejected input, named by the property it was supplied for.
#[derive(SimpleObject, Clone, Debug, PartialEq)]
#[graphql(name = "Error")]
pub struct InputError {
	pub property: String,
	pub message: String,
}

impl InputError {
	pub fn new(property: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			property: property.into(),
			message: message.into(),
		}
	}
}

impl From<Invalid> for InputError {
	fn from(value: Invalid) -> Self {
		Self {
			property: value.property,
			message: value.message,
		}
	}
}

#[derive(SimpleObject, Default)]
pub struct UserResponse {
	pub errors: Option<Vec<FieldError>>,
	pub user: Option<User>,
}

impl UserResponse {
	pub fn ok(user: impl Into<User>) -> Self {
		Self {
			errors: None,
			user: Some(user.into()),
		}
	}

	pub fn field_error(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::with_errors(vec![FieldError {
			field: field.into(),
			message: message.into(),
		}])
	}

	pub fn with_errors(errors: Vec<FieldError>) -> Self {
		Self {
			errors: Some(errors),
			user: None,
		}
	}
}

/// A payload carrying either `$field` or an [`InputError`].
macro_rules! response {
	($name:ident, $field:ident: $ty:ty) => {
		#[derive(SimpleObject)]
		pub struct $name {
			pub $field: Option<$ty>,
			pub error: Option<InputError>,
		}

		impl $name {
			pub fn ok(value: impl Into<$ty>) -> Self {
				Self {
					$field: Some(value.into()),
					error: None,
				}
			}

			pub fn invalid(error: impl Into<InputError>) -> Self {
				Self {
					$field: None,
					error: Some(error.into()),
				}
			}
		}
	};
}

response!(CollectionResponse, collection: Collection);
response!(NotesListResponse, notes_list: NotesList);
response!(NoteResponse, note: Note);
response!(ChatPrivateResponse, chat_private: ChatPrivate);
response!(ChatRoomResponse, chat_room: ChatRoom);
response!(MessageResponse, message: Message);
response!(MessageDeleteResponse, message_id: GqlUlid);

#[derive(Enum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Activity {
	Create,
	Update,
}

impl From<database::Activity> for Activity {
	fn from(value: database::Activity) -> Self {
		match value {
			database::Activity::Create => Self::Create,
			database::Activity::Update => Self::Update,
		}
	}
}

#[derive(SimpleObject)]
pub struct ActivityFeedItem {
	pub activity: Activity,
	pub collection: Collection,
}

/// A user joined or left a chat room.
#[derive(SimpleObject, Clone)]
pub struct ChatRoomMemberEvent {
	pub chat_room_id: GqlUlid,
	pub user_id: GqlUlid,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_user_response_field_error() {
		let response = UserResponse::field_error("registerInput", "Already registered");

		assert!(response.user.is_none());
		assert_eq!(
			response.errors,
			Some(vec![FieldError {
				field: "registerInput".to_string(),
				message: "Already registered".to_string(),
			}])
		);
	}

	#[test]
	fn test_field_errors_keep_failures_only() {
		let errors = field_errors([
			("username", Ok(())),
			("password", Err("Password must be at least 3 characters long")),
		]);

		assert_eq!(
			errors,
			vec![FieldError {
				field: "password".to_string(),
				message: "Password must be at least 3 characters long".to_string(),
			}]
		);
	}

	#[test]
	fn test_input_error_from_invalid() {
		let response = CollectionResponse::invalid(database::duplicate_title("Collection", "work"));

		assert!(response.collection.is_none());
		assert_eq!(
			response.error,
			Some(InputError::new("title", "Collection with title 'work' already exisits."))
		);
	}
}
