use async_graphql::MergedObject;

mod auth;
mod chat;
mod collection;
mod message;
mod notes_list;
mod user;

#[derive(MergedObject, Default)]
/// The root mutation type which contains root level fields.
pub struct Mutation(
	auth::AuthMutation,
	user::UserMutation,
	collection::CollectionMutation,
	notes_list::NotesListMutation,
	chat::ChatMutation,
	message::MessageMutation,
);
