use async_graphql::MergedObject;

mod chat;
mod collection;
mod notes_list;
mod user;
#[derive(MergedObject, Default)]
/// The root query type which contains root level fields.
pub struct Query(
	user::UserQuery,
	collection::CollectionQuery,
	notes_list::NotesListQuery,
	chat::ChatQuery,
);
