use async_graphql::{Context, Object};

use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::require_auth;
use crate::api::v1::gql::models::input::{ListLocationInput, NoteLocationInput};
use crate::api::v1::gql::models::notes_list::{Note, NotesList};
use crate::api::v1::gql::models::ulid::GqlUlid;
use crate::database::{self, Ulid};
use crate::global::GlobalState;

/// A list in one of `owner_id`'s collections.
pub(crate) async fn owned_list(
	global: &GlobalState,
	owner_id: Ulid,
	location: ListLocationInput,
) -> Result<Option<database::NotesList>> {
	let collection = database::Collection::owned(&global.db, owner_id, location.collection_id.into())
		.await
		.map_err_gql("failed to fetch collection")?;

	let Some(collection) = collection else {
		return Ok(None);
	};

	database::NotesList::in_collection(&global.db, collection.id, location.list_id.into())
		.await
		.map_err_gql("failed to fetch notes list")
}

#[derive(Default)]
pub struct NotesListQuery;

#[Object]
impl NotesListQuery {
	async fn notes_list(&self, ctx: &Context<'_>, list_location: ListLocationInput) -> Result<Option<NotesList>> {
		let auth = require_auth(ctx).await?;

		let list = owned_list(ctx.get_global(), auth.user_id(), list_location).await?;

		Ok(list.map(NotesList::from))
	}

	/// The lists of one of the viewer's collections, null if there is no such
	/// collection.
	async fn notes_lists(&self, ctx: &Context<'_>, collection_id: GqlUlid) -> Result<Option<Vec<NotesList>>> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let collection = database::Collection::owned(&global.db, auth.user_id(), collection_id.into())
			.await
			.map_err_gql("failed to fetch collection")?;

		let Some(collection) = collection else {
			return Ok(None);
		};

		let lists = database::NotesList::by_collection(&global.db, collection.id)
			.await
			.map_err_gql("failed to fetch notes lists")?;

		Ok(Some(lists.into_iter().map(NotesList::from).collect()))
	}

	async fn note(&self, ctx: &Context<'_>, note_location: NoteLocationInput) -> Result<Option<Note>> {
		let auth = require_auth(ctx).await?;

		let location = ListLocationInput {
			collection_id: note_location.collection_id,
			list_id: note_location.list_id,
		};

		let note = owned_list(ctx.get_global(), auth.user_id(), location)
			.await?
			.and_then(|list| list.note(note_location.note_id.to_ulid()).cloned());

		Ok(note.map(Note::from))
	}
}
