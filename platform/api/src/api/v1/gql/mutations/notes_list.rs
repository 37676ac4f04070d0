use async_graphql::{Context, Object};

use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::require_auth;
use crate::api::v1::gql::models::input::{ListLocationInput, NoteInput, NoteLocationInput, NotesListInput};
use crate::api::v1::gql::models::response::{InputError, NoteResponse, NotesListResponse};
use crate::api::v1::gql::models::ulid::GqlUlid;
use crate::database::{self, duplicate_title, validate_title, Invalid, Note, Ulid};
use crate::global::GlobalState;

/// Checks a title for a list in `collection_id`.
async fn check_title(global: &GlobalState, collection_id: Ulid, title: &str) -> Result<Option<Invalid>> {
	if let Err(err) = validate_title("title", title) {
		return Ok(Some(err));
	}

	let taken = database::NotesList::title_taken(&global.db, collection_id, title)
		.await
		.map_err_gql("failed to fetch notes list")?;

	Ok(taken.then(|| duplicate_title("NotesList", title)))
}

async fn owned_collection(global: &GlobalState, owner_id: Ulid, id: Ulid) -> Result<Option<database::Collection>> {
	database::Collection::owned(&global.db, owner_id, id)
		.await
		.map_err_gql("failed to fetch collection")
}

async fn list_in(global: &GlobalState, collection_id: Ulid, id: Ulid) -> Result<Option<database::NotesList>> {
	database::NotesList::in_collection(&global.db, collection_id, id)
		.await
		.map_err_gql("failed to fetch notes list")
}

/// Resolves a list location against the viewer's collections, or the error
/// to answer with.
async fn locate_list(
	global: &GlobalState,
	owner_id: Ulid,
	location: ListLocationInput,
) -> Result<Result<(database::Collection, database::NotesList), InputError>> {
	let Some(collection) = owned_collection(global, owner_id, location.collection_id.into()).await? else {
		return Ok(Err(InputError::new("collection", "Collection not found.")));
	};

	let Some(list) = list_in(global, collection.id, location.list_id.into()).await? else {
		return Ok(Err(InputError::new("list", "List note found")));
	};

	Ok(Ok((collection, list)))
}

#[derive(Default)]
pub struct NotesListMutation;

#[Object]
impl NotesListMutation {
	async fn create_notes_list(
		&self,
		ctx: &Context<'_>,
		collection_id: GqlUlid,
		title: String,
	) -> Result<NotesListResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let Some(collection) = owned_collection(global, auth.user_id(), collection_id.into()).await? else {
			return Ok(NotesListResponse::invalid(InputError::new("collection", "Collection not found")));
		};

		if let Some(err) = check_title(global, collection.id, &title).await? {
			return Ok(NotesListResponse::invalid(err));
		}

		let list = database::NotesList::create(&global.db, collection.id, &title)
			.await
			.map_err_gql("failed to create notes list")?;

		Ok(NotesListResponse::ok(list))
	}

	async fn update_notes_list(
		&self,
		ctx: &Context<'_>,
		list_location: ListLocationInput,
		notes_list_input: NotesListInput,
	) -> Result<NotesListResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let (collection, list) = match locate_list(global, auth.user_id(), list_location).await? {
			Ok(found) => found,
			Err(err) => return Ok(NotesListResponse::invalid(err)),
		};

		if notes_list_input.title == list.title {
			return Ok(NotesListResponse::ok(list));
		}

		if let Some(err) = check_title(global, collection.id, &notes_list_input.title).await? {
			return Ok(NotesListResponse::invalid(err));
		}

		let list = list
			.rename(&global.db, &notes_list_input.title)
			.await
			.map_err_gql("failed to update notes list")?;

		Ok(NotesListResponse::ok(list))
	}

	async fn delete_notes_list(&self, ctx: &Context<'_>, list_location: ListLocationInput) -> Result<bool> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let Some(collection) = owned_collection(global, auth.user_id(), list_location.collection_id.into()).await? else {
			return Ok(false);
		};

		database::NotesList::delete_in_collection(&global.db, collection.id, list_location.list_id.into())
			.await
			.map_err_gql("failed to delete notes list")
	}

	/// Moves a list into another of the viewer's collections.
	async fn move_list(
		&self,
		ctx: &Context<'_>,
		list_location: ListLocationInput,
		new_collection_id: GqlUlid,
	) -> Result<NotesListResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		if list_location.collection_id == new_collection_id {
			return Ok(NotesListResponse::invalid(InputError::new(
				"listLocation.collectionId && newCollectionId",
				"Source and target collections cannot be the same.",
			)));
		}

		let (_, list) = match locate_list(global, auth.user_id(), list_location).await? {
			Ok(found) => found,
			Err(err) => return Ok(NotesListResponse::invalid(err)),
		};

		let Some(target) = owned_collection(global, auth.user_id(), new_collection_id.into()).await? else {
			return Ok(NotesListResponse::invalid(InputError::new(
				"newCollectionId",
				"Collection not found.",
			)));
		};

		let taken = database::NotesList::title_taken(&global.db, target.id, &list.title)
			.await
			.map_err_gql("failed to fetch notes list")?;
		if taken {
			return Ok(NotesListResponse::invalid(duplicate_title("NotesList", &list.title)));
		}

		let list = list.move_to(&global.db, target.id).await.map_err_gql("failed to move notes list")?;

		Ok(NotesListResponse::ok(list))
	}

	async fn add_note(
		&self,
		ctx: &Context<'_>,
		list_location: ListLocationInput,
		note_input: NoteInput,
	) -> Result<NoteResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let Some(collection) = owned_collection(global, auth.user_id(), list_location.collection_id.into()).await? else {
			return Ok(NoteResponse::invalid(InputError::new("collection", "Collection not found")));
		};

		let Some(mut list) = list_in(global, collection.id, list_location.list_id.into()).await? else {
			return Ok(NoteResponse::invalid(InputError::new("notesList", "Notes list not found")));
		};

		if let Err(err) = validate_title("noteInput.title", &note_input.title) {
			return Ok(NoteResponse::invalid(err));
		}

		let note = Note::new(note_input.title, note_input.body);
		list.notes.push(note.clone());
		list.save_notes(&global.db).await.map_err_gql("failed to update notes list")?;

		Ok(NoteResponse::ok(note))
	}

	async fn update_note(
		&self,
		ctx: &Context<'_>,
		note_location: NoteLocationInput,
		note_input: NoteInput,
	) -> Result<NoteResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let location = ListLocationInput {
			collection_id: note_location.collection_id,
			list_id: note_location.list_id,
		};

		let (_, mut list) = match locate_list(global, auth.user_id(), location).await? {
			Ok(found) => found,
			Err(err) => return Ok(NoteResponse::invalid(err)),
		};

		if let Err(err) = validate_title("noteInput.title", &note_input.title) {
			return Ok(NoteResponse::invalid(err));
		}

		let Some(note) = list.note_mut(note_location.note_id.to_ulid()) else {
			return Ok(NoteResponse::invalid(InputError::new("note", "Note note found.")));
		};

		note.title = note_input.title;
		note.body = note_input.body;
		let note = note.clone();

		list.save_notes(&global.db).await.map_err_gql("failed to update notes list")?;

		Ok(NoteResponse::ok(note))
	}

	async fn delete_note(&self, ctx: &Context<'_>, note_location: NoteLocationInput) -> Result<bool> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let location = ListLocationInput {
			collection_id: note_location.collection_id,
			list_id: note_location.list_id,
		};

		let Ok((_, mut list)) = locate_list(global, auth.user_id(), location).await? else {
			return Ok(false);
		};

		if !list.remove_note(note_location.note_id.to_ulid()) {
			return Ok(false);
		}

		list.save_notes(&global.db).await.map_err_gql("failed to update notes list")?;

		Ok(true)
	}
}
