use async_graphql::{Context, Object};

use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::require_auth;
use crate::api::v1::gql::models::input::CollectionInput;
use crate::api::v1::gql::models::response::{CollectionResponse, InputError};
use crate::api::v1::gql::models::ulid::GqlUlid;
use crate::database::{self, duplicate_title, validate_title, validate_visibility, Invalid, Ulid};
use crate::global::GlobalState;

/// Checks a title for one of `owner_id`'s collections.
async fn check_title(global: &GlobalState, owner_id: Ulid, title: &str) -> Result<Option<Invalid>> {
	if let Err(err) = validate_title("title", title) {
		return Ok(Some(err));
	}

	let taken = database::Collection::title_taken(&global.db, owner_id, title)
		.await
		.map_err_gql("failed to fetch collection")?;

	Ok(taken.then(|| duplicate_title("Collection", title)))
}

fn not_found() -> CollectionResponse {
	CollectionResponse::invalid(InputError::new("collection", "Collection does not exist."))
}

#[derive(Default)]
pub struct CollectionMutation;

#[Object]
impl CollectionMutation {
	async fn create_collection(&self, ctx: &Context<'_>, title: String, visibility: String) -> Result<CollectionResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let visibility = match validate_visibility(&visibility) {
			Ok(visibility) => visibility,
			Err(err) => return Ok(CollectionResponse::invalid(err)),
		};

		if let Some(err) = check_title(global, auth.user_id(), &title).await? {
			return Ok(CollectionResponse::invalid(err));
		}

		let collection = database::Collection::create(&global.db, auth.user_id(), &title, visibility)
			.await
			.map_err_gql("failed to create collection")?;

		Ok(CollectionResponse::ok(collection))
	}

	/// Changes the title or visibility of one of the viewer's collections.
	async fn update_collection(
		&self,
		ctx: &Context<'_>,
		id: GqlUlid,
		collection_input: CollectionInput,
	) -> Result<CollectionResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let Some(mut collection) = database::Collection::owned(&global.db, auth.user_id(), id.into())
			.await
			.map_err_gql("failed to fetch collection")?
		else {
			return Ok(not_found());
		};

		if let Some(visibility) = collection_input.visibility.filter(|visibility| !visibility.is_empty()) {
			match validate_visibility(&visibility) {
				Ok(visibility) => collection.visibility = visibility.to_string(),
				Err(err) => return Ok(CollectionResponse::invalid(err)),
			}
		}

		if let Some(title) = collection_input.title.filter(|title| !title.is_empty()) {
			if title != collection.title {
				if let Some(err) = check_title(global, auth.user_id(), &title).await? {
					return Ok(CollectionResponse::invalid(err));
				}

				collection.title = title;
			}
		}

		let collection = collection.save(&global.db).await.map_err_gql("failed to update collection")?;

		Ok(CollectionResponse::ok(collection))
	}

	/// Deletes one of the viewer's collections. False if the viewer has no
	/// such collection.
	async fn delete_collection(&self, ctx: &Context<'_>, id: GqlUlid) -> Result<bool> {
		let auth = require_auth(ctx).await?;

		database::Collection::delete_owned(&ctx.get_global().db, auth.user_id(), id.into())
			.await
			.map_err_gql("failed to delete collection")
	}

	/// Upvotes a collection, or takes the vote back when already voted.
	async fn vote(&self, ctx: &Context<'_>, id: GqlUlid) -> Result<CollectionResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let Some(collection) = database::Collection::toggle_vote(&global.db, auth.user_id(), id.into())
			.await
			.map_err_gql("failed to update collection")?
		else {
			return Ok(not_found());
		};

		Ok(CollectionResponse::ok(collection))
	}

	/// Copies another user's public collection into the viewer's collections.
	async fn save_public_collection(
		&self,
		ctx: &Context<'_>,
		target_user_id: GqlUlid,
		collection_id: GqlUlid,
	) -> Result<CollectionResponse> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let public = database::Collection::public_by_owner(&global.db, target_user_id.into())
			.await
			.map_err_gql("failed to fetch collections")?;

		if public.is_empty() {
			return Ok(CollectionResponse::invalid(InputError::new("visibility", "No public collections")));
		}

		let Some(source) = public.into_iter().find(|collection| collection.id == collection_id.to_db()) else {
			return Ok(not_found());
		};

		let taken = database::Collection::title_taken(&global.db, auth.user_id(), &source.title)
			.await
			.map_err_gql("failed to fetch collection")?;
		if taken {
			return Ok(CollectionResponse::invalid(duplicate_title("Collection", &source.title)));
		}

		let collection = database::Collection::copy_to(&global.db, auth.user_id(), &source)
			.await
			.map_err_gql("failed to copy collection")?;

		Ok(CollectionResponse::ok(collection))
	}
}
