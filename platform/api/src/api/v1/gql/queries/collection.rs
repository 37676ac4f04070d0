use async_graphql::{Context, Object};

use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::api::v1::gql::guards::require_auth;
use crate::api::v1::gql::models::collection::Collection;
use crate::api::v1::gql::models::response::{CollectionResponse, InputError};
use crate::api::v1::gql::models::ulid::GqlUlid;
use crate::database;

#[derive(Default)]
pub struct CollectionQuery;

#[Object]
impl CollectionQuery {
	/// One of the viewer's collections, by id or by title.
	async fn collection(
		&self,
		ctx: &Context<'_>,
		id: Option<GqlUlid>,
		title: Option<String>,
	) -> Result<CollectionResponse> {
		let auth = require_auth(ctx).await?;

		let collection = database::Collection::owned_by_id_or_title(
			&ctx.get_global().db,
			auth.user_id(),
			id.map(Into::into),
			title.as_deref(),
		)
		.await
		.map_err_gql("failed to fetch collection")?;

		Ok(match collection {
			Some(collection) => CollectionResponse::ok(collection),
			None => CollectionResponse::invalid(InputError::new("collection", "Collection does not exist.")),
		})
	}

	/// All of the viewer's collections.
	async fn collections(&self, ctx: &Context<'_>) -> Result<Vec<Collection>> {
		let auth = require_auth(ctx).await?;

		let collections = database::Collection::by_owner(&ctx.get_global().db, auth.user_id())
			.await
			.map_err_gql("failed to fetch collections")?;

		Ok(collections.into_iter().map(Collection::from).collect())
	}

	/// A user's collections, private ones are left out unless the viewer is
	/// the owner.
	async fn user_collections(&self, ctx: &Context<'_>, id: GqlUlid) -> Result<Vec<Collection>> {
		let auth = require_auth(ctx).await?;
		let global = ctx.get_global();

		let collections = if auth.user_id() == id.to_db() {
			database::Collection::by_owner(&global.db, id.into()).await
		} else {
			database::Collection::public_by_owner(&global.db, id.into()).await
		}
		.map_err_gql("failed to fetch collections")?;

		Ok(collections.into_iter().map(Collection::from).collect())
	}
}
