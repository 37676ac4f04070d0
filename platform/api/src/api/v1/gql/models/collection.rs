use async_graphql::{ComplexObject, Context, SimpleObject};

use super::date::DateRFC3339;
use super::notes_list::NotesList;
use super::ulid::GqlUlid;
use super::user::User;
use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::database;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Collection {
	pub id: GqlUlid,
	pub owner_id: GqlUlid,
	pub title: String,
	/// Either `public` or `private`.
	pub visibility: String,
	pub upvotes: i32,
	pub created_at: DateRFC3339,
	pub updated_at: DateRFC3339,
}

#[ComplexObject]
impl Collection {
	async fn owner(&self, ctx: &Context<'_>) -> Result<Option<User>> {
		let user = ctx
			.get_global()
			.user_by_id_loader
			.load_one(self.owner_id.into())
			.await
			.map_err_gql("failed to fetch user")?;

		Ok(user.map(User::from))
	}

	async fn lists(&self, ctx: &Context<'_>) -> Result<Vec<NotesList>> {
		let lists = database::NotesList::by_collection(&ctx.get_global().db, self.id.into())
			.await
			.map_err_gql("failed to fetch notes lists")?;

		Ok(lists.into_iter().map(NotesList::from).collect())
	}
}

impl From<database::Collection> for Collection {
	fn from(value: database::Collection) -> Self {
		Self {
			id: value.id.into(),
			owner_id: value.owner_id.into(),
			title: value.title,
			visibility: value.visibility,
			upvotes: value.upvotes,
			created_at: value.created_at.into(),
			updated_at: value.updated_at.into(),
		}
	}
}
