use async_graphql::{ComplexObject, Context, SimpleObject};

use super::collection::Collection;
use super::date::DateRFC3339;
use super::ulid::GqlUlid;
use crate::api::v1::gql::error::ext::*;
use crate::api::v1::gql::error::Result;
use crate::api::v1::gql::ext::ContextExt;
use crate::database;

#[derive(SimpleObject, Clone)]
pub struct Note {
	pub id: GqlUlid,
	pub title: String,
	pub body: String,
}

impl From<database::Note> for Note {
	fn from(value: database::Note) -> Self {
		Self {
			id: value.id.into(),
			title: value.title,
			body: value.body,
		}
	}
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct NotesList {
	pub id: GqlUlid,
	pub collection_id: GqlUlid,
	pub title: String,
	pub notes: Vec<Note>,
	pub created_at: DateRFC3339,
	pub updated_at: DateRFC3339,
}

#[ComplexObject]
impl NotesList {
	async fn collection(&self, ctx: &Context<'_>) -> Result<Option<Collection>> {
		let collection = ctx
			.get_global()
			.collection_by_id_loader
			.load_one(self.collection_id.into())
			.await
			.map_err_gql("failed to fetch collection")?;

		Ok(collection.map(Collection::from))
	}
}

impl From<database::NotesList> for NotesList {
	fn from(value: database::NotesList) -> Self {
		Self {
			id: value.id.into(),
			collection_id: value.collection_id.into(),
			title: value.title,
			notes: value.notes.0.into_iter().map(Note::from).collect(),
			created_at: value.created_at.into(),
			updated_at: value.updated_at.into(),
		}
	}
}
