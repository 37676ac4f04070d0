use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::async_trait::async_trait;
use async_graphql::dataloader::{DataLoader, Loader};

use crate::database::{Collection, Ulid};

pub struct CollectionByIdLoader {
	db: Arc<sqlx::PgPool>,
}

impl CollectionByIdLoader {
	pub fn new(db: Arc<sqlx::PgPool>) -> DataLoader<Self> {
		DataLoader::new(Self { db }, tokio::spawn)
	}
}

#[async_trait]
impl Loader<Ulid> for CollectionByIdLoader {
	type Error = Arc<sqlx::Error>;
	type Value = Collection;

	async fn load(&self, keys: &[Ulid]) -> Result<HashMap<Ulid, Self::Value>, Self::Error> {
		let results: Vec<Collection> = sqlx::query_as("SELECT * FROM collections WHERE id = ANY($1)")
			.bind(keys)
			.fetch_all(self.db.as_ref())
			.await
			.map_err(|e| {
				tracing::error!(err = %e, "failed to fetch collections");
				Arc::new(e)
			})?;

		Ok(results.into_iter().map(|r| (r.id, r)).collect())
	}
}
