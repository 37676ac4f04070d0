use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::async_trait::async_trait;
use async_graphql::dataloader::{DataLoader, Loader};

use crate::database::{Session, Ulid};

pub struct SessionByIdLoader {
	db: Arc<sqlx::PgPool>,
}

impl SessionByIdLoader {
	pub fn new(db: Arc<sqlx::PgPool>) -> DataLoader<Self> {
		DataLoader::new(Self { db }, tokio::spawn)
	}
}

#[async_trait]
impl Loader<Ulid> for SessionByIdLoader {
	type Error = Arc<sqlx::Error>;
	type Value = Session;

	async fn load(&self, keys: &[Ulid]) -> Result<HashMap<Ulid, Self::Value>, Self::Error> {
		let results: Vec<Session> = sqlx::query_as("SELECT * FROM user_sessions WHERE id = ANY($1)")
			.bind(keys)
			.fetch_all(self.db.as_ref())
			.await
			.map_err(|e| {
				tracing::error!(err = %e, "failed to fetch sessions");
				Arc::new(e)
			})?;

		Ok(results.into_iter().map(|r| (r.id, r)).collect())
	}
}
