use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::async_trait::async_trait;
use async_graphql::dataloader::{DataLoader, Loader};

use crate::database::{Ulid, User};

pub struct UserByUsernameLoader {
	db: Arc<sqlx::PgPool>,
}

impl UserByUsernameLoader {
	pub fn new(db: Arc<sqlx::PgPool>) -> DataLoader<Self> {
		DataLoader::new(Self { db }, tokio::spawn)
	}
}

#[async_trait]
impl Loader<String> for UserByUsernameLoader {
	type Error = Arc<sqlx::Error>;
	type Value = User;

	async fn load(&self, keys: &[String]) -> Result<HashMap<String, Self::Value>, Self::Error> {
		let results: Vec<User> = sqlx::query_as("SELECT * FROM users WHERE username = ANY($1)")
			.bind(keys)
			.fetch_all(self.db.as_ref())
			.await
			.map_err(|e| {
				tracing::error!(err = %e, "failed to fetch users by username");
				Arc::new(e)
			})?;

		Ok(results.into_iter().map(|r| (r.username.clone(), r)).collect())
	}
}

pub struct UserByIdLoader {
	db: Arc<sqlx::PgPool>,
}

impl UserByIdLoader {
	pub fn new(db: Arc<sqlx::PgPool>) -> DataLoader<Self> {
		DataLoader::new(Self { db }, tokio::spawn)
	}
}

#[async_trait]
impl Loader<Ulid> for UserByIdLoader {
	type Error = Arc<sqlx::Error>;
	type Value = User;

	async fn load(&self, keys: &[Ulid]) -> Result<HashMap<Ulid, Self::Value>, Self::Error> {
		let results: Vec<User> = sqlx::query_as("SELECT * FROM users WHERE id = ANY($1)")
			.bind(keys)
			.fetch_all(self.db.as_ref())
			.await
			.map_err(|e| {
				tracing::error!(err = %e, "failed to fetch users by id");
				Arc::new(e)
			})?;

		Ok(results.into_iter().map(|r| (r.id, r)).collect())
	}
}
