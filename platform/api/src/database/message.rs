use chrono::{DateTime, Utc};

use super::Ulid;

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct Message {
	pub id: Ulid,
	pub chat_id: Ulid,
	pub sender_id: Ulid,
	pub content: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Message {
	pub async fn by_id(db: &sqlx::PgPool, id: Ulid) -> sqlx::Result<Option<Self>> {
		sqlx::query_as("SELECT * FROM messages WHERE id = $1")
			.bind(id)
			.fetch_optional(db)
			.await
	}

	pub async fn create(db: &sqlx::PgPool, chat_id: Ulid, sender_id: Ulid, content: &str) -> sqlx::Result<Self> {
		sqlx::query_as("INSERT INTO messages (id, chat_id, sender_id, content) VALUES ($1, $2, $3, $4) RETURNING *")
			.bind(Ulid::new())
			.bind(chat_id)
			.bind(sender_id)
			.bind(content)
			.fetch_one(db)
			.await
	}

	pub async fn update_content(&self, db: &sqlx::PgPool, content: &str) -> sqlx::Result<Self> {
		sqlx::query_as("UPDATE messages SET content = $2, updated_at = NOW() WHERE id = $1 RETURNING *")
			.bind(self.id)
			.bind(content)
			.fetch_one(db)
			.await
	}

	pub async fn delete(&self, db: &sqlx::PgPool) -> sqlx::Result<()> {
		sqlx::query("DELETE FROM messages WHERE id = $1")
			.bind(self.id)
			.execute(db)
			.await?;

		Ok(())
	}

	/// Messages of a chat, oldest first.
	pub async fn in_chat(db: &sqlx::PgPool, chat_id: Ulid, offset: i64, limit: i64) -> sqlx::Result<Vec<Self>> {
		sqlx::query_as("SELECT * FROM messages WHERE chat_id = $1 ORDER BY id OFFSET $2 LIMIT $3")
			.bind(chat_id)
			.bind(offset)
			.bind(limit)
			.fetch_all(db)
			.await
	}
}
