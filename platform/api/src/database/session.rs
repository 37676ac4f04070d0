use chrono::{DateTime, Duration, Utc};

use super::Ulid;

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct Session {
	/// The unique identifier for the session.
	pub id: Ulid,
	/// Foreign key to the user table.
	pub user_id: Ulid,
	/// The time the session expires.
	pub expires_at: DateTime<Utc>,
	/// The time the session was last used.
	pub last_used_at: DateTime<Utc>,
}

impl Session {
	pub fn is_valid(&self) -> bool {
		self.expires_at > Utc::now()
	}

	pub async fn create(db: &sqlx::PgPool, user_id: Ulid, validity: Duration) -> sqlx::Result<Self> {
		sqlx::query_as(
			r#"
			INSERT INTO user_sessions (
				id,
				user_id,
				expires_at
			) VALUES (
				$1,
				$2,
				$3
			) RETURNING *
			"#,
		)
		.bind(Ulid::new())
		.bind(user_id)
		.bind(Utc::now() + validity)
		.fetch_one(db)
		.await
	}

	pub async fn delete(db: &sqlx::PgPool, id: Ulid) -> sqlx::Result<bool> {
		let result = sqlx::query("DELETE FROM user_sessions WHERE id = $1")
			.bind(id)
			.execute(db)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}
