use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::{NotesList, Ulid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
	Public,
	Private,
}

impl Visibility {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Public => "public",
			Self::Private => "private",
		}
	}
}

impl fmt::Display for Visibility {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid visibility: {0:?}")]
pub struct InvalidVisibility(pub String);

impl FromStr for Visibility {
	type Err = InvalidVisibility;

	/// Only the exact lowercase literals are accepted.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"public" => Ok(Self::Public),
			"private" => Ok(Self::Private),
			_ => Err(InvalidVisibility(s.to_string())),
		}
	}
}

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct Collection {
	pub id: Ulid,
	pub owner_id: Ulid,
	pub title: String,
	/// Either `public` or `private`, enforced by a check constraint.
	pub visibility: String,
	pub upvotes: i32,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Collection {
	pub fn visibility(&self) -> Visibility {
		self.visibility.parse().unwrap_or(Visibility::Private)
	}

	pub fn is_public(&self) -> bool {
		self.visibility() == Visibility::Public
	}

	/// Whether `viewer` may see this collection.
	pub fn visible_to(&self, viewer: Option<Ulid>) -> bool {
		self.is_public() || viewer == Some(self.owner_id)
	}

	pub async fn by_owner(db: &sqlx::PgPool, owner_id: Ulid) -> sqlx::Result<Vec<Self>> {
		sqlx::query_as("SELECT * FROM collections WHERE owner_id = $1 ORDER BY id")
			.bind(owner_id)
			.fetch_all(db)
			.await
	}

	pub async fn public_by_owner(db: &sqlx::PgPool, owner_id: Ulid) -> sqlx::Result<Vec<Self>> {
		sqlx::query_as("SELECT * FROM collections WHERE owner_id = $1 AND visibility = 'public' ORDER BY id")
			.bind(owner_id)
			.fetch_all(db)
			.await
	}

	/// Looks up one of `owner_id`'s collections.
	pub async fn owned(db: &sqlx::PgPool, owner_id: Ulid, id: Ulid) -> sqlx::Result<Option<Self>> {
		sqlx::query_as("SELECT * FROM collections WHERE id = $1 AND owner_id = $2")
			.bind(id)
			.bind(owner_id)
			.fetch_optional(db)
			.await
	}

	pub async fn create(
		db: &sqlx::PgPool,
		owner_id: Ulid,
		title: &str,
		visibility: Visibility,
	) -> sqlx::Result<Self> {
		sqlx::query_as(
			r#"
			INSERT INTO collections (
				id,
				owner_id,
				title,
				visibility
			) VALUES (
				$1,
				$2,
				$3,
				$4
			) RETURNING *
			"#,
		)
		.bind(Ulid::new())
		.bind(owner_id)
		.bind(title)
		.bind(visibility.as_str())
		.fetch_one(db)
		.await
	}

	/// Copies `source` and its lists into `owner_id`'s collections. The notes
	/// get fresh ids, the upvote count is carried over.
	pub async fn copy_to(db: &sqlx::PgPool, owner_id: Ulid, source: &Collection) -> sqlx::Result<Self> {
		let lists = NotesList::by_collection(db, source.id).await?;

		let mut tx = db.begin().await?;

		let collection: Collection = sqlx::query_as(
			r#"
			INSERT INTO collections (
				id,
				owner_id,
				title,
				visibility,
				upvotes
			) VALUES (
				$1,
				$2,
				$3,
				$4,
				$5
			) RETURNING *
			"#,
		)
		.bind(Ulid::new())
		.bind(owner_id)
		.bind(&source.title)
		.bind(&source.visibility)
		.bind(source.upvotes)
		.fetch_one(&mut *tx)
		.await?;

		for list in &lists {
			sqlx::query("INSERT INTO notes_lists (id, collection_id, title, notes) VALUES ($1, $2, $3, $4)")
				.bind(Ulid::new())
				.bind(collection.id)
				.bind(&list.title)
				.bind(sqlx::types::Json(list.copied_notes()))
				.execute(&mut *tx)
				.await?;
		}

		tx.commit().await?;

		Ok(collection)
	}

	/// Writes back the title and visibility.
	pub async fn save(&self, db: &sqlx::PgPool) -> sqlx::Result<Self> {
		sqlx::query_as("UPDATE collections SET title = $2, visibility = $3, updated_at = NOW() WHERE id = $1 RETURNING *")
			.bind(self.id)
			.bind(&self.title)
			.bind(&self.visibility)
			.fetch_one(db)
			.await
	}

	/// Upvotes the collection for `user_id`, or takes the vote back when the
	/// user already voted on it. The vote list and the counter change in one
	/// statement while the user row is locked. `None` if either row is missing.
	pub async fn toggle_vote(db: &sqlx::PgPool, user_id: Ulid, id: Ulid) -> sqlx::Result<Option<Self>> {
		sqlx::query_as(
			r#"
			WITH voter AS (
				SELECT u.id, $2 = ANY(u.upvoted) AS voted
				FROM users u
				JOIN collections c ON c.id = $2
				WHERE u.id = $1
				FOR UPDATE OF u
			), flipped AS (
				UPDATE users
				SET upvoted = CASE WHEN voter.voted THEN array_remove(users.upvoted, $2) ELSE array_append(users.upvoted, $2) END
				FROM voter
				WHERE users.id = voter.id
			)
			UPDATE collections
			SET upvotes = collections.upvotes + CASE WHEN voter.voted THEN -1 ELSE 1 END
			FROM voter
			WHERE collections.id = $2
			RETURNING collections.*
			"#,
		)
		.bind(user_id)
		.bind(id)
		.fetch_optional(db)
		.await
	}

	/// Deletes one of `owner_id`'s collections, its lists go with it. Returns
	/// false if the owner has no such collection.
	pub async fn delete_owned(db: &sqlx::PgPool, owner_id: Ulid, id: Ulid) -> sqlx::Result<bool> {
		let result = sqlx::query("DELETE FROM collections WHERE id = $1 AND owner_id = $2")
			.bind(id)
			.bind(owner_id)
			.execute(db)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	/// Looks up one of `owner_id`'s collections by id or title.
	pub async fn owned_by_id_or_title(
		db: &sqlx::PgPool,
		owner_id: Ulid,
		id: Option<Ulid>,
		title: Option<&str>,
	) -> sqlx::Result<Option<Self>> {
		sqlx::query_as("SELECT * FROM collections WHERE owner_id = $1 AND (id = $2 OR title = $3) ORDER BY id LIMIT 1")
			.bind(owner_id)
			.bind(id)
			.bind(title)
			.fetch_optional(db)
			.await
	}

	pub async fn title_taken(db: &sqlx::PgPool, owner_id: Ulid, title: &str) -> sqlx::Result<bool> {
		sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM collections WHERE owner_id = $1 AND title = $2)")
			.bind(owner_id)
			.bind(title)
			.fetch_one(db)
			.await
	}
}
