use chrono::{DateTime, Utc};
use sqlx::types::Json;

use super::Ulid;

/// A note embedded in a [`NotesList`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Note {
	pub id: ulid::Ulid,
	pub title: String,
	pub body: String,
}

impl Note {
	pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
		Self {
			id: ulid::Ulid::new(),
			title: title.into(),
			body: body.into(),
		}
	}
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotesList {
	pub id: Ulid,
	pub collection_id: Ulid,
	pub title: String,
	pub notes: Json<Vec<Note>>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl NotesList {
	pub fn note(&self, id: ulid::Ulid) -> Option<&Note> {
		self.notes.iter().find(|n| n.id == id)
	}

	pub fn note_mut(&mut self, id: ulid::Ulid) -> Option<&mut Note> {
		self.notes.iter_mut().find(|n| n.id == id)
	}

	/// Returns false if no note had that id.
	pub fn remove_note(&mut self, id: ulid::Ulid) -> bool {
		let len = self.notes.len();
		self.notes.retain(|n| n.id != id);
		self.notes.len() != len
	}

	/// Copies the notes with fresh ids, as used when a list is copied into
	/// another collection.
	pub fn copied_notes(&self) -> Vec<Note> {
		self.notes.iter().map(|n| Note::new(n.title.clone(), n.body.clone())).collect()
	}

	pub async fn by_collection(db: &sqlx::PgPool, collection_id: Ulid) -> sqlx::Result<Vec<Self>> {
		sqlx::query_as("SELECT * FROM notes_lists WHERE collection_id = $1 ORDER BY id")
			.bind(collection_id)
			.fetch_all(db)
			.await
	}

	pub async fn in_collection(db: &sqlx::PgPool, collection_id: Ulid, id: Ulid) -> sqlx::Result<Option<Self>> {
		sqlx::query_as("SELECT * FROM notes_lists WHERE id = $1 AND collection_id = $2")
			.bind(id)
			.bind(collection_id)
			.fetch_optional(db)
			.await
	}

	pub async fn title_taken(db: &sqlx::PgPool, collection_id: Ulid, title: &str) -> sqlx::Result<bool> {
		sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM notes_lists WHERE collection_id = $1 AND title = $2)")
			.bind(collection_id)
			.bind(title)
			.fetch_one(db)
			.await
	}

	pub async fn create(db: &sqlx::PgPool, collection_id: Ulid, title: &str) -> sqlx::Result<Self> {
		sqlx::query_as("INSERT INTO notes_lists (id, collection_id, title) VALUES ($1, $2, $3) RETURNING *")
			.bind(Ulid::new())
			.bind(collection_id)
			.bind(title)
			.fetch_one(db)
			.await
	}

	pub async fn rename(&self, db: &sqlx::PgPool, title: &str) -> sqlx::Result<Self> {
		sqlx::query_as("UPDATE notes_lists SET title = $2, updated_at = NOW() WHERE id = $1 RETURNING *")
			.bind(self.id)
			.bind(title)
			.fetch_one(db)
			.await
	}

	pub async fn move_to(&self, db: &sqlx::PgPool, collection_id: Ulid) -> sqlx::Result<Self> {
		sqlx::query_as("UPDATE notes_lists SET collection_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *")
			.bind(self.id)
			.bind(collection_id)
			.fetch_one(db)
			.await
	}

	/// Returns false if the collection has no such list.
	pub async fn delete_in_collection(db: &sqlx::PgPool, collection_id: Ulid, id: Ulid) -> sqlx::Result<bool> {
		let result = sqlx::query("DELETE FROM notes_lists WHERE id = $1 AND collection_id = $2")
			.bind(id)
			.bind(collection_id)
			.execute(db)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	/// Writes the embedded notes back.
	pub async fn save_notes(&self, db: &sqlx::PgPool) -> sqlx::Result<Self> {
		sqlx::query_as("UPDATE notes_lists SET notes = $2, updated_at = NOW() WHERE id = $1 RETURNING *")
			.bind(self.id)
			.bind(&self.notes)
			.fetch_one(db)
			.await
	}
}

#[cfg(test)]
mod tests {
	use chrono::Utc;

	use super::*;

	fn list(notes: Vec<Note>) -> NotesList {
		NotesList {
			id: Ulid::new(),
			collection_id: Ulid::new(),
			title: "groceries".to_string(),
			notes: Json(notes),
			created_at: Utc::now(),
			updated_at: Utc::now(),
		}
	}

	#[test]
	fn test_note_lookup_and_removal() {
		let milk = Note::new("milk", "2 litres");
		let mut list = list(vec![milk.clone(), Note::new("eggs", "a dozen")]);

		assert_eq!(list.note(milk.id), Some(&milk));

		list.note_mut(milk.id).unwrap().body = "1 litre".to_string();
		assert_eq!(list.note(milk.id).unwrap().body, "1 litre");

		assert!(list.remove_note(milk.id));
		assert!(!list.remove_note(milk.id));
		assert_eq!(list.notes.len(), 1);
	}

	#[test]
	fn test_copied_notes_get_fresh_ids() {
		let list = list(vec![Note::new("milk", "2 litres")]);
		let copied = list.copied_notes();

		assert_eq!(copied.len(), 1);
		assert_eq!(copied[0].title, "milk");
		assert_eq!(copied[0].body, "2 litres");
		assert_ne!(copied[0].id, list.notes[0].id);
	}
}
