use chrono::{DateTime, Utc};

use super::Ulid;

/// A chat row joined with its member ids.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChatRow {
	pub id: Ulid,
	pub kind: String,
	pub name: Option<String>,
	pub members: Vec<Ulid>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatKind {
	/// Exactly the two users it was created with.
	Private { participants: [Ulid; 2] },
	Room { name: String, members: Vec<Ulid> },
}

#[derive(Debug, Clone)]
pub struct Chat {
	pub id: Ulid,
	pub kind: ChatKind,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum InvalidChat {
	#[error("private chat {0} does not have exactly two participants")]
	Participants(Ulid),
	#[error("chat room {0} has no name")]
	MissingName(Ulid),
	#[error("chat {0} has unknown kind {1:?}")]
	Kind(Ulid, String),
}

impl TryFrom<ChatRow> for Chat {
	type Error = InvalidChat;

	fn try_from(row: ChatRow) -> Result<Self, Self::Error> {
		let kind = match row.kind.as_str() {
			"private" => {
				let participants: [Ulid; 2] = row
					.members
					.try_into()
					.map_err(|_| InvalidChat::Participants(row.id))?;
				ChatKind::Private { participants }
			}
			"room" => ChatKind::Room {
				name: row.name.ok_or(InvalidChat::MissingName(row.id))?,
				members: row.members,
			},
			_ => return Err(InvalidChat::Kind(row.id, row.kind.clone())),
		};

		Ok(Self {
			id: row.id,
			kind,
			created_at: row.created_at,
			updated_at: row.updated_at,
		})
	}
}

const SELECT_CHATS: &str = r#"
	SELECT
		c.id,
		c.kind,
		c.name,
		c.created_at,
		c.updated_at,
		COALESCE(array_agg(m.user_id ORDER BY m.joined_at) FILTER (WHERE m.user_id IS NOT NULL), '{}') AS members
	FROM
		chats c
	LEFT JOIN
		chat_members m ON m.chat_id = c.id
"#;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
	#[error("database error: {0}")]
	Sqlx(#[from] sqlx::Error),
	#[error(transparent)]
	Invalid(#[from] InvalidChat),
}

fn rows_to_chats(rows: Vec<ChatRow>) -> Result<Vec<Chat>, ChatError> {
	rows.into_iter()
		.map(|row| Chat::try_from(row).map_err(ChatError::from))
		.collect()
}

impl Chat {
	pub fn members(&self) -> &[Ulid] {
		match &self.kind {
			ChatKind::Private { participants } => participants,
			ChatKind::Room { members, .. } => members,
		}
	}

	pub fn is_member(&self, user_id: Ulid) -> bool {
		self.members().contains(&user_id)
	}

	pub fn is_room(&self) -> bool {
		matches!(self.kind, ChatKind::Room { .. })
	}

	pub async fn by_id(db: &sqlx::PgPool, id: Ulid) -> Result<Option<Self>, ChatError> {
		let row: Option<ChatRow> = sqlx::query_as(&format!("{SELECT_CHATS} WHERE c.id = $1 GROUP BY c.id"))
			.bind(id)
			.fetch_optional(db)
			.await?;

		Ok(row.map(Chat::try_from).transpose()?)
	}

	/// Chats of the given kind that `user_id` is a member of.
	pub async fn for_member(db: &sqlx::PgPool, user_id: Ulid, kind: &str) -> Result<Vec<Self>, ChatError> {
		let rows: Vec<ChatRow> = sqlx::query_as(&format!(
			"{SELECT_CHATS} WHERE c.kind = $2 AND c.id IN (SELECT chat_id FROM chat_members WHERE user_id = $1) GROUP BY c.id ORDER BY c.id"
		))
		.bind(user_id)
		.bind(kind)
		.fetch_all(db)
		.await?;

		rows_to_chats(rows)
	}

	/// The private chat between two users, if there is one.
	pub async fn private_between(db: &sqlx::PgPool, a: Ulid, b: Ulid) -> Result<Option<Self>, ChatError> {
		let row: Option<ChatRow> = sqlx::query_as(&format!(
			r#"{SELECT_CHATS}
			WHERE
				c.kind = 'private'
				AND c.id IN (SELECT chat_id FROM chat_members WHERE user_id = $1)
				AND c.id IN (SELECT chat_id FROM chat_members WHERE user_id = $2)
			GROUP BY c.id
			LIMIT 1"#
		))
		.bind(a)
		.bind(b)
		.fetch_optional(db)
		.await?;

		Ok(row.map(Chat::try_from).transpose()?)
	}

	/// Inserts the chat and its members.
	pub async fn create(db: &sqlx::PgPool, kind: ChatKind) -> Result<Self, ChatError> {
		let id = Ulid::new();
		let (kind_str, name, members) = match &kind {
			ChatKind::Private { participants } => ("private", None, participants.to_vec()),
			ChatKind::Room { name, members } => ("room", Some(name.as_str()), members.clone()),
		};

		let mut tx = db.begin().await?;

		sqlx::query("INSERT INTO chats (id, kind, name) VALUES ($1, $2, $3)")
			.bind(id)
			.bind(kind_str)
			.bind(name)
			.execute(&mut *tx)
			.await?;

		sqlx::query("INSERT INTO chat_members (chat_id, user_id) SELECT $1, UNNEST($2::UUID[]) ON CONFLICT DO NOTHING")
			.bind(id)
			.bind(&members)
			.execute(&mut *tx)
			.await?;

		tx.commit().await?;

		Self::by_id(db, id).await?.ok_or(ChatError::Sqlx(sqlx::Error::RowNotFound))
	}

	pub async fn add_member(db: &sqlx::PgPool, chat_id: Ulid, user_id: Ulid) -> sqlx::Result<()> {
		sqlx::query("INSERT INTO chat_members (chat_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
			.bind(chat_id)
			.bind(user_id)
			.execute(db)
			.await?;

		Ok(())
	}

	pub async fn remove_member(db: &sqlx::PgPool, chat_id: Ulid, user_id: Ulid) -> sqlx::Result<()> {
		sqlx::query("DELETE FROM chat_members WHERE chat_id = $1 AND user_id = $2")
			.bind(chat_id)
			.bind(user_id)
			.execute(db)
			.await?;

		Ok(())
	}

	pub async fn rename(db: &sqlx::PgPool, chat_id: Ulid, name: &str) -> sqlx::Result<()> {
		sqlx::query("UPDATE chats SET name = $2, updated_at = NOW() WHERE id = $1 AND kind = 'room'")
			.bind(chat_id)
			.bind(name)
			.execute(db)
			.await?;

		Ok(())
	}
}
