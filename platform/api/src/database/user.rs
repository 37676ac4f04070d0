use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};

use super::Ulid;

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct User {
	/// The unique identifier for the user.
	pub id: Ulid,
	/// The email of the user.
	pub email: String,
	/// The username of the user.
	pub username: String,
	/// The hashed password of the user. (argon2)
	pub password_hash: String,
	/// Users this user follows.
	pub following: Vec<Ulid>,
	/// Users following this user.
	pub followers: Vec<Ulid>,
	/// Collections this user has upvoted.
	pub upvoted: Vec<Ulid>,
	/// The time the user was created.
	pub created_at: DateTime<Utc>,
	/// The time the user was last updated.
	pub updated_at: DateTime<Utc>,
}

impl User {
	/// Uses argon2 to verify the password hash against the provided password.
	pub fn verify_password(&self, password: &str) -> bool {
		let hash = match PasswordHash::new(&self.password_hash) {
			Ok(hash) => hash,
			Err(err) => {
				tracing::error!("failed to parse password hash: {}", err);
				return false;
			}
		};

		Argon2::default().verify_password(password.as_bytes(), &hash).is_ok()
	}

	/// Generates a new password hash using argon2.
	pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
		let salt = SaltString::generate(&mut OsRng);

		Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
	}

	/// Follows `target`, or unfollows it when already following. Both sides of
	/// the edge are updated. Returns true when the user now follows `target`.
	pub fn toggle_follow(&mut self, target: &mut User) -> bool {
		if self.following.contains(&target.id) {
			self.following.retain(|id| *id != target.id);
			target.followers.retain(|id| *id != self.id);
			false
		} else {
			self.following.push(target.id);
			if !target.followers.contains(&self.id) {
				target.followers.push(self.id);
			}
			true
		}
	}

	pub async fn by_email(db: &sqlx::PgPool, email: &str) -> sqlx::Result<Option<Self>> {
		sqlx::query_as("SELECT * FROM users WHERE email = $1")
			.bind(email)
			.fetch_optional(db)
			.await
	}

	/// Whether either the username or the email is already registered.
	pub async fn is_registered(db: &sqlx::PgPool, username: &str, email: &str) -> sqlx::Result<bool> {
		sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)")
			.bind(username)
			.bind(email)
			.fetch_one(db)
			.await
	}

	pub async fn username_taken(db: &sqlx::PgPool, username: &str) -> sqlx::Result<bool> {
		sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
			.bind(username)
			.fetch_one(db)
			.await
	}

	pub async fn create(db: &sqlx::PgPool, email: &str, username: &str, password_hash: &str) -> sqlx::Result<Self> {
		sqlx::query_as(
			r#"
			INSERT INTO users (
				id,
				email,
				username,
				password_hash
			) VALUES (
				$1,
				$2,
				$3,
				$4
			) RETURNING *
			"#,
		)
		.bind(Ulid::new())
		.bind(email)
		.bind(username)
		.bind(password_hash)
		.fetch_one(db)
		.await
	}

	/// Writes back the username and password hash.
	pub async fn save_credentials(&self, db: &sqlx::PgPool) -> sqlx::Result<Self> {
		sqlx::query_as("UPDATE users SET username = $2, password_hash = $3, updated_at = NOW() WHERE id = $1 RETURNING *")
			.bind(self.id)
			.bind(&self.username)
			.bind(&self.password_hash)
			.fetch_one(db)
			.await
	}

	/// Writes back the follow graph. The vote list is left alone, it only
	/// changes through [`Collection::toggle_vote`](super::Collection::toggle_vote).
	pub async fn save_follows(&self, db: &sqlx::PgPool) -> sqlx::Result<()> {
		sqlx::query("UPDATE users SET following = $2, followers = $3 WHERE id = $1")
			.bind(self.id)
			.bind(&self.following)
			.bind(&self.followers)
			.execute(db)
			.await?;

		Ok(())
	}

	/// Validates a username. `@` is reserved since login treats anything
	/// containing it as an email.
	pub fn validate_username(username: &str) -> Result<(), &'static str> {
		if username.chars().count() < 3 {
			return Err("Username must be at least 3 characters long");
		}

		if username.chars().count() > 32 {
			return Err("Username must be at most 32 characters long");
		}

		if username.contains('@') {
			return Err("Username cannot include an @");
		}

		Ok(())
	}

	/// Validates a password.
	pub fn validate_password(password: &str) -> Result<(), &'static str> {
		if password.chars().count() < 3 {
			return Err("Password must be at least 3 characters long");
		}

		if password.len() > 100 {
			return Err("Password must be at most 100 characters long");
		}

		Ok(())
	}

	/// Validates an email.
	pub fn validate_email(email: &str) -> Result<(), &'static str> {
		if email.len() > 100 {
			return Err("Email must be at most 100 characters long");
		}

		if !email_address::EmailAddress::is_valid(email) {
			return Err("Email is not a valid email address");
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn user(username: &str) -> User {
		User {
			id: Ulid::new(),
			username: username.to_string(),
			..Default::default()
		}
	}

	#[test]
	fn test_toggle_follow() {
		let mut me = user("me");
		let mut other = user("other");

		assert!(me.toggle_follow(&mut other));
		assert_eq!(me.following, vec![other.id]);
		assert_eq!(other.followers, vec![me.id]);

		assert!(!me.toggle_follow(&mut other));
		assert!(me.following.is_empty());
		assert!(other.followers.is_empty());
	}

	#[test]
	fn test_password_hash() {
		let hash = User::hash_password("hunter22a").unwrap();
		let user = User {
			password_hash: hash,
			..Default::default()
		};

		assert!(user.verify_password("hunter22a"));
		assert!(!user.verify_password("hunter22b"));
	}

	#[test]
	fn test_validate_register_fields() {
		assert!(User::validate_username("note_taker").is_ok());
		assert!(User::validate_username("no").is_err());
		assert!(User::validate_username("me@home").is_err());
		assert!(User::validate_email("someone@example.com").is_ok());
		assert!(User::validate_email("not-an-email").is_err());
		assert!(User::validate_password("newPassword").is_ok());
		assert_eq!(
			User::validate_password("pw"),
			Err("Password must be at least 3 characters long")
		);
	}
}
