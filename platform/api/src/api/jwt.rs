use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use jwt::{Claims, Header, RegisteredClaims, SignWithKey, Token, VerifyWithKey};
use sha2::Sha256;

use crate::config::JwtConfig;
use crate::database::{Session, Ulid, User};

pub trait JwtState: Sized {
	fn to_claims(&self) -> Claims;

	fn from_claims(claims: &Claims) -> Option<Self>;

	fn serialize(&self, config: &JwtConfig) -> Option<String> {
		self.serialize_with_key(config, config.secret.as_bytes())
	}

	fn serialize_with_key(&self, config: &JwtConfig, secret: &[u8]) -> Option<String> {
		let key = Hmac::<Sha256>::new_from_slice(secret).ok()?;
		let mut claims = self.to_claims();

		claims.registered.issuer = Some(config.issuer.clone());

		if claims.registered.issued_at.is_none() {
			claims.registered.issued_at = Some(Utc::now().timestamp() as u64);
		}

		claims.sign_with_key(&key).ok()
	}

	fn verify(config: &JwtConfig, token: &str) -> Option<Self> {
		Self::verify_with_key(config, config.secret.as_bytes(), token)
	}

	fn verify_with_key(config: &JwtConfig, secret: &[u8], token: &str) -> Option<Self> {
		let key = Hmac::<Sha256>::new_from_slice(secret).ok()?;
		let token: Token<Header, Claims, _> = token.verify_with_key(&key).ok()?;

		let claims = token.claims();

		if claims.registered.issuer.as_ref() != Some(&config.issuer) {
			return None;
		}

		let iat = timestamp(claims.registered.issued_at?)?;
		if iat > Utc::now() {
			return None;
		}

		if let Some(nbf) = claims.registered.not_before.and_then(timestamp) {
			if nbf > Utc::now() {
				return None;
			}
		}

		if let Some(exp) = claims.registered.expiration.and_then(timestamp) {
			if exp < Utc::now() {
				return None;
			}
		}

		Self::from_claims(claims)
	}
}

fn timestamp(secs: u64) -> Option<DateTime<Utc>> {
	Utc.timestamp_opt(secs as i64, 0).single()
}

fn parse_id(value: Option<&String>) -> Option<Ulid> {
	value.and_then(|x| ulid::Ulid::from_string(x).ok()).map(Ulid::from)
}

/// The payload of the session cookie.
pub struct AuthJwtPayload {
	pub user_id: Ulid,
	pub session_id: Ulid,
	pub expiration: Option<DateTime<Utc>>,
	pub issued_at: DateTime<Utc>,
}

impl JwtState for AuthJwtPayload {
	fn to_claims(&self) -> Claims {
		Claims {
			registered: RegisteredClaims {
				issuer: None,
				subject: Some(self.user_id.to_string()),
				audience: None,
				expiration: self.expiration.map(|x| x.timestamp() as u64),
				not_before: None,
				issued_at: Some(self.issued_at.timestamp() as u64),
				json_web_token_id: Some(self.session_id.to_string()),
			},
			private: Default::default(),
		}
	}

	fn from_claims(claims: &Claims) -> Option<Self> {
		Some(Self {
			expiration: claims.registered.expiration.and_then(timestamp),
			issued_at: timestamp(claims.registered.issued_at?)?,
			session_id: parse_id(claims.registered.json_web_token_id.as_ref())?,
			user_id: parse_id(claims.registered.subject.as_ref())?,
		})
	}
}

impl From<&Session> for AuthJwtPayload {
	fn from(session: &Session) -> Self {
		AuthJwtPayload {
			user_id: session.user_id,
			session_id: session.id,
			expiration: Some(session.expires_at),
			issued_at: session.id.0.datetime().into(),
		}
	}
}

/// How long a password reset link stays usable.
pub fn reset_password_validity() -> Duration {
	Duration::minutes(15)
}

/// The payload of a password reset link. It is signed with the user's
/// password hash mixed into the secret, so changing the password invalidates
/// every outstanding link.
pub struct ResetPasswordPayload {
	pub user_id: Ulid,
	pub email: String,
	pub expiration: DateTime<Utc>,
}

impl ResetPasswordPayload {
	pub fn new(user: &User) -> Self {
		Self {
			user_id: user.id,
			email: user.email.clone(),
			expiration: Utc::now() + reset_password_validity(),
		}
	}

	pub fn secret(config: &JwtConfig, user: &User) -> Vec<u8> {
		format!("{}{}", config.secret, user.password_hash).into_bytes()
	}
}

impl JwtState for ResetPasswordPayload {
	fn to_claims(&self) -> Claims {
		let mut claims = Claims {
			registered: RegisteredClaims {
				subject: Some(self.user_id.to_string()),
				expiration: Some(self.expiration.timestamp() as u64),
				..Default::default()
			},
			private: Default::default(),
		};

		claims
			.private
			.insert("email".to_string(), serde_json::Value::String(self.email.clone()));

		claims
	}

	fn from_claims(claims: &Claims) -> Option<Self> {
		Some(Self {
			user_id: parse_id(claims.registered.subject.as_ref())?,
			email: claims.private.get("email")?.as_str()?.to_string(),
			expiration: timestamp(claims.registered.expiration?)?,
		})
	}
}
