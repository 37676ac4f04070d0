use sqlx::postgres::{PgArgumentBuffer, PgHasArrayType, PgTypeInfo, PgValueRef};
use sqlx::Postgres;

/// A [`ulid::Ulid`] stored in a postgres `UUID` column.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Ulid(pub ulid::Ulid);

impl Ulid {
	pub fn new() -> Self {
		Self(ulid::Ulid::new())
	}
}

impl Default for Ulid {
	fn default() -> Self {
		Self(ulid::Ulid::nil())
	}
}

impl std::fmt::Display for Ulid {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}

impl std::fmt::Debug for Ulid {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}

impl sqlx::Type<Postgres> for Ulid {
	fn type_info() -> PgTypeInfo {
		<uuid::Uuid as sqlx::Type<Postgres>>::type_info()
	}
}

impl PgHasArrayType for Ulid {
	fn array_type_info() -> PgTypeInfo {
		<uuid::Uuid as PgHasArrayType>::array_type_info()
	}

	fn array_compatible(ty: &PgTypeInfo) -> bool {
		<uuid::Uuid as PgHasArrayType>::array_compatible(ty)
	}
}

impl sqlx::Decode<'_, Postgres> for Ulid {
	fn decode(value: PgValueRef<'_>) -> Result<Self, sqlx::error::BoxDynError> {
		let id = <uuid::Uuid as sqlx::Decode<'_, Postgres>>::decode(value)?;
		Ok(Self(ulid::Ulid::from(id)))
	}
}

impl sqlx::Encode<'_, Postgres> for Ulid {
	fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> sqlx::encode::IsNull {
		<uuid::Uuid as sqlx::Encode<'_, Postgres>>::encode_by_ref(&self.0.into(), buf)
	}
}

impl From<Ulid> for ulid::Ulid {
	fn from(id: Ulid) -> Self {
		id.0
	}
}

impl From<ulid::Ulid> for Ulid {
	fn from(id: ulid::Ulid) -> Self {
		Self(id)
	}
}

impl From<uuid::Uuid> for Ulid {
	fn from(id: uuid::Uuid) -> Self {
		Self(ulid::Ulid::from(id))
	}
}

impl From<Ulid> for uuid::Uuid {
	fn from(id: Ulid) -> Self {
		id.0.into()
	}
}
