use std::ops::Deref;

use async_graphql::{Description, InputValueError, InputValueResult, Scalar, ScalarType, Value};

use crate::database;

/// A ULID (Universally Unique Lexicographically Sortable Identifier) scalar.
///
/// Any string is accepted as input. Strings that are not ULIDs become the nil
/// ULID, which no stored row carries, so a lookup by them reports the entity
/// as missing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Description)]
pub struct GqlUlid(ulid::Ulid);

impl GqlUlid {
	pub const UNKNOWN: Self = Self(ulid::Ulid::nil());

	pub fn to_ulid(self) -> ulid::Ulid {
		self.0
	}

	pub fn to_db(self) -> database::Ulid {
		database::Ulid(self.0)
	}
}

#[Scalar(name = "ULID", specified_by_url = "https://github.com/ulid/spec", use_type_description)]
impl ScalarType for GqlUlid {
	fn parse(value: Value) -> InputValueResult<Self> {
		match value {
			Value::String(s) => Ok(ulid::Ulid::from_string(&s).map_or(Self::UNKNOWN, GqlUlid)),
			// async-graphql has no 128-bit integers.
			_ => Err(InputValueError::custom("Invalid value")),
		}
	}

	fn to_value(&self) -> Value {
		Value::String(self.0.to_string())
	}
}

impl Deref for GqlUlid {
	type Target = ulid::Ulid;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl From<ulid::Ulid> for GqlUlid {
	fn from(value: ulid::Ulid) -> Self {
		Self(value)
	}
}

impl From<database::Ulid> for GqlUlid {
	fn from(value: database::Ulid) -> Self {
		Self(value.0)
	}
}

impl From<GqlUlid> for database::Ulid {
	fn from(value: GqlUlid) -> Self {
		value.to_db()
	}
}

/// Converts a list of stored ids.
pub fn ids(ids: &[database::Ulid]) -> Vec<GqlUlid> {
	ids.iter().copied().map(GqlUlid::from).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_ulid() {
		let id = ulid::Ulid::new();

		assert_eq!(GqlUlid::parse(Value::String(id.to_string())).unwrap(), GqlUlid(id));
		assert_eq!(GqlUlid(id).to_value(), Value::String(id.to_string()));
	}

	#[test]
	fn test_parse_unknown_id() {
		for input in ["collection-does-not-exist", "nope", ""] {
			let parsed = GqlUlid::parse(Value::String(input.to_string())).unwrap();
			assert_eq!(parsed, GqlUlid::UNKNOWN);
		}

		assert!(GqlUlid::parse(Value::Number(1.into())).is_err());
	}
}
