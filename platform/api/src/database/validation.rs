use super::Visibility;

/// A rejected input, named by the property it was supplied for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalid {
	pub property: String,
	pub message: String,
}

impl Invalid {
	pub fn new(property: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			property: property.into(),
			message: message.into(),
		}
	}
}

pub fn validate_visibility(visibility: &str) -> Result<Visibility, Invalid> {
	visibility
		.parse()
		.map_err(|_| Invalid::new("visibility", "Visibility can only be public or private."))
}

pub fn validate_title(property: &str, title: &str) -> Result<(), Invalid> {
	if title.is_empty() {
		return Err(Invalid::new(property, "'title' cannot be empty."));
	}

	Ok(())
}

pub fn validate_content(content: &str) -> Result<(), Invalid> {
	if content.is_empty() {
		return Err(Invalid::new("content", "'content' cannot be empty."));
	}

	Ok(())
}

/// The error for a title that is already used by a sibling `entity`
/// (`Collection` within an owner, `NotesList` within a collection).
pub fn duplicate_title(entity: &str, title: &str) -> Invalid {
	Invalid::new("title", format!("{entity} with title '{title}' already exisits."))
}
