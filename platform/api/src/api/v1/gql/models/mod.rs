pub mod chat;
pub mod collection;
pub mod date;
pub mod input;
pub mod message;
pub mod notes_list;
pub mod response;
pub mod ulid;
pub mod user;
