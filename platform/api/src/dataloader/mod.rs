pub mod collection;
pub mod session;
pub mod user;
