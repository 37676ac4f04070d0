mod activity;
mod chat;
mod collection;
mod id;
mod message;
mod notes_list;
mod session;
mod user;
mod validation;

pub use activity::*;
pub use chat::*;
pub use collection::*;
pub use id::*;
pub use message::*;
pub use notes_list::*;
pub use session::*;
pub use user::*;
pub use validation::*;
