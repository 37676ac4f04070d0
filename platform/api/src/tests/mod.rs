mod api;
mod global;
