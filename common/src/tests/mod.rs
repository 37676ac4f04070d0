#[cfg(feature = "config")]
mod config;
#[cfg(feature = "context")]
mod context;
