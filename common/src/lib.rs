#![forbid(unsafe_code)]

#[cfg(feature = "config")]
pub mod config;
#[cfg(feature = "context")]
pub mod context;
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "logging")]
pub mod logging;
#[cfg(feature = "prelude")]
pub mod prelude;
#[cfg(feature = "signal")]
pub mod signal;

#[cfg(test)]
mod tests;
