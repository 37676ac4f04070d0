use std::str::FromStr;

use once_cell::sync::OnceCell;
use tracing_subscriber::prelude::*;
use tracing_subscriber::reload::Handle;
use tracing_subscriber::EnvFilter;

static RELOAD_HANDLE: OnceCell<Handle<EnvFilter, tracing_subscriber::Registry>> = OnceCell::new();

/// How log lines are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
	#[default]
	Default,
	Json,
	Pretty,
	Compact,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
	#[error("invalid log filter: {0}")]
	InvalidFilter(#[from] tracing_subscriber::filter::ParseError),
	#[error("failed to install subscriber: {0}")]
	Init(#[from] tracing_subscriber::util::TryInitError),
	#[error("failed to reload filter: {0}")]
	Reload(#[from] tracing_subscriber::reload::Error),
}

/// Installs the global subscriber on first call. Later calls only swap the
/// filter, the output mode is fixed by the first call.
pub fn init(level: &str, mode: Mode) -> Result<(), LoggingError> {
	let env_filter = EnvFilter::from_str(level)?;

	if let Some(handle) = RELOAD_HANDLE.get() {
		handle.reload(env_filter)?;
		return Ok(());
	}

	let handle = RELOAD_HANDLE.get_or_try_init(|| {
		let (filter, handle) = tracing_subscriber::reload::Layer::new(env_filter);

		let registry = tracing_subscriber::registry().with(filter);

		match mode {
			Mode::Default => registry
				.with(tracing_subscriber::fmt::layer().with_file(true).with_line_number(true))
				.try_init(),
			Mode::Json => registry
				.with(tracing_subscriber::fmt::layer().json().with_file(true).with_line_number(true))
				.try_init(),
			Mode::Pretty => registry
				.with(tracing_subscriber::fmt::layer().pretty().with_file(true).with_line_number(true))
				.try_init(),
			Mode::Compact => registry.with(tracing_subscriber::fmt::layer().compact()).try_init(),
		}
		.map(|_| handle)
	})?;

	tracing::debug!(mode = ?mode, "logging initialized");

	// a racing init may have won, make sure our filter is the active one
	handle.reload(EnvFilter::from_str(level)?)?;

	Ok(())
}
