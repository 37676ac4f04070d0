//! Layered configuration.
//!
//! Values are merged from lowest to highest priority: struct defaults, a TOML
//! file, environment variables and finally `--set key=value` flags. Nested keys
//! are joined with `.` on the command line and `__` in the environment, so
//! `NOTES_DATABASE__URI` and `--set database.uri=...` address the same field.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use toml::{Table, Value};

use crate::logging;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read config file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse config file {path}: {source}")]
	File {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
	#[error("invalid override {0:?}, expected key=value")]
	Override(String),
	#[error("key {0} conflicts with a non table value")]
	Conflict(String),
	#[error("invalid config: {0}")]
	Deserialize(#[from] toml::de::Error),
}

impl ConfigError {
	pub fn is_io(&self) -> bool {
		matches!(self, Self::Io { .. })
	}
}

/// Flags every binary accepts for locating and overriding its config.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
	/// Path to a TOML config file
	#[arg(long = "config-file", short = 'c')]
	pub config_file: Option<String>,

	/// Override a single config key, e.g. `--set api.bind_address=0.0.0.0:4000`
	#[arg(long = "set", value_name = "KEY=VALUE")]
	pub overrides: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
	/// The log level to use, this is a tracing env filter
	pub level: String,

	/// What logging mode we should use
	pub mode: logging::Mode,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			mode: logging::Mode::Default,
		}
	}
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
	root: Table,
	file: Option<PathBuf>,
}

impl ConfigBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, ConfigError> {
		let path = path.as_ref();
		let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;

		let table: Table = raw.parse().map_err(|source| ConfigError::File {
			path: path.to_path_buf(),
			source,
		})?;

		merge(&mut self.root, table);
		self.file = Some(std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()));

		Ok(self)
	}

	/// Adds every variable starting with `{prefix}_`.
	pub fn add_env<I, K, V>(&mut self, prefix: &str, vars: I) -> Result<&mut Self, ConfigError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let prefix = format!("{}_", prefix.to_ascii_uppercase());

		for (key, value) in vars {
			let Some(key) = key.as_ref().strip_prefix(&prefix) else {
				continue;
			};

			let path: Vec<String> = key.split("__").map(|s| s.to_ascii_lowercase()).collect();
			self.set(&path, value.as_ref())?;
		}

		Ok(self)
	}

	/// Adds `key=value` overrides, keys are `.` separated.
	pub fn add_overrides<I, S>(&mut self, overrides: I) -> Result<&mut Self, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for raw in overrides {
			let raw = raw.as_ref();
			let (key, value) = raw.split_once('=').ok_or_else(|| ConfigError::Override(raw.to_string()))?;
			let path: Vec<String> = key.trim().split('.').map(str::to_string).collect();
			if path.iter().any(String::is_empty) {
				return Err(ConfigError::Override(raw.to_string()));
			}

			self.set(&path, value.trim())?;
		}

		Ok(self)
	}

	fn set(&mut self, path: &[String], raw: &str) -> Result<(), ConfigError> {
		let Some((last, parents)) = path.split_last() else {
			return Ok(());
		};

		let mut table = &mut self.root;
		for key in parents {
			let entry = table.entry(key.clone()).or_insert_with(|| Value::Table(Table::new()));
			table = match entry {
				Value::Table(t) => t,
				_ => return Err(ConfigError::Conflict(path.join("."))),
			};
		}

		table.insert(last.clone(), parse_scalar(raw));
		Ok(())
	}

	/// The canonical path of the loaded file, if any.
	pub fn file(&self) -> Option<&Path> {
		self.file.as_deref()
	}

	pub fn build<C: DeserializeOwned>(&self) -> Result<C, ConfigError> {
		Ok(Value::Table(self.root.clone()).try_into::<C>()?)
	}
}

/// Values that parse as a TOML value keep their type, anything else is a string.
fn parse_scalar(raw: &str) -> Value {
	format!("v = {raw}")
		.parse::<Table>()
		.ok()
		.and_then(|mut t| t.remove("v"))
		.unwrap_or_else(|| Value::String(raw.to_string()))
}

fn merge(base: &mut Table, other: Table) {
	for (key, value) in other {
		match (base.get_mut(&key), value) {
			(Some(Value::Table(existing)), Value::Table(incoming)) => merge(existing, incoming),
			(_, value) => {
				base.insert(key, value);
			}
		}
	}
}

/// Loads `C` from every source. A missing default file is skipped, a missing
/// file passed on the command line is an error.
pub fn parse<C: DeserializeOwned>(
	env_prefix: &str,
	args: &ConfigArgs,
	default_file: Option<&str>,
) -> Result<(C, Option<String>), ConfigError> {
	let mut builder = ConfigBuilder::new();

	if let Some(path) = args.config_file.as_deref() {
		builder.add_file(path)?;
	} else if let Some(path) = default_file {
		match builder.add_file(path) {
			Ok(_) => {}
			Err(err) if err.is_io() => tracing::debug!("skipping config file: {}", err),
			Err(err) => return Err(err),
		}
	}

	builder.add_env(env_prefix, std::env::vars())?;
	builder.add_overrides(&args.overrides)?;

	let file = builder.file().map(|p| p.display().to_string());

	Ok((builder.build()?, file))
}
