use std::io::Write;

use crate::config::{ConfigArgs, ConfigBuilder, ConfigError, LoggingConfig};
use crate::logging::Mode;

#[derive(Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
struct TestConfig {
	name: String,
	export: bool,
	logging: LoggingConfig,
	database: Database,
}

#[derive(Debug, PartialEq, serde::Deserialize)]
#[serde(default)]
struct Database {
	uri: String,
	pool_size: u32,
}

impl Default for Database {
	fn default() -> Self {
		Self {
			uri: "postgres://localhost:5432".into(),
			pool_size: 10,
		}
	}
}

#[test]
fn test_defaults() {
	let config: TestConfig = ConfigBuilder::new().build().unwrap();
	assert_eq!(config, TestConfig::default());
	assert_eq!(config.logging.level, "info");
}

#[test]
fn test_file_then_env_then_overrides() {
	let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
	writeln!(
		file,
		r#"
name = "from-file"

[logging]
level = "debug"
mode = "json"

[database]
uri = "postgres://file"
pool_size = 5
"#
	)
	.unwrap();

	let env = vec![
		("NOTES_DATABASE__URI", "postgres://env"),
		("NOTES_EXPORT", "true"),
		("OTHER_NAME", "ignored"),
	];

	let config: TestConfig = ConfigBuilder::new()
		.add_file(file.path())
		.unwrap()
		.add_env("notes", env)
		.unwrap()
		.add_overrides(["database.pool_size=20"])
		.unwrap()
		.build()
		.unwrap();

	assert_eq!(config.name, "from-file");
	assert!(config.export);
	assert_eq!(config.logging.level, "debug");
	assert_eq!(config.logging.mode, Mode::Json);
	assert_eq!(config.database.uri, "postgres://env");
	assert_eq!(config.database.pool_size, 20);
}

#[test]
fn test_bad_override() {
	let err = ConfigBuilder::new().add_overrides(["no-equals-sign"]).unwrap_err();
	assert!(matches!(err, ConfigError::Override(_)));

	let err = ConfigBuilder::new().add_overrides(["database..uri=x"]).unwrap_err();
	assert!(matches!(err, ConfigError::Override(_)));
}

#[test]
fn test_conflicting_keys() {
	let err = ConfigBuilder::new()
		.add_overrides(["name=plain", "name.nested=1"])
		.unwrap_err();
	assert!(matches!(err, ConfigError::Conflict(_)));
}

#[test]
fn test_missing_default_file_is_skipped() {
	let args = ConfigArgs::default();
	let (config, file) = crate::config::parse::<TestConfig>("NOTES_TEST_UNUSED", &args, Some("does-not-exist.toml")).unwrap();
	assert!(file.is_none());
	assert_eq!(config.database, Database::default());
}

#[test]
fn test_missing_explicit_file_is_an_error() {
	let args = ConfigArgs {
		config_file: Some("does-not-exist.toml".into()),
		overrides: vec![],
	};

	let err = crate::config::parse::<TestConfig>("NOTES_TEST_UNUSED", &args, None).unwrap_err();
	assert!(err.is_io());
}
