use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use common::config::{ConfigArgs, LoggingConfig};

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
/// The API is the backend for the notes platform
pub struct AppConfig {
	/// The path to the config file
	pub config_file: Option<String>,

	/// Name of this instance
	pub name: String,

	/// If we should export the GraphQL schema, if set to true, the schema will
	/// be exported to the stdout, and the program will exit.
	pub export_gql: bool,

	/// The logging config
	pub logging: LoggingConfig,

	/// API Config
	pub api: ApiConfig,

	/// Database Config
	pub database: DatabaseConfig,

	/// JWT Config
	pub jwt: JwtConfig,

	/// Base url of the web client, used to build links sent to users
	pub client_domain: String,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ApiConfig {
	/// Bind address for the API
	pub bind_address: SocketAddr,

	/// Origins allowed to make credentialed cross origin requests
	pub allowed_origins: Vec<String>,

	/// Session cookie settings
	pub cookie: CookieConfig,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			bind_address: SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 0], 4000)),
			allowed_origins: vec!["http://localhost:3000".to_string()],
			cookie: CookieConfig::default(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct CookieConfig {
	/// Name of the session cookie
	pub name: String,

	/// Only send the cookie over https
	pub secure: bool,

	/// Domain attribute of the cookie
	pub domain: Option<String>,

	/// How long a session lives
	pub max_age_secs: i64,
}

impl Default for CookieConfig {
	fn default() -> Self {
		Self {
			name: "qid".to_string(),
			secure: false,
			domain: None,
			max_age_secs: 60 * 60 * 24 * 365 * 10,
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
	/// The database URL to use
	pub uri: String,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			uri: "postgres://root@localhost:5432/notes_dev".to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct JwtConfig {
	/// JWT secret
	pub secret: String,

	/// JWT issuer
	pub issuer: String,
}

impl Default for JwtConfig {
	fn default() -> Self {
		Self {
			issuer: "notes".to_string(),
			secret: "notes".to_string(),
		}
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			config_file: Some("config.toml".to_string()),
			name: "notes-api".to_string(),
			export_gql: false,
			logging: LoggingConfig::default(),
			api: ApiConfig::default(),
			database: DatabaseConfig::default(),
			jwt: JwtConfig::default(),
			client_domain: "http://localhost:3000".to_string(),
		}
	}
}

#[derive(Debug, Parser)]
#[command(name = "platform-api", version, about = "Notes platform GraphQL API")]
pub struct Args {
	#[command(flatten)]
	pub config: ConfigArgs,

	/// Print the GraphQL schema and exit
	#[arg(long)]
	pub export_gql: bool,
}

impl AppConfig {
	pub fn parse() -> Result<Self> {
		Self::from_args(&Args::parse())
	}

	pub fn from_args(args: &Args) -> Result<Self> {
		let (mut config, config_file) =
			common::config::parse::<Self>("NOTES", &args.config, Self::default().config_file.as_deref())?;

		config.config_file = config_file;
		config.export_gql |= args.export_gql;

		Ok(config)
	}
}
