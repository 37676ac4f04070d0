use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_graphql::SDLExportOptions;
use common::context::Context;
use common::{logging, signal};
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use tokio::signal::unix::SignalKind;
use tokio::{select, time};

use crate::api::v1::gql::schema;

mod api;
mod config;
mod database;
mod dataloader;
mod global;
mod mailer;
mod subscription;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> Result<()> {
	let config = config::AppConfig::parse()?;

	if config.export_gql {
		let schema = schema();

		println!(
			"{}",
			schema.sdl_with_options(
				SDLExportOptions::default()
					.include_specified_by()
					.sorted_arguments()
					.sorted_enum_items()
					.sorted_fields()
			)
		);

		return Ok(());
	}

	logging::init(&config.logging.level, config.logging.mode)?;

	if let Some(file) = &config.config_file {
		tracing::info!(file = file, "loaded config from file");
	}

	tracing::debug!("config: {:#?}", config);

	let db = Arc::new(
		sqlx::PgPool::connect_with(
			PgConnectOptions::from_str(&config.database.uri)?
				.disable_statement_logging()
				.to_owned(),
		)
		.await?,
	);

	sqlx::migrate!("./migrations").run(&*db).await?;

	let (ctx, handler) = Context::new();

	let global = Arc::new(global::GlobalState::new(config, db, ctx));

	let api_future = tokio::spawn(api::run(global.clone()));

	// Listen on both sigint and sigterm and cancel the context when either is received
	let mut signal_handler = signal::SignalHandler::new()
		.with_signal(SignalKind::interrupt())?
		.with_signal(SignalKind::terminate())?;

	select! {
		r = api_future => tracing::error!("api stopped unexpectedly: {:?}", r),
		r = global.subscription_manager.run(global.ctx.clone()) => tracing::error!("subscription manager stopped unexpectedly: {:?}", r),
		_ = signal_handler.recv() => tracing::info!("shutting down"),
	}

	// We cannot have a context in scope when we cancel the handler, otherwise it will deadlock.
	drop(global);

	tracing::info!("waiting for tasks to finish");

	select! {
		_ = time::sleep(Duration::from_secs(60)) => tracing::warn!("force shutting down"),
		_ = signal_handler.recv() => tracing::warn!("force shutting down"),
		_ = handler.cancel() => tracing::info!("shutting down"),
	}

	Ok(())
}
