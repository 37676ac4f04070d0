use std::sync::Arc;

use common::context::{Context, Handler};
use common::logging;

use crate::config::AppConfig;
use crate::global::GlobalState;

/// A global state whose pool only connects once a query runs, so code paths
/// that never touch the database work without one.
pub fn mock_global_state(config: AppConfig) -> (Arc<GlobalState>, Handler) {
	let (ctx, handler) = Context::new();

	logging::init(&config.logging.level, config.logging.mode).expect("failed to initialize logging");

	let db = Arc::new(sqlx::PgPool::connect_lazy(&config.database.uri).expect("failed to create pool"));

	(Arc::new(GlobalState::new(config, db, ctx)), handler)
}

/// A global state backed by the database in `DATABASE_URL`, migrated and
/// emptied.
pub async fn db_global_state(config: AppConfig) -> (Arc<GlobalState>, Handler) {
	let (ctx, handler) = Context::new();

	dotenvy::dotenv().ok();

	logging::init(&config.logging.level, config.logging.mode).expect("failed to initialize logging");

	let db = Arc::new(
		sqlx::PgPool::connect(&std::env::var("DATABASE_URL").expect("DATABASE_URL not set"))
			.await
			.expect("failed to connect to database"),
	);

	sqlx::migrate!("./migrations").run(&*db).await.expect("failed to migrate");

	sqlx::query("TRUNCATE users, user_sessions, collections, notes_lists, chats, chat_members, messages CASCADE")
		.execute(&*db)
		.await
		.expect("failed to clear tables");

	(Arc::new(GlobalState::new(config, db, ctx)), handler)
}
