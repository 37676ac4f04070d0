use std::sync::Arc;

use async_graphql::dataloader::DataLoader;
use common::context::Context;

use crate::config::AppConfig;
use crate::dataloader::collection::CollectionByIdLoader;
use crate::dataloader::session::SessionByIdLoader;
use crate::dataloader::user::{UserByIdLoader, UserByUsernameLoader};
use crate::mailer::{LogMailer, Mailer};
use crate::subscription::SubscriptionManager;

pub struct GlobalState {
	pub config: AppConfig,
	pub db: Arc<sqlx::PgPool>,
	pub ctx: Context,

	pub user_by_username_loader: DataLoader<UserByUsernameLoader>,
	pub user_by_id_loader: DataLoader<UserByIdLoader>,
	pub session_by_id_loader: DataLoader<SessionByIdLoader>,
	pub collection_by_id_loader: DataLoader<CollectionByIdLoader>,

	pub subscription_manager: SubscriptionManager,
	pub mailer: Box<dyn Mailer>,
}

impl GlobalState {
	pub fn new(config: AppConfig, db: Arc<sqlx::PgPool>, ctx: Context) -> Self {
		Self::with_mailer(config, db, ctx, Box::new(LogMailer))
	}

	pub fn with_mailer(config: AppConfig, db: Arc<sqlx::PgPool>, ctx: Context, mailer: Box<dyn Mailer>) -> Self {
		Self {
			config,
			ctx,

			user_by_username_loader: UserByUsernameLoader::new(db.clone()),
			user_by_id_loader: UserByIdLoader::new(db.clone()),
			session_by_id_loader: SessionByIdLoader::new(db.clone()),
			collection_by_id_loader: CollectionByIdLoader::new(db.clone()),

			subscription_manager: SubscriptionManager::default(),
			mailer,
			db,
		}
	}
}
