use std::sync::Arc;

use common::http::RouteError;
use hyper::Body;
use routerify::Router;

use super::error::ApiError;
use crate::global::GlobalState;

pub mod gql;
pub mod health;

pub fn routes(global: &Arc<GlobalState>) -> routerify::Result<Router<Body, RouteError<ApiError>>> {
	Router::builder()
		.scope("/health", health::routes(global)?)
		.scope("/gql", gql::routes(global)?)
		.build()
}
