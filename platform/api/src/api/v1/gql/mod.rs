use std::sync::Arc;

use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql::{extensions, Schema};
use common::http::ext::ResultExt;
use common::http::RouteError;
use hyper::{header, Body, Response, StatusCode};
use routerify::Router;

use crate::api::error::ApiError;
use crate::global::GlobalState;

pub mod error;
pub mod ext;
pub mod guards;
pub mod handlers;
pub mod models;
pub mod mutations;
pub mod queries;
pub mod subscription;

pub type MySchema = Schema<queries::Query, mutations::Mutation, subscription::Subscription>;

pub fn schema() -> MySchema {
	Schema::build(
		queries::Query::default(),
		mutations::Mutation::default(),
		subscription::Subscription::default(),
	)
	.extension(extensions::Analyzer)
	.extension(extensions::Tracing)
	.limit_complexity(200) // We don't want to allow too complex queries to be executed
	.finish()
}

pub fn routes(_: &Arc<GlobalState>) -> routerify::Result<Router<Body, RouteError<ApiError>>> {
	Router::builder()
		.data(schema())
		.any_method("/", handlers::graphql_handler)
		.get("/playground", |_| async move {
			let html = playground_source(GraphQLPlaygroundConfig::new("/v1/gql").subscription_endpoint("/v1/gql"));

			Ok::<_, RouteError<ApiError>>(Response::builder()
				.status(StatusCode::OK)
				.header(header::CONTENT_TYPE, "text/html")
				.body(Body::from(html))
				.map_ignore_err_route("failed to build response")?)
		})
		.build()
}
