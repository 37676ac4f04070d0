use std::sync::Arc;

use common::http::ext::RequestGlobalExt;
use hyper::{Body, Request};

use super::error::{ApiError, Result};
use crate::global::GlobalState;

pub trait RequestExt {
	fn get_global(&self) -> Result<Arc<GlobalState>>;
}

impl RequestExt for Request<Body> {
	#[track_caller]
	fn get_global(&self) -> Result<Arc<GlobalState>> {
		<Self as RequestGlobalExt<ApiError>>::get_global::<GlobalState>(self)
	}
}
