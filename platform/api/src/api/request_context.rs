use std::ops::Deref;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::auth::{AuthData, AuthError};
use crate::global::GlobalState;

#[derive(Default, Clone)]
pub struct ContextData {
	pub auth: Option<AuthData>,
	pub websocket: bool,
}

/// Per connection state shared between the http layer and the resolvers.
#[derive(Default, Clone)]
pub struct RequestContext(Arc<RwLock<ContextData>>);

impl RequestContext {
	pub async fn set_auth(&self, data: AuthData) {
		let mut guard = self.0.write().await;
		guard.auth = Some(data);
	}

	pub async fn reset_auth(&self) {
		let mut guard = self.0.write().await;
		guard.auth = None;
	}

	pub async fn websocket(&self) {
		let mut guard = self.0.write().await;
		guard.websocket = true;
	}

	/// The current session. Websocket connections outlive their session, so
	/// their session is fetched again on every call.
	pub async fn auth(&self, global: &Arc<GlobalState>) -> Result<Option<AuthData>, AuthError> {
		let inner = self.0.read().await.deref().clone();
		match inner.auth {
			Some(auth) => {
				if !auth.session.is_valid() {
					self.reset_auth().await;
					Err(AuthError::SessionExpired)
				} else if inner.websocket {
					match AuthData::from_session_id(global, auth.session.id).await {
						Ok(auth) => {
							self.set_auth(auth.clone()).await;
							Ok(Some(auth))
						}
						Err(err) => {
							if !err.is_internal() {
								self.reset_auth().await;
							}
							Err(err)
						}
					}
				} else {
					Ok(Some(auth))
				}
			}
			None => Ok(None),
		}
	}
}
