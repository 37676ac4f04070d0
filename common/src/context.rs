use std::future::Future;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A cancellation scope handed out to long running tasks.
///
/// Every clone keeps the scope alive, so [`Handler::cancel`] can wait for all
/// of them to be dropped before returning.
#[derive(Clone, Debug)]
pub struct Context {
	token: CancellationToken,
	_alive: mpsc::Sender<()>,
}

/// The owning side of a [`Context`].
#[derive(Debug)]
pub struct Handler {
	token: CancellationToken,
	alive: mpsc::Receiver<()>,
}

impl Context {
	#[must_use]
	pub fn new() -> (Self, Handler) {
		Self::from_token(CancellationToken::new())
	}

	fn from_token(token: CancellationToken) -> (Self, Handler) {
		let (alive_tx, alive_rx) = mpsc::channel(1);

		(
			Self {
				token: token.clone(),
				_alive: alive_tx,
			},
			Handler { token, alive: alive_rx },
		)
	}

	/// Creates a scope that is cancelled together with this one, but can also
	/// be cancelled on its own.
	#[must_use]
	pub fn child(&self) -> (Self, Handler) {
		Self::from_token(self.token.child_token())
	}

	/// Resolves once the scope has been cancelled.
	pub fn done(&self) -> impl Future<Output = ()> + Send + '_ {
		self.token.cancelled()
	}

	pub fn is_done(&self) -> bool {
		self.token.is_cancelled()
	}
}

impl Handler {
	/// Resolves once every [`Context`] of this scope has been dropped.
	pub async fn done(&mut self) {
		while self.alive.recv().await.is_some() {}
	}

	/// Cancels the scope and waits for every [`Context`] to be dropped.
	pub async fn cancel(mut self) {
		self.token.cancel();
		self.done().await;
	}

	pub fn is_done(&self) -> bool {
		self.token.is_cancelled()
	}
}

impl Drop for Handler {
	fn drop(&mut self) {
		self.token.cancel();
	}
}
