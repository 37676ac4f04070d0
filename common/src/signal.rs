use futures::future::{select_all, BoxFuture, FutureExt};
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Fans several unix signals into a single receiver.
#[derive(Default)]
pub struct SignalHandler {
	signals: Vec<(SignalKind, Signal)>,
}

impl SignalHandler {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_signal(mut self, kind: SignalKind) -> std::io::Result<Self> {
		self.signals.push((kind, signal(kind)?));
		Ok(self)
	}

	/// Waits for the next registered signal. Never resolves when no signal was
	/// registered.
	pub async fn recv(&mut self) -> SignalKind {
		if self.signals.is_empty() {
			return std::future::pending().await;
		}

		let pending: Vec<BoxFuture<'_, SignalKind>> = self
			.signals
			.iter_mut()
			.map(|(kind, signal)| {
				let kind = *kind;
				async move {
					signal.recv().await;
					kind
				}
				.boxed()
			})
			.collect();

		let (kind, _, _) = select_all(pending).await;
		kind
	}
}
