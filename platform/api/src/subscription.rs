use std::collections::HashMap;

use common::context::Context;
use tokio::select;
use tokio::sync::{broadcast, mpsc, oneshot, Mutex};
use tracing::{debug, warn};

use crate::database::{Message, Ulid};

#[derive(thiserror::Error, Debug)]
pub enum SubscriptionManagerError {
	#[error("send error: {0}")]
	Send(#[from] mpsc::error::SendError<Event>),
	#[error("receive error: {0}")]
	Receive(#[from] oneshot::error::RecvError),
}

/// Something that happened in a chat.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEventKind {
	MessageSent(Message),
	MessageUpdated(Message),
	MessageDeleted(Message),
	UserJoined(Ulid),
	UserLeft(Ulid),
}

/// A chat event together with the members of the chat at the time it was
/// published.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatEvent {
	pub chat_id: Ulid,
	pub members: Vec<Ulid>,
	pub kind: ChatEventKind,
}

impl ChatEvent {
	/// Whether a subscriber watching `chat_id` as `viewer` gets this event.
	pub fn should_deliver(&self, chat_id: Ulid, viewer: Ulid) -> bool {
		self.chat_id == chat_id && self.members.contains(&viewer)
	}
}

#[derive(Debug)]
pub enum Event {
	Subscribe {
		topic: String,
		tx: oneshot::Sender<broadcast::Receiver<ChatEvent>>,
	},
	Unsubscribe {
		topic: String,
	},
	Publish {
		topic: String,
		event: ChatEvent,
	},
}

/// In-process topic fan-out. Every subscriber of a topic gets its own
/// broadcast receiver, a subscriber that falls too far behind misses events.
pub struct SubscriptionManager {
	events_tx: mpsc::UnboundedSender<Event>,
	events_rx: Mutex<mpsc::UnboundedReceiver<Event>>,
}

impl Default for SubscriptionManager {
	fn default() -> Self {
		// Unbounded so the receiver can unsubscribe from a drop.
		let (events_tx, events_rx) = mpsc::unbounded_channel();

		Self {
			events_rx: Mutex::new(events_rx),
			events_tx,
		}
	}
}

pub struct SubscriberReceiver<'a> {
	topic: String,
	// Taken on drop, the manager only removes a topic once it has no receivers.
	rx: Option<broadcast::Receiver<ChatEvent>>,
	manager: &'a SubscriptionManager,
}

impl SubscriberReceiver<'_> {
	/// The next event, skipping over anything lost to lag. Returns `None` once
	/// the topic is closed.
	pub async fn next_event(&mut self) -> Option<ChatEvent> {
		let rx = self.rx.as_mut()?;

		loop {
			match rx.recv().await {
				Ok(event) => return Some(event),
				Err(broadcast::error::RecvError::Lagged(skipped)) => {
					warn!(topic = %self.topic, skipped, "subscriber lagged behind");
				}
				Err(broadcast::error::RecvError::Closed) => return None,
			}
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionTopic {
	ChatMessages(Ulid),
	ChatMembers(Ulid),
}

impl std::fmt::Display for SubscriptionTopic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::ChatMessages(chat_id) => write!(f, "chat.{chat_id}.messages"),
			Self::ChatMembers(chat_id) => write!(f, "chat.{chat_id}.members"),
		}
	}
}

const TOPIC_CAPACITY: usize = 64;

impl SubscriptionManager {
	/// Runs until `ctx` is done and the last subscriber has gone away.
	pub async fn run(&self, ctx: Context) -> Result<(), SubscriptionManagerError> {
		let mut topics = HashMap::<String, broadcast::Sender<ChatEvent>>::new();
		let mut shutting_down = false;

		let mut events_rx = self.events_rx.lock().await;

		loop {
			select! {
				_ = ctx.done(), if !shutting_down => {
					shutting_down = true;
					if topics.is_empty() {
						break;
					}
				}
				event = events_rx.recv() => {
					let Some(event) = event else {
						break;
					};

					match event {
						Event::Subscribe { topic, tx } => {
							let rx = topics
								.entry(topic)
								.or_insert_with_key(|topic| {
									debug!("creating topic: {}", topic);
									broadcast::channel(TOPIC_CAPACITY).0
								})
								.subscribe();

							if tx.send(rx).is_err() {
								debug!("subscriber went away before receiving its receiver");
							}
						}
						Event::Unsubscribe { topic } => {
							if topics.get(&topic).is_some_and(|btx| btx.receiver_count() == 0) {
								debug!("removing topic: {}", topic);
								topics.remove(&topic);
							}

							if topics.is_empty() && shutting_down {
								break;
							}
						}
						Event::Publish { topic, event } => {
							let Some(btx) = topics.get(&topic) else {
								debug!("no subscribers for topic: {}", topic);
								continue;
							};

							if btx.send(event).is_err() {
								debug!("all subscribers of {} are gone", topic);
							}
						}
					}
				}
			}
		}

		Ok(())
	}

	pub async fn subscribe(&self, topic: SubscriptionTopic) -> Result<SubscriberReceiver<'_>, SubscriptionManagerError> {
		let (tx, rx) = oneshot::channel();

		self.events_tx.send(Event::Subscribe {
			topic: topic.to_string(),
			tx,
		})?;

		let rx = rx.await?;

		Ok(SubscriberReceiver {
			topic: topic.to_string(),
			rx: Some(rx),
			manager: self,
		})
	}

	/// Hands `event` to whoever is subscribed to `topic` right now.
	pub fn publish(&self, topic: SubscriptionTopic, event: ChatEvent) -> Result<(), SubscriptionManagerError> {
		self.events_tx.send(Event::Publish {
			topic: topic.to_string(),
			event,
		})?;

		Ok(())
	}
}

impl Drop for SubscriberReceiver<'_> {
	fn drop(&mut self) {
		drop(self.rx.take());

		self.manager
			.events_tx
			.send(Event::Unsubscribe {
				topic: self.topic.clone(),
			})
			.ok();
	}
}
