use async_graphql::MergedSubscription;

mod chat;

#[derive(MergedSubscription, Default)]
/// The root subscription type which contains root level fields.
pub struct Subscription(chat::ChatSubscription);
