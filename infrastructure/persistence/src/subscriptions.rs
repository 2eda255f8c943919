use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

use business::domain::shopping_list::model::ShoppingList;
use business::domain::shopping_list::subscription::ListSubscription;
use business::domain::shopping_list::value_objects::SubscriptionTarget;

/// Fan-out of document snapshots to live subscriptions.
///
/// One watch channel per target. Channels whose receivers were all dropped
/// are pruned on the next subscribe or publish.
#[derive(Default)]
pub struct SnapshotHub {
    channels: Mutex<HashMap<SubscriptionTarget, watch::Sender<Option<ShoppingList>>>>,
}

impl SnapshotHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a subscription whose first snapshot is `initial`, unless the
    /// channel already holds something newer.
    pub fn subscribe(
        &self,
        target: SubscriptionTarget,
        initial: Option<ShoppingList>,
    ) -> ListSubscription {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        channels.retain(|_, sender| sender.receiver_count() > 0);

        let receiver = match channels.get(&target) {
            Some(sender) => {
                sender.send_if_modified(|current| replace_if_newer(current, initial));
                sender.subscribe()
            }
            None => {
                let (sender, receiver) = watch::channel(initial);
                channels.insert(target, sender);
                receiver
            }
        };
        ListSubscription::new(target, receiver)
    }

    /// Sends `snapshot` to subscribers of `target`. Unchanged or older
    /// snapshots are not delivered.
    pub fn publish(&self, target: SubscriptionTarget, snapshot: Option<ShoppingList>) {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        channels.retain(|_, sender| sender.receiver_count() > 0);

        if let Some(sender) = channels.get(&target) {
            sender.send_if_modified(|current| replace_if_newer(current, snapshot));
        }
    }

    pub fn has_subscribers(&self, target: SubscriptionTarget) -> bool {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&target)
            .is_some_and(|sender| sender.receiver_count() > 0)
    }

    /// Targets with at least one live subscription.
    pub fn active_targets(&self) -> Vec<SubscriptionTarget> {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, sender)| sender.receiver_count() > 0)
            .map(|(target, _)| *target)
            .collect()
    }
}

fn replace_if_newer(current: &mut Option<ShoppingList>, next: Option<ShoppingList>) -> bool {
    let replace = match (current.as_ref(), next.as_ref()) {
        (None, None) => false,
        // Same document: only a higher revision wins.
        (Some(old), Some(new)) if old.id == new.id => new.revision > old.revision,
        _ => true,
    };
    if replace {
        *current = next;
    }
    replace
}

#[cfg(test)]
mod tests {
    use super::*;
    use business::domain::shopping_list::value_objects::ListId;

    fn list(revision: u64) -> ShoppingList {
        let mut list = ShoppingList::new("Weekly".to_string()).unwrap();
        list.revision = revision;
        list
    }

    #[test]
    fn should_start_subscription_with_initial_snapshot() {
        let hub = SnapshotHub::new();
        let stored = list(1);

        let mut subscription = hub.subscribe(SubscriptionTarget::List(stored.id), Some(stored.clone()));

        assert_eq!(subscription.latest(), Some(stored));
    }

    #[tokio::test]
    async fn should_deliver_newer_revisions_only() {
        let hub = SnapshotHub::new();
        let mut first = list(2);
        let target = SubscriptionTarget::List(first.id);
        let mut subscription = hub.subscribe(target, Some(first.clone()));

        let mut stale = first.clone();
        stale.revision = 1;
        hub.publish(target, Some(stale));
        assert!(!subscription.has_unseen());

        first.revision = 3;
        hub.publish(target, Some(first.clone()));
        assert_eq!(subscription.changed().await.unwrap(), Some(first));
    }

    #[test]
    fn should_deliver_deletion() {
        let hub = SnapshotHub::new();
        let stored = list(1);
        let target = SubscriptionTarget::List(stored.id);
        let mut subscription = hub.subscribe(target, Some(stored));

        hub.publish(target, None);

        assert!(subscription.has_unseen());
        assert_eq!(subscription.latest(), None);
    }

    #[test]
    fn should_prune_channel_when_last_subscription_drops() {
        let hub = SnapshotHub::new();
        let target = SubscriptionTarget::List(ListId::generate());
        let first = hub.subscribe(target, None);
        let second = hub.subscribe(target, None);

        drop(first);
        assert!(hub.has_subscribers(target));

        drop(second);
        assert!(!hub.has_subscribers(target));
        assert!(hub.active_targets().is_empty());
    }

    #[test]
    fn should_not_create_channel_on_publish() {
        let hub = SnapshotHub::new();

        hub.publish(SubscriptionTarget::Current, Some(list(1)));

        assert!(hub.active_targets().is_empty());
    }

    #[test]
    fn should_switch_current_to_another_list() {
        let hub = SnapshotHub::new();
        let older = list(7);
        let newer = list(1);
        let mut subscription = hub.subscribe(SubscriptionTarget::Current, Some(older));

        hub.publish(SubscriptionTarget::Current, Some(newer.clone()));

        assert_eq!(subscription.latest(), Some(newer));
    }
}
