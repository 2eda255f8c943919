use tokio::sync::watch;

use crate::domain::errors::RepositoryError;

use super::model::ShoppingList;
use super::value_objects::SubscriptionTarget;

/// Live view of a list document.
///
/// Each update carries the whole document (`None` while it does not exist).
/// Dropping the subscription releases it; stores prune channels that no
/// longer have receivers.
#[derive(Debug)]
pub struct ListSubscription {
    target: SubscriptionTarget,
    receiver: watch::Receiver<Option<ShoppingList>>,
}

impl ListSubscription {
    pub fn new(target: SubscriptionTarget, receiver: watch::Receiver<Option<ShoppingList>>) -> Self {
        Self { target, receiver }
    }

    pub fn target(&self) -> SubscriptionTarget {
        self.target
    }

    /// Latest snapshot, marking it as seen.
    pub fn latest(&mut self) -> Option<ShoppingList> {
        self.receiver.borrow_and_update().clone()
    }

    pub fn has_unseen(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Waits for the next snapshot.
    pub async fn changed(&mut self) -> Result<Option<ShoppingList>, RepositoryError> {
        self.receiver
            .changed()
            .await
            .map_err(|_| RepositoryError::SubscriptionClosed)?;
        Ok(self.latest())
    }
}
