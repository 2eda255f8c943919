use async_trait::async_trait;

use crate::domain::errors::RepositoryError;

use super::model::ShoppingList;
use super::subscription::ListSubscription;
use super::value_objects::{ListId, SubscriptionTarget};

/// Port to the document store holding one document per list.
#[async_trait]
pub trait ShoppingListRepository: Send + Sync {
    async fn get_by_id(&self, id: &ListId) -> Result<ShoppingList, RepositoryError>;
    /// Most recently created incomplete list, if any.
    async fn find_current(&self) -> Result<Option<ShoppingList>, RepositoryError>;
    /// Incomplete lists, newest first.
    async fn get_incomplete(&self) -> Result<Vec<ShoppingList>, RepositoryError>;
    /// Completed lists, newest first.
    async fn get_completed(&self) -> Result<Vec<ShoppingList>, RepositoryError>;
    /// Writes the whole document.
    ///
    /// `list.revision` is the revision the caller read: 0 creates the
    /// document and fails with `Conflict` if it already exists; any other
    /// value must match the stored revision or the write fails with
    /// `Conflict`. Returns the stored document with its new revision.
    async fn save(&self, list: &ShoppingList) -> Result<ShoppingList, RepositoryError>;
    async fn delete(&self, id: &ListId) -> Result<(), RepositoryError>;
    async fn subscribe(
        &self,
        target: SubscriptionTarget,
    ) -> Result<ListSubscription, RepositoryError>;
}
