use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use business::domain::errors::RepositoryError;
use business::domain::shopping_list::model::ShoppingList;
use business::domain::shopping_list::repository::ShoppingListRepository;
use business::domain::shopping_list::subscription::ListSubscription;
use business::domain::shopping_list::value_objects::{ListId, SubscriptionTarget};

use crate::subscriptions::SnapshotHub;

/// Process-local document store with the same revision rules as the
/// PostgreSQL adapter.
#[derive(Default)]
pub struct ShoppingListRepositoryMemory {
    documents: RwLock<HashMap<ListId, ShoppingList>>,
    hub: SnapshotHub,
}

impl ShoppingListRepositoryMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_subscribers(&self, target: SubscriptionTarget) -> bool {
        self.hub.has_subscribers(target)
    }

    fn read(&self, id: &ListId) -> Option<ShoppingList> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn current(&self) -> Option<ShoppingList> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|list| !list.completed)
            .max_by_key(|list| list.created_at)
            .cloned()
    }

    fn newest_first(&self, completed: bool) -> Vec<ShoppingList> {
        let mut lists: Vec<ShoppingList> = self
            .documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|list| list.completed == completed)
            .cloned()
            .collect();
        lists.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        lists
    }

    fn publish_changes(&self, id: ListId) {
        self.hub.publish(SubscriptionTarget::List(id), self.read(&id));
        self.hub.publish(SubscriptionTarget::Current, self.current());
    }
}

#[async_trait]
impl ShoppingListRepository for ShoppingListRepositoryMemory {
    async fn get_by_id(&self, id: &ListId) -> Result<ShoppingList, RepositoryError> {
        self.read(id).ok_or(RepositoryError::NotFound)
    }

    async fn find_current(&self) -> Result<Option<ShoppingList>, RepositoryError> {
        Ok(self.current())
    }

    async fn get_incomplete(&self) -> Result<Vec<ShoppingList>, RepositoryError> {
        Ok(self.newest_first(false))
    }

    async fn get_completed(&self) -> Result<Vec<ShoppingList>, RepositoryError> {
        Ok(self.newest_first(true))
    }

    async fn save(&self, list: &ShoppingList) -> Result<ShoppingList, RepositoryError> {
        let stored = {
            let mut documents = self
                .documents
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            match (documents.get(&list.id), list.revision) {
                (None, 0) => {}
                (Some(_), 0) => return Err(RepositoryError::Conflict),
                (None, _) => return Err(RepositoryError::NotFound),
                (Some(current), base) if current.revision != base => {
                    return Err(RepositoryError::Conflict);
                }
                (Some(_), _) => {}
            }
            let mut stored = list.clone();
            stored.revision = list.revision + 1;
            documents.insert(stored.id, stored.clone());
            stored
        };

        self.publish_changes(stored.id);
        Ok(stored)
    }

    async fn delete(&self, id: &ListId) -> Result<(), RepositoryError> {
        let removed = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        if removed.is_none() {
            return Err(RepositoryError::NotFound);
        }

        self.publish_changes(*id);
        Ok(())
    }

    async fn subscribe(
        &self,
        target: SubscriptionTarget,
    ) -> Result<ListSubscription, RepositoryError> {
        let initial = match target {
            SubscriptionTarget::List(id) => self.read(&id),
            SubscriptionTarget::Current => self.current(),
        };
        Ok(self.hub.subscribe(target, initial))
    }
}
