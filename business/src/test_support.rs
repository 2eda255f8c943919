use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;

use crate::domain::errors::RepositoryError;
use crate::domain::logger::Logger;
use crate::domain::shopping_list::model::{Item, ShoppingList};
use crate::domain::shopping_list::repository::ShoppingListRepository;
use crate::domain::shopping_list::subscription::ListSubscription;
use crate::domain::shopping_list::value_objects::{ListId, SubscriptionTarget};

mock! {
    pub ShoppingListRepo {}

    #[async_trait]
    impl ShoppingListRepository for ShoppingListRepo {
        async fn get_by_id(&self, id: &ListId) -> Result<ShoppingList, RepositoryError>;
        async fn find_current(&self) -> Result<Option<ShoppingList>, RepositoryError>;
        async fn get_incomplete(&self) -> Result<Vec<ShoppingList>, RepositoryError>;
        async fn get_completed(&self) -> Result<Vec<ShoppingList>, RepositoryError>;
        async fn save(&self, list: &ShoppingList) -> Result<ShoppingList, RepositoryError>;
        async fn delete(&self, id: &ListId) -> Result<(), RepositoryError>;
        async fn subscribe(&self, target: SubscriptionTarget) -> Result<ListSubscription, RepositoryError>;
    }
}

mock! {
    pub Log {}

    impl Logger for Log {
        fn info(&self, message: &str);
        fn warn(&self, message: &str);
        fn error(&self, message: &str);
        fn debug(&self, message: &str);
    }
}

pub fn mock_logger() -> Arc<dyn Logger> {
    let mut logger = MockLog::new();
    logger.expect_info().returning(|_| ());
    logger.expect_warn().returning(|_| ());
    logger.expect_error().returning(|_| ());
    logger.expect_debug().returning(|_| ());
    Arc::new(logger)
}

/// A stored list with the given `(title, completed)` items.
pub fn stored_list(id: ListId, items: &[(&str, bool)], revision: u64) -> ShoppingList {
    ShoppingList::from_repository(
        id,
        "Weekly".to_string(),
        chrono::Utc::now(),
        false,
        items
            .iter()
            .map(|(title, completed)| {
                Item::from_repository(uuid::Uuid::new_v4(), title.to_string(), *completed, vec![])
            })
            .collect(),
        revision,
        vec![],
    )
}

/// What a store hands back after accepting `list`.
pub fn saved(list: &ShoppingList) -> ShoppingList {
    let mut stored = list.clone();
    stored.revision += 1;
    stored
}
