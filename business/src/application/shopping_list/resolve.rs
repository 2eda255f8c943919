use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::shopping_list::mutator::bounded;
use crate::domain::logger::Logger;
use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::repository::ShoppingListRepository;
use crate::domain::shopping_list::use_cases::resolve::{
    ResolveShoppingListParams, ResolveShoppingListUseCase, ResolvedList,
};
use crate::domain::shopping_list::value_objects::ListId;

pub struct ResolveShoppingListUseCaseImpl {
    pub repository: Arc<dyn ShoppingListRepository>,
    pub logger: Arc<dyn Logger>,
    pub timeout: Duration,
}

#[async_trait]
impl ResolveShoppingListUseCase for ResolveShoppingListUseCaseImpl {
    async fn execute(
        &self,
        params: ResolveShoppingListParams,
    ) -> Result<ResolvedList, ShoppingListError> {
        match params.id {
            Some(id) => {
                self.logger.info(&format!("Resolving shopping list: {}", id));
                match bounded(self.timeout, self.repository.get_by_id(&id)).await {
                    Ok(list) => {
                        let read_only = list.completed;
                        Ok(ResolvedList::Found { list, read_only })
                    }
                    Err(ShoppingListError::NotFound) => {
                        self.logger.warn(&format!("Shopping list not found: {}", id));
                        Ok(ResolvedList::NotFound { id })
                    }
                    Err(e) => Err(e),
                }
            }
            None => {
                self.logger.info("Resolving current shopping list");
                match bounded(self.timeout, self.repository.find_current()).await? {
                    Some(list) => Ok(ResolvedList::Found {
                        list,
                        read_only: false,
                    }),
                    None => {
                        let id = ListId::generate();
                        self.logger.info(&format!(
                            "No shopping list in progress, reserved id {}",
                            id
                        ));
                        Ok(ResolvedList::NotStarted { id })
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::RepositoryError;
    use crate::test_support::{MockShoppingListRepo, mock_logger, stored_list};

    fn use_case(repo: MockShoppingListRepo) -> ResolveShoppingListUseCaseImpl {
        ResolveShoppingListUseCaseImpl {
            repository: Arc::new(repo),
            logger: mock_logger(),
            timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn should_return_list_by_id() {
        let id = ListId::generate();
        let mut repo = MockShoppingListRepo::new();
        repo.expect_get_by_id()
            .withf(move |requested| *requested == id)
            .returning(move |_| Ok(stored_list(id, &[("Milk", false)], 2)));

        let result = use_case(repo)
            .execute(ResolveShoppingListParams { id: Some(id) })
            .await
            .unwrap();

        match result {
            ResolvedList::Found { list, read_only } => {
                assert_eq!(list.id, id);
                assert!(!read_only);
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[tokio::test]
    async fn should_open_completed_list_read_only() {
        let id = ListId::generate();
        let mut repo = MockShoppingListRepo::new();
        repo.expect_get_by_id().returning(move |_| {
            let mut list = stored_list(id, &[("Milk", true)], 5);
            list.completed = true;
            Ok(list)
        });

        let result = use_case(repo)
            .execute(ResolveShoppingListParams { id: Some(id) })
            .await
            .unwrap();

        assert!(matches!(result, ResolvedList::Found { read_only: true, .. }));
    }

    #[tokio::test]
    async fn should_report_unknown_id_as_not_found() {
        let id = ListId::generate();
        let mut repo = MockShoppingListRepo::new();
        repo.expect_get_by_id()
            .returning(|_| Err(RepositoryError::NotFound));

        let result = use_case(repo)
            .execute(ResolveShoppingListParams { id: Some(id) })
            .await
            .unwrap();

        assert_eq!(result, ResolvedList::NotFound { id });
    }

    #[tokio::test]
    async fn should_pick_current_list_without_id() {
        let id = ListId::generate();
        let mut repo = MockShoppingListRepo::new();
        repo.expect_find_current()
            .returning(move || Ok(Some(stored_list(id, &[], 1))));

        let result = use_case(repo)
            .execute(ResolveShoppingListParams { id: None })
            .await
            .unwrap();

        assert_eq!(result.id(), id);
        assert!(matches!(result, ResolvedList::Found { read_only: false, .. }));
    }

    #[tokio::test]
    async fn should_reserve_new_id_when_nothing_in_progress() {
        let mut repo = MockShoppingListRepo::new();
        repo.expect_find_current().returning(|| Ok(None));

        let result = use_case(repo)
            .execute(ResolveShoppingListParams { id: None })
            .await
            .unwrap();

        assert!(matches!(result, ResolvedList::NotStarted { .. }));
    }

    #[tokio::test]
    async fn should_propagate_store_failure() {
        let mut repo = MockShoppingListRepo::new();
        repo.expect_find_current()
            .returning(|| Err(RepositoryError::DatabaseError));

        let result = use_case(repo)
            .execute(ResolveShoppingListParams { id: None })
            .await;

        assert_eq!(
            result,
            Err(ShoppingListError::Repository(RepositoryError::DatabaseError))
        );
    }
}
