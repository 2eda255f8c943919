use std::sync::Arc;

use async_trait::async_trait;

use crate::application::shopping_list::mutator::ListMutator;
use crate::domain::logger::Logger;
use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::use_cases::complete::{
    CompleteShoppingListParams, CompleteShoppingListUseCase,
};

pub struct CompleteShoppingListUseCaseImpl {
    pub mutator: Arc<ListMutator>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl CompleteShoppingListUseCase for CompleteShoppingListUseCaseImpl {
    async fn execute(
        &self,
        params: CompleteShoppingListParams,
    ) -> Result<ShoppingList, ShoppingListError> {
        self.logger
            .info(&format!("Completing shopping list: {}", params.list_id));

        let list = self
            .mutator
            .mutate_once(
                "complete list",
                params.list_id,
                None,
                params.operation_id,
                |list| list.complete(),
            )
            .await?;

        self.logger
            .info(&format!("Shopping list completed: {}", list.id));
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::shopping_list::mutator::MutationPolicy;
    use crate::domain::shopping_list::value_objects::ListId;
    use crate::test_support::{MockShoppingListRepo, mock_logger, saved, stored_list};

    fn use_case(repo: MockShoppingListRepo) -> CompleteShoppingListUseCaseImpl {
        CompleteShoppingListUseCaseImpl {
            mutator: Arc::new(ListMutator::new(
                Arc::new(repo),
                mock_logger(),
                MutationPolicy::default(),
            )),
            logger: mock_logger(),
        }
    }

    #[tokio::test]
    async fn should_complete_when_every_item_checked() {
        let id = ListId::generate();
        let mut repo = MockShoppingListRepo::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(stored_list(id, &[("Milk", true), ("Bread", true)], 4)));
        repo.expect_save()
            .withf(|list| list.completed)
            .times(1)
            .returning(|list| Ok(saved(list)));

        let list = use_case(repo)
            .execute(CompleteShoppingListParams {
                list_id: id,
                operation_id: None,
            })
            .await
            .unwrap();

        assert!(list.completed);
        assert_eq!(list.items.len(), 2);
    }

    #[tokio::test]
    async fn should_refuse_when_items_pending() {
        let id = ListId::generate();
        let mut repo = MockShoppingListRepo::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(stored_list(id, &[("Milk", true), ("Bread", false)], 4)));
        repo.expect_save().never();

        let result = use_case(repo)
            .execute(CompleteShoppingListParams {
                list_id: id,
                operation_id: None,
            })
            .await;

        assert_eq!(result, Err(ShoppingListError::ItemsPending));
    }

    #[tokio::test]
    async fn should_refuse_empty_list() {
        let id = ListId::generate();
        let mut repo = MockShoppingListRepo::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(stored_list(id, &[], 1)));
        repo.expect_save().never();

        let result = use_case(repo)
            .execute(CompleteShoppingListParams {
                list_id: id,
                operation_id: None,
            })
            .await;

        assert_eq!(result, Err(ShoppingListError::ListEmpty));
    }
}
