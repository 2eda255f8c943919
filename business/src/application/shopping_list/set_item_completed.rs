use std::sync::Arc;

use async_trait::async_trait;

use crate::application::shopping_list::mutator::ListMutator;
use crate::domain::logger::Logger;
use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::use_cases::set_item_completed::{
    SetItemCompletedParams, SetItemCompletedUseCase,
};

pub struct SetItemCompletedUseCaseImpl {
    pub mutator: Arc<ListMutator>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl SetItemCompletedUseCase for SetItemCompletedUseCaseImpl {
    async fn execute(
        &self,
        params: SetItemCompletedParams,
    ) -> Result<ShoppingList, ShoppingListError> {
        self.logger.info(&format!(
            "{} item {} of shopping list {}",
            if params.completed { "Completing" } else { "Undoing" },
            params.index,
            params.list_id
        ));

        let (index, completed) = (params.index, params.completed);
        self.mutator
            .mutate("set item completed", params.list_id, None, |list| {
                list.set_item_completed(index, completed).map(|_| ())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::shopping_list::mutator::MutationPolicy;
    use crate::domain::shopping_list::value_objects::ListId;
    use crate::test_support::{MockShoppingListRepo, mock_logger, saved, stored_list};

    fn use_case(repo: MockShoppingListRepo) -> SetItemCompletedUseCaseImpl {
        SetItemCompletedUseCaseImpl {
            mutator: Arc::new(ListMutator::new(
                Arc::new(repo),
                mock_logger(),
                MutationPolicy::default(),
            )),
            logger: mock_logger(),
        }
    }

    #[tokio::test]
    async fn should_check_off_item() {
        let id = ListId::generate();
        let mut repo = MockShoppingListRepo::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(stored_list(id, &[("Milk", false), ("Bread", false)], 1)));
        repo.expect_save().returning(|list| Ok(saved(list)));

        let list = use_case(repo)
            .execute(SetItemCompletedParams {
                list_id: id,
                index: 0,
                completed: true,
            })
            .await
            .unwrap();

        assert!(list.items[0].completed);
        assert!(!list.items[1].completed);
        assert!(!list.all_completed());
    }

    #[tokio::test]
    async fn should_undo_checked_item() {
        let id = ListId::generate();
        let mut repo = MockShoppingListRepo::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(stored_list(id, &[("Milk", true)], 1)));
        repo.expect_save().returning(|list| Ok(saved(list)));

        let list = use_case(repo)
            .execute(SetItemCompletedParams {
                list_id: id,
                index: 0,
                completed: false,
            })
            .await
            .unwrap();

        assert!(!list.items[0].completed);
    }
}
