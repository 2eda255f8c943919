use std::sync::Arc;

use async_trait::async_trait;

use crate::application::shopping_list::mutator::ListMutator;
use crate::domain::logger::Logger;
use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::use_cases::edit_item::{EditItemParams, EditItemUseCase};

pub struct EditItemUseCaseImpl {
    pub mutator: Arc<ListMutator>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl EditItemUseCase for EditItemUseCaseImpl {
    async fn execute(&self, params: EditItemParams) -> Result<ShoppingList, ShoppingListError> {
        self.logger.info(&format!(
            "Editing item {} of shopping list {}",
            params.index, params.list_id
        ));

        if params.title.trim().is_empty() {
            return Err(ShoppingListError::TitleEmpty);
        }

        let (index, title) = (params.index, params.title);
        self.mutator
            .mutate("edit item", params.list_id, None, |list| {
                list.edit_item(index, title.clone()).map(|_| ())
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

    fn use_case(repo: MockShoppingListRepo) -> EditItemUseCaseImpl {
        EditItemUseCaseImpl {
            mutator: Arc::new(ListMutator::new(
                Arc::new(repo),
                mock_logger(),
                MutationPolicy::default(),
            )),
            logger: mock_logger(),
        }
    }

    #[tokio::test]
    async fn should_rename_and_uncheck_item() {
        let id = ListId::generate();
        let before = stored_list(id, &[("Milk", true), ("Bread", true)], 2);
        let stored = before.clone();
        let mut repo = MockShoppingListRepo::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(stored.clone()));
        repo.expect_save().returning(|list| Ok(saved(list)));

        let list = use_case(repo)
            .execute(EditItemParams {
                list_id: id,
                index: 1,
                title: "Sourdough".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(list.items[0], before.items[0]);
        assert_eq!(list.items[1].id, before.items[1].id);
        assert_eq!(list.items[1].title, "Sourdough");
        assert!(!list.items[1].completed);
    }

    #[tokio::test]
    async fn should_report_missing_item() {
        let id = ListId::generate();
        let mut repo = MockShoppingListRepo::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(stored_list(id, &[("Milk", false)], 2)));
        repo.expect_save().never();

        let result = use_case(repo)
            .execute(EditItemParams {
                list_id: id,
                index: 1,
                title: "Eggs".to_string(),
            })
            .await;

        assert_eq!(result, Err(ShoppingListError::ItemNotFound { index: 1 }));
    }

    #[tokio::test]
    async fn should_reject_empty_title() {
        let mut repo = MockShoppingListRepo::new();
        repo.expect_get_by_id().never();

        let result = use_case(repo)
            .execute(EditItemParams {
                list_id: ListId::generate(),
                index: 0,
                title: "".to_string(),
            })
            .await;

        assert_eq!(result, Err(ShoppingListError::TitleEmpty));
    }
}
