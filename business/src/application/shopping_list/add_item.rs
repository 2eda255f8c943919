use std::sync::Arc;

use async_trait::async_trait;

use crate::application::shopping_list::mutator::ListMutator;
use crate::domain::logger::Logger;
use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::{Item, ShoppingList};
use crate::domain::shopping_list::use_cases::add_item::{AddItemParams, AddItemUseCase};

pub struct AddItemUseCaseImpl {
    pub mutator: Arc<ListMutator>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl AddItemUseCase for AddItemUseCaseImpl {
    async fn execute(&self, params: AddItemParams) -> Result<ShoppingList, ShoppingListError> {
        self.logger.info(&format!(
            "Adding item '{}' to shopping list {}",
            params.title, params.list_id
        ));

        // Validate before touching the store.
        Item::new(params.title.clone())?;
        let seed = params
            .new_list_title
            .map(|title| ShoppingList::new_with_id(params.list_id, title))
            .transpose()?;

        let title = params.title;
        let list = self
            .mutator
            .mutate_once("add item", params.list_id, seed, params.operation_id, |list| {
                list.add_item(title.clone()).map(|_| ())
            })
            .await?;

        self.logger.info(&format!(
            "Shopping list {} now has {} items",
            list.id,
            list.items.len()
        ));
        Ok(list)
    }
}
