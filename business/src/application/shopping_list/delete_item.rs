use std::sync::Arc;

use async_trait::async_trait;

use crate::application::shopping_list::mutator::ListMutator;
use crate::domain::logger::Logger;
use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::use_cases::delete_item::{DeleteItemParams, DeleteItemUseCase};

pub struct DeleteItemUseCaseImpl {
    pub mutator: Arc<ListMutator>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl DeleteItemUseCase for DeleteItemUseCaseImpl {
    async fn execute(&self, params: DeleteItemParams) -> Result<ShoppingList, ShoppingListError> {
        self.logger.info(&format!(
            "Deleting item {} from shopping list {}",
            params.index, params.list_id
        ));

        let index = params.index;
        self.mutator
            .mutate_once("delete item", params.list_id, None, params.operation_id, |list| {
                list.delete_item(index).map(|_| ())
            })
            .await
    }
}
