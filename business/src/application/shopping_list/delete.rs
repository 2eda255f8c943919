use std::sync::Arc;

use async_trait::async_trait;

use crate::application::shopping_list::mutator::ListMutator;
use crate::domain::logger::Logger;
use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::use_cases::delete::{
    DeleteShoppingListParams, DeleteShoppingListUseCase,
};

pub struct DeleteShoppingListUseCaseImpl {
    pub mutator: Arc<ListMutator>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl DeleteShoppingListUseCase for DeleteShoppingListUseCaseImpl {
    async fn execute(&self, params: DeleteShoppingListParams) -> Result<(), ShoppingListError> {
        self.logger
            .info(&format!("Deleting shopping list: {}", params.list_id));

        self.mutator.remove(params.list_id).await?;

        self.logger
            .info(&format!("Shopping list deleted: {}", params.list_id));
        Ok(())
    }
}
