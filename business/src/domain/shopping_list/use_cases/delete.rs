use async_trait::async_trait;

use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::value_objects::ListId;

pub struct DeleteShoppingListParams {
    pub list_id: ListId,
}

#[async_trait]
pub trait DeleteShoppingListUseCase: Send + Sync {
    async fn execute(&self, params: DeleteShoppingListParams) -> Result<(), ShoppingListError>;
}
