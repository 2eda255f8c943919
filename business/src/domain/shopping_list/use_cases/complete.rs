use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::value_objects::ListId;

pub struct CompleteShoppingListParams {
    pub list_id: ListId,
    /// Token of this write; repeating the call with the same token applies it once.
    pub operation_id: Option<Uuid>,
}

#[async_trait]
pub trait CompleteShoppingListUseCase: Send + Sync {
    async fn execute(
        &self,
        params: CompleteShoppingListParams,
    ) -> Result<ShoppingList, ShoppingListError>;
}
