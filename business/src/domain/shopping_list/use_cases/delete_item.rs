use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::value_objects::ListId;

pub struct DeleteItemParams {
    pub list_id: ListId,
    pub index: usize,
    /// Token of this write; repeating the call with the same token applies it once.
    pub operation_id: Option<Uuid>,
}

#[async_trait]
pub trait DeleteItemUseCase: Send + Sync {
    async fn execute(&self, params: DeleteItemParams) -> Result<ShoppingList, ShoppingListError>;
}
