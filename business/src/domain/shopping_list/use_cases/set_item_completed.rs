use async_trait::async_trait;

use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::value_objects::ListId;

pub struct SetItemCompletedParams {
    pub list_id: ListId,
    pub index: usize,
    pub completed: bool,
}

#[async_trait]
pub trait SetItemCompletedUseCase: Send + Sync {
    async fn execute(
        &self,
        params: SetItemCompletedParams,
    ) -> Result<ShoppingList, ShoppingListError>;
}
