use async_trait::async_trait;

use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::value_objects::ListId;

pub struct EditItemParams {
    pub list_id: ListId,
    pub index: usize,
    pub title: String,
}

#[async_trait]
pub trait EditItemUseCase: Send + Sync {
    async fn execute(&self, params: EditItemParams) -> Result<ShoppingList, ShoppingListError>;
}
