use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::value_objects::ListId;

pub struct AddItemParams {
    pub list_id: ListId,
    pub title: String,
    /// When set and the list does not exist yet, it is created with this
    /// title together with the first item.
    pub new_list_title: Option<String>,
    /// Token of this write; repeating the call with the same token applies it once.
    pub operation_id: Option<Uuid>,
}

#[async_trait]
pub trait AddItemUseCase: Send + Sync {
    async fn execute(&self, params: AddItemParams) -> Result<ShoppingList, ShoppingListError>;
}
