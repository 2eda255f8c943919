use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::value_objects::ListId;

pub struct AddNoteParams {
    pub list_id: ListId,
    pub index: usize,
    pub note: String,
    /// Token of this write; repeating the call with the same token applies it once.
    pub operation_id: Option<Uuid>,
}

#[async_trait]
pub trait AddNoteUseCase: Send + Sync {
    async fn execute(&self, params: AddNoteParams) -> Result<ShoppingList, ShoppingListError>;
}
