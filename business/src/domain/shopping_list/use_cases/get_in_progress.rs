use async_trait::async_trait;

use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;

#[async_trait]
pub trait GetInProgressListsUseCase: Send + Sync {
    async fn execute(&self) -> Result<Vec<ShoppingList>, ShoppingListError>;
}
