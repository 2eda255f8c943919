use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::shopping_list::mutator::bounded;
use crate::domain::logger::Logger;
use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::repository::ShoppingListRepository;
use crate::domain::shopping_list::use_cases::get_in_progress::GetInProgressListsUseCase;

pub struct GetInProgressListsUseCaseImpl {
    pub repository: Arc<dyn ShoppingListRepository>,
    pub logger: Arc<dyn Logger>,
    pub timeout: Duration,
}

#[async_trait]
impl GetInProgressListsUseCase for GetInProgressListsUseCaseImpl {
    async fn execute(&self) -> Result<Vec<ShoppingList>, ShoppingListError> {
        self.logger.info("Getting shopping lists in progress");
        let lists = bounded(self.timeout, self.repository.get_incomplete()).await?;
        self.logger
            .info(&format!("Retrieved {} shopping lists in progress", lists.len()));
        Ok(lists)
    }
}
