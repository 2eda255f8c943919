use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::shopping_list::mutator::bounded;
use crate::domain::logger::Logger;
use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::repository::ShoppingListRepository;
use crate::domain::shopping_list::use_cases::get_history::GetListHistoryUseCase;

pub struct GetListHistoryUseCaseImpl {
    pub repository: Arc<dyn ShoppingListRepository>,
    pub logger: Arc<dyn Logger>,
    pub timeout: Duration,
}

#[async_trait]
impl GetListHistoryUseCase for GetListHistoryUseCaseImpl {
    async fn execute(&self) -> Result<Vec<ShoppingList>, ShoppingListError> {
        self.logger.info("Getting completed shopping lists");
        let lists = bounded(self.timeout, self.repository.get_completed()).await?;
        self.logger
            .info(&format!("Retrieved {} completed shopping lists", lists.len()));
        Ok(lists)
    }
}
