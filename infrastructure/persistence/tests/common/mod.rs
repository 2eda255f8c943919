use std::sync::Arc;
use std::time::Duration;

use business::application::session::controller::SessionContext;
use business::application::shopping_list::mutator::{ListMutator, MutationPolicy};
use business::domain::logger::Logger;
use business::domain::shopping_list::repository::ShoppingListRepository;
use logger::TracingLogger;
use persistence::memory::repository::ShoppingListRepositoryMemory;

pub fn policy() -> MutationPolicy {
    MutationPolicy {
        timeout: Duration::from_secs(2),
        max_attempts: 50,
        retry_backoff: Duration::from_millis(1),
    }
}

pub fn logger() -> Arc<dyn Logger> {
    Arc::new(TracingLogger::new("tests"))
}

pub fn store() -> Arc<ShoppingListRepositoryMemory> {
    Arc::new(ShoppingListRepositoryMemory::new())
}

/// A mutator with its own queue, as another process would have.
pub fn mutator(repository: Arc<dyn ShoppingListRepository>) -> Arc<ListMutator> {
    Arc::new(ListMutator::new(repository, logger(), policy()))
}

pub fn session_context(repository: Arc<dyn ShoppingListRepository>) -> SessionContext {
    SessionContext::new(repository, logger(), policy(), "Shopping".to_string())
}
