use std::sync::Arc;

use logger::TracingLogger;

use business::application::session::controller::SessionContext;
use business::application::shopping_list::create::CreateShoppingListUseCaseImpl;
use business::application::shopping_list::get_history::GetListHistoryUseCaseImpl;
use business::application::shopping_list::get_in_progress::GetInProgressListsUseCaseImpl;
use business::domain::logger::Logger;
use business::domain::shopping_list::repository::ShoppingListRepository;

use crate::config::store_config::{StoreBackend, StoreConfig, init_store};

pub struct DependencyContainer {
    pub health_api: crate::api::health::routes::Api,
    pub shopping_list_api: crate::api::shopping_list::routes::ShoppingListApi,
}

impl DependencyContainer {
    pub async fn new(config: &StoreConfig) -> anyhow::Result<Self> {
        let repository = init_store(config).await?;
        Ok(Self::with_store(repository, config))
    }

    /// Wires every use case over an already opened store.
    pub fn with_store(repository: Arc<dyn ShoppingListRepository>, config: &StoreConfig) -> Self {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger::default());
        let timeout = config.policy.timeout;
        let health_api = crate::api::health::routes::Api::new(match config.backend {
            StoreBackend::Postgres => "postgres",
            StoreBackend::Memory => "memory",
        });

        // Shared by every request so writes to one list queue in-process.
        let sessions = SessionContext::new(
            repository.clone(),
            logger.clone(),
            config.policy.clone(),
            config.default_list_title.clone(),
        );

        let create_use_case = Arc::new(CreateShoppingListUseCaseImpl {
            repository: repository.clone(),
            logger: logger.clone(),
            timeout,
        });
        let in_progress_use_case = Arc::new(GetInProgressListsUseCaseImpl {
            repository: repository.clone(),
            logger: logger.clone(),
            timeout,
        });
        let history_use_case = Arc::new(GetListHistoryUseCaseImpl {
            repository,
            logger,
            timeout,
        });

        let shopping_list_api = crate::api::shopping_list::routes::ShoppingListApi::new(
            sessions,
            create_use_case,
            in_progress_use_case,
            history_use_case,
        );

        Self {
            health_api,
            shopping_list_api,
        }
    }
}
