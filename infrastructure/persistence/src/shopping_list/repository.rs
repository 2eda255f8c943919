use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tokio::task::JoinHandle;

use business::domain::errors::RepositoryError;
use business::domain::shopping_list::model::ShoppingList;
use business::domain::shopping_list::repository::ShoppingListRepository;
use business::domain::shopping_list::subscription::ListSubscription;
use business::domain::shopping_list::value_objects::{ListId, SubscriptionTarget};

use super::entity::{ShoppingListEntity, item_documents};
use crate::subscriptions::SnapshotHub;

/// Channel carrying the id of every written or deleted list.
pub const CHANGE_CHANNEL: &str = "shopping_list_changes";

const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(30);

const COLUMNS: &str = "id, title, created_at, completed, items, revision, operations";

pub struct ShoppingListRepositoryPostgres {
    pool: PgPool,
    hub: SnapshotHub,
}

impl ShoppingListRepositoryPostgres {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            hub: SnapshotHub::new(),
        }
    }

    /// Listens for writes made by any process and forwards them to local
    /// subscribers. Lost connections are re-established with backoff, and
    /// every live subscription is refreshed once the feed is back.
    pub fn spawn_change_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let repository = Arc::clone(self);
        tokio::spawn(async move {
            let mut failures: u32 = 0;
            loop {
                let mut listener = match repository.listen().await {
                    Ok(listener) => listener,
                    Err(e) => {
                        failures = failures.saturating_add(1);
                        let delay = reconnect_delay(failures);
                        tracing::error!(
                            "Change feed unavailable (attempt {}), retrying in {:?}: {}",
                            failures,
                            delay,
                            e
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                };
                failures = 0;
                tracing::info!("Listening for shopping list changes on {}", CHANGE_CHANNEL);
                repository.resync().await;

                loop {
                    match listener.recv().await {
                        Ok(notification) => match notification.payload().parse::<ListId>() {
                            Ok(id) => repository.publish_changes(id).await,
                            Err(e) => tracing::warn!("Ignoring change notification: {}", e),
                        },
                        Err(e) => {
                            tracing::warn!("Change feed interrupted: {}", e);
                            break;
                        }
                    }
                }
            }
        })
    }

    async fn listen(&self) -> Result<PgListener, sqlx::Error> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(CHANGE_CHANNEL).await?;
        Ok(listener)
    }

    /// Re-reads every subscribed document, covering changes announced while
    /// the feed was down.
    async fn resync(&self) {
        for target in self.hub.active_targets() {
            let snapshot = match target {
                SubscriptionTarget::List(id) => self.fetch(&id).await,
                SubscriptionTarget::Current => self.find_current().await,
            };
            match snapshot {
                Ok(snapshot) => self.hub.publish(target, snapshot),
                Err(e) => tracing::warn!("Failed to refresh {}: {}", target, e),
            }
        }
    }

    async fn fetch(&self, id: &ListId) -> Result<Option<ShoppingList>, RepositoryError> {
        let entity = sqlx::query_as::<_, ShoppingListEntity>(&format!(
            "SELECT {} FROM shopping_lists WHERE id = $1",
            COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|_| RepositoryError::DatabaseError)?;

        Ok(entity.map(|e| e.into_domain()))
    }

    async fn notify(&self, id: &ListId) {
        let result = sqlx::query("SELECT pg_notify($1, $2)")
            .bind(CHANGE_CHANNEL)
            .bind(id.to_string())
            .execute(&self.pool)
            .await;
        if let Err(e) = result {
            tracing::warn!("Failed to announce change of shopping list {}: {}", id, e);
        }
    }

    /// Pushes fresh snapshots of `id` and of the current list to local
    /// subscribers.
    async fn publish_changes(&self, id: ListId) {
        let list_target = SubscriptionTarget::List(id);
        if self.hub.has_subscribers(list_target) {
            match self.fetch(&id).await {
                Ok(snapshot) => self.hub.publish(list_target, snapshot),
                Err(e) => tracing::warn!("Failed to refresh shopping list {}: {}", id, e),
            }
        }
        if self.hub.has_subscribers(SubscriptionTarget::Current) {
            match self.find_current().await {
                Ok(snapshot) => self.hub.publish(SubscriptionTarget::Current, snapshot),
                Err(e) => tracing::warn!("Failed to refresh current shopping list: {}", e),
            }
        }
    }

    async fn fetch_many(&self, completed: bool) -> Result<Vec<ShoppingList>, RepositoryError> {
        let entities = sqlx::query_as::<_, ShoppingListEntity>(&format!(
            "SELECT {} FROM shopping_lists WHERE completed = $1 ORDER BY created_at DESC",
            COLUMNS
        ))
        .bind(completed)
        .fetch_all(&self.pool)
        .await
        .map_err(|_| RepositoryError::DatabaseError)?;

        Ok(entities.into_iter().map(|e| e.into_domain()).collect())
    }

    async fn create(&self, list: &ShoppingList) -> Result<ShoppingList, RepositoryError> {
        let entity = sqlx::query_as::<_, ShoppingListEntity>(&format!(
            r#"INSERT INTO shopping_lists (id, title, created_at, completed, items, revision, operations)
            VALUES ($1, $2, $3, $4, $5, 1, $6)
            ON CONFLICT (id) DO NOTHING
            RETURNING {}"#,
            COLUMNS
        ))
        .bind(list.id.as_uuid())
        .bind(&list.title)
        .bind(list.created_at)
        .bind(list.completed)
        .bind(item_documents(list))
        .bind(list.operations.as_slice())
        .fetch_optional(&self.pool)
        .await
        .map_err(|_| RepositoryError::DatabaseError)?
        .ok_or(RepositoryError::Conflict)?;

        Ok(entity.into_domain())
    }

    async fn update(&self, list: &ShoppingList) -> Result<ShoppingList, RepositoryError> {
        let base_revision =
            i64::try_from(list.revision).map_err(|_| RepositoryError::Persistence)?;
        let entity = sqlx::query_as::<_, ShoppingListEntity>(&format!(
            r#"UPDATE shopping_lists
            SET title = $2, completed = $3, items = $4, operations = $6, revision = revision + 1
            WHERE id = $1 AND revision = $5
            RETURNING {}"#,
            COLUMNS
        ))
        .bind(list.id.as_uuid())
        .bind(&list.title)
        .bind(list.completed)
        .bind(item_documents(list))
        .bind(base_revision)
        .bind(list.operations.as_slice())
        .fetch_optional(&self.pool)
        .await
        .map_err(|_| RepositoryError::DatabaseError)?;

        match entity {
            Some(entity) => Ok(entity.into_domain()),
            None => match self.fetch(&list.id).await? {
                Some(_) => Err(RepositoryError::Conflict),
                None => Err(RepositoryError::NotFound),
            },
        }
    }
}

/// Doubles from one second up to half a minute.
fn reconnect_delay(failures: u32) -> Duration {
    let exponent = failures.saturating_sub(1).min(5);
    Duration::from_secs(1 << exponent).min(MAX_RECONNECT_DELAY)
}

#[async_trait]
impl ShoppingListRepository for ShoppingListRepositoryPostgres {
    async fn get_by_id(&self, id: &ListId) -> Result<ShoppingList, RepositoryError> {
        self.fetch(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn find_current(&self) -> Result<Option<ShoppingList>, RepositoryError> {
        let entity = sqlx::query_as::<_, ShoppingListEntity>(&format!(
            "SELECT {} FROM shopping_lists WHERE completed = FALSE ORDER BY created_at DESC LIMIT 1",
            COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(|_| RepositoryError::DatabaseError)?;

        Ok(entity.map(|e| e.into_domain()))
    }

    async fn get_incomplete(&self) -> Result<Vec<ShoppingList>, RepositoryError> {
        self.fetch_many(false).await
    }

    async fn get_completed(&self) -> Result<Vec<ShoppingList>, RepositoryError> {
        self.fetch_many(true).await
    }

    async fn save(&self, list: &ShoppingList) -> Result<ShoppingList, RepositoryError> {
        let stored = if list.is_persisted() {
            self.update(list).await?
        } else {
            self.create(list).await?
        };

        self.notify(&stored.id).await;
        self.publish_changes(stored.id).await;
        Ok(stored)
    }

    async fn delete(&self, id: &ListId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shopping_lists WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|_| RepositoryError::DatabaseError)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.notify(id).await;
        self.publish_changes(*id).await;
        Ok(())
    }

    async fn subscribe(
        &self,
        target: SubscriptionTarget,
    ) -> Result<ListSubscription, RepositoryError> {
        let initial = match target {
            SubscriptionTarget::List(id) => self.fetch(&id).await?,
            SubscriptionTarget::Current => self.find_current().await?,
        };
        Ok(self.hub.subscribe(target, initial))
    }
}
