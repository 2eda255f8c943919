use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::Rng;
use uuid::Uuid;

use crate::domain::errors::RepositoryError;
use crate::domain::logger::Logger;
use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::repository::ShoppingListRepository;
use crate::domain::shopping_list::value_objects::ListId;

/// Timeouts and conflict retries for store round trips.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationPolicy {
    /// Upper bound for a single store call.
    pub timeout: Duration,
    /// Read-splice-write attempts before giving up on revision conflicts.
    pub max_attempts: u32,
    /// Base delay between attempts, multiplied by the attempt number.
    pub retry_backoff: Duration,
}

impl Default for MutationPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_attempts: 5,
            retry_backoff: Duration::from_millis(50),
        }
    }
}

/// Bounds a store call by `timeout`, mapping expiry to `Timeout` and a
/// missing document to `NotFound`.
pub async fn bounded<T, Fut>(timeout: Duration, request: Fut) -> Result<T, ShoppingListError>
where
    Fut: Future<Output = Result<T, RepositoryError>> + Send,
{
    tokio::time::timeout(timeout, request)
        .await
        .map_err(|_| ShoppingListError::Timeout)?
        .map_err(ShoppingListError::from_lookup)
}

/// Runs read-modify-write cycles against list documents.
///
/// Mutations of the same list are queued behind a per-list async mutex, and
/// every write is guarded by the revision it was based on. A conflicting
/// write from another process triggers a fresh read and a re-applied splice,
/// so concurrent changes are never silently overwritten.
pub struct ListMutator {
    repository: Arc<dyn ShoppingListRepository>,
    logger: Arc<dyn Logger>,
    policy: MutationPolicy,
    queues: Mutex<HashMap<ListId, Arc<tokio::sync::Mutex<()>>>>,
}

impl ListMutator {
    pub fn new(
        repository: Arc<dyn ShoppingListRepository>,
        logger: Arc<dyn Logger>,
        policy: MutationPolicy,
    ) -> Self {
        Self {
            repository,
            logger,
            policy,
            queues: Mutex::new(HashMap::new()),
        }
    }

    /// Applies `splice` to the freshest copy of the list and writes it back.
    ///
    /// When the list does not exist and `seed` is given, the seed is used as
    /// the base document and created by the write.
    pub async fn mutate<F>(
        &self,
        operation: &str,
        id: ListId,
        seed: Option<ShoppingList>,
        splice: F,
    ) -> Result<ShoppingList, ShoppingListError>
    where
        F: FnMut(&mut ShoppingList) -> Result<(), ShoppingListError> + Send,
    {
        self.mutate_once(operation, id, seed, None, splice).await
    }

    /// Like `mutate`, but the write is recorded under `token`. A document
    /// that already carries the token is returned as is, so repeating a write
    /// whose outcome was lost does not apply it twice.
    pub async fn mutate_once<F>(
        &self,
        operation: &str,
        id: ListId,
        seed: Option<ShoppingList>,
        token: Option<Uuid>,
        splice: F,
    ) -> Result<ShoppingList, ShoppingListError>
    where
        F: FnMut(&mut ShoppingList) -> Result<(), ShoppingListError> + Send,
    {
        let queue = QueueSlot::claim(self, id);
        let _turn = queue.lock().await;
        self.read_splice_write(operation, id, seed, token, splice)
            .await
    }

    /// Deletes an open list. Completed lists are kept as history.
    pub async fn remove(&self, id: ListId) -> Result<(), ShoppingListError> {
        let queue = QueueSlot::claim(self, id);
        let _turn = queue.lock().await;
        let list = self.call(self.repository.get_by_id(&id)).await?;
        list.ensure_open()?;
        self.call(self.repository.delete(&id)).await
    }

    async fn call<T, Fut>(&self, request: Fut) -> Result<T, ShoppingListError>
    where
        Fut: Future<Output = Result<T, RepositoryError>> + Send,
    {
        bounded(self.policy.timeout, request).await
    }

    async fn read_splice_write<F>(
        &self,
        operation: &str,
        id: ListId,
        seed: Option<ShoppingList>,
        token: Option<Uuid>,
        mut splice: F,
    ) -> Result<ShoppingList, ShoppingListError>
    where
        F: FnMut(&mut ShoppingList) -> Result<(), ShoppingListError> + Send,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let mut list = match (self.call(self.repository.get_by_id(&id)).await, &seed) {
                (Ok(list), _) => list,
                (Err(ShoppingListError::NotFound), Some(seed)) => seed.clone(),
                (Err(e), _) => return Err(e),
            };

            if let Some(token) = token
                && list.has_applied(token)
            {
                self.logger.debug(&format!(
                    "{} on shopping list {} already applied at revision {}",
                    operation, id, list.revision
                ));
                return Ok(list);
            }

            splice(&mut list)?;
            if let Some(token) = token {
                list.record_operation(token);
            }

            match self.call(self.repository.save(&list)).await {
                Ok(saved) => {
                    self.logger.debug(&format!(
                        "{} applied to shopping list {} at revision {}",
                        operation, id, saved.revision
                    ));
                    return Ok(saved);
                }
                Err(ShoppingListError::Conflict) if attempt < max_attempts => {
                    self.logger.warn(&format!(
                        "{} on shopping list {} hit a revision conflict (attempt {}/{}), retrying",
                        operation, id, attempt, max_attempts
                    ));
                    tokio::time::sleep(self.backoff(attempt)).await;
                    attempt += 1;
                }
                Err(e) => {
                    self.logger.error(&format!(
                        "{} on shopping list {} failed: {}",
                        operation, id, e
                    ));
                    return Err(e);
                }
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let base = self
            .policy
            .retry_backoff
            .checked_mul(attempt)
            .unwrap_or(Duration::MAX);
        let jitter_ms = u64::try_from(self.policy.retry_backoff.as_millis() / 2).unwrap_or(u64::MAX);
        if jitter_ms == 0 {
            return base;
        }
        base.saturating_add(Duration::from_millis(rand::rng().random_range(0..=jitter_ms)))
    }

    #[cfg(test)]
    fn queued_lists(&self) -> usize {
        self.queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// A caller's claim on the per-list queue. Dropping it, including when the
/// mutation future is cancelled, removes the queue once nobody else holds it.
struct QueueSlot<'a> {
    mutator: &'a ListMutator,
    id: ListId,
    queue: Arc<tokio::sync::Mutex<()>>,
}

impl<'a> QueueSlot<'a> {
    fn claim(mutator: &'a ListMutator, id: ListId) -> Self {
        let mut queues = mutator.queues.lock().unwrap_or_else(PoisonError::into_inner);
        let queue = queues.entry(id).or_default().clone();
        Self { mutator, id, queue }
    }

    async fn lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.queue.lock().await
    }
}

impl Drop for QueueSlot<'_> {
    fn drop(&mut self) {
        let mut queues = self
            .mutator
            .queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Only the map and this slot hold it: nobody is waiting.
        if Arc::strong_count(&self.queue) == 2 {
            queues.remove(&self.id);
        }
    }
}
