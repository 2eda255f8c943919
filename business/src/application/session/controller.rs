use std::sync::Arc;

use uuid::Uuid;

use crate::application::session::mutation::Mutation;
use crate::application::shopping_list::add_item::AddItemUseCaseImpl;
use crate::application::shopping_list::add_note::AddNoteUseCaseImpl;
use crate::application::shopping_list::complete::CompleteShoppingListUseCaseImpl;
use crate::application::shopping_list::delete::DeleteShoppingListUseCaseImpl;
use crate::application::shopping_list::delete_item::DeleteItemUseCaseImpl;
use crate::application::shopping_list::edit_item::EditItemUseCaseImpl;
use crate::application::shopping_list::mutator::{ListMutator, MutationPolicy};
use crate::application::shopping_list::resolve::ResolveShoppingListUseCaseImpl;
use crate::application::shopping_list::set_item_completed::SetItemCompletedUseCaseImpl;
use crate::domain::errors::RepositoryError;
use crate::domain::logger::Logger;
use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::repository::ShoppingListRepository;
use crate::domain::shopping_list::subscription::ListSubscription;
use crate::domain::shopping_list::use_cases::add_item::{AddItemParams, AddItemUseCase};
use crate::domain::shopping_list::use_cases::add_note::{AddNoteParams, AddNoteUseCase};
use crate::domain::shopping_list::use_cases::complete::{
    CompleteShoppingListParams, CompleteShoppingListUseCase,
};
use crate::domain::shopping_list::use_cases::delete::{
    DeleteShoppingListParams, DeleteShoppingListUseCase,
};
use crate::domain::shopping_list::use_cases::delete_item::{DeleteItemParams, DeleteItemUseCase};
use crate::domain::shopping_list::use_cases::edit_item::{EditItemParams, EditItemUseCase};
use crate::domain::shopping_list::use_cases::resolve::{
    ResolveShoppingListParams, ResolveShoppingListUseCase, ResolvedList,
};
use crate::domain::shopping_list::use_cases::set_item_completed::{
    SetItemCompletedParams, SetItemCompletedUseCase,
};
use crate::domain::shopping_list::value_objects::{ListId, SubscriptionTarget};

/// Everything a session needs, handed over by the composition root.
#[derive(Clone)]
pub struct SessionContext {
    pub repository: Arc<dyn ShoppingListRepository>,
    pub logger: Arc<dyn Logger>,
    pub resolve: Arc<dyn ResolveShoppingListUseCase>,
    pub add_item: Arc<dyn AddItemUseCase>,
    pub edit_item: Arc<dyn EditItemUseCase>,
    pub delete_item: Arc<dyn DeleteItemUseCase>,
    pub set_item_completed: Arc<dyn SetItemCompletedUseCase>,
    pub add_note: Arc<dyn AddNoteUseCase>,
    pub complete: Arc<dyn CompleteShoppingListUseCase>,
    pub delete: Arc<dyn DeleteShoppingListUseCase>,
    /// Title given to a list created by its first item.
    pub draft_title: String,
}

impl SessionContext {
    /// Wires the default use cases over one store, sharing a single mutator
    /// so every session in the process queues behind the same per-list lock.
    pub fn new(
        repository: Arc<dyn ShoppingListRepository>,
        logger: Arc<dyn Logger>,
        policy: MutationPolicy,
        draft_title: String,
    ) -> Self {
        let timeout = policy.timeout;
        let mutator = Arc::new(ListMutator::new(
            repository.clone(),
            logger.clone(),
            policy,
        ));
        Self::with_mutator(repository, logger, mutator, timeout, draft_title)
    }

    pub fn with_mutator(
        repository: Arc<dyn ShoppingListRepository>,
        logger: Arc<dyn Logger>,
        mutator: Arc<ListMutator>,
        timeout: std::time::Duration,
        draft_title: String,
    ) -> Self {
        Self {
            resolve: Arc::new(ResolveShoppingListUseCaseImpl {
                repository: repository.clone(),
                logger: logger.clone(),
                timeout,
            }),
            add_item: Arc::new(AddItemUseCaseImpl {
                mutator: mutator.clone(),
                logger: logger.clone(),
            }),
            edit_item: Arc::new(EditItemUseCaseImpl {
                mutator: mutator.clone(),
                logger: logger.clone(),
            }),
            delete_item: Arc::new(DeleteItemUseCaseImpl {
                mutator: mutator.clone(),
                logger: logger.clone(),
            }),
            set_item_completed: Arc::new(SetItemCompletedUseCaseImpl {
                mutator: mutator.clone(),
                logger: logger.clone(),
            }),
            add_note: Arc::new(AddNoteUseCaseImpl {
                mutator: mutator.clone(),
                logger: logger.clone(),
            }),
            complete: Arc::new(CompleteShoppingListUseCaseImpl {
                mutator: mutator.clone(),
                logger: logger.clone(),
            }),
            delete: Arc::new(DeleteShoppingListUseCaseImpl {
                mutator,
                logger: logger.clone(),
            }),
            repository,
            logger,
            draft_title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    /// Completed list, shown as history only.
    ReadOnly,
    /// Nothing in progress; the first added item starts the list.
    NotStarted,
    NotFound,
    /// The list was deleted while the session was open.
    Deleted,
}

/// What a presentation layer renders for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub list_id: ListId,
    pub status: SessionStatus,
    pub list: Option<ShoppingList>,
    pub all_completed: bool,
    pub can_complete: bool,
    pub editing_index: Option<usize>,
    pub last_error: Option<ShoppingListError>,
    pub can_retry: bool,
}

/// Keeps one view of one list in sync with the store.
///
/// The session resolves which list to show, holds a live subscription to it,
/// and runs mutations through the use cases. Local edit state is cleared only
/// when a mutation succeeds; a failed mutation is remembered for `retry`.
/// Dropping the session releases its subscription.
pub struct ListSession {
    context: SessionContext,
    list_id: ListId,
    status: SessionStatus,
    snapshot: Option<ShoppingList>,
    subscription: Option<ListSubscription>,
    editing_index: Option<usize>,
    last_error: Option<ShoppingListError>,
    /// Last failed mutation with the token it was written under.
    failed: Option<(Mutation, Uuid)>,
}

impl ListSession {
    /// Opens `id`, or the current list when `id` is `None`.
    pub async fn open(context: SessionContext, id: Option<ListId>) -> Result<Self, ShoppingListError> {
        let resolved = context
            .resolve
            .execute(ResolveShoppingListParams { id })
            .await?;
        let mut session = Self {
            context,
            list_id: resolved.id(),
            status: SessionStatus::NotStarted,
            snapshot: None,
            subscription: None,
            editing_index: None,
            last_error: None,
            failed: None,
        };
        session.enter(resolved).await?;
        Ok(session)
    }

    /// Switches the session to another list, releasing the old subscription first.
    pub async fn navigate(&mut self, id: Option<ListId>) -> Result<(), ShoppingListError> {
        self.release();
        self.editing_index = None;
        self.last_error = None;
        self.failed = None;

        let resolved = self
            .context
            .resolve
            .execute(ResolveShoppingListParams { id })
            .await?;
        self.enter(resolved).await
    }

    pub fn list_id(&self) -> ListId {
        self.list_id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn subscription_target(&self) -> Option<SubscriptionTarget> {
        self.subscription.as_ref().map(|s| s.target())
    }

    pub fn view(&self) -> SessionView {
        let list = self.snapshot.clone();
        SessionView {
            list_id: self.list_id,
            status: self.status,
            all_completed: list.as_ref().is_some_and(|l| l.all_completed()),
            can_complete: self.status == SessionStatus::Active
                && list.as_ref().is_some_and(|l| l.can_complete()),
            list,
            editing_index: self.editing_index,
            last_error: self.last_error.clone(),
            can_retry: self.failed.is_some(),
        }
    }

    /// Folds in a snapshot the subscription delivered since the last look.
    pub async fn refresh(&mut self) -> Result<SessionView, ShoppingListError> {
        let pending = match self.subscription.as_mut() {
            Some(subscription) if subscription.has_unseen() => Some(subscription.latest()),
            _ => None,
        };
        if let Some(snapshot) = pending
            && let Some(id) = self.absorb(snapshot)
        {
            self.follow(SubscriptionTarget::List(id)).await?;
        }
        Ok(self.view())
    }

    /// Waits for the store to report a change, then returns the new view.
    pub async fn next_update(&mut self) -> Result<SessionView, ShoppingListError> {
        let subscription = self
            .subscription
            .as_mut()
            .ok_or(ShoppingListError::Repository(RepositoryError::SubscriptionClosed))?;
        let snapshot = subscription.changed().await?;
        if let Some(id) = self.absorb(snapshot) {
            self.follow(SubscriptionTarget::List(id)).await?;
        }
        Ok(self.view())
    }

    /// Puts the item at `index` into edit mode.
    pub fn begin_edit(&mut self, index: usize) -> Result<(), ShoppingListError> {
        self.ensure_writable()?;
        let exists = self
            .snapshot
            .as_ref()
            .is_some_and(|list| index < list.items.len());
        if !exists {
            return Err(ShoppingListError::ItemNotFound { index });
        }
        self.editing_index = Some(index);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing_index = None;
    }

    pub async fn add_item(&mut self, title: impl Into<String>) -> Result<(), ShoppingListError> {
        self.apply(Mutation::AddItem {
            title: title.into(),
        })
        .await
    }

    pub async fn edit_item(
        &mut self,
        index: usize,
        title: impl Into<String>,
    ) -> Result<(), ShoppingListError> {
        self.apply(Mutation::EditItem {
            index,
            title: title.into(),
        })
        .await
    }

    pub async fn delete_item(&mut self, index: usize) -> Result<(), ShoppingListError> {
        self.apply(Mutation::DeleteItem { index }).await
    }

    pub async fn set_item_completed(
        &mut self,
        index: usize,
        completed: bool,
    ) -> Result<(), ShoppingListError> {
        self.apply(Mutation::SetItemCompleted { index, completed })
            .await
    }

    pub async fn add_note(
        &mut self,
        index: usize,
        note: impl Into<String>,
    ) -> Result<(), ShoppingListError> {
        self.apply(Mutation::AddNote {
            index,
            note: note.into(),
        })
        .await
    }

    pub async fn complete_list(&mut self) -> Result<(), ShoppingListError> {
        self.apply(Mutation::CompleteList).await
    }

    pub async fn delete_list(&mut self) -> Result<(), ShoppingListError> {
        self.apply(Mutation::DeleteList).await
    }

    /// Runs `mutation`. On failure the error is kept for the view, edit state
    /// is left alone, and transient failures become retryable.
    pub async fn apply(&mut self, mutation: Mutation) -> Result<(), ShoppingListError> {
        self.attempt(mutation, Uuid::new_v4()).await
    }

    /// Re-runs the last failed mutation, if any, under its original token so
    /// a write that landed before its failure was reported is not repeated.
    pub async fn retry(&mut self) -> Result<(), ShoppingListError> {
        let Some((mutation, operation_id)) = self.failed.take() else {
            return Ok(());
        };
        self.context.logger.info(&format!(
            "Retrying {} on shopping list {}",
            mutation.name(),
            self.list_id
        ));
        let deleting = mutation == Mutation::DeleteList;
        match self.attempt(mutation, operation_id).await {
            // The earlier attempt already removed it.
            Err(ShoppingListError::NotFound) if deleting => self.succeeded(None).await,
            result => result,
        }
    }

    async fn attempt(
        &mut self,
        mutation: Mutation,
        operation_id: Uuid,
    ) -> Result<(), ShoppingListError> {
        match self.run(&mutation, operation_id).await {
            Ok(list) => self.succeeded(list).await,
            Err(error) => {
                self.context.logger.error(&format!(
                    "Failed to {} on shopping list {}: {}",
                    mutation.name(),
                    self.list_id,
                    error
                ));
                self.failed = error.is_transient().then_some((mutation, operation_id));
                self.last_error = Some(error.clone());
                Err(error)
            }
        }
    }

    async fn run(
        &self,
        mutation: &Mutation,
        operation_id: Uuid,
    ) -> Result<Option<ShoppingList>, ShoppingListError> {
        let operation_id = Some(operation_id);
        if !(self.status == SessionStatus::NotStarted && mutation.starts_list()) {
            self.ensure_writable()?;
        }

        let list_id = self.list_id;
        let list = match mutation.clone() {
            Mutation::AddItem { title } => {
                let new_list_title = (self.status == SessionStatus::NotStarted)
                    .then(|| self.context.draft_title.clone());
                self.context
                    .add_item
                    .execute(AddItemParams {
                        list_id,
                        title,
                        new_list_title,
                        operation_id,
                    })
                    .await?
            }
            Mutation::EditItem { index, title } => {
                self.context
                    .edit_item
                    .execute(EditItemParams {
                        list_id,
                        index,
                        title,
                    })
                    .await?
            }
            Mutation::DeleteItem { index } => {
                self.context
                    .delete_item
                    .execute(DeleteItemParams {
                        list_id,
                        index,
                        operation_id,
                    })
                    .await?
            }
            Mutation::SetItemCompleted { index, completed } => {
                self.context
                    .set_item_completed
                    .execute(SetItemCompletedParams {
                        list_id,
                        index,
                        completed,
                    })
                    .await?
            }
            Mutation::AddNote { index, note } => {
                self.context
                    .add_note
                    .execute(AddNoteParams {
                        list_id,
                        index,
                        note,
                        operation_id,
                    })
                    .await?
            }
            Mutation::CompleteList => {
                self.context
                    .complete
                    .execute(CompleteShoppingListParams {
                        list_id,
                        operation_id,
                    })
                    .await?
            }
            Mutation::DeleteList => {
                self.context
                    .delete
                    .execute(DeleteShoppingListParams { list_id })
                    .await?;
                return Ok(None);
            }
        };
        Ok(Some(list))
    }

    async fn succeeded(&mut self, list: Option<ShoppingList>) -> Result<(), ShoppingListError> {
        self.editing_index = None;
        self.last_error = None;
        self.failed = None;

        match list {
            Some(list) => {
                let started = self.status == SessionStatus::NotStarted;
                self.status = status_of(&list);
                self.snapshot = Some(list);
                if started {
                    self.follow(SubscriptionTarget::List(self.list_id)).await?;
                }
            }
            None => {
                self.release();
                self.snapshot = None;
                self.status = SessionStatus::Deleted;
            }
        }
        Ok(())
    }

    async fn enter(&mut self, resolved: ResolvedList) -> Result<(), ShoppingListError> {
        self.list_id = resolved.id();
        let target = match resolved {
            ResolvedList::Found { list, .. } => {
                self.status = status_of(&list);
                self.snapshot = Some(list);
                SubscriptionTarget::List(self.list_id)
            }
            ResolvedList::NotFound { .. } => {
                self.status = SessionStatus::NotFound;
                self.snapshot = None;
                return Ok(());
            }
            ResolvedList::NotStarted { .. } => {
                self.status = SessionStatus::NotStarted;
                self.snapshot = None;
                SubscriptionTarget::Current
            }
        };
        self.follow(target).await
    }

    /// Subscribes to `target`, switching to a concrete list if a not-started
    /// session sees one appear.
    async fn follow(&mut self, mut target: SubscriptionTarget) -> Result<(), ShoppingListError> {
        loop {
            self.release();
            let mut subscription = self
                .context
                .repository
                .subscribe(target)
                .await
                .map_err(ShoppingListError::from_lookup)?;
            self.context
                .logger
                .debug(&format!("Session subscribed to {}", target));
            let snapshot = subscription.latest();
            self.subscription = Some(subscription);

            match self.absorb(snapshot) {
                Some(id) => target = SubscriptionTarget::List(id),
                None => return Ok(()),
            }
        }
    }

    /// Applies a delivered snapshot. Returns the id to follow when a list
    /// in progress shows up for a session that had none.
    fn absorb(&mut self, snapshot: Option<ShoppingList>) -> Option<ListId> {
        match (self.status, snapshot) {
            (SessionStatus::NotStarted, Some(list)) => {
                self.context.logger.info(&format!(
                    "Shopping list {} started elsewhere, following it",
                    list.id
                ));
                self.list_id = list.id;
                self.status = status_of(&list);
                self.snapshot = Some(list);
                Some(self.list_id)
            }
            (SessionStatus::NotStarted, None) | (SessionStatus::NotFound, _) => None,
            (_, Some(list)) => {
                if list.id != self.list_id {
                    return None;
                }
                let stale = self
                    .snapshot
                    .as_ref()
                    .is_some_and(|current| current.revision > list.revision);
                if !stale {
                    self.status = status_of(&list);
                    if self.editing_index.is_some_and(|index| index >= list.items.len()) {
                        self.editing_index = None;
                    }
                    self.snapshot = Some(list);
                }
                None
            }
            (_, None) => {
                if self.status != SessionStatus::Deleted {
                    self.context
                        .logger
                        .warn(&format!("Shopping list {} was deleted", self.list_id));
                }
                self.status = SessionStatus::Deleted;
                self.snapshot = None;
                self.editing_index = None;
                None
            }
        }
    }

    fn ensure_writable(&self) -> Result<(), ShoppingListError> {
        match self.status {
            SessionStatus::Active => Ok(()),
            SessionStatus::ReadOnly => Err(ShoppingListError::ListCompleted),
            SessionStatus::NotStarted | SessionStatus::NotFound | SessionStatus::Deleted => {
                Err(ShoppingListError::NotFound)
            }
        }
    }

    fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.context.logger.debug(&format!(
                "Session released subscription to {}",
                subscription.target()
            ));
        }
    }
}

impl Drop for ListSession {
    fn drop(&mut self) {
        self.release();
    }
}

fn status_of(list: &ShoppingList) -> SessionStatus {
    if list.completed {
        SessionStatus::ReadOnly
    } else {
        SessionStatus::Active
    }
}
