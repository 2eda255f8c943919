use async_trait::async_trait;

use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::value_objects::ListId;

pub struct ResolveShoppingListParams {
    /// Explicit list to open; `None` opens the current list.
    pub id: Option<ListId>,
}

/// Which list a session should be showing.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedList {
    /// The list exists. Completed lists are returned read-only.
    Found { list: ShoppingList, read_only: bool },
    /// An explicit id with no document behind it.
    NotFound { id: ListId },
    /// No incomplete list exists; `id` is reserved for the list the first
    /// added item will create.
    NotStarted { id: ListId },
}

impl ResolvedList {
    pub fn id(&self) -> ListId {
        match self {
            ResolvedList::Found { list, .. } => list.id,
            ResolvedList::NotFound { id } | ResolvedList::NotStarted { id } => *id,
        }
    }
}

#[async_trait]
pub trait ResolveShoppingListUseCase: Send + Sync {
    async fn execute(
        &self,
        params: ResolveShoppingListParams,
    ) -> Result<ResolvedList, ShoppingListError>;
}
