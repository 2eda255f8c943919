use chrono::{DateTime, Utc};
use poem_openapi::Object;

use business::domain::shopping_list::display::format_timestamp;
use business::domain::shopping_list::model::{Item, ShoppingList};
use business::domain::shopping_list::use_cases::resolve::ResolvedList;

#[derive(Debug, Clone, Object)]
pub struct CreateShoppingListRequest {
    /// List title (cannot be empty)
    pub title: String,
}

#[derive(Debug, Clone, Object)]
pub struct AddItemRequest {
    /// Item title (cannot be empty)
    pub title: String,
    /// Title for the list if this item starts it; omit to require an
    /// existing list
    #[oai(skip_serializing_if_is_none)]
    pub new_list_title: Option<String>,
}

#[derive(Debug, Clone, Object)]
pub struct EditItemRequest {
    /// New item title; the item is marked as not bought again
    pub title: String,
}

#[derive(Debug, Clone, Object)]
pub struct SetItemCompletedRequest {
    pub completed: bool,
}

#[derive(Debug, Clone, Object)]
pub struct AddNoteRequest {
    /// Note text (cannot be empty)
    pub note: String,
}

#[derive(Debug, Clone, Object)]
pub struct ItemResponse {
    /// Position in the list, used to address the item
    pub index: usize,
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub notes: Vec<String>,
}

impl ItemResponse {
    fn from_item(index: usize, item: Item) -> Self {
        Self {
            index,
            id: item.id.to_string(),
            title: item.title,
            completed: item.completed,
            notes: item.notes,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ShoppingListResponse {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Creation time for display, e.g. "Mon, 1st Jan, 9:05"
    pub created_at_label: String,
    /// Completed lists are read-only
    pub completed: bool,
    /// Store revision of this snapshot
    pub revision: u64,
    pub all_completed: bool,
    pub can_complete: bool,
    pub items: Vec<ItemResponse>,
}

impl From<ShoppingList> for ShoppingListResponse {
    fn from(list: ShoppingList) -> Self {
        let all_completed = list.all_completed();
        let can_complete = list.can_complete();
        Self {
            id: list.id.to_string(),
            created_at_label: format_timestamp(&list.created_at),
            title: list.title,
            created_at: list.created_at,
            completed: list.completed,
            revision: list.revision,
            all_completed,
            can_complete,
            items: list
                .items
                .into_iter()
                .enumerate()
                .map(|(index, item)| ItemResponse::from_item(index, item))
                .collect(),
        }
    }
}

/// Which list to show
#[derive(Debug, Clone, Object)]
pub struct ResolvedListResponse {
    /// Id of the list, or the id reserved for the list the first item starts
    pub id: String,
    /// "found" or "not_started"
    pub status: String,
    pub read_only: bool,
    #[oai(skip_serializing_if_is_none)]
    pub list: Option<ShoppingListResponse>,
    /// Title to send with the first item when nothing is in progress
    #[oai(skip_serializing_if_is_none)]
    pub new_list_title: Option<String>,
}

impl ResolvedListResponse {
    pub fn new(resolved: ResolvedList, default_title: &str) -> Self {
        let id = resolved.id().to_string();
        match resolved {
            ResolvedList::Found { list, read_only } => Self {
                id,
                status: "found".to_string(),
                read_only,
                list: Some(list.into()),
                new_list_title: None,
            },
            ResolvedList::NotFound { .. } => Self {
                id,
                status: "not_found".to_string(),
                read_only: false,
                list: None,
                new_list_title: None,
            },
            ResolvedList::NotStarted { .. } => Self {
                id,
                status: "not_started".to_string(),
                read_only: false,
                list: None,
                new_list_title: Some(default_title.to_string()),
            },
        }
    }
}
