use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use business::domain::shopping_list::model::{Item, ShoppingList};
use business::domain::shopping_list::value_objects::ListId;

/// Item as stored inside the `items` JSONB column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDocument {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl From<&Item> for ItemDocument {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            completed: item.completed,
            notes: item.notes.clone(),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct ShoppingListEntity {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
    pub items: Json<Vec<ItemDocument>>,
    pub revision: i64,
    pub operations: Vec<Uuid>,
}

impl ShoppingListEntity {
    pub fn into_domain(self) -> ShoppingList {
        ShoppingList::from_repository(
            ListId::from(self.id),
            self.title,
            self.created_at,
            self.completed,
            self.items
                .0
                .into_iter()
                .map(|item| Item::from_repository(item.id, item.title, item.completed, item.notes))
                .collect(),
            u64::try_from(self.revision).unwrap_or_default(),
            self.operations,
        )
    }
}

pub fn item_documents(list: &ShoppingList) -> Json<Vec<ItemDocument>> {
    Json(list.items.iter().map(ItemDocument::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_read_items_without_optional_fields() {
        let id = Uuid::new_v4();
        let raw = format!(r#"[{{"id":"{}","title":"Milk"}}]"#, id);

        let items: Vec<ItemDocument> = serde_json::from_str(&raw).unwrap();

        assert_eq!(items[0].id, id);
        assert!(!items[0].completed);
        assert!(items[0].notes.is_empty());
    }

    #[test]
    fn should_map_row_to_domain() {
        let id = Uuid::new_v4();
        let item_id = Uuid::new_v4();
        let operation = Uuid::new_v4();
        let entity = ShoppingListEntity {
            id,
            title: "Weekly".to_string(),
            created_at: Utc::now(),
            completed: false,
            items: Json(vec![ItemDocument {
                id: item_id,
                title: "Bread".to_string(),
                completed: true,
                notes: vec!["Sourdough".to_string()],
            }]),
            revision: 4,
            operations: vec![operation],
        };

        let list = entity.into_domain();

        assert_eq!(list.id, ListId::from(id));
        assert_eq!(list.revision, 4);
        assert_eq!(list.items[0].id, item_id);
        assert!(list.items[0].completed);
        assert_eq!(list.items[0].notes, vec!["Sourdough".to_string()]);
        assert!(list.has_applied(operation));
    }

    #[test]
    fn should_write_items_in_order() {
        let mut list = ShoppingList::new("Weekly".to_string()).unwrap();
        list.add_item("Milk".to_string()).unwrap();
        list.add_item("Eggs".to_string()).unwrap();

        let Json(documents) = item_documents(&list);

        let titles: Vec<&str> = documents.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Milk", "Eggs"]);
    }
}
