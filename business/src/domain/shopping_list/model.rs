use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::ShoppingListError;
use super::value_objects::ListId;

/// A line on a shopping list. Embedded in its list document.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub notes: Vec<String>,
}

impl Item {
    pub fn new(title: String) -> Result<Self, ShoppingListError> {
        if title.trim().is_empty() {
            return Err(ShoppingListError::TitleEmpty);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            completed: false,
            notes: Vec::new(),
        })
    }

    /// Constructor for data already persisted in the repository (no validation).
    pub fn from_repository(id: Uuid, title: String, completed: bool, notes: Vec<String>) -> Self {
        Self {
            id,
            title,
            completed,
            notes,
        }
    }
}

/// Number of write tokens a list document remembers.
pub const RECENT_OPERATIONS: usize = 32;

/// One list document. Every mutation rewrites the whole document, so the
/// methods below splice `items` in place and leave persistence to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingList {
    pub id: ListId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
    pub items: Vec<Item>,
    /// Store revision this copy was read at; 0 for documents never written.
    pub revision: u64,
    /// Tokens of the latest writes that carried one, oldest first.
    pub operations: Vec<Uuid>,
}

impl ShoppingList {
    pub fn new(title: String) -> Result<Self, ShoppingListError> {
        Self::new_with_id(ListId::generate(), title)
    }

    /// Starts a list under an id that was handed out before the document existed.
    pub fn new_with_id(id: ListId, title: String) -> Result<Self, ShoppingListError> {
        if title.trim().is_empty() {
            return Err(ShoppingListError::TitleEmpty);
        }

        Ok(Self {
            id,
            title,
            created_at: Utc::now(),
            completed: false,
            items: Vec::new(),
            revision: 0,
            operations: Vec::new(),
        })
    }

    /// Constructor for data already persisted in the repository (no validation).
    pub fn from_repository(
        id: ListId,
        title: String,
        created_at: DateTime<Utc>,
        completed: bool,
        items: Vec<Item>,
        revision: u64,
        operations: Vec<Uuid>,
    ) -> Self {
        Self {
            id,
            title,
            created_at,
            completed,
            items,
            revision,
            operations,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.revision > 0
    }

    /// Whether a write carrying `operation` already landed on this document.
    pub fn has_applied(&self, operation: Uuid) -> bool {
        self.operations.contains(&operation)
    }

    pub fn record_operation(&mut self, operation: Uuid) {
        if self.has_applied(operation) {
            return;
        }
        self.operations.push(operation);
        let excess = self.operations.len().saturating_sub(RECENT_OPERATIONS);
        self.operations.drain(..excess);
    }

    pub fn ensure_open(&self) -> Result<(), ShoppingListError> {
        if self.completed {
            return Err(ShoppingListError::ListCompleted);
        }
        Ok(())
    }

    pub fn add_item(&mut self, title: String) -> Result<&Item, ShoppingListError> {
        self.ensure_open()?;
        let item = Item::new(title)?;
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Renames the item and puts it back on the to-buy side.
    pub fn edit_item(&mut self, index: usize, title: String) -> Result<&Item, ShoppingListError> {
        self.ensure_open()?;
        if title.trim().is_empty() {
            return Err(ShoppingListError::TitleEmpty);
        }
        let item = self.item_mut(index)?;
        item.title = title;
        item.completed = false;
        Ok(&*item)
    }

    pub fn delete_item(&mut self, index: usize) -> Result<Item, ShoppingListError> {
        self.ensure_open()?;
        self.item_mut(index)?;
        Ok(self.items.remove(index))
    }

    pub fn set_item_completed(
        &mut self,
        index: usize,
        completed: bool,
    ) -> Result<&Item, ShoppingListError> {
        self.ensure_open()?;
        let item = self.item_mut(index)?;
        item.completed = completed;
        Ok(&*item)
    }

    pub fn add_note(&mut self, index: usize, note: String) -> Result<&Item, ShoppingListError> {
        self.ensure_open()?;
        if note.trim().is_empty() {
            return Err(ShoppingListError::NoteEmpty);
        }
        let item = self.item_mut(index)?;
        item.notes.push(note);
        Ok(&*item)
    }

    /// True when no item is left to buy. Vacuously true for an empty list.
    pub fn all_completed(&self) -> bool {
        self.items.iter().all(|item| item.completed)
    }

    pub fn can_complete(&self) -> bool {
        !self.completed && !self.items.is_empty() && self.all_completed()
    }

    /// Finalizes the list. Only allowed once every item has been checked off.
    pub fn complete(&mut self) -> Result<(), ShoppingListError> {
        self.ensure_open()?;
        if self.items.is_empty() {
            return Err(ShoppingListError::ListEmpty);
        }
        if !self.all_completed() {
            return Err(ShoppingListError::ItemsPending);
        }
        self.completed = true;
        Ok(())
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut Item, ShoppingListError> {
        self.items
            .get_mut(index)
            .ok_or(ShoppingListError::ItemNotFound { index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn list_with(titles: &[&str]) -> ShoppingList {
        let mut list = ShoppingList::new("Weekly".to_string()).unwrap();
        for title in titles {
            list.add_item(title.to_string()).unwrap();
        }
        list
    }

    #[test]
    fn should_create_list_when_title_valid() {
        let list = ShoppingList::new("Morrisons".to_string()).unwrap();

        assert_eq!(list.title, "Morrisons");
        assert!(!list.completed);
        assert!(list.items.is_empty());
        assert_eq!(list.revision, 0);
        assert!(!list.is_persisted());
    }

    #[test]
    fn should_reject_list_when_title_only_whitespace() {
        let result = ShoppingList::new("   ".to_string());

        assert!(matches!(result, Err(ShoppingListError::TitleEmpty)));
    }

    #[test]
    fn should_keep_given_id_for_lazily_created_list() {
        let id = ListId::generate();

        let list = ShoppingList::new_with_id(id, "Shopping".to_string()).unwrap();

        assert_eq!(list.id, id);
    }

    #[test]
    fn should_add_item_with_defaults() {
        let mut list = list_with(&[]);

        let item = list.add_item("Milk".to_string()).unwrap().clone();

        assert_eq!(item.title, "Milk");
        assert!(!item.completed);
        assert!(item.notes.is_empty());
        assert_eq!(list.items, vec![item]);
    }

    #[test]
    fn should_reject_empty_item_title() {
        let mut list = list_with(&["Milk"]);

        let result = list.add_item("".to_string());

        assert!(matches!(result, Err(ShoppingListError::TitleEmpty)));
        assert_eq!(list.items.len(), 1);
    }

    #[test]
    fn should_reset_completed_when_editing_item() {
        let mut list = list_with(&["Milk", "Bread"]);
        list.set_item_completed(0, true).unwrap();
        list.add_note(0, "semi-skimmed".to_string()).unwrap();

        list.edit_item(0, "Oat milk".to_string()).unwrap();

        assert_eq!(list.items[0].title, "Oat milk");
        assert!(!list.items[0].completed);
        assert_eq!(list.items[0].notes, vec!["semi-skimmed".to_string()]);
    }

    #[test]
    fn should_report_missing_index() {
        let mut list = list_with(&["Milk"]);

        assert!(matches!(
            list.edit_item(4, "Eggs".to_string()),
            Err(ShoppingListError::ItemNotFound { index: 4 })
        ));
        assert!(matches!(
            list.delete_item(1),
            Err(ShoppingListError::ItemNotFound { index: 1 })
        ));
        assert!(matches!(
            list.set_item_completed(2, true),
            Err(ShoppingListError::ItemNotFound { index: 2 })
        ));
        assert!(matches!(
            list.add_note(9, "x".to_string()),
            Err(ShoppingListError::ItemNotFound { index: 9 })
        ));
    }

    #[test]
    fn should_remember_recent_operations_only() {
        let mut list = list_with(&[]);
        let first = Uuid::new_v4();
        list.record_operation(first);
        list.record_operation(first);
        assert_eq!(list.operations.len(), 1);

        for _ in 0..RECENT_OPERATIONS {
            list.record_operation(Uuid::new_v4());
        }

        assert_eq!(list.operations.len(), RECENT_OPERATIONS);
        assert!(!list.has_applied(first));
        assert!(list.has_applied(list.operations[RECENT_OPERATIONS - 1]));
    }

    #[test]
    fn should_reject_empty_note() {
        let mut list = list_with(&["Milk"]);

        let result = list.add_note(0, " ".to_string());

        assert!(matches!(result, Err(ShoppingListError::NoteEmpty)));
        assert!(list.items[0].notes.is_empty());
    }

    #[test]
    fn should_complete_list_after_checking_off_every_item() {
        let mut list = list_with(&["Milk", "Bread"]);

        list.set_item_completed(0, true).unwrap();
        assert_eq!(list.items[0].title, "Milk");
        assert!(list.items[0].completed);
        assert!(!list.items[1].completed);
        assert!(!list.all_completed());
        assert!(matches!(list.complete(), Err(ShoppingListError::ItemsPending)));

        list.set_item_completed(1, true).unwrap();
        assert!(list.all_completed());
        assert!(list.can_complete());

        list.complete().unwrap();
        assert!(list.completed);
    }

    #[test]
    fn should_not_complete_empty_list() {
        let mut list = list_with(&[]);

        assert!(list.all_completed());
        assert!(!list.can_complete());
        assert!(matches!(list.complete(), Err(ShoppingListError::ListEmpty)));
    }

    #[test]
    fn should_freeze_completed_list() {
        let mut list = list_with(&["Milk"]);
        list.set_item_completed(0, true).unwrap();
        list.complete().unwrap();
        let frozen = list.clone();

        assert!(matches!(
            list.add_item("Eggs".to_string()),
            Err(ShoppingListError::ListCompleted)
        ));
        assert!(matches!(
            list.set_item_completed(0, false),
            Err(ShoppingListError::ListCompleted)
        ));
        assert!(matches!(list.complete(), Err(ShoppingListError::ListCompleted)));
        assert_eq!(list, frozen);
    }

    fn titles() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[A-Za-z][A-Za-z ]{0,11}", 0..8)
    }

    proptest! {
        #[test]
        fn should_append_exactly_one_item(existing in titles(), title in "[A-Za-z][A-Za-z ]{0,11}") {
            let mut list = ShoppingList::new("Weekly".to_string()).unwrap();
            for t in &existing {
                list.add_item(t.clone()).unwrap();
            }
            let before = list.items.clone();

            list.add_item(title.clone()).unwrap();

            prop_assert_eq!(list.items.len(), before.len() + 1);
            prop_assert_eq!(&list.items[..before.len()], &before[..]);
            let added = &list.items[before.len()];
            prop_assert_eq!(&added.title, &title);
            prop_assert!(!added.completed);
            prop_assert!(added.notes.is_empty());
        }

        #[test]
        fn should_edit_only_target_item(existing in titles(), pick in any::<prop::sample::Index>(), title in "[a-z]{1,10}") {
            prop_assume!(!existing.is_empty());
            let mut list = ShoppingList::new("Weekly".to_string()).unwrap();
            for t in &existing {
                list.add_item(t.clone()).unwrap();
                let last = list.items.len() - 1;
                list.set_item_completed(last, true).unwrap();
            }
            let index = pick.index(existing.len());
            let before = list.items.clone();

            list.edit_item(index, title.clone()).unwrap();

            for (i, (after, prior)) in list.items.iter().zip(before.iter()).enumerate() {
                if i == index {
                    prop_assert_eq!(&after.title, &title);
                    prop_assert!(!after.completed);
                    prop_assert_eq!(after.id, prior.id);
                    prop_assert_eq!(&after.notes, &prior.notes);
                } else {
                    prop_assert_eq!(after, prior);
                }
            }
        }

        #[test]
        fn should_delete_exactly_one_item(existing in titles(), pick in any::<prop::sample::Index>()) {
            prop_assume!(!existing.is_empty());
            let mut list = ShoppingList::new("Weekly".to_string()).unwrap();
            for t in &existing {
                list.add_item(t.clone()).unwrap();
            }
            let index = pick.index(existing.len());
            let mut expected = list.items.clone();
            expected.remove(index);

            let removed = list.delete_item(index).unwrap();

            prop_assert_eq!(list.items.len(), existing.len() - 1);
            prop_assert_eq!(&list.items, &expected);
            prop_assert_eq!(&removed.title, &existing[index]);
        }

        #[test]
        fn should_toggle_without_touching_title_or_notes(existing in titles(), pick in any::<prop::sample::Index>(), completed in any::<bool>()) {
            prop_assume!(!existing.is_empty());
            let mut list = ShoppingList::new("Weekly".to_string()).unwrap();
            for t in &existing {
                list.add_item(t.clone()).unwrap();
                let last = list.items.len() - 1;
                list.add_note(last, format!("note for {}", t)).unwrap();
            }
            let index = pick.index(existing.len());
            let before = list.items[index].clone();

            list.set_item_completed(index, completed).unwrap();

            prop_assert_eq!(list.items[index].completed, completed);
            prop_assert_eq!(&list.items[index].title, &before.title);
            prop_assert_eq!(&list.items[index].notes, &before.notes);
        }

        #[test]
        fn should_append_note_to_target_item_only(existing in titles(), pick in any::<prop::sample::Index>(), note in "[a-z]{1,16}") {
            prop_assume!(!existing.is_empty());
            let mut list = ShoppingList::new("Weekly".to_string()).unwrap();
            for t in &existing {
                list.add_item(t.clone()).unwrap();
                let last = list.items.len() - 1;
                list.add_note(last, "first".to_string()).unwrap();
            }
            let index = pick.index(existing.len());
            let before = list.items.clone();

            list.add_note(index, note.clone()).unwrap();

            prop_assert_eq!(list.items[index].notes.len(), 2);
            prop_assert_eq!(list.items[index].notes.last(), Some(&note));
            for (i, item) in list.items.iter().enumerate() {
                if i != index {
                    prop_assert_eq!(item, &before[i]);
                }
            }
        }
    }
}
