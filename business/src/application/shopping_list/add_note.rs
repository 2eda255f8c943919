use std::sync::Arc;

use async_trait::async_trait;

use crate::application::shopping_list::mutator::ListMutator;
use crate::domain::logger::Logger;
use crate::domain::shopping_list::errors::ShoppingListError;
use crate::domain::shopping_list::model::ShoppingList;
use crate::domain::shopping_list::use_cases::add_note::{AddNoteParams, AddNoteUseCase};

pub struct AddNoteUseCaseImpl {
    pub mutator: Arc<ListMutator>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl AddNoteUseCase for AddNoteUseCaseImpl {
    async fn execute(&self, params: AddNoteParams) -> Result<ShoppingList, ShoppingListError> {
        self.logger.info(&format!(
            "Adding note to item {} of shopping list {}",
            params.index, params.list_id
        ));

        if params.note.trim().is_empty() {
            return Err(ShoppingListError::NoteEmpty);
        }

        let (index, note) = (params.index, params.note);
        self.mutator
            .mutate_once("add note", params.list_id, None, params.operation_id, |list| {
                list.add_note(index, note.clone()).map(|_| ())
            })
            .await
    }
}
