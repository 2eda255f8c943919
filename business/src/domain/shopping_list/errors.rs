use crate::domain::errors::RepositoryError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShoppingListError {
    #[error("shopping_list.title_empty")]
    TitleEmpty,
    #[error("shopping_list.note_empty")]
    NoteEmpty,
    #[error("shopping_list.not_found")]
    NotFound,
    #[error("shopping_list.item_not_found")]
    ItemNotFound { index: usize },
    /// Completed lists are history and accept no further writes.
    #[error("shopping_list.completed")]
    ListCompleted,
    #[error("shopping_list.empty")]
    ListEmpty,
    #[error("shopping_list.items_pending")]
    ItemsPending,
    #[error("shopping_list.timeout")]
    Timeout,
    /// Revision conflicts persisted after every retry attempt.
    #[error("shopping_list.conflict")]
    Conflict,
    #[error("repository.persistence")]
    Repository(#[from] RepositoryError),
}

impl ShoppingListError {
    /// Maps store errors where `NotFound` means the list document is missing.
    pub fn from_lookup(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => ShoppingListError::NotFound,
            RepositoryError::Conflict => ShoppingListError::Conflict,
            other => ShoppingListError::Repository(other),
        }
    }

    /// Errors worth offering the user a retry for.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ShoppingListError::Timeout
                | ShoppingListError::Conflict
                | ShoppingListError::Repository(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_missing_document_to_not_found() {
        let error = ShoppingListError::from_lookup(RepositoryError::NotFound);

        assert_eq!(error, ShoppingListError::NotFound);
    }

    #[test]
    fn should_wrap_other_repository_errors() {
        let error = ShoppingListError::from_lookup(RepositoryError::DatabaseError);

        assert_eq!(
            error,
            ShoppingListError::Repository(RepositoryError::DatabaseError)
        );
        assert!(error.is_transient());
    }

    #[test]
    fn should_not_treat_validation_errors_as_transient() {
        assert!(!ShoppingListError::TitleEmpty.is_transient());
        assert!(!ShoppingListError::ItemsPending.is_transient());
        assert!(!ShoppingListError::ListCompleted.is_transient());
    }

    #[test]
    fn should_use_code_style_messages() {
        assert_eq!(
            ShoppingListError::ItemNotFound { index: 3 }.to_string(),
            "shopping_list.item_not_found"
        );
        assert_eq!(ShoppingListError::Timeout.to_string(), "shopping_list.timeout");
    }
}
