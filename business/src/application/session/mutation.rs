/// A change a session can request on its list.
///
/// Sessions keep the last failed mutation so it can be retried verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddItem { title: String },
    EditItem { index: usize, title: String },
    DeleteItem { index: usize },
    SetItemCompleted { index: usize, completed: bool },
    AddNote { index: usize, note: String },
    CompleteList,
    DeleteList,
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddItem { .. } => "add item",
            Mutation::EditItem { .. } => "edit item",
            Mutation::DeleteItem { .. } => "delete item",
            Mutation::SetItemCompleted { completed: true, .. } => "complete item",
            Mutation::SetItemCompleted { completed: false, .. } => "undo item",
            Mutation::AddNote { .. } => "add note",
            Mutation::CompleteList => "complete list",
            Mutation::DeleteList => "delete list",
        }
    }

    /// Whether the mutation may run before the list document exists.
    pub fn starts_list(&self) -> bool {
        matches!(self, Mutation::AddItem { .. })
    }
}
