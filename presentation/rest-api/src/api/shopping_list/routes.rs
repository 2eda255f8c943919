use std::sync::Arc;
use std::time::Duration;

use poem_openapi::{
    OpenApi,
    param::{Path, Query},
    payload::Json,
};

use business::application::session::controller::{ListSession, SessionContext, SessionStatus};
use business::domain::shopping_list::errors::ShoppingListError;
use business::domain::shopping_list::model::ShoppingList;
use business::domain::shopping_list::use_cases::add_item::AddItemParams;
use business::domain::shopping_list::use_cases::add_note::AddNoteParams;
use business::domain::shopping_list::use_cases::complete::CompleteShoppingListParams;
use business::domain::shopping_list::use_cases::create::{
    CreateShoppingListParams, CreateShoppingListUseCase,
};
use business::domain::shopping_list::use_cases::delete::DeleteShoppingListParams;
use business::domain::shopping_list::use_cases::delete_item::DeleteItemParams;
use business::domain::shopping_list::use_cases::edit_item::EditItemParams;
use business::domain::shopping_list::use_cases::get_history::GetListHistoryUseCase;
use business::domain::shopping_list::use_cases::get_in_progress::GetInProgressListsUseCase;
use business::domain::shopping_list::use_cases::resolve::{
    ResolveShoppingListParams, ResolvedList,
};
use business::domain::shopping_list::use_cases::set_item_completed::SetItemCompletedParams;
use business::domain::shopping_list::value_objects::ListId;

use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::shopping_list::dto::{
    AddItemRequest, AddNoteRequest, CreateShoppingListRequest, EditItemRequest,
    ResolvedListResponse, SetItemCompletedRequest, ShoppingListResponse,
};
use crate::api::tags::ApiTags;

const DEFAULT_WAIT_SECS: u64 = 25;
const MAX_WAIT_SECS: u64 = 60;

pub struct ShoppingListApi {
    sessions: SessionContext,
    create_use_case: Arc<dyn CreateShoppingListUseCase>,
    in_progress_use_case: Arc<dyn GetInProgressListsUseCase>,
    history_use_case: Arc<dyn GetListHistoryUseCase>,
}

impl ShoppingListApi {
    pub fn new(
        sessions: SessionContext,
        create_use_case: Arc<dyn CreateShoppingListUseCase>,
        in_progress_use_case: Arc<dyn GetInProgressListsUseCase>,
        history_use_case: Arc<dyn GetListHistoryUseCase>,
    ) -> Self {
        Self {
            sessions,
            create_use_case,
            in_progress_use_case,
            history_use_case,
        }
    }

    async fn resolve(&self, id: Option<ListId>) -> ResolveResponse {
        match self
            .sessions
            .resolve
            .execute(ResolveShoppingListParams { id })
            .await
        {
            Ok(ResolvedList::NotFound { .. }) => {
                ResolveResponse::failure(ShoppingListError::NotFound)
            }
            Ok(resolved) => ResolveResponse::Ok(Json(ResolvedListResponse::new(
                resolved,
                &self.sessions.draft_title,
            ))),
            Err(err) => ResolveResponse::failure(err),
        }
    }
}

fn parse_id(id: &str) -> Result<ListId, Json<ErrorResponse>> {
    id.parse()
        .map_err(|_| ErrorResponse::validation("shopping_list.invalid_id"))
}

/// Shopping list API
///
/// Endpoints for opening, editing and completing shopping lists. Items are
/// addressed by their position in the list.
#[OpenApi]
impl ShoppingListApi {
    /// Current shopping list
    ///
    /// Returns the most recently created list in progress. When nothing is in
    /// progress the status is "not_started" and the returned id is reserved
    /// for the list the first added item will create.
    #[oai(
        path = "/shopping-lists/current",
        method = "get",
        tag = "ApiTags::ShoppingLists"
    )]
    async fn current(&self) -> ResolveResponse {
        self.resolve(None).await
    }

    /// Lists in progress
    ///
    /// Returns every incomplete list, newest first.
    #[oai(
        path = "/shopping-lists/in-progress",
        method = "get",
        tag = "ApiTags::ShoppingLists"
    )]
    async fn in_progress(&self) -> ListsResponse {
        match self.in_progress_use_case.execute().await {
            Ok(lists) => ListsResponse::Ok(Json(lists.into_iter().map(Into::into).collect())),
            Err(err) => ListsResponse::failure(err),
        }
    }

    /// List history
    ///
    /// Returns completed lists, newest first.
    #[oai(
        path = "/shopping-lists/history",
        method = "get",
        tag = "ApiTags::ShoppingLists"
    )]
    async fn history(&self) -> ListsResponse {
        match self.history_use_case.execute().await {
            Ok(lists) => ListsResponse::Ok(Json(lists.into_iter().map(Into::into).collect())),
            Err(err) => ListsResponse::failure(err),
        }
    }

    /// Open a shopping list
    ///
    /// Completed lists are returned with `read_only` set.
    #[oai(
        path = "/shopping-lists/:id",
        method = "get",
        tag = "ApiTags::ShoppingLists"
    )]
    async fn get_by_id(&self, id: Path<String>) -> ResolveResponse {
        match parse_id(&id.0) {
            Ok(list_id) => self.resolve(Some(list_id)).await,
            Err(json) => ResolveResponse::BadRequest(json),
        }
    }

    /// Create a shopping list
    #[oai(path = "/shopping-lists", method = "post", tag = "ApiTags::ShoppingLists")]
    async fn create(&self, body: Json<CreateShoppingListRequest>) -> ListResponse {
        let params = CreateShoppingListParams { title: body.0.title };
        match self.create_use_case.execute(params).await {
            Ok(list) => ListResponse::Created(Json(list.into())),
            Err(err) => ListResponse::failure(err),
        }
    }

    /// Delete a shopping list
    ///
    /// Completed lists are kept as history and cannot be deleted.
    #[oai(
        path = "/shopping-lists/:id",
        method = "delete",
        tag = "ApiTags::ShoppingLists"
    )]
    async fn delete(&self, id: Path<String>) -> DeleteListResponse {
        let list_id = match parse_id(&id.0) {
            Ok(list_id) => list_id,
            Err(json) => return DeleteListResponse::BadRequest(json),
        };
        match self
            .sessions
            .delete
            .execute(DeleteShoppingListParams { list_id })
            .await
        {
            Ok(()) => DeleteListResponse::NoContent,
            Err(err) => DeleteListResponse::failure(err),
        }
    }

    /// Complete a shopping list
    ///
    /// Requires at least one item and every item checked off.
    #[oai(
        path = "/shopping-lists/:id/complete",
        method = "post",
        tag = "ApiTags::ShoppingLists"
    )]
    async fn complete(&self, id: Path<String>) -> ListResponse {
        let list_id = match parse_id(&id.0) {
            Ok(list_id) => list_id,
            Err(json) => return ListResponse::BadRequest(json),
        };
        ListResponse::from_result(
            self.sessions
                .complete
                .execute(CompleteShoppingListParams {
                    list_id,
                    operation_id: None,
                })
                .await,
        )
    }

    /// Add an item
    ///
    /// Appends an item. With `new_list_title` the list is created if it does
    /// not exist yet.
    #[oai(
        path = "/shopping-lists/:id/items",
        method = "post",
        tag = "ApiTags::ShoppingLists"
    )]
    async fn add_item(&self, id: Path<String>, body: Json<AddItemRequest>) -> ListResponse {
        let list_id = match parse_id(&id.0) {
            Ok(list_id) => list_id,
            Err(json) => return ListResponse::BadRequest(json),
        };
        let params = AddItemParams {
            list_id,
            title: body.0.title,
            new_list_title: body.0.new_list_title,
            operation_id: None,
        };
        ListResponse::from_result(self.sessions.add_item.execute(params).await)
    }

    /// Edit an item
    ///
    /// Replaces the title and marks the item as not bought.
    #[oai(
        path = "/shopping-lists/:id/items/:index",
        method = "put",
        tag = "ApiTags::ShoppingLists"
    )]
    async fn edit_item(
        &self,
        id: Path<String>,
        index: Path<usize>,
        body: Json<EditItemRequest>,
    ) -> ListResponse {
        let list_id = match parse_id(&id.0) {
            Ok(list_id) => list_id,
            Err(json) => return ListResponse::BadRequest(json),
        };
        let params = EditItemParams {
            list_id,
            index: index.0,
            title: body.0.title,
        };
        ListResponse::from_result(self.sessions.edit_item.execute(params).await)
    }

    /// Delete an item
    #[oai(
        path = "/shopping-lists/:id/items/:index",
        method = "delete",
        tag = "ApiTags::ShoppingLists"
    )]
    async fn delete_item(&self, id: Path<String>, index: Path<usize>) -> ListResponse {
        let list_id = match parse_id(&id.0) {
            Ok(list_id) => list_id,
            Err(json) => return ListResponse::BadRequest(json),
        };
        let params = DeleteItemParams {
            list_id,
            index: index.0,
            operation_id: None,
        };
        ListResponse::from_result(self.sessions.delete_item.execute(params).await)
    }

    /// Check off or restore an item
    #[oai(
        path = "/shopping-lists/:id/items/:index/completed",
        method = "put",
        tag = "ApiTags::ShoppingLists"
    )]
    async fn set_item_completed(
        &self,
        id: Path<String>,
        index: Path<usize>,
        body: Json<SetItemCompletedRequest>,
    ) -> ListResponse {
        let list_id = match parse_id(&id.0) {
            Ok(list_id) => list_id,
            Err(json) => return ListResponse::BadRequest(json),
        };
        let params = SetItemCompletedParams {
            list_id,
            index: index.0,
            completed: body.0.completed,
        };
        ListResponse::from_result(self.sessions.set_item_completed.execute(params).await)
    }

    /// Add a note to an item
    #[oai(
        path = "/shopping-lists/:id/items/:index/notes",
        method = "post",
        tag = "ApiTags::ShoppingLists"
    )]
    async fn add_note(
        &self,
        id: Path<String>,
        index: Path<usize>,
        body: Json<AddNoteRequest>,
    ) -> ListResponse {
        let list_id = match parse_id(&id.0) {
            Ok(list_id) => list_id,
            Err(json) => return ListResponse::BadRequest(json),
        };
        let params = AddNoteParams {
            list_id,
            index: index.0,
            note: body.0.note,
            operation_id: None,
        };
        ListResponse::from_result(self.sessions.add_note.execute(params).await)
    }

    /// Wait for changes
    ///
    /// Long-polls a live subscription to the list. Returns the list as soon
    /// as its revision is greater than `after_revision` (immediately if it
    /// already is), 204 when nothing changed within `wait_secs` (default 25,
    /// at most 60) and 404 once the list is gone.
    #[oai(
        path = "/shopping-lists/:id/changes",
        method = "get",
        tag = "ApiTags::ShoppingLists"
    )]
    async fn changes(
        &self,
        id: Path<String>,
        after_revision: Query<Option<u64>>,
        wait_secs: Query<Option<u64>>,
    ) -> ChangesResponse {
        let list_id = match parse_id(&id.0) {
            Ok(list_id) => list_id,
            Err(json) => return ChangesResponse::BadRequest(json),
        };
        let after = after_revision.0.unwrap_or(0);
        let wait = Duration::from_secs(wait_secs.0.unwrap_or(DEFAULT_WAIT_SECS).min(MAX_WAIT_SECS));

        let mut session = match ListSession::open(self.sessions.clone(), Some(list_id)).await {
            Ok(session) => session,
            Err(err) => return ChangesResponse::failure(err),
        };
        match tokio::time::timeout(wait, newer_than(&mut session, after)).await {
            Ok(Ok(list)) => ChangesResponse::Ok(Json(list.into())),
            Ok(Err(err)) => ChangesResponse::failure(err),
            Err(_) => ChangesResponse::NoChange,
        }
    }
}

async fn newer_than(session: &mut ListSession, revision: u64) -> Result<ShoppingList, ShoppingListError> {
    loop {
        let view = session.view();
        if matches!(view.status, SessionStatus::NotFound | SessionStatus::Deleted) {
            return Err(ShoppingListError::NotFound);
        }
        if let Some(list) = view.list
            && list.revision > revision
        {
            return Ok(list);
        }
        session.next_update().await?;
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum ResolveResponse {
    #[oai(status = 200)]
    Ok(Json<ResolvedListResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
    #[oai(status = 504)]
    Timeout(Json<ErrorResponse>),
}

impl ResolveResponse {
    fn failure(err: ShoppingListError) -> Self {
        let (status, json) = err.into_error_response();
        match status.as_u16() {
            400 => ResolveResponse::BadRequest(json),
            404 => ResolveResponse::NotFound(json),
            504 => ResolveResponse::Timeout(json),
            _ => ResolveResponse::InternalError(json),
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum ListsResponse {
    #[oai(status = 200)]
    Ok(Json<Vec<ShoppingListResponse>>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
    #[oai(status = 504)]
    Timeout(Json<ErrorResponse>),
}

impl ListsResponse {
    fn failure(err: ShoppingListError) -> Self {
        let (status, json) = err.into_error_response();
        match status.as_u16() {
            504 => ListsResponse::Timeout(json),
            _ => ListsResponse::InternalError(json),
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum ListResponse {
    #[oai(status = 200)]
    Ok(Json<ShoppingListResponse>),
    #[oai(status = 201)]
    Created(Json<ShoppingListResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
    #[oai(status = 504)]
    Timeout(Json<ErrorResponse>),
}

impl ListResponse {
    fn from_result(result: Result<ShoppingList, ShoppingListError>) -> Self {
        match result {
            Ok(list) => ListResponse::Ok(Json(list.into())),
            Err(err) => ListResponse::failure(err),
        }
    }

    fn failure(err: ShoppingListError) -> Self {
        let (status, json) = err.into_error_response();
        match status.as_u16() {
            400 => ListResponse::BadRequest(json),
            404 => ListResponse::NotFound(json),
            409 => ListResponse::Conflict(json),
            504 => ListResponse::Timeout(json),
            _ => ListResponse::InternalError(json),
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum DeleteListResponse {
    #[oai(status = 204)]
    NoContent,
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
    #[oai(status = 504)]
    Timeout(Json<ErrorResponse>),
}

impl DeleteListResponse {
    fn failure(err: ShoppingListError) -> Self {
        let (status, json) = err.into_error_response();
        match status.as_u16() {
            404 => DeleteListResponse::NotFound(json),
            409 => DeleteListResponse::Conflict(json),
            504 => DeleteListResponse::Timeout(json),
            _ => DeleteListResponse::InternalError(json),
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum ChangesResponse {
    #[oai(status = 200)]
    Ok(Json<ShoppingListResponse>),
    /// Nothing changed within the wait
    #[oai(status = 204)]
    NoChange,
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
    #[oai(status = 504)]
    Timeout(Json<ErrorResponse>),
}

impl ChangesResponse {
    fn failure(err: ShoppingListError) -> Self {
        let (status, json) = err.into_error_response();
        match status.as_u16() {
            400 => ChangesResponse::BadRequest(json),
            404 => ChangesResponse::NotFound(json),
            504 => ChangesResponse::Timeout(json),
            _ => ChangesResponse::InternalError(json),
        }
    }
}
