use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    app_state::SharedState,
    create_task_request::NewTask,
    task::Task,
    task_list_query::TaskFilter,
    update_task_request::TaskPatch,
    web_api::{api_error::ApiError, validated::TaskId},
};

/// Set on list responses when another page of matching tasks exists.
pub const NEXT_CURSOR_HEADER: &str = "x-next-cursor";

pub struct TaskController {}

impl TaskController {
    #[tracing::instrument(skip(state))]
    pub async fn list(
        State(state): State<SharedState>,
        filter: TaskFilter,
    ) -> Result<Response, ApiError> {
        let page = state.tasks.list_all(filter).await?;
        let next_cursor = page
            .next_cursor
            .map(|cursor| [(NEXT_CURSOR_HEADER, cursor.to_string())]);
        Ok((next_cursor, Json(page.tasks)).into_response())
    }

    #[tracing::instrument(skip(state))]
    pub async fn get(
        State(state): State<SharedState>,
        TaskId { id, requested }: TaskId,
    ) -> Result<Json<Task>, ApiError> {
        state
            .tasks
            .get_by_id(id)
            .await?
            .map(Json)
            .ok_or(ApiError::NotFound(requested))
    }

    #[tracing::instrument(skip(state))]
    pub async fn create(
        State(state): State<SharedState>,
        input: NewTask,
    ) -> Result<(StatusCode, Json<Task>), ApiError> {
        let task = state.tasks.create(input).await?;
        Ok((StatusCode::CREATED, Json(task)))
    }

    #[tracing::instrument(skip(state))]
    pub async fn update(
        State(state): State<SharedState>,
        TaskId { id, requested }: TaskId,
        patch: TaskPatch,
    ) -> Result<Json<Task>, ApiError> {
        state
            .tasks
            .update(id, patch)
            .await?
            .map(Json)
            .ok_or(ApiError::NotFound(requested))
    }

    #[tracing::instrument(skip(state))]
    pub async fn delete(
        State(state): State<SharedState>,
        TaskId { id, requested }: TaskId,
    ) -> Result<StatusCode, ApiError> {
        if !state.tasks.delete(id).await? {
            return Err(ApiError::NotFound(requested));
        }
        Ok(StatusCode::NO_CONTENT)
    }
}
