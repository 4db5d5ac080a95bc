//! Extractors that run the validators before any handler body executes.
//!
//! Axum runs extractors in argument order, so a handler taking
//! `(State, TaskId, TaskPatch)` checks the path id before the body, and
//! neither check touches the store.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    app_state::SharedState,
    create_task_request::NewTask,
    task_list_query::{RawTaskQuery, TaskFilter},
    update_task_request::TaskPatch,
    validation::{validate_new_task, validate_task_id, validate_task_patch, validate_task_query},
    web_api::api_error::ApiError,
};

/// A path `:id` in canonical UUID form, plus the text the client sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskId {
    pub id: Uuid,
    pub requested: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for TaskId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(requested) = Path::<String>::from_request_parts(parts, state).await?;
        let id = validate_task_id(&requested)?;
        Ok(TaskId { id, requested })
    }
}

#[async_trait]
impl FromRequestParts<SharedState> for TaskFilter {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawTaskQuery>::from_request_parts(parts, state).await?;
        Ok(validate_task_query(&raw, state.default_page_size, state.max_page_size)?)
    }
}

#[async_trait]
impl<S> FromRequest<S> for NewTask
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await?;
        Ok(validate_new_task(&body)?)
    }
}

#[async_trait]
impl<S> FromRequest<S> for TaskPatch
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await?;
        Ok(validate_task_patch(&body)?)
    }
}
