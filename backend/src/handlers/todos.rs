use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::todo::{
        Todo, TodoCreateRequest, TodoCreateResponse, TodoDetailResponse, TodoListQuery,
        TodoListResponse, TodoPatchRequest, TodoStatisticsResponse, TodoUpdateRequest,
    },
    models::user::User,
    repositories::todos,
    state::AppState,
};

pub async fn get_todos(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<TodoListQuery>,
) -> Result<Json<TodoListResponse>, AppError> {
    query.validate()?;

    let items = todos::find_page_by_user(&state.pool, user.user_no, &query).await?;
    let total_count = todos::count_by_user(&state.pool, user.user_no, &query).await?;

    Ok(Json(TodoListResponse {
        page: query.page,
        size: query.size,
        total_count,
        list: items.into_iter().map(Into::into).collect(),
    }))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(todo_id): Path<String>,
) -> Result<Json<TodoDetailResponse>, AppError> {
    let todo = find_owned_todo(&state, &todo_id, user.user_no).await?;
    Ok(Json(todo.into()))
}

pub async fn create_todo(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<TodoCreateRequest>,
) -> Result<Json<TodoCreateResponse>, AppError> {
    payload.validate()?;

    let todo_id = todos::insert(
        &state.pool,
        todos::NewTodo {
            todo_id: Uuid::now_v7().to_string(),
            user_no: user.user_no,
            title: payload.title,
            content: payload.content,
            color: payload.color,
            sequence: None,
            due_at: payload.due_at,
            created_at: Utc::now(),
        },
    )
    .await?;

    tracing::info!(user_no = user.user_no, %todo_id, "todo created");
    Ok(Json(TodoCreateResponse { todo_id }))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(todo_id): Path<String>,
    Json(payload): Json<TodoUpdateRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    find_owned_todo(&state, &todo_id, user.user_no).await?;

    let affected = todos::update(
        &state.pool,
        &todo_id,
        todos::TodoChanges {
            title: Some(payload.title),
            content: payload.content,
            color: payload.color,
            due_at: payload.due_at,
        },
    )
    .await?;
    if affected == 0 {
        return Err(AppError::InternalServerError(anyhow::anyhow!(
            "todo update failed"
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn patch_todo(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(todo_id): Path<String>,
    Json(payload): Json<TodoPatchRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    if payload.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }
    find_owned_todo(&state, &todo_id, user.user_no).await?;

    let mut affected = 0;
    if let Some(sequence) = payload.sequence {
        affected += todos::update_sequence(&state.pool, &todo_id, sequence).await?;
    }
    if let Some(completed) = payload.completed {
        let completed_at = completed.then(Utc::now);
        affected += todos::update_completed_at(&state.pool, &todo_id, completed_at).await?;
    }
    if affected == 0 {
        return Err(AppError::InternalServerError(anyhow::anyhow!(
            "todo patch failed"
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(todo_id): Path<String>,
) -> Result<StatusCode, AppError> {
    find_owned_todo(&state, &todo_id, user.user_no).await?;

    let affected = todos::delete(&state.pool, &todo_id).await?;
    if affected == 0 {
        return Err(AppError::InternalServerError(anyhow::anyhow!(
            "todo deletion failed"
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_todo_statistics(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<TodoStatisticsResponse>, AppError> {
    let total_count = todos::count_all_by_user(&state.pool, user.user_no).await?;
    let completed_count = todos::count_completed_by_user(&state.pool, user.user_no).await?;
    let today_completed_count =
        todos::count_today_completed_by_user(&state.pool, user.user_no).await?;

    Ok(Json(TodoStatisticsResponse {
        total_count,
        completed_count,
        today_completed_count,
    }))
}

async fn find_owned_todo(
    state: &AppState,
    todo_id: &str,
    user_no: i32,
) -> Result<Todo, AppError> {
    let todo = todos::find(&state.pool, todo_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Todo not found".to_string()))?;

    if todo.user_no != user_no {
        return Err(AppError::Forbidden(
            "Not allowed to access this todo".to_string(),
        ));
    }

    Ok(todo)
}
