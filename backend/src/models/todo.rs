//! Models for TODO items and their request/response payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::validation::rules;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Database representation of a TODO item.
pub struct Todo {
    /// UUIDv7 identifier.
    pub todo_id: String,
    pub user_no: i32,
    pub title: String,
    pub content: Option<String>,
    /// Hex color label, e.g. `#ff8800`.
    pub color: Option<String>,
    /// Per-user ordering position.
    pub sequence: i32,
    pub due_at: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
/// Query parameters for the paginated TODO list.
pub struct TodoListQuery {
    /// `all` (default), `complete`, or `incomplete`.
    #[validate(custom(function = "rules::validate_todo_status"))]
    pub status: Option<String>,
    /// `title` or `content`; only meaningful together with `keyword`.
    #[validate(custom(function = "rules::validate_search_type"))]
    pub search_type: Option<String>,
    #[validate(length(max = 100))]
    pub keyword: Option<String>,
    /// 1-based page number.
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: i64,
    #[serde(default = "default_size")]
    #[validate(range(min = 10, max = 50))]
    pub size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

#[derive(Debug, Deserialize, Validate)]
pub struct TodoCreateRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub content: Option<String>,
    #[validate(custom(function = "rules::validate_hex_color"))]
    pub color: Option<String>,
    pub due_at: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TodoUpdateRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub content: Option<String>,
    #[validate(custom(function = "rules::validate_hex_color"))]
    pub color: Option<String>,
    pub due_at: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
/// Partial update: reorder and/or toggle completion.
pub struct TodoPatchRequest {
    #[validate(range(min = 0))]
    pub sequence: Option<i32>,
    pub completed: Option<bool>,
}

impl TodoPatchRequest {
    pub fn is_empty(&self) -> bool {
        self.sequence.is_none() && self.completed.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct TodoDetailResponse {
    pub todo_id: String,
    pub title: String,
    pub content: Option<String>,
    pub color: Option<String>,
    pub sequence: i32,
    pub due_at: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Todo> for TodoDetailResponse {
    fn from(todo: Todo) -> Self {
        TodoDetailResponse {
            todo_id: todo.todo_id,
            title: todo.title,
            content: todo.content,
            color: todo.color,
            sequence: todo.sequence,
            due_at: todo.due_at,
            completed_at: todo.completed_at,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub page: i64,
    pub size: i64,
    pub total_count: i64,
    pub list: Vec<TodoDetailResponse>,
}

#[derive(Debug, Serialize)]
pub struct TodoCreateResponse {
    pub todo_id: String,
}

#[derive(Debug, Serialize)]
pub struct TodoStatisticsResponse {
    pub total_count: i64,
    pub completed_count: i64,
    pub today_completed_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_query() -> TodoListQuery {
        TodoListQuery {
            status: None,
            search_type: None,
            keyword: None,
            page: 1,
            size: 10,
        }
    }

    #[test]
    fn list_query_accepts_defaults() {
        assert!(base_query().validate().is_ok());
    }

    #[test]
    fn list_query_rejects_unknown_status() {
        let query = TodoListQuery {
            status: Some("done".into()),
            ..base_query()
        };
        assert!(query.validate().is_err());

        let query = TodoListQuery {
            status: Some("incomplete".into()),
            ..base_query()
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn list_query_bounds_page_and_size() {
        let query = TodoListQuery {
            page: 0,
            ..base_query()
        };
        assert!(query.validate().is_err());

        let query = TodoListQuery {
            size: 51,
            ..base_query()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn patch_request_reports_emptiness() {
        let patch = TodoPatchRequest {
            sequence: None,
            completed: None,
        };
        assert!(patch.is_empty());

        let patch = TodoPatchRequest {
            sequence: Some(3),
            completed: None,
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn create_request_rejects_bad_color() {
        let request = TodoCreateRequest {
            title: "Buy milk".into(),
            content: None,
            color: Some("red".into()),
            due_at: None,
        };
        assert!(request.validate().is_err());

        let request = TodoCreateRequest {
            title: "Buy milk".into(),
            content: None,
            color: Some("#ff8800".into()),
            due_at: None,
        };
        assert!(request.validate().is_ok());
    }
}
