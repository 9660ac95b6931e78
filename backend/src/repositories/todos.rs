//! Query functions for the `todos` table.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;

use crate::models::todo::{Todo, TodoListQuery};

const TODO_COLUMNS: &str = "todo_id, user_no, title, content, color, sequence, \
     due_at, completed_at, created_at, updated_at";

// Shared predicate for the list/count pair so total_count always matches the
// page contents. `all` and NULL status both mean "no completion filter".
const LIST_FILTER: &str = "user_no = $1 \
     AND ($2::text IS NULL OR $2 = 'all' \
          OR ($2 = 'complete' AND completed_at IS NOT NULL) \
          OR ($2 = 'incomplete' AND completed_at IS NULL)) \
     AND ($3::text IS NULL OR $4::text IS NULL \
          OR ($3 = 'title' AND title ILIKE '%' || $4 || '%') \
          OR ($3 = 'content' AND content ILIKE '%' || $4 || '%'))";

/// Fields required to insert a new TODO. `sequence = None` assigns the next
/// position for the user.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub todo_id: String,
    pub user_no: i32,
    pub title: String,
    pub content: Option<String>,
    pub color: Option<String>,
    pub sequence: Option<i32>,
    pub due_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Partial content update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<String>,
    pub due_at: Option<NaiveDate>,
}

pub async fn find(pool: &PgPool, todo_id: &str) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(&format!(
        "SELECT {} FROM todos WHERE todo_id = $1",
        TODO_COLUMNS
    ))
    .bind(todo_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_page_by_user(
    pool: &PgPool,
    user_no: i32,
    query: &TodoListQuery,
) -> Result<Vec<Todo>, sqlx::Error> {
    let offset = (query.page - 1) * query.size;
    sqlx::query_as::<_, Todo>(&format!(
        "SELECT {} FROM todos WHERE {} ORDER BY sequence ASC LIMIT $5 OFFSET $6",
        TODO_COLUMNS, LIST_FILTER
    ))
    .bind(user_no)
    .bind(&query.status)
    .bind(&query.search_type)
    .bind(&query.keyword)
    .bind(query.size)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_by_user(
    pool: &PgPool,
    user_no: i32,
    query: &TodoListQuery,
) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as(&format!("SELECT COUNT(*) FROM todos WHERE {}", LIST_FILTER))
            .bind(user_no)
            .bind(&query.status)
            .bind(&query.search_type)
            .bind(&query.keyword)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

pub async fn count_all_by_user(pool: &PgPool, user_no: i32) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos WHERE user_no = $1")
        .bind(user_no)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_completed_by_user(pool: &PgPool, user_no: i32) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM todos WHERE user_no = $1 AND completed_at IS NOT NULL",
    )
    .bind(user_no)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn count_today_completed_by_user(
    pool: &PgPool,
    user_no: i32,
) -> Result<i64, sqlx::Error> {
    let start_of_day = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    let end_of_day = start_of_day + Duration::days(1);

    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM todos WHERE user_no = $1 \
         AND completed_at >= $2 AND completed_at < $3",
    )
    .bind(user_no)
    .bind(start_of_day)
    .bind(end_of_day)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn insert(pool: &PgPool, todo: NewTodo) -> Result<String, sqlx::Error> {
    let (todo_id,): (String,) = sqlx::query_as(
        "INSERT INTO todos (todo_id, user_no, title, content, color, sequence, due_at, created_at) \
         VALUES ($1, $2, $3, $4, $5, \
                 COALESCE($6, (SELECT COALESCE(MAX(sequence), 0) + 1 FROM todos WHERE user_no = $2)), \
                 $7, $8) \
         RETURNING todo_id",
    )
    .bind(&todo.todo_id)
    .bind(todo.user_no)
    .bind(&todo.title)
    .bind(&todo.content)
    .bind(&todo.color)
    .bind(todo.sequence)
    .bind(todo.due_at)
    .bind(todo.created_at)
    .fetch_one(pool)
    .await?;

    Ok(todo_id)
}

pub async fn update(
    pool: &PgPool,
    todo_id: &str,
    changes: TodoChanges,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE todos SET \
             title = COALESCE($2, title), \
             content = COALESCE($3, content), \
             color = COALESCE($4, color), \
             due_at = COALESCE($5, due_at), \
             updated_at = $6 \
         WHERE todo_id = $1",
    )
    .bind(todo_id)
    .bind(&changes.title)
    .bind(&changes.content)
    .bind(&changes.color)
    .bind(changes.due_at)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn update_sequence(
    pool: &PgPool,
    todo_id: &str,
    sequence: i32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE todos SET sequence = $2, updated_at = $3 WHERE todo_id = $1")
        .bind(todo_id)
        .bind(sequence)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn update_completed_at(
    pool: &PgPool,
    todo_id: &str,
    completed_at: Option<DateTime<Utc>>,
) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("UPDATE todos SET completed_at = $2, updated_at = $3 WHERE todo_id = $1")
            .bind(todo_id)
            .bind(completed_at)
            .bind(Utc::now())
            .execute(pool)
            .await?;

    Ok(result.rows_affected())
}

pub async fn delete(pool: &PgPool, todo_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todos WHERE todo_id = $1")
        .bind(todo_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
