use axum::{
    extract::{Extension, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    error::AppError,
    models::token::RefreshTokenDetailResponse,
    models::user::{AccessTokenResponse, User},
    state::AppState,
    utils::cookies,
};

pub async fn get_tokens(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<RefreshTokenDetailResponse>>, AppError> {
    let list = state.auth.get_tokens(user.user_no).await?;
    Ok(Json(list))
}

/// Renews the access token using the refresh-token cookie. Public: the old
/// access token may already be expired when this is called.
pub async fn refresh_access_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AccessTokenResponse>, AppError> {
    let refresh_token = refresh_token_from_cookie(&headers, &state.config.refresh_cookie_name)
        .ok_or_else(|| AppError::BadRequest("Invalid token".to_string()))?;

    let access_token = state.auth.refresh_access_token(&refresh_token).await?;
    Ok(Json(AccessTokenResponse {
        access_token,
        refresh_token: None,
    }))
}

pub async fn delete_token(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(refresh_token): Path<String>,
) -> Result<StatusCode, AppError> {
    state.auth.delete_token(user.user_no, &refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes the session named by the refresh-token cookie and clears it.
pub async fn delete_current_token(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let refresh_token = refresh_token_from_cookie(&headers, &state.config.refresh_cookie_name)
        .ok_or_else(|| AppError::BadRequest("Invalid token".to_string()))?;

    state.auth.delete_token(user.user_no, &refresh_token).await?;

    let clear_cookie = cookies::build_clear_refresh_cookie(&state.config.refresh_cookie_name);
    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_cookie)],
    ))
}

fn refresh_token_from_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| cookies::extract_cookie_value(raw, cookie_name))
        .filter(|value| !value.is_empty())
}
