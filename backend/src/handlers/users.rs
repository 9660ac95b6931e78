use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{User, UserChangePasswordRequest, UserDetailResponse, UserPatchRequest, UserUpdate},
    state::AppState,
    utils::password::{hash_password, verify_password},
};

pub async fn get_user_detail(
    Extension(user): Extension<User>,
) -> Result<Json<UserDetailResponse>, AppError> {
    Ok(Json(UserDetailResponse::from(&user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<UserPatchRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    let affected = state
        .users
        .update(
            user.user_no,
            UserUpdate {
                user_name: Some(payload.user_name),
                ..Default::default()
            },
        )
        .await?;
    if affected == 0 {
        return Err(AppError::InternalServerError(anyhow::anyhow!(
            "user update failed"
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<UserChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.new_password)?;
    let affected = state
        .users
        .update(
            user.user_no,
            UserUpdate {
                password: Some(password_hash),
                ..Default::default()
            },
        )
        .await?;
    if affected == 0 {
        return Err(AppError::InternalServerError(anyhow::anyhow!(
            "password change failed"
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}
