use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{
        AccessTokenResponse, CodeVerifyRequest, EmailExistResponse, EmailRequest, LoginRequest,
        ResetPasswordRequest, SignupRequest,
    },
    state::AppState,
    utils::{client_os, cookies},
};

pub async fn check_email_exists(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> Result<Json<EmailExistResponse>, AppError> {
    payload.validate()?;

    let exists = state.auth.exists_by_email(&payload.email).await?;
    Ok(Json(EmailExistResponse { exists }))
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let client_os = client_os::detect(&headers);
    let pair = state
        .auth
        .login(&payload.email, &payload.password, &client_os)
        .await?;

    let cookie = cookies::build_refresh_cookie(
        &state.config.refresh_cookie_name,
        &pair.refresh_token,
        state.config.refresh_token_minutes,
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(AccessTokenResponse {
            access_token: pair.access_token,
            refresh_token: Some(pair.refresh_token),
        }),
    ))
}

pub async fn send_signup_code(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    state.auth.send_signup_code(&payload.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn verify_signup_code(
    State(state): State<AppState>,
    Json(payload): Json<CodeVerifyRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    state
        .auth
        .verify_signup_code(&payload.email, &payload.code)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    state
        .auth
        .signup(
            &payload.email,
            &payload.password,
            &payload.user_name,
            &payload.code,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn send_reset_password_code(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    state.auth.send_reset_password_code(&payload.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn verify_reset_password_code(
    State(state): State<AppState>,
    Json(payload): Json<CodeVerifyRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    state
        .auth
        .verify_reset_password_code(&payload.email, &payload.code)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    state
        .auth
        .reset_password(&payload.email, &payload.password, &payload.code)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
