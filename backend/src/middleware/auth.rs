use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, state::AppState, utils::jwt::verify_access_token};

/// Bearer-token authentication for protected routes.
///
/// Verifies the access token, loads the (non-deleted) user it names, and
/// injects both `Claims` and `User` extensions for downstream handlers.
pub async fn auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = auth_header
        .and_then(parse_bearer_token)
        .ok_or_else(|| AppError::Unauthorized("Missing access token".to_string()))?;

    let claims = verify_access_token(token, &state.config.jwt_secret).map_err(|err| {
        tracing::debug!(?err, "access token rejected");
        AppError::Unauthorized("Invalid or expired access token".to_string())
    })?;

    let user = state
        .users
        .find(claims.user_no)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired access token".to_string()))?;

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

fn parse_bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(rest.trim_start())
    } else {
        None
    }
}
