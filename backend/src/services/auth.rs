//! Authentication and token-lifecycle orchestration.
//!
//! Composes the user directory, the refresh-token store, the verification
//! code store, and the email dispatcher into the login / signup /
//! reset-password / token-renewal flows. Every operation returns a success
//! value or exactly one typed error; nothing partially succeeds.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::error::AppError;
use crate::models::token::{NewRefreshToken, RefreshTokenDetailResponse};
use crate::models::user::{NewUser, UserRole, UserUpdate};
use crate::repositories::{TokenStore, UserDirectory};
use crate::services::verification_code::{generate_code, CodePurpose, VerificationCodeStore};
use crate::utils::email::{verification_code_body, EmailDispatcher};
use crate::utils::jwt::{create_access_token, generate_refresh_token};
use crate::utils::password::{hash_password, verify_password};

pub const SIGNUP_CODE_SUBJECT: &str = "Taskbook signup verification";
pub const RESET_CODE_SUBJECT: &str = "Taskbook password reset verification";

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Immutable auth settings, injected once at construction.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_minutes: i64,
    pub reissue_threshold_minutes: i64,
    pub signup_code_ttl_seconds: u64,
    pub reset_password_code_ttl_seconds: u64,
}

/// Both tokens returned by a successful login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserDirectory>,
    tokens: Arc<dyn TokenStore>,
    codes: Arc<dyn VerificationCodeStore>,
    mailer: Arc<dyn EmailDispatcher>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        tokens: Arc<dyn TokenStore>,
        codes: Arc<dyn VerificationCodeStore>,
        mailer: Arc<dyn EmailDispatcher>,
        config: AuthConfig,
    ) -> Self {
        Self {
            users,
            tokens,
            codes,
            mailer,
            config,
        }
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.users.find_by_email(email).await?.is_some())
    }

    /// Verifies credentials and opens a new session.
    ///
    /// Unknown email and wrong password produce the same `Unauthorized`
    /// message so the endpoint cannot be used to enumerate accounts.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client_os: &str,
    ) -> Result<TokenPair, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(password, &user.password)? {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let access_token = create_access_token(
            user.user_no,
            &user.email,
            user.role.as_str(),
            &self.config.jwt_secret,
            self.config.access_token_minutes,
        )?;
        let refresh_token = generate_refresh_token();

        let now = Utc::now();
        self.tokens
            .insert(NewRefreshToken {
                user_no: user.user_no,
                refresh_token: refresh_token.clone(),
                client_os: client_os.to_string(),
                access_token_expires_at: now + Duration::minutes(self.config.access_token_minutes),
                refresh_token_expires_at: now
                    + Duration::minutes(self.config.refresh_token_minutes),
                created_at: now,
            })
            .await
            .map_err(|err| {
                tracing::error!(?err, "failed to persist refresh token");
                AppError::InternalServerError(anyhow::anyhow!("token creation failed"))
            })?;

        tracing::info!(user_no = user.user_no, client_os, "user logged in");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    pub async fn send_signup_code(&self, email: &str) -> Result<(), AppError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("Email is already in use".to_string()));
        }

        let code = generate_code();

        // Store only after confirmed dispatch so a failed send never leaves
        // a live code the user could not have received.
        self.mailer
            .send(
                email,
                SIGNUP_CODE_SUBJECT,
                &verification_code_body(&code, self.config.signup_code_ttl_seconds / 60),
            )
            .await
            .map_err(|err| {
                tracing::error!(?err, "failed to send signup code email");
                AppError::InternalServerError(anyhow::anyhow!("email dispatch failed"))
            })?;

        self.codes.save(CodePurpose::Signup, email, &code).await?;
        Ok(())
    }

    /// Advisory check only; the authoritative check happens again in
    /// [`AuthService::signup`], which is where the code is consumed.
    pub async fn verify_signup_code(&self, email: &str, code: &str) -> Result<(), AppError> {
        if !self.codes.verify(CodePurpose::Signup, email, code).await? {
            return Err(AppError::BadRequest(
                "Invalid verification code".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        user_name: &str,
        code: &str,
    ) -> Result<(), AppError> {
        // Re-checked here: the advisory verify endpoint does not reserve the
        // email, so it may have been taken in between.
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("Email is already in use".to_string()));
        }

        if !self.codes.verify(CodePurpose::Signup, email, code).await? {
            return Err(AppError::BadRequest(
                "Invalid verification code".to_string(),
            ));
        }

        // One-time use is enforced at the point of consumption.
        self.codes.delete(CodePurpose::Signup, email).await?;

        let password_hash = hash_password(password)?;
        self.users
            .insert(NewUser {
                email: email.to_string(),
                password: password_hash,
                user_name: user_name.to_string(),
                role: UserRole::User,
                created_at: Utc::now(),
            })
            .await
            .map_err(|err| {
                tracing::error!(?err, "failed to insert user");
                AppError::InternalServerError(anyhow::anyhow!("signup failed"))
            })?;

        tracing::info!(email, "user signed up");
        Ok(())
    }

    pub async fn send_reset_password_code(&self, email: &str) -> Result<(), AppError> {
        if self.users.find_by_email(email).await?.is_none() {
            return Err(AppError::NotFound(
                "No account with this email".to_string(),
            ));
        }

        let code = generate_code();

        self.mailer
            .send(
                email,
                RESET_CODE_SUBJECT,
                &verification_code_body(&code, self.config.reset_password_code_ttl_seconds / 60),
            )
            .await
            .map_err(|err| {
                tracing::error!(?err, "failed to send reset-password code email");
                AppError::InternalServerError(anyhow::anyhow!("email dispatch failed"))
            })?;

        self.codes
            .save(CodePurpose::ResetPassword, email, &code)
            .await?;
        Ok(())
    }

    pub async fn verify_reset_password_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<(), AppError> {
        if !self
            .codes
            .verify(CodePurpose::ResetPassword, email, code)
            .await?
        {
            return Err(AppError::BadRequest(
                "Invalid verification code".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
        code: &str,
    ) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("No account with this email".to_string()))?;

        if !self
            .codes
            .verify(CodePurpose::ResetPassword, email, code)
            .await?
        {
            return Err(AppError::BadRequest(
                "Invalid verification code".to_string(),
            ));
        }

        self.codes.delete(CodePurpose::ResetPassword, email).await?;

        let password_hash = hash_password(new_password)?;
        let affected = self
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
                "password reset failed"
            )));
        }

        tracing::info!(user_no = user.user_no, "password reset");
        Ok(())
    }

    /// Lists all stored sessions of a user, newest first. Expired records
    /// remain listed until explicitly deleted; no cleanup happens here.
    pub async fn get_tokens(
        &self,
        user_no: i32,
    ) -> Result<Vec<RefreshTokenDetailResponse>, AppError> {
        let records = self.tokens.list_by_user_no(user_no).await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Renews the access token of one session.
    ///
    /// Renewal is refused (`Conflict`) while the current access token is
    /// still more than the reissue threshold away from expiring, and refused
    /// (`BadRequest`) once the refresh token itself has expired — in that
    /// case the record is left in place for the caller to delete.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AppError> {
        let record = self
            .tokens
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid token".to_string()))?;

        let user = self
            .users
            .find(record.user_no)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let now = Utc::now();

        if now
            < record.access_token_expires_at
                - Duration::minutes(self.config.reissue_threshold_minutes)
        {
            return Err(AppError::Conflict(
                "Not yet eligible to renew".to_string(),
            ));
        }

        if now > record.refresh_token_expires_at {
            return Err(AppError::BadRequest("Session expired".to_string()));
        }

        let affected = self
            .tokens
            .update_access_expires_at(
                record.token_no,
                now + Duration::minutes(self.config.access_token_minutes),
            )
            .await?;
        if affected == 0 {
            return Err(AppError::InternalServerError(anyhow::anyhow!(
                "token renewal failed"
            )));
        }

        // Claims come from the re-fetched user so renewals always reflect the
        // current email and role.
        let access_token = create_access_token(
            user.user_no,
            &user.email,
            user.role.as_str(),
            &self.config.jwt_secret,
            self.config.access_token_minutes,
        )?;

        Ok(access_token)
    }

    /// Deletes one session; only its owner may do so.
    pub async fn delete_token(&self, user_no: i32, refresh_token: &str) -> Result<(), AppError> {
        let record = self
            .tokens
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or_else(|| AppError::NotFound("Token not found".to_string()))?;

        if record.user_no != user_no {
            return Err(AppError::Forbidden(
                "Not allowed to delete this token".to_string(),
            ));
        }

        let affected = self.tokens.delete_by_refresh_token(refresh_token).await?;
        if affected == 0 {
            return Err(AppError::InternalServerError(anyhow::anyhow!(
                "token deletion failed"
            )));
        }

        Ok(())
    }
}
