//! One-time email verification codes, held in Redis under purpose-prefixed
//! keys with a TTL. At most one live code exists per (purpose, email); a new
//! send overwrites the previous entry.

use crate::db::redis::RedisPool;
use async_trait::async_trait;
use bb8_redis::redis::AsyncCommands;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePurpose {
    Signup,
    ResetPassword,
}

impl CodePurpose {
    fn prefix(&self) -> &'static str {
        match self {
            CodePurpose::Signup => "signup:",
            CodePurpose::ResetPassword => "resetPassword:",
        }
    }

    pub fn key(&self, email: &str) -> String {
        format!("{}{}", self.prefix(), email)
    }
}

/// Generates a uniformly random 6-digit code, zero-padded.
pub fn generate_code() -> String {
    let number: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", number)
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationCodeStore: Send + Sync {
    /// Stores `code` under the purpose key, unconditionally overwriting any
    /// previous entry, with the purpose's TTL.
    async fn save(&self, purpose: CodePurpose, email: &str, code: &str) -> anyhow::Result<()>;

    /// True iff a live entry exists and matches exactly. A missing or
    /// mismatched entry is `Ok(false)`, never an error.
    async fn verify(&self, purpose: CodePurpose, email: &str, code: &str)
        -> anyhow::Result<bool>;

    /// Removes the entry; idempotent.
    async fn delete(&self, purpose: CodePurpose, email: &str) -> anyhow::Result<()>;
}

pub struct RedisCodeStore {
    pool: RedisPool,
    signup_ttl_seconds: u64,
    reset_password_ttl_seconds: u64,
}

impl RedisCodeStore {
    pub fn new(pool: RedisPool, signup_ttl_seconds: u64, reset_password_ttl_seconds: u64) -> Self {
        Self {
            pool,
            signup_ttl_seconds,
            reset_password_ttl_seconds,
        }
    }

    fn ttl(&self, purpose: CodePurpose) -> u64 {
        match purpose {
            CodePurpose::Signup => self.signup_ttl_seconds,
            CodePurpose::ResetPassword => self.reset_password_ttl_seconds,
        }
    }
}

#[async_trait]
impl VerificationCodeStore for RedisCodeStore {
    async fn save(&self, purpose: CodePurpose, email: &str, code: &str) -> anyhow::Result<()> {
        let span = tracing::debug_span!("redis_save_code", ?purpose, email);
        let _enter = span.enter();

        let mut conn = self.pool.get().await?;
        conn.set_ex::<_, _, ()>(purpose.key(email), code, self.ttl(purpose))
            .await?;
        Ok(())
    }

    async fn verify(
        &self,
        purpose: CodePurpose,
        email: &str,
        code: &str,
    ) -> anyhow::Result<bool> {
        let span = tracing::debug_span!("redis_verify_code", ?purpose, email);
        let _enter = span.enter();

        let mut conn = self.pool.get().await?;
        let stored: Option<String> = conn.get(purpose.key(email)).await?;
        Ok(stored.as_deref() == Some(code))
    }

    async fn delete(&self, purpose: CodePurpose, email: &str) -> anyhow::Result<()> {
        let span = tracing::debug_span!("redis_delete_code", ?purpose, email);
        let _enter = span.enter();

        let mut conn = self.pool.get().await?;
        conn.del::<_, ()>(purpose.key(email)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_prefixed_per_purpose() {
        assert_eq!(
            CodePurpose::Signup.key("a@example.com"),
            "signup:a@example.com"
        );
        assert_eq!(
            CodePurpose::ResetPassword.key("a@example.com"),
            "resetPassword:a@example.com"
        );
    }

    #[test]
    fn generated_codes_are_six_zero_padded_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
