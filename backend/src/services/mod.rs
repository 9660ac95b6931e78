pub mod auth;
pub mod verification_code;

pub use auth::{AuthConfig, AuthService, TokenPair};
pub use verification_code::{CodePurpose, RedisCodeStore, VerificationCodeStore};
