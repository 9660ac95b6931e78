pub mod todos;
pub mod tokens;
pub mod users;

pub use tokens::{PgTokenStore, TokenStore};
pub use users::{PgUserDirectory, UserDirectory};
