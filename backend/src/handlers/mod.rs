pub mod auth;
pub mod todos;
pub mod tokens;
pub mod users;
