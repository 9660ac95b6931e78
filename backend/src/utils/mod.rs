pub mod client_os;
pub mod cookies;
pub mod email;
pub mod jwt;
pub mod password;
