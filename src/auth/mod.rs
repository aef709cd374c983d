//! Authentication: password hashing, signed session tokens and the
//! request guard protecting project routes.

pub mod handlers;
pub mod middleware;
pub mod password;
pub mod token;

pub use handlers::*;
pub use middleware::{AuthContext, SESSION_COOKIE_NAME};
pub use token::TokenSigner;
