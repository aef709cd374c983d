//! Application state shared by all handlers.

use crate::auth::token::TokenSigner;
use crate::db::DbPool;

/// Application state passed to all handlers.
///
/// Built once in `main` (or a test) and handed to the router; there is no
/// global connection.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub tokens: TokenSigner,
    /// Mark the session cookie `Secure` (disable for plain-http development)
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(db: DbPool, tokens: TokenSigner, secure_cookies: bool) -> Self {
        Self {
            db,
            tokens,
            secure_cookies,
        }
    }
}
