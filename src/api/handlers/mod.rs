pub mod system;

pub use system::*;

use crate::auth::service::AuthService;
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
}
