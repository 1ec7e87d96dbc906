use std::sync::Arc;

use crate::analysis::matcher::SkillMatcher;
use crate::config::Config;
use crate::users::store::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable user persistence. Default: SqliteUserStore.
    pub users: Arc<dyn UserStore>,
    /// Skill catalog compiled once at startup.
    pub matcher: Arc<SkillMatcher>,
}
