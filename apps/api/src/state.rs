use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::token::TokenIssuer;
use crate::config::Config;
use crate::matches::scorer::MatchScorer;
use crate::uploads::UploadStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    pub tokens: TokenIssuer,
    pub uploads: UploadStore,
    /// Pluggable match scorer. Default: RandomMatchScorer.
    pub match_scorer: Arc<dyn MatchScorer>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config, match_scorer: Arc<dyn MatchScorer>) -> Self {
        let tokens = TokenIssuer::new(
            &config.jwt_secret,
            chrono::Duration::hours(config.token_ttl_hours),
        );
        let uploads = UploadStore::new(config.upload_dir.clone());
        Self {
            db,
            config,
            tokens,
            uploads,
            match_scorer,
        }
    }
}
