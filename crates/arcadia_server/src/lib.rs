use arcadia_core::traits::{CoverStorage, GameStore};
use axum::extract::DefaultBodyLimit;
use axum::middleware::map_response;
use axum::{Router, routing::get};
use std::path::PathBuf;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

mod api;

pub mod cors;
pub mod state;

pub use api::ApiError;
use state::AppState;

/// Covers arrive base64-encoded inside the JSON body, so allow more than axum's 2 MiB.
const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// The builder for the catalog server.
#[derive(Clone, Debug, Default)]
pub struct CatalogServer {
    config: CatalogServerConfig,
}

impl CatalogServer {
    pub fn new(config: CatalogServerConfig) -> Self {
        Self { config }
    }
}

#[derive(Clone, Debug)]
pub struct CatalogServerConfig {
    /// Path of the catalog endpoint.
    ///
    /// Defaults to `/`.
    pub route: String,
    /// Delete an uploaded cover again if inserting its row fails.
    ///
    /// Defaults to `false`, which leaves the object orphaned.
    pub cleanup_orphaned_covers: bool,
    /// Defaults to 16 MiB.
    pub max_body_bytes: usize,
    /// Serve a local directory of covers, for file system cover storage.
    ///
    /// Defaults to `None`.
    pub files: Option<FileMount>,
}

/// A directory served read-only under `route`, e.g. `/files`.
#[derive(Clone, Debug)]
pub struct FileMount {
    pub route: String,
    pub root: PathBuf,
}

impl FileMount {
    pub fn new(route: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            route: route.into(),
            root: root.into(),
        }
    }
}

impl Default for CatalogServerConfig {
    fn default() -> Self {
        Self {
            route: "/".to_string(),
            cleanup_orphaned_covers: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            files: None,
        }
    }
}

impl CatalogServer {
    pub fn build<G: GameStore, C: CoverStorage>(self, games: G, covers: C) -> Router {
        let CatalogServerConfig {
            route,
            cleanup_orphaned_covers,
            max_body_bytes,
            files,
        } = self.config;
        let state = AppState {
            games,
            covers,
            cleanup_orphaned_covers,
        };

        let catalog = get(api::list_games::<G, C>)
            .post(api::create_game::<G, C>)
            .delete(api::delete_game::<G, C>)
            .options(api::preflight)
            .head(api::method_not_allowed)
            .fallback(api::method_not_allowed);

        let mut router: Router<AppState<G, C>> = Router::new()
            .route("/health", get(|| async { "OK" }))
            .route(route.as_str(), catalog);

        if let Some(FileMount { route, root }) = files {
            router = router.nest_service(route.as_str(), ServeDir::new(root));
        }

        router
            .layer(DefaultBodyLimit::max(max_body_bytes))
            .layer(map_response(cors::add_cors_headers))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

pub mod prelude {
    pub use crate::state::*;
    pub use crate::{CatalogServer, CatalogServerConfig, FileMount};
}
