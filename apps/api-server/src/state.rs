//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::PostRepository;
use blog_infra::{DatabaseConfig, InMemoryPostRepository};

#[cfg(feature = "postgres")]
use blog_infra::{DatabaseConnections, PostgresPostRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let connected = match db_config {
            Some(config) => Self::connect(config).await,
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                None
            }
        };

        #[cfg(not(feature = "postgres"))]
        let connected: Option<Self> = {
            if db_config.is_some() {
                tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
            }
            None
        };

        connected.unwrap_or_else(|| {
            tracing::info!("Application state initialized (in-memory)");
            Self::in_memory()
        })
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &DatabaseConfig) -> Option<Self> {
        match DatabaseConnections::init(config).await {
            Ok(connections) => {
                let conn = Arc::new(connections);
                tracing::info!("Application state initialized (postgres)");
                Some(Self {
                    posts: Arc::new(PostgresPostRepository::new(conn.main.clone())),
                    db: Some(conn),
                })
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                None
            }
        }
    }

    /// State backed by a fresh in-memory repository.
    pub fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// Name of the active storage backend.
    pub fn storage(&self) -> &'static str {
        #[cfg(feature = "postgres")]
        let connected = self.db.is_some();
        #[cfg(not(feature = "postgres"))]
        let connected = false;

        if connected { "postgres" } else { "memory" }
    }
}
