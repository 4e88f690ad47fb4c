use std::sync::Arc;
use tracing::info;

use crate::{
    config::Config,
    error::AppResult,
    infrastructure::{
        memory_store::MemoryDocumentStore,
        security::LocalAuthProvider,
        sqlite_database::SqliteDatabase,
        traits::{AuthProvider, DocumentStore},
    },
    services::{InfoService, NetworkingService, ProfileService},
    session::SessionStore,
    shell::Dashboard,
};

/// Composition root: every handler receives its collaborators from here
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub networking: NetworkingService,
    pub info: InfoService,
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let store: Arc<dyn DocumentStore> = if config.uses_memory_store() {
            info!("Using in-memory document store");
            Arc::new(MemoryDocumentStore::new())
        } else {
            info!("Using SQLite document store at {}", config.database.url);
            Arc::new(SqliteDatabase::connect(&config.database.url).await?)
        };
        let auth: Arc<dyn AuthProvider> = Arc::new(LocalAuthProvider::new(store.clone())?);

        Self::with_backends(config, store, auth).await
    }

    /// Wire the application over already-built backends, subscribe the
    /// session to identity changes and wait for it to finish loading.
    pub async fn with_backends(
        config: Config,
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
    ) -> AppResult<Self> {
        let profiles = ProfileService::new(store.clone(), auth.clone());
        let session = SessionStore::new(
            auth,
            profiles,
            config.auth.signup_placeholder_password.clone(),
        );
        session.initialize();
        session.wait_until_loaded().await;

        Ok(Self {
            config,
            session,
            networking: NetworkingService::new(store.clone()),
            info: InfoService::new(store),
            dashboard: Arc::new(Dashboard::new()),
        })
    }
}
