//! Server assembly: shared state and startup.

use std::sync::Arc;

use crate::auth::AuthKeys;
use crate::config::ServerConfig;
use crate::directory::UserDirectory;
use crate::engine::TaskEngine;
use crate::leaves::LeaveService;
use crate::notify::Notifier;
use crate::projects::ProjectService;
use crate::registry::ConnectionRegistry;
use crate::routes;
use crate::store::TaskStore;
use crate::teams::TeamService;

/// Shared application state handed to every handler.
///
/// Holds only what handlers reach for; the task store and the fan-out are
/// owned by the engine and services built over them.
pub struct AppState {
    /// Token verification keys.
    pub auth: AuthKeys,
    /// User directory.
    pub directory: Arc<UserDirectory>,
    /// Task lifecycle engine.
    pub engine: TaskEngine,
    /// Live connection registry.
    pub registry: Arc<ConnectionRegistry>,
    /// Leave request workflow.
    pub leaves: LeaveService,
    /// Team catalog.
    pub teams: Arc<TeamService>,
    /// Project catalog.
    pub projects: ProjectService,
}

impl AppState {
    /// Builds fresh state from a resolved configuration.
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        let directory = Arc::new(UserDirectory::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let notifier = Notifier::new(Arc::clone(&registry));
        let engine = TaskEngine::new(
            Arc::new(TaskStore::new()),
            Arc::clone(&directory),
            notifier.clone(),
        );
        let leaves = LeaveService::new(notifier);
        let teams = Arc::new(TeamService::new(Arc::clone(&directory)));
        let projects = ProjectService::new(Arc::clone(&teams));
        Self {
            auth: AuthKeys::from_secret(&config.token_secret),
            directory,
            engine,
            registry,
            leaves,
            teams,
            projects,
        }
    }
}

/// Starts the server on the given address and returns the bound address and
/// a join handle.
///
/// This is the primary entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
    config: &ServerConfig,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(AppState::new(config))).await
}

/// Starts the server with pre-built [`AppState`].
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<AppState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "server error");
        }
    });

    Ok((bound_addr, handle))
}

/// Starts the server in-process for testing.
///
/// Binds to `127.0.0.1:0` (OS-assigned port) and returns the bound address,
/// the shared state for direct seeding, and a join handle for cleanup.
#[cfg(test)]
pub async fn start_test_server() -> (
    std::net::SocketAddr,
    Arc<AppState>,
    tokio::task::JoinHandle<()>,
) {
    let state = Arc::new(AppState::new(&crate::config::ServerConfig::default()));
    let (addr, handle) = start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .expect("failed to start test server");
    (addr, state, handle)
}
