//! Web server for filedrop.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::{ServerConfig, StorageConfig};

use super::handlers::AppState;
use super::router::{
    create_health_router, create_openapi_router, create_router, create_static_router,
};

/// Web server for the API and static pages.
pub struct WebServer {
    /// Host to bind.
    host: String,
    /// Port to bind (0 picks a free port).
    port: u16,
    /// Application state.
    app_state: Arc<AppState>,
    /// Directory holding the static pages.
    public_dir: PathBuf,
    /// Upload request limit in bytes.
    max_upload_bytes: Option<usize>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(
        server: &ServerConfig,
        storage: &StorageConfig,
        app_state: AppState,
        public_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            host: server.host.clone(),
            port: server.port,
            app_state: Arc::new(app_state),
            public_dir: public_dir.into(),
            max_upload_bytes: storage.max_upload_bytes(),
        }
    }

    /// Build the complete router.
    fn router(&self) -> Router {
        create_router(self.app_state.clone(), self.max_upload_bytes)
            .merge(create_health_router())
            .merge(create_openapi_router())
            .merge(create_static_router(&self.public_dir))
            .layer(CompressionLayer::new())
    }

    async fn bind(&self) -> Result<(TcpListener, SocketAddr), std::io::Error> {
        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        let local_addr = listener.local_addr()?;
        Ok((listener, local_addr))
    }

    /// Run the web server.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let router = self.router();
        let (listener, local_addr) = self.bind().await?;

        tracing::info!("Serving on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr, std::io::Error> {
        let router = self.router();
        let (listener, local_addr) = self.bind().await?;

        tracing::info!("Serving on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
