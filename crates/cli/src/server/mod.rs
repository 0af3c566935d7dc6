//! Live-reload dev server for a launched element.

pub mod assets;
pub mod routes;
pub mod watcher;
pub mod ws;

use std::sync::Arc;

use async_trait::async_trait;
use element_dev_core::{Config, DevServerLauncher, Error, LaunchContext, Result, ServerHandle};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot, watch};
use tracing::{debug, error, info};

pub use routes::{env_module, router, ServerState};
pub use watcher::{watch_element, ElementWatcher, ReloadMessage};

/// axum-backed implementation of [`DevServerLauncher`]
#[derive(Debug, Clone)]
pub struct DevServer {
    host: String,
    port: u16,
    watch: bool,
}

impl DevServer {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            watch: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.host.clone(), config.port).with_watch(config.watch)
    }

    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }
}

#[async_trait]
impl DevServerLauncher for DevServer {
    async fn launch(&self, context: LaunchContext) -> Result<ServerHandle> {
        let listener = TcpListener::bind((self.host.as_str(), self.port))
            .await
            .map_err(|e| {
                Error::DevServerLaunch(format!("failed to bind {}:{}: {}", self.host, self.port, e))
            })?;
        let port = listener.local_addr()?.port();
        let url = format!("http://{}:{}", self.host, port);

        let (reload_tx, _) = broadcast::channel(64);
        let element_watcher = if self.watch {
            let watcher = watch_element(&context.element_path, reload_tx.clone())
                .map_err(|e| Error::DevServerLaunch(format!("failed to watch element: {e}")))?;
            Some(watcher)
        } else {
            None
        };

        debug!(
            "Serving {:?} from {:?}",
            context.module_path, context.working_dir
        );
        let (closing_tx, closing_rx) = watch::channel(false);
        let state = Arc::new(ServerState::new(context, reload_tx, closing_rx));
        let app = router(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let _watcher = element_watcher;
            let shutdown = async move {
                let _ = shutdown_rx.await;
                info!("Dev server shutting down");
                // Ends open reload sockets so graceful shutdown can finish
                closing_tx.send_replace(true);
            };
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!("Dev server error: {}", e);
            }
        });

        Ok(ServerHandle::new(url, shutdown_tx, task))
    }
}
