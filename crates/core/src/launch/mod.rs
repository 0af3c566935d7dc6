//! Hand-off between the session and the dev server collaborator

pub mod context;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};

pub use context::{
    working_dir, LaunchContext, DEV_FOLDER, LAUNCH_CONTEXT_VERSION, PROPERTY_KIND_UI_VARIANT,
};

/// Starts a live-reload dev server for one launch context
#[async_trait]
pub trait DevServerLauncher: Send + Sync {
    /// Bind, start serving, and return once the server accepts connections
    async fn launch(&self, context: LaunchContext) -> Result<ServerHandle>;
}

/// A running dev server. Dropping the handle without calling [`stop`]
/// leaves the server running until the process exits.
///
/// [`stop`]: ServerHandle::stop
#[derive(Debug)]
pub struct ServerHandle {
    url: String,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub fn new(url: impl Into<String>, shutdown: oneshot::Sender<()>, task: JoinHandle<()>) -> Self {
        Self {
            url: url.into(),
            shutdown,
            task,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Signal graceful shutdown and wait for the server task to finish
    pub async fn stop(self) -> Result<()> {
        // The server may already be gone; that still counts as stopped
        let _ = self.shutdown.send(());
        self.task
            .await
            .map_err(|e| Error::DevServerLaunch(format!("server task failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stop_signals_shutdown() {
        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let _ = rx.await;
        });
        let handle = ServerHandle::new("http://localhost:5173", tx, task);
        assert_eq!(handle.url(), "http://localhost:5173");
        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_after_server_exit() {
        let (tx, _rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async {});
        let handle = ServerHandle::new("http://localhost:1", tx, task);
        handle.stop().await.unwrap();
    }
}
