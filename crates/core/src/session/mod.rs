//! Session orchestrator: drives discovery, unit and property selection, and
//! the dev server hand-off, publishing every transition on a watch channel.

pub mod state;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::discovery::{discover_elements, enumerate, resolve_properties};
use crate::error::{Error, Result};
use crate::launch::{DevServerLauncher, LaunchContext, ServerHandle};
use crate::loader::ElementLoader;
use crate::types::{ActionOrSignalUnit, ElementInfo, PropertyDescriptor, PropertyResolution};

pub use state::{RunningServer, SessionState, Stage};

/// The selection handed to a launch
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchTarget {
    pub element: ElementInfo,
    pub unit: ActionOrSignalUnit,
    pub property: Option<PropertyDescriptor>,
}

struct Inner {
    loader: Arc<dyn ElementLoader>,
    launcher: Arc<dyn DevServerLauncher>,
    timeout: Option<Duration>,
    state: watch::Sender<SessionState>,
    server: Mutex<Option<ServerHandle>>,
}

pub struct Session {
    root: PathBuf,
    inner: Arc<Inner>,
    element: Option<ElementInfo>,
    unit: Option<ActionOrSignalUnit>,
}

impl Session {
    /// `timeout` bounds each blocking step; `None` waits indefinitely.
    ///
    /// A step that times out is abandoned, not cancelled: its blocking thread
    /// runs to completion and the runtime waits for it on shutdown unless the
    /// runtime is shut down with a deadline.
    pub fn new(
        root: impl Into<PathBuf>,
        loader: Arc<dyn ElementLoader>,
        launcher: Arc<dyn DevServerLauncher>,
        timeout: Option<Duration>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            root: root.into(),
            inner: Arc::new(Inner {
                loader,
                launcher,
                timeout,
                state,
                server: Mutex::new(None),
            }),
            element: None,
            unit: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Discover elements under the root
    pub async fn start(&mut self) -> SessionState {
        self.inner.set(SessionState::Loading);
        let root = self.root.clone();
        let next = match self
            .inner
            .run_blocking(move |loader| discover_elements(loader, &root))
            .await
        {
            Ok(elements) => SessionState::ElementsReady(elements),
            Err(Error::NoElementsFound(root)) => SessionState::NoElements { root },
            Err(e) => Inner::failure(Stage::Discovery, e),
        };
        self.inner.set(next)
    }

    /// Choose an element from `ElementsReady` by position
    pub async fn select_element(&mut self, index: usize) -> SessionState {
        let picked = self.pick(|state| match state {
            SessionState::ElementsReady(elements) => elements.get(index).cloned(),
            _ => None,
        });
        let Some(element) = picked else {
            return self.reject_selection("element", index);
        };

        self.element = Some(element.clone());
        self.inner.set(SessionState::LoadingUnits);
        let next = match self
            .inner
            .run_blocking(move |loader| enumerate(loader, &element))
            .await
        {
            Ok(units) => SessionState::UnitsReady(units),
            Err(e) => Inner::failure(Stage::Units, e),
        };
        self.inner.set(next)
    }

    /// Choose a unit from `UnitsReady` by position. Depending on its
    /// properties this either asks for a property or launches.
    pub async fn select_unit(&mut self, index: usize) -> SessionState {
        let picked = self.pick(|state| match state {
            SessionState::UnitsReady(units) => units.get(index).cloned(),
            _ => None,
        });
        let (Some(unit), Some(element)) = (picked, self.element.clone()) else {
            return self.reject_selection("unit", index);
        };

        self.unit = Some(unit.clone());
        self.inner.set(SessionState::LoadingProperties);
        let resolution = {
            let element = element.clone();
            let unit = unit.clone();
            self.inner
                .run_blocking(move |loader| resolve_properties(loader, &element, &unit))
                .await
        };

        let target = LaunchTarget {
            element,
            unit,
            property: None,
        };
        match resolution {
            Ok(PropertyResolution::HasOwnUi(ui)) => {
                tracing::debug!("Unit '{}' has its own UI '{}'", target.unit.key, ui);
                drop(self.launch_detached(target));
                self.state()
            }
            Ok(PropertyResolution::NoProperties) => self.launch_awaited(target).await,
            Ok(PropertyResolution::PropertyChoices(choices)) => {
                self.inner.set(SessionState::PropertiesReady(choices))
            }
            Err(e) => self.inner.set(Inner::failure(Stage::Properties, e)),
        }
    }

    /// Choose a property from `PropertiesReady` by position and launch
    pub async fn select_property(&mut self, index: usize) -> SessionState {
        let picked = self.pick(|state| match state {
            SessionState::PropertiesReady(properties) => properties.get(index).cloned(),
            _ => None,
        });
        let (Some(property), Some(element), Some(unit)) =
            (picked, self.element.clone(), self.unit.clone())
        else {
            return self.reject_selection("property", index);
        };

        self.launch_awaited(LaunchTarget {
            element,
            unit,
            property: Some(property),
        })
        .await
    }

    /// Launch and wait until the server is running or the launch failed
    pub async fn launch_awaited(&self, target: LaunchTarget) -> SessionState {
        self.inner.set(SessionState::Launching);
        self.inner.complete_launch(target).await
    }

    /// Move to `Launching` right away and finish the launch in the
    /// background. The outcome is published on the state channel.
    pub fn launch_detached(&self, target: LaunchTarget) -> JoinHandle<SessionState> {
        self.inner.set(SessionState::Launching);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.complete_launch(target).await })
    }

    /// Wait until the session needs no further input
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.subscribe();
        match rx.wait_for(SessionState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Stop the dev server if one is running
    pub async fn shutdown(&self) -> Result<()> {
        let handle = self.inner.server.lock().await.take();
        match handle {
            Some(handle) => {
                tracing::info!("Stopping dev server at {}", handle.url());
                handle.stop().await
            }
            None => Ok(()),
        }
    }

    fn pick<T>(&self, select: impl FnOnce(&SessionState) -> Option<T>) -> Option<T> {
        select(&self.inner.state.borrow())
    }

    fn reject_selection(&self, what: &str, index: usize) -> SessionState {
        let state = self.state();
        tracing::warn!("Ignoring {} selection {} in state {:?}", what, index, state);
        state
    }
}

impl Inner {
    fn set(&self, state: SessionState) -> SessionState {
        tracing::debug!("Session state: {:?}", state);
        self.state.send_replace(state.clone());
        state
    }

    fn failure(stage: Stage, error: Error) -> SessionState {
        tracing::warn!("Failed while {}: {}", stage, error);
        SessionState::Error {
            stage,
            message: error.to_string(),
        }
    }

    async fn run_blocking<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&dyn ElementLoader) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let loader = Arc::clone(&self.loader);
        let task = tokio::task::spawn_blocking(move || work(loader.as_ref()));
        let joined = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, task)
                .await
                .map_err(|_| Error::Timeout(limit))?,
            None => task.await,
        };
        joined.map_err(|e| Error::IoError(io::Error::other(e)))?
    }

    async fn complete_launch(&self, target: LaunchTarget) -> SessionState {
        match self.start_server(&target).await {
            Ok(url) => self.set(SessionState::DevServerRunning(RunningServer {
                url,
                element: target.element.name.clone(),
                unit: target.unit.label(),
                property: target.property.as_ref().map(|p| p.key.clone()),
            })),
            Err(e) => self.set(Inner::failure(Stage::Launch, e)),
        }
    }

    async fn start_server(&self, target: &LaunchTarget) -> Result<String> {
        let mut server = self.server.lock().await;
        if let Some(running) = server.as_ref() {
            return Err(Error::DevServerLaunch(format!(
                "a dev server is already running at {}",
                running.url()
            )));
        }

        let context = {
            let target = target.clone();
            self.run_blocking(move |loader| {
                LaunchContext::prepare(
                    loader,
                    &target.element,
                    &target.unit,
                    target.property.as_ref(),
                )
            })
            .await?
        };

        let handle = self.launcher.launch(context).await?;
        let url = handle.url().to_string();
        tracing::info!("Dev server running at {}", url);
        *server = Some(handle);
        Ok(url)
    }
}
