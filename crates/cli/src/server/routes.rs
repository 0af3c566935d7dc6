//! Dev server routes.
//!
//! - `/` the element's own `dev/index.html` when present, else the HTML shell
//! - `/__element/context` launch context as JSON
//! - `/__element/env.js` launch constants as an ES module
//! - `/__element/ws` reload notifications
//! - `/@element/*` element root, `/@element-ui/*` resolved UI directory
//! - `/@module` resolved unit module, `/@element-main` main app module
//! - `/@dev/*` working directory

use std::fmt::Write;
use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use element_dev_core::LaunchContext;
use tokio::sync::{broadcast, watch};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::assets::INDEX_HTML;
use super::watcher::ReloadMessage;
use super::ws::ws_handler;

/// Page in the working directory that replaces the built-in shell
pub const DEV_INDEX: &str = "index.html";

/// State shared by every request of one launch
pub struct ServerState {
    context: LaunchContext,
    reload: broadcast::Sender<ReloadMessage>,
    closing: watch::Receiver<bool>,
}

impl ServerState {
    pub fn new(
        context: LaunchContext,
        reload: broadcast::Sender<ReloadMessage>,
        closing: watch::Receiver<bool>,
    ) -> Self {
        Self {
            context,
            reload,
            closing,
        }
    }

    pub fn context(&self) -> &LaunchContext {
        &self.context
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.reload.subscribe()
    }

    pub fn closing(&self) -> watch::Receiver<bool> {
        self.closing.clone()
    }
}

/// Create the dev server router for one launch
pub fn router(state: Arc<ServerState>) -> Router {
    let context = state.context();
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(index_handler))
        .route("/__element/context", get(context_handler))
        .route("/__element/env.js", get(env_handler))
        .route("/__element/ws", get(ws_handler))
        .route_service("/@module", ServeFile::new(&context.module_path))
        .nest_service("/@element", ServeDir::new(&context.element_path))
        .nest_service("/@element-ui", ServeDir::new(&context.ui_directory))
        .nest_service("/@dev", ServeDir::new(&context.working_dir));

    if let Some(main_module) = &context.main_module {
        router = router.route_service("/@element-main", ServeFile::new(main_module));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn index_handler(State(state): State<Arc<ServerState>>) -> Html<String> {
    let custom = state.context().working_dir.join(DEV_INDEX);
    match tokio::fs::read_to_string(&custom).await {
        Ok(page) => Html(page),
        Err(_) => Html(INDEX_HTML.to_string()),
    }
}

async fn context_handler(State(state): State<Arc<ServerState>>) -> Json<LaunchContext> {
    Json(state.context().clone())
}

async fn env_handler(State(state): State<Arc<ServerState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        env_module(state.context()),
    )
        .into_response()
}

/// ES module exporting each launch constant by name plus a default object
pub fn env_module(context: &LaunchContext) -> String {
    let constants = context.constants();
    let mut module = String::new();
    let _ = writeln!(module, "export const CONTEXT_VERSION = {};", context.version);
    for (name, value) in &constants {
        let _ = writeln!(module, "export const {name} = {value};");
    }
    let _ = writeln!(
        module,
        "export default {};",
        serde_json::Value::Object(constants)
    );
    module
}

#[cfg(test)]
mod tests {
    use super::*;
    use element_dev_core::types::{Dialect, UnitKind};
    use serde_json::{json, Value};
    use std::path::PathBuf;

    fn context() -> LaunchContext {
        LaunchContext {
            version: 1,
            element_path: PathBuf::from("/el"),
            element_name: "slack".to_string(),
            element_dialect: Dialect::Process,
            unit_kind: UnitKind::Action,
            unit_key: "send".to_string(),
            property_key: None,
            property_kind: None,
            property_ui: None,
            module_path: PathBuf::from("/el/actions/send/send.mts"),
            ui_directory: PathBuf::from("/el/ui"),
            ui_directory_exists: false,
            working_dir: PathBuf::from("/el"),
            main_module: None,
            element_module: json!({ "name": "slack" }),
            unit_module: json!({ "key": "send" }),
            property_module: Value::Null,
        }
    }

    #[test]
    fn test_env_module() {
        let module = env_module(&context());
        assert!(module.contains("export const CONTEXT_VERSION = 1;"));
        assert!(module.contains("export const ACTION_SIGNAL_KEY = \"send\";"));
        assert!(module.contains("export const ELEMENT_TYPE = \"action\";"));
        assert!(module.contains("export const PROPERTY_KEY = null;"));
        assert!(module.contains("export const ELEMENT_MODULE = {\"name\":\"slack\"};"));
        assert!(module.contains("export default {\"ELEMENT_PATH\":\"/el\""));
    }
}
