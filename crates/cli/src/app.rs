use anyhow::{Context, Result};
use element_dev_core::{
    ActionOrSignalUnit, ConfigLoader, ElementInfo, Session, SessionState, SourceLoader,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

use crate::display;
use crate::prompt::{LineSelector, Selector};
use crate::server::DevServer;

/// Run the interactive session for `root` until the user stops it
pub async fn run(root: PathBuf) -> Result<ExitCode> {
    let config = ConfigLoader::load_from_path(&root).context("Failed to load configuration")?;
    debug!("Using configuration: {:?}", config);

    let loader = Arc::new(SourceLoader::from_config(&config));
    let launcher = Arc::new(DevServer::from_config(&config));
    let mut session = Session::new(&root, loader, launcher, config.resolve_timeout());
    let mut selector = LineSelector::stdio();

    let Some(outcome) = drive(&mut session, &mut selector).await? else {
        println!("No selection made.");
        return Ok(ExitCode::SUCCESS);
    };

    let code = match outcome {
        SessionState::NoElements { root } => {
            println!("{}", display::no_elements_message(&root));
            ExitCode::SUCCESS
        }
        SessionState::Error { stage, message } => {
            eprintln!("{}", display::error_message(&root, stage, &message));
            ExitCode::FAILURE
        }
        SessionState::DevServerRunning(running) => {
            println!("{}", display::running_banner(&running));
            ExitCode::SUCCESS
        }
        other => {
            debug!("Session ended in {:?}", other);
            return Ok(ExitCode::FAILURE);
        }
    };

    // The session stays on screen until interrupted
    shutdown_signal().await;
    session
        .shutdown()
        .await
        .context("Failed to stop the dev server")?;
    Ok(code)
}

/// Walk the session forward, asking `selector` at every choice, until it
/// settles. `None` means input ended before a choice was made.
pub async fn drive(
    session: &mut Session,
    selector: &mut dyn Selector,
) -> Result<Option<SessionState>> {
    println!("{}", display::loading_message(session.root()));
    let mut state = session.start().await;
    let mut element: Option<ElementInfo> = None;
    let mut unit: Option<ActionOrSignalUnit> = None;

    loop {
        state = match state {
            SessionState::ElementsReady(elements) => {
                let labels: Vec<String> = elements.iter().map(ElementInfo::label).collect();
                let prompt = display::elements_prompt(session.root(), &elements);
                let Some(index) = choose(selector, &prompt, &labels)? else {
                    return Ok(None);
                };
                println!("{}", display::loading_units_message(&elements[index]));
                element = Some(elements[index].clone());
                session.select_element(index).await
            }
            SessionState::UnitsReady(units) => {
                let Some(current) = element.as_ref() else {
                    return Ok(None);
                };
                let labels: Vec<String> = units.iter().map(ActionOrSignalUnit::label).collect();
                let prompt = display::units_prompt(current, &units);
                let Some(index) = choose(selector, &prompt, &labels)? else {
                    return Ok(None);
                };
                println!("{}", display::loading_properties_message(&units[index]));
                unit = Some(units[index].clone());
                session.select_unit(index).await
            }
            SessionState::PropertiesReady(properties) => {
                let (Some(current), Some(selected)) = (element.as_ref(), unit.as_ref()) else {
                    return Ok(None);
                };
                let labels: Vec<String> = properties.iter().map(display::property_label).collect();
                let prompt = display::properties_prompt(current, selected, &properties);
                let Some(index) = choose(selector, &prompt, &labels)? else {
                    return Ok(None);
                };
                println!(
                    "{}",
                    display::launching_message(&labels[index], session.root())
                );
                session.select_property(index).await
            }
            SessionState::Launching => {
                if let Some(selected) = unit.as_ref() {
                    println!(
                        "{}",
                        display::launching_message(&selected.label(), session.root())
                    );
                }
                session.settled().await
            }
            // Loading states only appear while a step is in flight
            pending if pending.is_loading() => session.settled().await,
            settled => return Ok(Some(settled)),
        };
    }
}

fn choose(selector: &mut dyn Selector, prompt: &str, labels: &[String]) -> Result<Option<usize>> {
    tokio::task::block_in_place(|| selector.select(prompt, labels))
        .context("Failed to read selection")
}

/// Resolves on Ctrl+C, or SIGTERM on Unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
