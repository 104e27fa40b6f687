// cli/src/commands.rs
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use repodock_core::errors::{OpenError, ServiceError};
use repodock_core::service::{OpenService, OpenTransport};
use repodock_core::settings::{ServiceConfig, SettingsStore};
use repodock_core::types::{OpenResult, Status};
use repodock_core::Session;
use repodock_plugins::{DirectTransport, FileSettingsStore, HttpOpenService};

use crate::cli::{Args, Commands, ConfigAction};
use crate::notify;

/// Dispatch a parsed invocation; `Err` carries the process exit code.
pub async fn dispatch(args: Args) -> Result<(), i32> {
    let store: Arc<dyn SettingsStore> = Arc::new(match &args.settings {
        Some(path) => FileSettingsStore::at(path),
        None => FileSettingsStore::default_location(),
    });
    let settings = store.load().unwrap_or_else(|e| {
        tracing::warn!("settings load failed: {}, using defaults", e);
        ServiceConfig::default()
    });
    let base_url = args
        .service_url
        .clone()
        .unwrap_or_else(|| settings.service_url.clone());

    let service = Arc::new(HttpOpenService::new(base_url.as_str()).map_err(|e| {
        notify::render(Status::Error, &format!("bad service URL: {e}"));
        2
    })?);
    let transport: Arc<dyn OpenTransport> = Arc::new(DirectTransport::new(service.clone()));
    let session = Session::new(store.clone(), transport);

    match args.command {
        Commands::Open { url, line } => {
            finish_open(with_spinner(session.open_url_at(&url, line)).await)
        }
        Commands::Clipboard => {
            let text = read_clipboard().map_err(|e| {
                notify::render(Status::Error, &format!("Failed to read clipboard: {e}"));
                2
            })?;
            finish_open(with_spinner(session.open_from_clipboard(&text)).await)
        }
        Commands::Pr { repo, number } => {
            finish_open(with_spinner(session.open_pull_request(&repo, number)).await)
        }
        Commands::Status => status(&service).await,
        Commands::Config { action } => config(action, &store, &settings, &service).await,
    }
}

fn read_clipboard() -> anyhow::Result<String> {
    let mut clipboard = arboard::Clipboard::new()?;
    Ok(clipboard.get_text()?)
}

async fn with_spinner<F>(action: F) -> Result<OpenResult, OpenError>
where
    F: std::future::Future<Output = Result<OpenResult, OpenError>>,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Contacting service...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = action.await;
    spinner.finish_and_clear();
    result
}

fn finish_open(result: Result<OpenResult, OpenError>) -> Result<(), i32> {
    match result {
        Ok(opened) => {
            match opened.path {
                Some(path) => notify::render(Status::Success, &format!("Opened {path}")),
                None => notify::render(Status::Success, "Opened successfully!"),
            }
            Ok(())
        }
        Err(e) => {
            notify::render_open_error(&e);
            Err(1)
        }
    }
}

async fn status(service: &HttpOpenService) -> Result<(), i32> {
    match service.health().await {
        Ok(health) => {
            notify::render(
                Status::Success,
                &format!("Service running (v{})", health.version),
            );
            Ok(())
        }
        Err(ServiceError::Transport { url, .. }) => {
            notify::render(
                Status::Error,
                &format!("Service not running at {url}. Start it first."),
            );
            Err(1)
        }
        Err(e) => {
            notify::render(Status::Error, &format!("Service check failed: {e}"));
            Err(1)
        }
    }
}

async fn config(
    action: ConfigAction,
    store: &Arc<dyn SettingsStore>,
    settings: &ServiceConfig,
    service: &HttpOpenService,
) -> Result<(), i32> {
    match action {
        ConfigAction::Show => {
            match serde_json::to_string_pretty(settings) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    notify::render(Status::Error, &format!("{e}"));
                    return Err(2);
                }
            }
            Ok(())
        }
        ConfigAction::Set {
            service_url,
            ide,
            mappings,
        } => {
            let mut updated = settings.clone();
            if let Some(url) = service_url {
                updated.service_url = url;
            }
            if let Some(ide) = ide {
                updated.ide = ide;
            }
            if !mappings.is_empty() {
                updated.path_mappings = mappings;
            }

            // test connection first, but save either way: the service may
            // simply not be started yet
            let probe = HttpOpenService::new(updated.service_url.as_str())
                .map_err(|e| {
                    notify::render(Status::Error, &format!("bad service URL: {e}"));
                    2
                })?
                .health()
                .await;

            store.save(&updated).map_err(|e| {
                notify::render(Status::Error, &format!("Failed to save settings: {e}"));
                2
            })?;

            match probe {
                Ok(_) => notify::render(Status::Success, "Settings saved."),
                Err(_) => notify::render(
                    Status::Info,
                    "Warning: settings saved, but cannot connect to the service. Make sure it is running.",
                ),
            }
            Ok(())
        }
        ConfigAction::PushMappings => {
            match service.push_path_mappings(&settings.path_mappings).await {
                Ok(()) => {
                    notify::render(
                        Status::Success,
                        &format!(
                            "Pushed {} path mapping(s) to the service.",
                            settings.path_mappings.len()
                        ),
                    );
                    Ok(())
                }
                Err(e) => {
                    notify::render(Status::Error, &format!("Failed to push mappings: {e}"));
                    Err(1)
                }
            }
        }
    }
}
