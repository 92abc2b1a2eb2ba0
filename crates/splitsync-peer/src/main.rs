//! splitsync-peer: a headless editor that mirrors its window layout with
//! another peer over a local socket.
//!
//! One side listens, the other connects. Each side keeps an in-memory
//! host driven by console commands on stdin; every layout change is
//! sent to the other side and applied there.

mod cli;
mod connection;
mod console;
mod transport;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use splitsync_common::{EventBus, HostEvent, SyncError};
use splitsync_config::{toml_loader, validation, SyncConfig};
use splitsync_layout::{reconcile, Extent, LayoutNode, MemoryHost};
use splitsync_session::SessionOptions;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::cli::{Args, Role};
use crate::connection::{run_connection, PeerContext};
use crate::console::Command;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    let (config, config_warning) = resolve_config(&args);

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.as_filter().to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("splitsync={level}").into()),
        )
        .init();

    if let Some(warning) = config_warning {
        warn!("{warning}");
    }

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "splitsync-peer failed");
            ExitCode::FAILURE
        }
    }
}

/// Load the config named by `--config` (or the default file) and
/// describe any problem, to be logged once tracing is up.
///
/// A file that fails to load is replaced by defaults. A file with
/// out-of-range values is kept as written.
fn resolve_config(args: &Args) -> (SyncConfig, Option<String>) {
    let loaded = match &args.config {
        Some(path) => toml_loader::load_from_path(path),
        None => splitsync_config::load_config(),
    };
    match loaded {
        Ok(config) => {
            let warning = validation::validate(&config)
                .err()
                .map(|e| format!("config has out-of-range values, using them as written: {e}"));
            (config, warning)
        }
        Err(e) => (
            SyncConfig::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}

async fn run(args: Args, config: SyncConfig) -> Result<(), SyncError> {
    let host = initial_host(&args)?;
    let host = Arc::new(Mutex::new(host));
    let events = EventBus::default();
    let (shutdown_tx, shutdown) = watch::channel(false);

    let ctx = PeerContext {
        host: host.clone(),
        events: events.clone(),
        options: SessionOptions::from_config(&config),
        initial_sync: config.sync.initial_sync,
        shutdown: shutdown.clone(),
    };

    tokio::spawn(run_console(host, events.clone(), shutdown_tx.clone()));
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted");
            let _ = shutdown_tx.send(true);
        }
    });

    let socket = args
        .socket
        .clone()
        .unwrap_or_else(|| config.connection.resolved_socket_path());
    let result = match args.role {
        Role::Listen => {
            let listener = transport::bind(&socket)?;
            let result = listen(listener, ctx).await;
            let _ = std::fs::remove_file(&socket);
            result
        }
        Role::Connect => {
            let backoff = Duration::from_millis(config.connection.reconnect_backoff_ms);
            connect(&socket, backoff, ctx).await
        }
    };
    events.publish(HostEvent::Shutdown);
    info!("shutting down");
    result
}

fn initial_host(args: &Args) -> Result<MemoryHost, SyncError> {
    let mut host = MemoryHost::new(Extent::new(args.width, args.height));

    if let Some(path) = &args.layout {
        let text = std::fs::read_to_string(path)?;
        let layout: LayoutNode = serde_json::from_str(&text)
            .map_err(|e| SyncError::Other(format!("invalid layout in {}: {e}", path.display())))?;
        let report = reconcile(&layout, &mut host);
        if !report.is_clean() {
            warn!(
                split_failures = report.split_failures,
                buffer_failures = report.buffer_failures.len(),
                "startup layout applied partially"
            );
        }
    }

    for path in &args.open {
        if let Err(e) = host.open_in_focused(path) {
            warn!(path = %path, error = %e, "could not open file");
        }
    }
    Ok(host)
}

/// Accept peers one at a time; a new connection replaces the previous one.
async fn listen(listener: UnixListener, ctx: PeerContext) -> Result<(), SyncError> {
    let mut shutdown = ctx.shutdown.clone();
    let mut current: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, _) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        warn!(error = %e, "accept failed");
                        continue;
                    }
                };
                if let Some(previous) = current.take() {
                    info!("new peer connected; dropping previous connection");
                    previous.abort();
                }
                let ctx = ctx.clone();
                current = Some(tokio::spawn(async move {
                    if let Err(e) = run_connection(stream, ctx, true).await {
                        warn!(error = %e, "connection ended with error");
                    }
                }));
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    if let Some(task) = current.take() {
                        task.abort();
                    }
                    return Ok(());
                }
            }
        }
    }
}

/// Connect to the listener, reconnecting after every disconnect until
/// shutdown.
async fn connect(socket: &Path, backoff: Duration, ctx: PeerContext) -> Result<(), SyncError> {
    let mut shutdown = ctx.shutdown.clone();
    while let Some(stream) = transport::connect_with_backoff(socket, backoff, &mut shutdown).await {
        if let Err(e) = run_connection(stream, ctx.clone(), false).await {
            warn!(error = %e, "connection ended with error");
        }
        if *shutdown.borrow() {
            break;
        }
        info!(retry_in_ms = backoff.as_millis() as u64, "reconnecting");
        tokio::time::sleep(backoff).await;
    }
    Ok(())
}

/// Read console commands from stdin and drive the local host with them.
async fn run_console(host: Arc<Mutex<MemoryHost>>, events: EventBus, shutdown: watch::Sender<bool>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "stdin read failed");
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        let (event, output) = {
            let mut host = host.lock().await;
            let event = command.apply(&mut host);
            (event, console::output(&command, &host))
        };
        if let Some(output) = output {
            println!("{output}");
        }
        match event {
            Ok(Some(HostEvent::Shutdown)) => {
                let _ = shutdown.send(true);
                return;
            }
            Ok(Some(event)) => {
                events.publish(event);
            }
            Ok(None) => {}
            Err(e) => println!("{e}"),
        }
    }
}
