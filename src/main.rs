use std::fs::OpenOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod engine;
mod error;
mod notify;
mod pomodoro;
mod protocol;
mod render;
mod settings;
mod terminal;
mod ws;

use engine::{Engine, RequestReceiver, UpdateSender};
use error::AppError;
use settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "pomo_clock", version, about = "Analog Pomodoro clock")]
struct Cli {
    /// Serve the clock to a browser page over WebSocket instead of the terminal
    #[arg(long)]
    daemon: bool,

    /// WebSocket listen address (daemon mode)
    #[arg(long, default_value = "127.0.0.1:8765")]
    addr: SocketAddr,

    /// JSON settings file; missing sections keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Never play the one-second warning sound
    #[arg(long)]
    mute: bool,

    /// Desktop notification on every phase change
    #[arg(long)]
    notify: bool,

    #[arg(short, long)]
    verbose: bool,

    /// Append logs to this file instead of stderr
    #[arg(short, long)]
    log: Option<PathBuf>,
}

fn init_tracing(verbose: bool, log_file: Option<&PathBuf>) -> Result<(), AppError> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings, AppError> {
    let mut settings = match cli.config {
        Some(ref path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if cli.mute {
        settings.sound_is_on = false;
    }
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log.as_ref())?;

    let settings = load_settings(&cli)?;
    let work_minutes = settings.default.work_time / 60;
    let break_minutes = settings.default.break_time / 60;

    println!("🍅 Pomodoro Clock");
    println!("======================================================");
    println!(
        "Pomodoro settings: {}min work / {}min break",
        work_minutes, break_minutes
    );
    if let Some(ref path) = cli.log {
        println!("Logging to: {}", path.display());
    }

    let (requests, receiver) = engine::create_request_channel();
    let updates = engine::create_update_channel();

    if cli.notify {
        tokio::spawn(notify::run_notifier(updates.clone()));
    }

    if cli.daemon {
        let listener = ws::websocket_server::bind(cli.addr).await?;
        tokio::spawn(ws::websocket_server::start_websocket_server(
            listener,
            requests,
            updates.clone(),
        ));
        println!("Running WebSocket server on ws://{}", cli.addr);
        println!("Open web/index.html in a browser. Press Ctrl+C to stop\n");
    } else {
        println!("Type `start` to begin. Press Ctrl+C or type `quit` to stop\n");

        tokio::spawn(terminal::print_updates(updates.clone()));
        tokio::spawn(async move {
            if let Err(e) = terminal::read_commands(requests).await {
                error!("Terminal input error: {}", e);
            }
        });
    }

    run_until_shutdown(Engine::new(settings), receiver, updates).await
}

async fn run_until_shutdown(
    engine: Engine,
    receiver: RequestReceiver,
    updates: UpdateSender,
) -> Result<(), AppError> {
    tokio::select! {
        engine = engine::run(engine, receiver, updates) => {
            info!(phase = %engine.session().current, "session ended");
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("interrupted, shutting down");
        }
    }
    Ok(())
}
