//! Selfhost installer - Entry Point
//!
//! Writes the runtime config from the environment, then serves the app and
//! the `/install` endpoint until interrupted.

use std::env;

use selfhost_installer::app::options::{parse_cli_args, AppOptions};
use selfhost_installer::app::run::run;
use selfhost_installer::logs::init_logging;
use selfhost_installer::utils::version_info;

use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli_args = parse_cli_args(env::args().skip(1));

    // Print version and exit
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Failed to render version info: {e}"),
        }
        return;
    }

    let options = match AppOptions::load(&cli_args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Keep the guard alive so file logs are flushed on exit
    let _log_guard = match init_logging(options.log.clone()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    info!("Running installer with options: {:?}", options);
    if let Err(e) = run(options, await_shutdown_signal()).await {
        error!("Installer server failed: {e}");
        std::process::exit(1);
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                _ => {
                    error!("Unable to install signal handlers, falling back to Ctrl+C");
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
        }
        info!("Ctrl+C received, shutting down...");
    }
}
