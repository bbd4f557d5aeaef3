mod cli;
mod commands;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use outlet_core::{Session, SessionConfig};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.log_json);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Local settings never need a backend
        Command::Settings(args) => commands::settings::handle(args, &cli.global),

        cmd => {
            let session = Session::new(build_session_config(&cli.global)?)?;
            session.start().await;

            let connected = session
                .wait_until_connected(Duration::from_secs(cli.global.connect_timeout))
                .await;
            let result = match connected {
                Ok(()) => {
                    tracing::debug!(command = ?cmd, "dispatching command");
                    commands::dispatch(cmd, &session, &cli.global).await
                }
                Err(e) => Err(e.into()),
            };

            session.stop().await;
            result
        }
    }
}

/// Settings file + environment, then `--host`/`--port` on top.
pub(crate) fn build_session_config(global: &GlobalOpts) -> Result<SessionConfig, CliError> {
    let mut cfg = outlet_config::load_config()?;
    apply_overrides(&mut cfg, global);
    Ok(outlet_config::to_session_config(&cfg)?)
}

pub(crate) fn apply_overrides(cfg: &mut outlet_config::Config, global: &GlobalOpts) {
    if let Some(host) = &global.host {
        cfg.connection.mode = "fixed".into();
        cfg.connection.host.clone_from(host);
    }
    if let Some(port) = global.port {
        cfg.connection.port = port;
    }
}
