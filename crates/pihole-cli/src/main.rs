mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pihole_api::PiholeClient;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(mut cli: Cli) -> Result<(), CliError> {
    let cfg = pihole_config::load_config_or_default();
    cli.global.output = config::resolve_output(&cli.global, &cfg);

    match cli.command {
        // Config commands don't need an appliance connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "pihole6", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let client_config = config::build_client_config(&cli.global, &cfg)?;
            let client = PiholeClient::new(&client_config)
                .map_err(|e| CliError::from_api(e, &client_config.url))?;

            tracing::debug!(command = ?cmd, url = %client.base_url(), "dispatching command");
            let result = commands::dispatch(cmd, &client, &cli.global).await;
            end_session(&client).await;
            result
        }
    }
}

/// Log out if the run left a session open. The appliance caps concurrent
/// API sessions, so each invocation releases its own.
async fn end_session(client: &PiholeClient) {
    if !client.has_session().await {
        return;
    }
    if let Err(e) = client.logout().await {
        tracing::warn!(error = %e, "logout failed (non-fatal)");
    }
}
