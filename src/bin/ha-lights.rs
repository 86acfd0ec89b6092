use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use hass_tools::lights::{LightsSession, StateFilter};
use hass_tools::{HomeAssistantClient, HomeAssistantConfig, Outcome, cli};

#[derive(Parser)]
#[command(name = "ha-lights")]
#[command(about = "List Home Assistant lights and toggle them by number")]
#[command(version)]
struct Cli {
    /// Only show lights that are currently on or off
    #[arg(value_enum, ignore_case = true)]
    state: Option<StateFilter>,

    /// Disable colored status labels
    #[arg(long)]
    no_color: bool,

    /// Debug logging and full error traces
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Cli::parse();
    cli::init_tracing(args.verbose);

    match run(&args).await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "done");
            ExitCode::SUCCESS
        }
        Err(error) => cli::report_failure(&error, args.verbose),
    }
}

async fn run(args: &Cli) -> anyhow::Result<Outcome> {
    let config = HomeAssistantConfig::from_home().context("loading hub credentials")?;
    tracing::info!(url = %config.url, "using Home Assistant");
    let client = HomeAssistantClient::new(config);

    let color = !args.no_color && console::colors_enabled();
    let mut input = io::stdin().lock();
    let mut output = io::stdout();
    let outcome = LightsSession::new(&client, args.state, color)
        .run(&mut input, &mut output)
        .await?;
    Ok(outcome)
}
