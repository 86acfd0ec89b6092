use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use hass_tools::thermostat::{self, TemperatureUnits};
use hass_tools::{HomeAssistantClient, HomeAssistantConfig, Outcome, cli};

#[derive(Parser)]
#[command(name = "ha-thermostat")]
#[command(about = "Show mode, temperatures and humidity of every Home Assistant thermostat")]
#[command(version)]
struct Cli {
    /// How temperatures are displayed
    #[arg(long, value_enum, default_value_t = TemperatureUnits::Dual)]
    units: TemperatureUnits,

    /// Disable colored mode labels
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
    let outcome = thermostat::run(&client, &mut io::stdout(), args.units, color)
        .await
        .context("fetching thermostats")?;
    Ok(outcome)
}
