use anyhow::{Context, Result};
use std::process;

use clap::{Parser, Subcommand};
use geolocate::{logging, CachedLookup, Config, GeoClient, Output};

#[derive(Debug, Parser)]
#[clap(name = "geolocate", version, about = "Locate IP addresses")]
pub struct App {
    #[clap(flatten)]
    config: Config,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look up a single address
    Lookup {
        /// ip to look up
        ip: String,
        /// Print the HTML result fragment instead of the terminal report
        #[clap(long)]
        html: bool,
    },
    /// Look up several addresses, batched when the provider supports it
    Batch {
        /// ips to look up
        #[clap(required = true)]
        ips: Vec<String>,
        /// Print the HTML result fragment instead of the terminal report
        #[clap(long)]
        html: bool,
    },
    /// Show the form and look up each address typed on stdin
    Interactive {
        /// Print the HTML result fragment instead of the terminal report
        #[clap(long)]
        html: bool,
    },
}

fn output_for(html: bool) -> Output {
    if html {
        Output::Html
    } else {
        Output::Terminal
    }
}

async fn run(cli: App) -> Result<()> {
    logging::init_logger(cli.config.log_level.into()).context("Failed to initialize logger")?;
    let client = GeoClient::new(&cli.config).context("Failed to build HTTP client")?;
    log::debug!("using {:?} at {}", client.provider(), cli.config.base_url());
    let client = CachedLookup::new(client);

    match cli.command {
        Command::Lookup { ip, html } => {
            geolocate::lookup_one(&client, &ip, output_for(html)).await?;
        }
        Command::Batch { ips, html } => {
            geolocate::lookup_many(&client, &ips, output_for(html)).await?;
        }
        Command::Interactive { html } => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let n = geolocate::run_interactive(&client, stdin, output_for(html)).await?;
            log::info!("{} lookups, {} addresses cached", n, client.len());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = App::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Application error: {:#}", e);
        process::exit(1);
    }
}
