//! loof-sync CLI entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use loof_sync::{ChipId, LookupOutcome, RecordPatch, RegistryClient, TitleLayout};
use loof_sync_server::config::{resolve_addr, resolve_registry_config, RegistryOverrides};
use loof_sync_server::transport::HttpTransport;

#[derive(Parser)]
#[command(
    name = "loof-sync",
    about = "Look up cats on the LOOF registry by microchip number",
    version
)]
struct Cli {
    /// Registry search page URL.
    #[arg(long, global = true)]
    registry_url: Option<String>,

    /// Timeout for each registry request, in milliseconds.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Title list layout (inline_date, split_columns).
    #[arg(long, global = true)]
    title_layout: Option<TitleLayout>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the lookup endpoint over HTTP (default).
    Serve {
        /// Listen address (host:port).
        #[arg(long)]
        addr: Option<String>,
    },

    /// Look up a single 15-digit chip number.
    Lookup {
        /// Microchip number.
        chip: String,

        /// Print the {success, data | error} JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let overrides = RegistryOverrides {
        search_url: cli.registry_url.clone(),
        timeout_ms: cli.timeout_ms,
        title_layout: cli.title_layout,
    };

    match cli.command.unwrap_or(Commands::Serve { addr: None }) {
        Commands::Serve { addr } => {
            let config = resolve_registry_config(&overrides)?;
            let client = RegistryClient::new(&config)?;
            let addr = resolve_addr(addr.as_deref());
            tracing::info!("loof-sync v{}", env!("CARGO_PKG_VERSION"));
            HttpTransport::new(client).run(&addr).await?;
        }

        Commands::Lookup { chip, json } => {
            let chip = match ChipId::parse(&chip) {
                Ok(chip) => chip,
                Err(e) => {
                    if json {
                        print_json(&LookupOutcome::failed(e.to_string()))?;
                    } else {
                        eprintln!("Error: {e}");
                    }
                    std::process::exit(1);
                }
            };

            let config = resolve_registry_config(&overrides)?;
            let client = RegistryClient::new(&config)?;
            let outcome = client.lookup(chip.as_str()).await;
            let success = outcome.success;

            if json {
                print_json(&outcome)?;
            } else {
                print_summary(&outcome);
            }

            if !success {
                std::process::exit(1);
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "loof-sync", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn print_json(outcome: &LookupOutcome) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(())
}

fn print_summary(outcome: &LookupOutcome) {
    let record = match (&outcome.data, &outcome.error) {
        (Some(record), _) => record,
        (None, error) => {
            eprintln!("Error: {}", error.as_deref().unwrap_or("lookup failed"));
            return;
        }
    };

    println!("Chip:          {}", record.chip_id);
    println!("Breed:         {}", record.breed.as_deref().unwrap_or("-"));
    println!("Color:         {}", record.color.as_deref().unwrap_or("-"));
    println!(
        "Sex:           {}",
        record.sex.map(|s| s.as_str()).unwrap_or("-")
    );
    println!(
        "Qualification: {}",
        record.qualification_grade.as_deref().unwrap_or("-")
    );
    for title in record.titles.iter().flatten() {
        let date = if title.obtained_date.is_empty() {
            "undated"
        } else {
            title.obtained_date.as_str()
        };
        println!("  - {} [{}, {}]", title.name, title.federation, date);
    }

    println!();
    println!("{}", RecordPatch::from_record(record).summary());
}
