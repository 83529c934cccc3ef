use clap::Parser;
use paper_ledger::cli::{Cli, Commands};
use paper_ledger::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if std::path::Path::new(&cli.config).exists() {
        Config::load(&cli.config)?
    } else {
        eprintln!("Warning: config file {} not found", cli.config);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example"))?
    };

    // Initialize telemetry
    let _telemetry = paper_ledger::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting paper trading session");
            args.execute(&config).await?;
        }
        Commands::Replay(args) => {
            tracing::info!("Starting order replay");
            args.execute(&config).await?;
        }
        Commands::History(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
