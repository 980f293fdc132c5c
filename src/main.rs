use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "triagent")]
#[command(about = "Incident triage and remediation agent", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Run,
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Init {
        #[arg(long)]
        stdout: bool,
    },
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "triagent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config_path = triagent::config::resolve_config_path(cli.config.as_deref());

    match cli.command {
        Some(Commands::Run) | None => {
            // Default behavior is to run
            triagent::cli::run::run(config_path).await?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { stdout } => {
                triagent::cli::config::init(stdout)?;
            }
            ConfigAction::Validate => {
                triagent::cli::config::validate(config_path)?;
            }
        },
    }

    Ok(())
}
