mod config_commands;

use std::path::PathBuf;

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {config_commands::ConfigAction, tempvoice_config::TempVoiceConfig};

#[derive(Parser)]
#[command(name = "tempvoice", about = "TempVoice: temporary voice channels for Discord")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to use instead of the discovered one.
    #[arg(long, global = true, env = "TEMPVOICE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and manage rooms (default).
    Run,
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Load the explicit config file, or discover one. Environment overrides
/// apply either way.
fn load(path: Option<&std::path::Path>) -> anyhow::Result<TempVoiceConfig> {
    let Some(path) = path else {
        return Ok(tempvoice_config::discover_and_load());
    };
    let mut config = tempvoice_config::load_config(path)
        .with_context(|| format!("loading {}", path.display()))?;
    tempvoice_config::apply_env_overrides(&mut config);
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "tempvoice starting");

    match cli.command {
        None | Some(Commands::Run) => {
            let config = load(cli.config.as_deref())?;
            tempvoice_discord::start(&config).await?;
            Ok(())
        },
        Some(Commands::Config { action }) => {
            config_commands::handle_config(action, cli.config.as_deref())
        },
    }
}
