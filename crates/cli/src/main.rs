use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
    wagate_session::CredentialStore,
};

#[derive(Parser)]
#[command(name = "wagate", about = "Wagate — multi-tenant WhatsApp gateway")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Persisted session credentials.
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Print the config search locations.
    Path,
}

#[derive(Subcommand)]
enum SessionAction {
    /// List accounts with a persisted credential.
    List,
    /// Delete one account's persisted credential.
    Remove { account: String },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = wagate_config::discover_and_load();
                print!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            },
            ConfigAction::Path => {
                println!("./wagate.toml");
                if let Some(dir) = wagate_config::config_dir() {
                    println!("{}", dir.join("wagate.toml").display());
                }
                Ok(())
            },
        },
        Commands::Sessions { action } => {
            let config = wagate_config::discover_and_load();
            let store = CredentialStore::new(config.server.store_path);
            match action {
                SessionAction::List => {
                    for account in store.list() {
                        println!("{account}");
                    }
                    Ok(())
                },
                SessionAction::Remove { account } => {
                    store.delete(&account)?;
                    info!(%account, "credential removed");
                    Ok(())
                },
            }
        },
    }
}
