// proxyshim CLI - Command Line Interface Entry Point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use proxyshim_channel::{MethodCall, MethodChannel, proxy_settings_channel};
use proxyshim_config::{Config, ConfigLoader, parse_override};
use proxyshim_settings::{ProxySettingsReader, SystemProxyProvider, provider_for};

/// proxyshim - expose the host's proxy settings to an application shell
#[derive(Parser, Debug)]
#[command(name = "proxyshim")]
#[command(version, about, long_about = None)]
struct TopCli {
    #[clap(flatten)]
    config_overrides: CliConfigOverrides,

    #[clap(subcommand)]
    command: Commands,

    /// Project directory holding `.proxyshim/config.toml`
    #[arg(short = 'd', long = "dir", global = true)]
    dir: Option<PathBuf>,

    /// Read proxies from a JSON snapshot file instead of the OS
    #[arg(long = "snapshot", value_name = "PATH", global = true)]
    snapshot: Option<PathBuf>,
}

/// CLI configuration overrides
#[derive(Debug, clap::Args)]
struct CliConfigOverrides {
    /// Configuration override in key=value format
    #[arg(short = 'c', long = "config", value_name = "KEY=VALUE", global = true)]
    overrides: Vec<String>,
}

/// Available commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the current proxy settings as JSON
    Get,

    /// Print the raw proxy snapshot the settings are derived from
    Snapshot,

    /// Invoke one method on the channel
    Call {
        /// Method name
        method: String,

        /// Method arguments as JSON
        #[arg(long = "args")]
        args: Option<String>,
    },

    /// Serve the channel as newline-delimited JSON over stdin/stdout
    Serve,

    /// Configuration management
    Config {
        #[command(subcommand)]
        config_command: ConfigCommands,
    },
}

/// Configuration commands
#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = TopCli::parse();

    let config = load_config(&cli)?;

    // Initialize logging; stdout is reserved for command output
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("proxyshim starting with {:?} provider", config.provider.source);

    match cli.command {
        Commands::Get => print_settings(&config)?,
        Commands::Snapshot => print_snapshot(&config)?,
        Commands::Call { method, args } => call_method(&config, method, args)?,
        Commands::Serve => serve_stdio(&config).await?,
        Commands::Config { config_command } => match config_command {
            ConfigCommands::Show => show_config(&config)?,
        },
    }

    Ok(())
}

/// Collect `-c` and `--snapshot` into config overrides
fn collect_overrides(cli: &TopCli) -> Result<Vec<(String, String)>> {
    let mut overrides = cli
        .config_overrides
        .overrides
        .iter()
        .map(String::as_str)
        .map(parse_override)
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(path) = &cli.snapshot {
        overrides.push(("provider.source".to_string(), "static".to_string()));
        overrides.push((
            "provider.snapshot_path".to_string(),
            path.display().to_string(),
        ));
    }
    Ok(overrides)
}

fn load_config(cli: &TopCli) -> Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(dir) = &cli.dir {
        loader = loader.with_project_dir(dir.clone());
    }
    loader
        .load_with_cli_overrides(collect_overrides(cli)?)
        .context("failed to load configuration")
}

fn build_reader(config: &Config) -> Result<Arc<ProxySettingsReader<Box<dyn SystemProxyProvider>>>> {
    let provider = provider_for(&config.provider).context("failed to set up proxy provider")?;
    info!("Reading proxies through the {} provider", provider.name());
    Ok(Arc::new(ProxySettingsReader::new(provider)))
}

fn build_channel(config: &Config) -> Result<MethodChannel> {
    Ok(proxy_settings_channel(
        config.channel.name.clone(),
        build_reader(config)?,
    ))
}

fn print_settings(config: &Config) -> Result<()> {
    let settings = build_reader(config)?.read();
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

fn print_snapshot(config: &Config) -> Result<()> {
    let snapshot = build_reader(config)?.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn call_method(config: &Config, method: String, args: Option<String>) -> Result<()> {
    let arguments = match args {
        Some(raw) => serde_json::from_str(&raw).context("--args must be valid JSON")?,
        None => serde_json::Value::Null,
    };
    let channel = build_channel(config)?;
    let response = channel.invoke(&MethodCall::new(method).with_arguments(arguments));
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn serve_stdio(config: &Config) -> Result<()> {
    let channel = build_channel(config)?;
    info!(
        "Serving channel {} ({}) on stdio",
        channel.name(),
        channel.methods().join(", ")
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let answered = proxyshim_channel::stdio::serve(&channel, stdin, tokio::io::stdout()).await?;
    info!("Answered {} requests", answered);
    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
