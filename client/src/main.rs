use anyhow::Result;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use manageritm_client::constants::config::DEFAULT_DIR;
use manageritm_client::constants::session::MAX_WAIT_LIMIT_SECS;
use manageritm_client::{
    run_session, ClientHandle, CommandClient, CommandRequest, Config, ConfigManager, ProxyClient,
    ProxyRequest,
};

#[derive(Parser, Debug)]
#[command(name = "manageritm", version, about = "Drive remote ManagerITM proxy and command clients")]
struct Cli {
    /// Directory containing main.toml
    #[arg(short, long, default_value = DEFAULT_DIR)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Provision a proxy, run it to completion and tear it down
    Proxy {
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        webport: Option<u16>,
        /// Capture an HTTP archive (true/false, overrides the config file)
        #[arg(long, value_name = "BOOL")]
        har: Option<bool>,
        /// Seconds to wait for the process before stopping it
        #[arg(long, value_parser = max_wait_parser())]
        max_wait: Option<u64>,
    },
    /// Provision a command client, run it to completion and tear it down
    Command {
        /// Replacement environment entry, KEY=VALUE
        #[arg(long = "env", value_parser = parse_key_val)]
        env: Vec<(String, String)>,
        /// Entry added to the remote default environment, KEY=VALUE
        #[arg(long = "additional-env", value_parser = parse_key_val)]
        additional_env: Vec<(String, String)>,
        #[arg(long, value_parser = max_wait_parser())]
        max_wait: Option<u64>,
    },
    /// Query the status of an existing remote client
    Status { client_id: String },
    /// Stop the process of an existing remote client
    Stop { client_id: String },
    /// Tear down an existing remote client
    Delete { client_id: String },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn max_wait_parser() -> RangedU64ValueParser {
    RangedU64ValueParser::new().range(0..=MAX_WAIT_LIMIT_SECS)
}

fn non_empty(entries: Vec<(String, String)>) -> Option<BTreeMap<String, String>> {
    if entries.is_empty() {
        None
    } else {
        Some(entries.into_iter().collect())
    }
}

/// Command-line values win; anything left unset comes from `[proxy]`.
fn proxy_request(
    port: Option<u16>,
    webport: Option<u16>,
    har: Option<bool>,
    config: &Config,
) -> ProxyRequest {
    ProxyRequest { port, webport, har }.or(&config.proxy)
}

/// Command-line values win; anything left unset comes from `[command]`.
fn command_request(
    env: Vec<(String, String)>,
    additional_env: Vec<(String, String)>,
    config: &Config,
) -> CommandRequest {
    CommandRequest {
        env: non_empty(env),
        additional_env: non_empty(additional_env),
    }
    .or(&config.command)
}

fn session_max_wait(secs: Option<u64>, config: &Config) -> Duration {
    secs.map(Duration::from_secs).unwrap_or(config.max_wait())
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("manageritm=info".parse()?)
        .add_directive("manageritm_client=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config).await?;
    let config = config_manager.get_current_config();
    let transport = config.transport()?;
    info!("Using ManagerITM at {}", transport.base_uri());

    let output = match cli.command {
        Commands::Proxy {
            port,
            webport,
            har,
            max_wait,
        } => {
            let request = proxy_request(port, webport, har, &config);

            let mut client = ProxyClient::from_transport(transport);
            let provisioned = client.client(&request).await?;
            info!("Provisioned proxy {}", provisioned.client_id);

            let max_wait = session_max_wait(max_wait, &config);
            let report =
                run_session(client.into_handle(), config.poll_interval(), max_wait).await?;
            serde_json::json!({ "client": provisioned, "session": report })
        }
        Commands::Command {
            env,
            additional_env,
            max_wait,
        } => {
            let request = command_request(env, additional_env, &config);

            let mut client = CommandClient::from_transport(transport);
            let provisioned = client.client(&request).await?;
            info!("Provisioned command client {}", provisioned.client_id);

            let max_wait = session_max_wait(max_wait, &config);
            let report =
                run_session(client.into_handle(), config.poll_interval(), max_wait).await?;
            serde_json::json!({ "client": provisioned, "session": report })
        }
        Commands::Status { client_id } => {
            let handle = ClientHandle::attach(transport, client_id);
            let status = handle.status().await;
            // Querying must not tear the instance down
            handle.detach();
            serde_json::to_value(status?)?
        }
        Commands::Stop { client_id } => {
            let handle = ClientHandle::attach(transport, client_id);
            let status = handle.stop().await;
            handle.detach();
            serde_json::to_value(status?)?
        }
        Commands::Delete { client_id } => {
            let mut handle = ClientHandle::attach(transport, client_id.clone());
            handle.close().await;
            serde_json::json!({ "client_id": client_id, "teardown_requested": true })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
