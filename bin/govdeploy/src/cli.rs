//! CLI definition for the govdeploy binary.

use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use govdeploy::{
    BUILTIN_NETWORKS, ConfigError, DEFAULT_ARTIFACTS_DIR, DEFAULT_CONFIRMATIONS, DeployConfig,
    DeploymentReport, GovernanceParams, NetworkConfig, OutputFormat, PRIVATE_KEY_ENV, TxOptions,
    build_signer, validate_url,
};
use govdeploy_cli_utils::{CliStyles, LogConfig, build_runtime};
use tracing::info;
use url::Url;

govdeploy_cli_utils::define_log_args!("GOVDEPLOY");

/// Deploys the governance contract suite to an EVM network.
#[derive(Debug, Clone, Parser)]
#[command(name = "govdeploy")]
#[command(version, about, long_about = None)]
#[command(styles = CliStyles::init())]
pub(crate) struct Cli {
    /// What to deploy.
    #[command(subcommand)]
    pub command: Commands,

    /// Deployment target and transaction arguments.
    #[command(flatten)]
    pub deploy: DeployArgs,

    /// Logging configuration arguments.
    #[command(flatten)]
    pub logging: LogArgs,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub(crate) enum Commands {
    /// Deploy token, timelock, governor and voting contract, then wire the timelock roles.
    Governance(GovernanceArgs),
    /// Deploy the standalone hybrid voting contract.
    HybridVoting,
    /// List the built-in networks.
    Networks,
}

/// Governance procedure arguments.
#[derive(Debug, Clone, Args)]
pub(crate) struct GovernanceArgs {
    /// Timelock minimum delay (e.g., "1h", "2days").
    #[arg(
        long = "min-delay",
        env = "GOVDEPLOY_MIN_DELAY",
        default_value = "1h",
        value_parser = parse_min_delay
    )]
    pub min_delay: Duration,

    /// Skip reading the timelock roles back after setup.
    #[arg(long = "skip-role-check", default_value = "false")]
    pub skip_role_check: bool,
}

impl From<GovernanceArgs> for GovernanceParams {
    fn from(args: GovernanceArgs) -> Self {
        Self { min_delay: args.min_delay, role_check: !args.skip_role_check }
    }
}

/// Deployment target and transaction arguments.
#[derive(Debug, Clone, Args)]
#[command(next_help_heading = "Deployment")]
pub(crate) struct DeployArgs {
    /// Network name (local, bsc-testnet, or ~/.govdeploy/networks/<name>.yaml) or YAML file path.
    #[arg(
        short = 'n',
        long = "network",
        env = "GOVDEPLOY_NETWORK",
        default_value = "local",
        global = true
    )]
    pub network: String,

    /// Directory of user network files, `~/.govdeploy/networks` when unset.
    #[arg(long = "networks-dir", env = "GOVDEPLOY_NETWORKS_DIR", global = true)]
    pub networks_dir: Option<PathBuf>,

    /// Overrides the network's RPC endpoint.
    #[arg(long = "rpc-url", env = "GOVDEPLOY_RPC_URL", value_parser = parse_url, global = true)]
    pub rpc_url: Option<Url>,

    /// Deployer private key (hex-encoded). Optional on networks with dev accounts.
    #[arg(long = "private-key", env = PRIVATE_KEY_ENV, hide_env_values = true, global = true)]
    pub private_key: Option<String>,

    /// Directory holding the compiled contract artifacts.
    #[arg(
        long = "artifacts",
        env = "GOVDEPLOY_ARTIFACTS",
        default_value = DEFAULT_ARTIFACTS_DIR,
        global = true
    )]
    pub artifacts: PathBuf,

    /// Confirmations awaited for every transaction.
    #[arg(
        long = "confirmations",
        env = "GOVDEPLOY_CONFIRMATIONS",
        default_value_t = DEFAULT_CONFIRMATIONS,
        global = true
    )]
    pub confirmations: u64,

    /// Upper bound on waiting for each receipt (e.g., "2m"). Waits indefinitely when unset.
    #[arg(
        long = "tx-timeout",
        env = "GOVDEPLOY_TX_TIMEOUT",
        value_parser = parse_duration,
        global = true
    )]
    pub tx_timeout: Option<Duration>,

    /// Summary format printed on success.
    #[arg(long = "output", value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Also write the JSON report to this file.
    #[arg(long = "report", global = true)]
    pub report: Option<PathBuf>,
}

impl Cli {
    /// Whether errors logged with `error!` reach the console.
    pub(crate) const fn console_logs_enabled(&self) -> bool {
        !self.logging.stdout_quiet && self.logging.level > 0
    }

    /// Runs the selected command.
    pub(crate) fn run(self) -> eyre::Result<()> {
        LogConfig::from(self.logging).init_tracing_subscriber()?;

        let params = match self.command {
            Commands::Networks => {
                print!("{}", list_networks());
                return Ok(());
            }
            Commands::Governance(args) => Some(GovernanceParams::from(args)),
            Commands::HybridVoting => None,
        };

        let config = DeployConfig::try_from(self.deploy)?;
        info!(?config, "Starting deployment");

        let runtime = build_runtime()?;
        let report = runtime.block_on(async {
            match params {
                Some(params) => govdeploy::deploy_governance(&config, params).await,
                None => govdeploy::deploy_hybrid(&config).await,
            }
        })?;

        emit(&report, &config)
    }
}

fn emit(report: &DeploymentReport, config: &DeployConfig) -> eyre::Result<()> {
    println!("{}", report.render(config.output)?);

    if let Some(path) = &config.report_path {
        report.write_json(path)?;
        info!(path = %path.display(), "Wrote deployment report");
    }
    Ok(())
}

fn list_networks() -> String {
    render_networks(BUILTIN_NETWORKS.iter().map(|name| (*name, NetworkConfig::builtin(name))))
}

/// One line per network; a network whose environment override is broken is listed with the error.
fn render_networks<'a>(
    networks: impl IntoIterator<Item = (&'a str, Result<Option<NetworkConfig>, ConfigError>)>,
) -> String {
    let mut out = String::new();
    for (name, resolved) in networks {
        match resolved {
            Ok(Some(network)) => {
                let key = if network.dev_accounts {
                    "dev account #0 unless a key is given".to_string()
                } else {
                    format!("${} required", network.private_key_env())
                };
                out.push_str(&format!(
                    "{:<12} chain {:<6} {}  ({key})\n",
                    network.name, network.chain_id, network.rpc_url
                ));
            }
            Ok(None) => {}
            Err(err) => out.push_str(&format!("{name:<12} unavailable: {err}\n")),
        }
    }
    out
}

impl TryFrom<DeployArgs> for DeployConfig {
    type Error = ConfigError;

    fn try_from(args: DeployArgs) -> Result<Self, Self::Error> {
        let networks_dir = args.networks_dir.or_else(NetworkConfig::config_dir);
        let network = NetworkConfig::load_with_dir(&args.network, networks_dir.as_deref())?;

        let rpc_url = args.rpc_url.unwrap_or_else(|| network.rpc_url.clone());
        validate_url(&rpc_url, "rpc-url")?;

        let tx = TxOptions { confirmations: args.confirmations, receipt_timeout: args.tx_timeout };
        tx.validate()?;

        let private_key = args.private_key.or_else(|| network.private_key_from_env());
        let signer = build_signer(private_key.as_deref(), &network)?;

        Ok(Self {
            network,
            rpc_url,
            signer,
            artifacts_dir: args.artifacts,
            tx,
            output: args.output,
            report_path: args.report,
        })
    }
}

/// Parse a duration string like "30s", "5m", "1h".
fn parse_duration(s: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(s)
}

/// Parse a timelock delay; the timelock only counts whole seconds.
fn parse_min_delay(s: &str) -> Result<Duration, String> {
    let min_delay = parse_duration(s).map_err(|e| e.to_string())?;
    GovernanceParams { min_delay, ..Default::default() }.validate().map_err(|e| e.to_string())?;
    Ok(min_delay)
}

/// Parse a URL string.
fn parse_url(s: &str) -> Result<Url, url::ParseError> {
    Url::parse(s)
}
