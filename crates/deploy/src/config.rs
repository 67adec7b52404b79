//! Configuration types and validation for the deployer.

use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use thiserror::Error;
use url::Url;

use crate::{DEFAULT_CONFIRMATIONS, NetworkConfig, OutputFormat, constants::DEV_PRIVATE_KEY};

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid URL format.
    #[error("invalid {field} URL: {reason}")]
    InvalidUrl {
        /// The field name that contains the invalid URL.
        field: &'static str,
        /// The reason the URL is invalid.
        reason: String,
    },
    /// A field value is out of the allowed range.
    #[error("{field} must be {constraint}, got {value}")]
    OutOfRange {
        /// The field name that is out of range.
        field: &'static str,
        /// The constraint description.
        constraint: &'static str,
        /// The actual value.
        value: String,
    },
    /// Invalid signing configuration.
    #[error("invalid signing config: {0}")]
    Signing(String),
    /// The network could not be resolved or parsed.
    #[error("invalid network config: {0}")]
    Network(String),
}

/// Validate that a URL has a scheme and host.
pub fn validate_url(url: &Url, field: &'static str) -> Result<(), ConfigError> {
    if url.scheme().is_empty() {
        return Err(ConfigError::InvalidUrl { field, reason: "missing scheme".to_string() });
    }

    if url.host().is_none() {
        return Err(ConfigError::InvalidUrl { field, reason: "missing host".to_string() });
    }

    Ok(())
}

/// Builds the deployer's signer.
///
/// An explicit key wins. Without one, networks that expose dev accounts fall back to
/// dev account #0; every other network is an error. The key never appears in errors.
pub fn build_signer(
    private_key: Option<&str>,
    network: &NetworkConfig,
) -> Result<PrivateKeySigner, ConfigError> {
    let key = match private_key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => key,
        None if network.dev_accounts => DEV_PRIVATE_KEY,
        None => {
            return Err(ConfigError::Signing(format!(
                "network {} requires a deployer key (--private-key or ${})",
                network.name,
                network.private_key_env()
            )));
        }
    };

    PrivateKeySigner::from_str(key)
        .map_err(|e| ConfigError::Signing(format!("invalid private key: {e}")))
}

/// Transaction submission settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOptions {
    /// Confirmations awaited before a step counts as done.
    pub confirmations: u64,
    /// Upper bound on waiting for a receipt, `None` to wait indefinitely.
    pub receipt_timeout: Option<Duration>,
}

impl Default for TxOptions {
    fn default() -> Self {
        Self { confirmations: DEFAULT_CONFIRMATIONS, receipt_timeout: None }
    }
}

impl TxOptions {
    /// Validates the options.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.confirmations == 0 {
            return Err(ConfigError::OutOfRange {
                field: "confirmations",
                constraint: "at least 1",
                value: "0".to_string(),
            });
        }
        if self.receipt_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::OutOfRange {
                field: "tx-timeout",
                constraint: "greater than 0",
                value: "0s".to_string(),
            });
        }
        Ok(())
    }
}

/// Validated deployer configuration.
#[derive(Clone)]
pub struct DeployConfig {
    /// Selected network.
    pub network: NetworkConfig,
    /// Endpoint actually used, the network's own or an override.
    pub rpc_url: Url,
    /// Deployer account.
    pub signer: PrivateKeySigner,
    /// Root of the compiled contract artifacts.
    pub artifacts_dir: PathBuf,
    /// Transaction submission settings.
    pub tx: TxOptions,
    /// Format of the summary printed on success.
    pub output: OutputFormat,
    /// Optional path receiving the JSON deployment report.
    pub report_path: Option<PathBuf>,
}

impl DeployConfig {
    /// Address of the deployer account.
    pub fn deployer(&self) -> Address {
        self.signer.address()
    }
}

impl fmt::Debug for DeployConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployConfig")
            .field("network", &self.network.name)
            .field("chain_id", &self.network.chain_id)
            .field("rpc_url", &self.rpc_url.as_str())
            .field("deployer", &self.signer.address())
            .field("artifacts_dir", &self.artifacts_dir)
            .field("tx", &self.tx)
            .field("output", &self.output)
            .field("report_path", &self.report_path)
            .finish()
    }
}
