//! Error types for the deployer.

use alloy_primitives::TxHash;
use thiserror::Error;

use crate::{ArtifactError, ConfigError};

/// Main error type for deployments.
///
/// Any variant aborts the run: steps already confirmed stay on chain and later
/// steps are never attempted.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A contract artifact could not be loaded.
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// The node rejected a request or could not be reached.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// A transaction was mined with a failed status.
    #[error("{label} transaction {tx_hash} reverted")]
    Reverted {
        /// Step that sent the transaction.
        label: String,
        /// Hash of the reverted transaction.
        tx_hash: TxHash,
    },

    /// A deployment receipt carried no contract address.
    #[error("{label} transaction {tx_hash} confirmed without a contract address")]
    MissingContractAddress {
        /// Step that sent the transaction.
        label: String,
        /// Hash of the deployment transaction.
        tx_hash: TxHash,
    },

    /// The endpoint serves a different chain than the selected network.
    #[error("network {network} expects chain id {expected}, but the endpoint reports {actual}")]
    ChainIdMismatch {
        /// Selected network name.
        network: String,
        /// Chain id configured for the network.
        expected: u64,
        /// Chain id reported by the endpoint.
        actual: u64,
    },

    /// A call returned data that does not match the expected ABI.
    #[error("failed to decode {what}: {reason}")]
    Decode {
        /// What was being decoded.
        what: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// The timelock roles do not match the intended wiring after setup.
    #[error("role check failed: {0}")]
    RoleCheck(String),

    /// The deployment report could not be written.
    #[error("Report error: {0}")]
    Report(String),
}

/// Result type alias for deployment operations.
pub type DeployResult<T> = Result<T, DeployError>;
