//! Deployment summaries.

use std::{fmt, fs, path::Path};

use alloy_primitives::{Address, TxHash};
use clap::ValueEnum;
use serde::Serialize;

use crate::{DeployError, DeployResult, GovernanceAddresses, TimelockRoles};

const RULE: &str = "----------------------------------------------------";

/// How the summary is printed on success.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// One on-chain action of a deployment procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Deploy `GovernanceToken`.
    DeployToken,
    /// Delegate the deployer's votes to itself.
    DelegateVotes,
    /// Deploy `Timelock`.
    DeployTimelock,
    /// Deploy `MyGovernor`.
    DeployGovernor,
    /// Deploy `Voting`.
    DeployVoting,
    /// Grant `PROPOSER_ROLE` to the governor.
    GrantProposer,
    /// Grant `EXECUTOR_ROLE` to the zero address.
    GrantExecutor,
    /// Revoke the deployer's `TIMELOCK_ADMIN_ROLE`.
    RevokeAdmin,
    /// Deploy `HybridVoting`.
    DeployHybridVoting,
}

impl Step {
    /// Label used in logs and errors.
    pub const fn label(self) -> &'static str {
        match self {
            Self::DeployToken => "GovernanceToken",
            Self::DelegateVotes => "delegate votes",
            Self::DeployTimelock => "Timelock",
            Self::DeployGovernor => "MyGovernor",
            Self::DeployVoting => "Voting",
            Self::GrantProposer => "grant PROPOSER_ROLE",
            Self::GrantExecutor => "grant EXECUTOR_ROLE",
            Self::RevokeAdmin => "revoke TIMELOCK_ADMIN_ROLE",
            Self::DeployHybridVoting => "HybridVoting",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A confirmed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    /// Which step.
    pub step: Step,
    /// Confirmed transaction.
    pub tx_hash: TxHash,
    /// Contract created by the step, for deployments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<Address>,
}

/// Contracts produced by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Deployed {
    /// The governance suite.
    Governance {
        /// Deployed addresses.
        contracts: GovernanceAddresses,
        /// Timelock role ids.
        roles: TimelockRoles,
    },
    /// The standalone hybrid voting contract.
    HybridVoting {
        /// Deployed address.
        address: Address,
    },
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentReport {
    /// Network name.
    pub network: String,
    /// Chain id confirmed with the endpoint.
    pub chain_id: u64,
    /// Deployer account.
    pub deployer: Address,
    /// What was deployed.
    #[serde(flatten)]
    pub deployed: Deployed,
    /// Confirmed steps, in execution order.
    pub steps: Vec<StepRecord>,
}

impl DeploymentReport {
    /// Renders the report for stdout.
    pub fn render(&self, format: OutputFormat) -> DeployResult<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| DeployError::Report(format!("failed to serialize report: {e}"))),
        }
    }

    /// Writes the JSON report to `path`, replacing any existing file.
    pub fn write_json(&self, path: &Path) -> DeployResult<()> {
        let json = self.render(OutputFormat::Json)?;
        fs::write(path, json + "\n")
            .map_err(|e| DeployError::Report(format!("failed to write {}: {e}", path.display())))
    }
}

impl fmt::Display for DeploymentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deployment and setup complete on {} (chain {})", self.network, self.chain_id)?;
        writeln!(f, "{RULE}")?;
        match &self.deployed {
            Deployed::Governance { contracts, .. } => {
                writeln!(f, "Token Address: {}", contracts.token)?;
                writeln!(f, "Timelock Address: {}", contracts.timelock)?;
                writeln!(f, "Governor Address: {}", contracts.governor)?;
                writeln!(f, "Voting App Address: {}", contracts.voting)?;
            }
            Deployed::HybridVoting { address } => {
                writeln!(f, "HybridVoting Address: {address}")?;
            }
        }
        write!(f, "{RULE}")
    }
}
