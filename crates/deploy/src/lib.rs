#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod artifacts;
pub use artifacts::{ArtifactError, ArtifactStore, ContractArtifact};

mod client;
pub use client::{AlloyChainClient, ChainClient, DeployedContract, call_typed, ensure_chain_id};

mod config;
pub use config::{ConfigError, DeployConfig, TxOptions, build_signer, validate_url};

mod constants;
pub use constants::*;

pub mod contracts;

mod error;
pub use error::*;

mod governance;
pub use governance::{
    GovernanceAddresses, GovernanceArtifacts, GovernanceDeployer, GovernanceDeployment,
    GovernanceParams, TimelockRoles,
};

mod hybrid;
pub use hybrid::{HybridVotingDeployment, deploy_hybrid_voting, load_hybrid_voting};

mod network;
pub use network::{BUILTIN_NETWORKS, NetworkConfig};

mod report;
pub use report::{Deployed, DeploymentReport, OutputFormat, Step, StepRecord};

mod service;
pub use service::{deploy_governance, deploy_hybrid};

#[cfg(test)]
mod test_utils;
