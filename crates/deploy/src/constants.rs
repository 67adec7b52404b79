//! Constants used throughout the deployer.

use std::time::Duration;

/// Default timelock minimum delay.
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_secs(3600);

/// Default number of confirmations awaited for every transaction.
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

/// Default directory searched for compiled contract artifacts.
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// Env var holding the deployer key, shared with the Hardhat tooling.
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

// ============================================================================
// Built-in networks
// ============================================================================

/// Chain id of a local Hardhat or Anvil node.
pub const LOCAL_CHAIN_ID: u64 = 31337;

/// RPC endpoint of a local Hardhat or Anvil node.
pub const LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";

/// Chain id of the BNB Smart Chain testnet.
pub const BSC_TESTNET_CHAIN_ID: u64 = 97;

/// Public BNB Smart Chain testnet endpoint, used when no override is set.
pub const BSC_TESTNET_RPC_URL: &str = "https://data-seed-prebsc-1-s1.binance.org:8545";

/// Env var overriding the BNB Smart Chain testnet endpoint.
pub const BSC_TESTNET_RPC_URL_ENV: &str = "BSC_TESTNET_RPC_URL";

/// Private key of dev account #0 on Hardhat and Anvil nodes.
///
/// Public knowledge; only ever used for networks flagged with `dev_accounts`.
pub const DEV_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

// ============================================================================
// Contract names
// ============================================================================

/// Artifact name of the governance token.
pub const GOVERNANCE_TOKEN: &str = "GovernanceToken";

/// Artifact name of the timelock controller.
pub const TIMELOCK: &str = "Timelock";

/// Artifact name of the governor.
pub const GOVERNOR: &str = "MyGovernor";

/// Artifact name of the timelock-owned voting contract.
pub const VOTING: &str = "Voting";

/// Artifact name of the standalone hybrid voting contract.
pub const HYBRID_VOTING: &str = "HybridVoting";
