//! Network selection: built-in networks, user overrides and standalone files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    ConfigError,
    constants::{
        BSC_TESTNET_CHAIN_ID, BSC_TESTNET_RPC_URL, BSC_TESTNET_RPC_URL_ENV, LOCAL_CHAIN_ID,
        LOCAL_RPC_URL, PRIVATE_KEY_ENV,
    },
};

/// Names of the networks known without any configuration file.
pub const BUILTIN_NETWORKS: &[&str] = &["local", "bsc-testnet"];

/// A deployment target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Display name.
    pub name: String,
    /// JSON-RPC endpoint.
    pub rpc_url: Url,
    /// Chain id the endpoint must report.
    pub chain_id: u64,
    /// Env var holding the deployer key, `PRIVATE_KEY` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_env: Option<String>,
    /// Whether the node ships pre-funded dev accounts usable without a key.
    #[serde(default)]
    pub dev_accounts: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct NetworkConfigOverride {
    name: Option<String>,
    rpc_url: Option<Url>,
    chain_id: Option<u64>,
    private_key_env: Option<String>,
    dev_accounts: Option<bool>,
}

impl NetworkConfig {
    /// Local Hardhat or Anvil node.
    pub fn local() -> Self {
        Self {
            name: "local".to_string(),
            rpc_url: Url::parse(LOCAL_RPC_URL).expect("valid constant URL"),
            chain_id: LOCAL_CHAIN_ID,
            private_key_env: None,
            dev_accounts: true,
        }
    }

    /// BNB Smart Chain testnet, honoring `$BSC_TESTNET_RPC_URL`.
    pub fn bsc_testnet() -> Result<Self, ConfigError> {
        Self::bsc_testnet_with_rpc(std::env::var(BSC_TESTNET_RPC_URL_ENV).ok().as_deref())
    }

    fn bsc_testnet_with_rpc(rpc_override: Option<&str>) -> Result<Self, ConfigError> {
        let rpc_url = match rpc_override.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
                field: BSC_TESTNET_RPC_URL_ENV,
                reason: e.to_string(),
            })?,
            None => Url::parse(BSC_TESTNET_RPC_URL).expect("valid constant URL"),
        };

        Ok(Self {
            name: "bsc-testnet".to_string(),
            rpc_url,
            chain_id: BSC_TESTNET_CHAIN_ID,
            private_key_env: None,
            dev_accounts: false,
        })
    }

    /// Resolves a built-in network by name or alias.
    pub fn builtin(name: &str) -> Result<Option<Self>, ConfigError> {
        match name {
            "local" | "localhost" | "hardhat" | "anvil" => Ok(Some(Self::local())),
            "bsc-testnet" | "bscTestnet" | "bsctestnet" => Self::bsc_testnet().map(Some),
            _ => Ok(None),
        }
    }

    /// Env var holding the deployer key for this network.
    pub fn private_key_env(&self) -> &str {
        self.private_key_env.as_deref().unwrap_or(PRIVATE_KEY_ENV)
    }

    /// Reads the deployer key from this network's env var, when it is not the default one.
    ///
    /// The default `PRIVATE_KEY` is already bound to the `--private-key` flag.
    pub fn private_key_from_env(&self) -> Option<String> {
        self.private_key_env
            .as_deref()
            .filter(|var| *var != PRIVATE_KEY_ENV)
            .and_then(|var| std::env::var(var).ok())
    }

    /// Load a network by name or path.
    ///
    /// Resolution order:
    /// 1. Built-in network as base (if the name matches one)
    /// 2. User file at `~/.govdeploy/networks/<name>.yaml` merged on top
    /// 3. Or treat the argument as a standalone file path
    pub fn load(name_or_path: &str) -> Result<Self, ConfigError> {
        Self::load_with_dir(name_or_path, Self::config_dir().as_deref())
    }

    /// [`Self::load`] with an explicit user config directory, `None` to skip user files.
    pub fn load_with_dir(
        name_or_path: &str,
        config_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let base = Self::builtin(name_or_path)?;

        if let Some(dir) = config_dir {
            let user_path = dir.join(format!("{name_or_path}.yaml"));
            if user_path.is_file() {
                return match base {
                    Some(base) => Self::load_and_merge(&user_path, base),
                    None => Self::load_from_file(&user_path),
                };
            }
        }

        if let Some(network) = base {
            return Ok(network);
        }

        let path = PathBuf::from(name_or_path);
        if path.is_file() {
            return Self::load_from_file(&path);
        }

        Err(ConfigError::Network(format!(
            "network '{name_or_path}' not found. Expected a built-in name ({}), \
             a user file at ~/.govdeploy/networks/{name_or_path}.yaml, or a valid file path",
            BUILTIN_NETWORKS.join(", ")
        )))
    }

    fn read(path: &Path) -> Result<String, ConfigError> {
        std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Network(format!("failed to read {}: {e}", path.display()))
        })
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = Self::read(path)?;
        serde_yaml::from_str(&contents).map_err(|e| {
            ConfigError::Network(format!("failed to parse {}: {e}", path.display()))
        })
    }

    fn load_and_merge(path: &Path, base: Self) -> Result<Self, ConfigError> {
        let contents = Self::read(path)?;
        let overrides: NetworkConfigOverride = serde_yaml::from_str(&contents).map_err(|e| {
            ConfigError::Network(format!("failed to parse {}: {e}", path.display()))
        })?;

        Ok(Self {
            name: overrides.name.unwrap_or(base.name),
            rpc_url: overrides.rpc_url.unwrap_or(base.rpc_url),
            chain_id: overrides.chain_id.unwrap_or(base.chain_id),
            private_key_env: overrides.private_key_env.or(base.private_key_env),
            dev_accounts: overrides.dev_accounts.unwrap_or(base.dev_accounts),
        })
    }

    /// Default user config directory, `~/.govdeploy/networks`.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".govdeploy").join("networks"))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::local("local", 31337)]
    #[case::hardhat_alias("hardhat", 31337)]
    #[case::anvil_alias("anvil", 31337)]
    #[case::bsc("bsc-testnet", 97)]
    #[case::bsc_hardhat_alias("bscTestnet", 97)]
    fn builtin_networks(#[case] name: &str, #[case] chain_id: u64) {
        let network = NetworkConfig::load_with_dir(name, None).unwrap();
        assert_eq!(network.chain_id, chain_id);
    }

    #[test]
    fn local_exposes_dev_accounts() {
        let local = NetworkConfig::local();
        assert!(local.dev_accounts);
        assert_eq!(local.rpc_url.as_str(), "http://127.0.0.1:8545/");
        assert_eq!(local.private_key_env(), "PRIVATE_KEY");
    }

    #[test]
    fn bsc_testnet_rpc_override() {
        let network =
            NetworkConfig::bsc_testnet_with_rpc(Some("https://bsc-testnet.example.org")).unwrap();
        assert_eq!(network.rpc_url.host_str(), Some("bsc-testnet.example.org"));
        assert!(!network.dev_accounts);

        let fallback = NetworkConfig::bsc_testnet_with_rpc(Some("  ")).unwrap();
        assert_eq!(fallback.rpc_url.host_str(), Some("data-seed-prebsc-1-s1.binance.org"));
    }

    #[test]
    fn bsc_testnet_rejects_bad_override() {
        let result = NetworkConfig::bsc_testnet_with_rpc(Some("not a url"));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidUrl { field: "BSC_TESTNET_RPC_URL", .. })
        ));
    }

    #[test]
    fn unknown_network() {
        let err = NetworkConfig::load_with_dir("nonexistent", None).unwrap_err();
        assert!(err.to_string().contains("local, bsc-testnet"));
    }

    #[test]
    fn standalone_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sepolia.yaml");
        std::fs::write(
            &path,
            "name: sepolia\nrpc_url: https://sepolia.example.org\nchain_id: 11155111\n\
             private_key_env: SEPOLIA_KEY\n",
        )
        .unwrap();

        let network = NetworkConfig::load_with_dir(path.to_str().unwrap(), None).unwrap();
        assert_eq!(network.name, "sepolia");
        assert_eq!(network.chain_id, 11155111);
        assert_eq!(network.private_key_env(), "SEPOLIA_KEY");
        assert!(!network.dev_accounts);
    }

    #[test]
    fn user_file_merges_over_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("local.yaml"), "rpc_url: http://10.0.0.5:8545\n").unwrap();

        let network = NetworkConfig::load_with_dir("local", Some(dir.path())).unwrap();
        assert_eq!(network.name, "local");
        assert_eq!(network.chain_id, 31337);
        assert_eq!(network.rpc_url.host_str(), Some("10.0.0.5"));
        assert!(network.dev_accounts);
    }

    #[test]
    fn user_file_without_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("staging.yaml"),
            "name: staging\nrpc_url: http://staging:8545\nchain_id: 1337\ndev_accounts: true\n",
        )
        .unwrap();

        let network = NetworkConfig::load_with_dir("staging", Some(dir.path())).unwrap();
        assert_eq!(network.chain_id, 1337);
        assert!(network.dev_accounts);
    }

    #[test]
    fn override_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("local.yaml"), "rpc: http://10.0.0.5:8545\n").unwrap();

        let result = NetworkConfig::load_with_dir("local", Some(dir.path()));
        assert!(matches!(result, Err(ConfigError::Network(_))));
    }

    #[test]
    fn malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "chain_id: [").unwrap();

        let result = NetworkConfig::load_with_dir(path.to_str().unwrap(), None);
        assert!(matches!(result, Err(ConfigError::Network(_))));
    }
}
