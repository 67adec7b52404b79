//! Standalone `HybridVoting` deployment.

use alloy_primitives::Address;
use tracing::info;

use crate::{
    ArtifactError, ArtifactStore, ChainClient, ContractArtifact, DeployResult, DeployedContract,
    Step, StepRecord,
    constants::HYBRID_VOTING,
    contracts::{HybridVoting, init_code},
};

/// Result of a hybrid voting deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HybridVotingDeployment {
    /// Deployed address.
    pub address: Address,
    /// The deployment step.
    pub step: StepRecord,
}

/// Loads the `HybridVoting` artifact.
pub fn load_hybrid_voting(store: &ArtifactStore) -> Result<ContractArtifact, ArtifactError> {
    store.load(HYBRID_VOTING)
}

/// Deploys `HybridVoting`, which takes no constructor arguments.
pub async fn deploy_hybrid_voting<C>(
    client: &C,
    artifact: &ContractArtifact,
) -> DeployResult<HybridVotingDeployment>
where
    C: ChainClient + ?Sized,
{
    let step = Step::DeployHybridVoting;
    info!(deployer = %client.sender(), "Deploying HybridVoting contract");

    let code = init_code(artifact, &HybridVoting::constructorCall {});
    let DeployedContract { address, tx_hash } = client.deploy(step.label(), code).await?;

    info!(%address, %tx_hash, "HybridVoting contract deployed");
    Ok(HybridVotingDeployment { address, step: StepRecord { step, tx_hash, contract: Some(address) } })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use alloy_primitives::Bytes;

    use super::*;
    use crate::{
        DeployError,
        test_utils::{MOCK_SENDER, MockChainClient, Op},
    };

    fn artifact() -> ContractArtifact {
        ContractArtifact {
            name: HYBRID_VOTING.to_string(),
            path: PathBuf::from("HybridVoting.json"),
            bytecode: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]),
        }
    }

    #[tokio::test]
    async fn deploys_bare_creation_code() {
        let client = MockChainClient::new(97);

        let deployment = deploy_hybrid_voting(&client, &artifact()).await.unwrap();

        assert_eq!(deployment.address, MOCK_SENDER.create(0));
        assert_eq!(deployment.step.contract, Some(deployment.address));
        assert_eq!(
            client.ops(),
            vec![Op::Deploy {
                label: "HybridVoting".to_string(),
                init_code: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]),
            }]
        );
    }

    #[tokio::test]
    async fn revert_is_reported() {
        let client = MockChainClient::new(97).reverting_at("HybridVoting");

        let err = deploy_hybrid_voting(&client, &artifact()).await.unwrap_err();
        assert!(matches!(err, DeployError::Reverted { ref label, .. } if label == "HybridVoting"));
    }

    #[test]
    fn loads_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("contracts/HybridVoting.sol");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("HybridVoting.json"), r#"{"bytecode":"0x6080"}"#).unwrap();

        let artifact = load_hybrid_voting(&ArtifactStore::new(dir.path())).unwrap();
        assert_eq!(artifact.bytecode, Bytes::from_static(&[0x60, 0x80]));
    }
}
