//! Entry points tying configuration, artifacts and the chain client together.

use tracing::info;

use crate::{
    AlloyChainClient, ArtifactStore, ChainClient, DeployConfig, DeployResult, Deployed,
    DeploymentReport, GovernanceArtifacts, GovernanceDeployer, GovernanceParams, ensure_chain_id,
    hybrid::{deploy_hybrid_voting, load_hybrid_voting},
};

fn connect(config: &DeployConfig) -> AlloyChainClient {
    AlloyChainClient::new(config.rpc_url.clone(), config.signer.clone(), config.tx)
}

/// Deploys and wires the governance suite on the configured network.
pub async fn deploy_governance(
    config: &DeployConfig,
    params: GovernanceParams,
) -> DeployResult<DeploymentReport> {
    let store = ArtifactStore::new(&config.artifacts_dir);
    let artifacts = GovernanceArtifacts::load(&store)?;
    info!(root = %store.root().display(), "Loaded governance artifacts");

    run_governance(&connect(config), config, artifacts, params).await
}

/// Deploys the standalone `HybridVoting` contract on the configured network.
pub async fn deploy_hybrid(config: &DeployConfig) -> DeployResult<DeploymentReport> {
    let artifact = load_hybrid_voting(&ArtifactStore::new(&config.artifacts_dir))?;
    let client = connect(config);

    ensure_chain_id(&client, &config.network).await?;
    let deployment = deploy_hybrid_voting(&client, &artifact).await?;

    Ok(DeploymentReport {
        network: config.network.name.clone(),
        chain_id: config.network.chain_id,
        deployer: client.sender(),
        deployed: Deployed::HybridVoting { address: deployment.address },
        steps: vec![deployment.step],
    })
}

async fn run_governance<C>(
    client: &C,
    config: &DeployConfig,
    artifacts: GovernanceArtifacts,
    params: GovernanceParams,
) -> DeployResult<DeploymentReport>
where
    C: ChainClient + ?Sized,
{
    ensure_chain_id(client, &config.network).await?;
    let deployment = GovernanceDeployer::new(client, artifacts, params).run().await?;

    Ok(DeploymentReport {
        network: config.network.name.clone(),
        chain_id: config.network.chain_id,
        deployer: client.sender(),
        deployed: Deployed::Governance { contracts: deployment.addresses, roles: deployment.roles },
        steps: deployment.steps,
    })
}
