//! Governance suite deployment: token, timelock, governor and voting contract.
//!
//! Steps run strictly in sequence and each one waits for its predecessor's
//! confirmation:
//!
//! 1. deploy `GovernanceToken`
//! 2. delegate the deployer's votes to itself
//! 3. deploy `Timelock(minDelay, [], [], deployer)`
//! 4. deploy `MyGovernor(token, timelock)`
//! 5. deploy `Voting(timelock)`, owned by the timelock from construction
//! 6. grant `PROPOSER_ROLE` to the governor and `EXECUTOR_ROLE` to the zero address
//! 7. revoke the deployer's `TIMELOCK_ADMIN_ROLE`
//!
//! After step 7 the timelock is administered only by itself, so governance
//! proposals are the only way to change it.

use std::time::Duration;

use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::SolCall;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    ArtifactError, ArtifactStore, ChainClient, ConfigError, ContractArtifact, DeployError,
    DeployResult,
    DeployedContract, Step, StepRecord, call_typed,
    constants::{DEFAULT_MIN_DELAY, GOVERNANCE_TOKEN, GOVERNOR, TIMELOCK, VOTING},
    contracts::{GovernanceToken, MyGovernor, Timelock, Voting, init_code},
};

/// Tunables of the governance procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GovernanceParams {
    /// Minimum delay the timelock enforces between queueing and execution.
    pub min_delay: Duration,
    /// Whether to read the roles back after wiring them.
    pub role_check: bool,
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self { min_delay: DEFAULT_MIN_DELAY, role_check: true }
    }
}

impl GovernanceParams {
    /// Validates the params.
    ///
    /// The timelock counts its delay in whole seconds, so a fractional delay is rejected
    /// instead of being truncated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_delay.subsec_nanos() != 0 {
            return Err(ConfigError::OutOfRange {
                field: "min-delay",
                constraint: "a whole number of seconds",
                value: format!("{:?}", self.min_delay),
            });
        }
        Ok(())
    }
}

/// Creation code of the four governance contracts.
#[derive(Debug, Clone)]
pub struct GovernanceArtifacts {
    /// `GovernanceToken`.
    pub token: ContractArtifact,
    /// `Timelock`.
    pub timelock: ContractArtifact,
    /// `MyGovernor`.
    pub governor: ContractArtifact,
    /// `Voting`.
    pub voting: ContractArtifact,
}

impl GovernanceArtifacts {
    /// Loads every artifact up front, so a missing one fails before any transaction.
    pub fn load(store: &ArtifactStore) -> Result<Self, ArtifactError> {
        Ok(Self {
            token: store.load(GOVERNANCE_TOKEN)?,
            timelock: store.load(TIMELOCK)?,
            governor: store.load(GOVERNOR)?,
            voting: store.load(VOTING)?,
        })
    }
}

/// Addresses of the deployed suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GovernanceAddresses {
    /// Governance token.
    pub token: Address,
    /// Timelock controller.
    pub timelock: Address,
    /// Governor.
    pub governor: Address,
    /// Timelock-owned voting contract.
    pub voting: Address,
}

/// Role identifiers read from the deployed timelock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelockRoles {
    /// `PROPOSER_ROLE`.
    pub proposer: B256,
    /// `EXECUTOR_ROLE`.
    pub executor: B256,
    /// `TIMELOCK_ADMIN_ROLE`.
    pub admin: B256,
}

/// Result of a completed governance deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceDeployment {
    /// Deployed addresses.
    pub addresses: GovernanceAddresses,
    /// Timelock role ids.
    pub roles: TimelockRoles,
    /// Executed steps, in order.
    pub steps: Vec<StepRecord>,
}

/// Runs the governance procedure against a [`ChainClient`].
pub struct GovernanceDeployer<'a, C: ?Sized> {
    client: &'a C,
    artifacts: GovernanceArtifacts,
    params: GovernanceParams,
    steps: Vec<StepRecord>,
}

impl<'a, C> GovernanceDeployer<'a, C>
where
    C: ChainClient + ?Sized,
{
    /// Creates a deployer; nothing is sent until [`Self::run`].
    pub const fn new(client: &'a C, artifacts: GovernanceArtifacts, params: GovernanceParams) -> Self {
        Self { client, artifacts, params, steps: Vec::new() }
    }

    /// Executes every step and returns the deployed suite.
    ///
    /// The first failing step aborts the run; later steps are never attempted.
    #[instrument(skip_all)]
    pub async fn run(mut self) -> DeployResult<GovernanceDeployment> {
        self.params.validate()?;
        let deployer = self.client.sender();
        info!(%deployer, min_delay = ?self.params.min_delay, "Deploying governance contracts");

        let token = self.deploy_token().await?;
        self.delegate_votes(token, deployer).await?;
        let timelock = self.deploy_timelock(deployer).await?;
        let governor = self.deploy_governor(token, timelock).await?;
        let voting = self.deploy_voting(timelock).await?;

        info!("Configuring roles and ownership");
        let roles = self.read_roles(timelock).await?;
        self.grant(Step::GrantProposer, timelock, roles.proposer, governor).await?;
        // Anyone may execute a proposal once its delay has passed.
        self.grant(Step::GrantExecutor, timelock, roles.executor, Address::ZERO).await?;
        self.revoke_admin(timelock, roles.admin, deployer).await?;

        let addresses = GovernanceAddresses { token, timelock, governor, voting };
        if self.params.role_check {
            self.check_roles(&addresses, &roles, deployer).await?;
        }

        info!(
            token = %addresses.token,
            timelock = %addresses.timelock,
            governor = %addresses.governor,
            voting = %addresses.voting,
            "Deployment and setup complete"
        );
        Ok(GovernanceDeployment { addresses, roles, steps: self.steps })
    }

    async fn deploy(&mut self, step: Step, code: Bytes) -> DeployResult<Address> {
        let DeployedContract { address, tx_hash } = self.client.deploy(step.label(), code).await?;
        info!(step = %step, %address, "Contract deployed");
        self.steps.push(StepRecord { step, tx_hash, contract: Some(address) });
        Ok(address)
    }

    async fn transact(&mut self, step: Step, to: Address, call: impl SolCall) -> DeployResult<()> {
        let tx_hash = self.client.transact(step.label(), to, call.abi_encode().into()).await?;
        self.steps.push(StepRecord { step, tx_hash, contract: None });
        Ok(())
    }

    async fn deploy_token(&mut self) -> DeployResult<Address> {
        let code = self.artifacts.token.bytecode.clone();
        self.deploy(Step::DeployToken, code).await
    }

    async fn delegate_votes(&mut self, token: Address, deployer: Address) -> DeployResult<()> {
        self.transact(Step::DelegateVotes, token, GovernanceToken::delegateCall { delegatee: deployer })
            .await?;
        info!(%deployer, "Delegated deployer voting power to itself");
        Ok(())
    }

    async fn deploy_timelock(&mut self, admin: Address) -> DeployResult<Address> {
        // Proposers and executors stay empty until the governor exists.
        let ctor = Timelock::constructorCall {
            minDelay: U256::from(self.params.min_delay.as_secs()),
            proposers: Vec::new(),
            executors: Vec::new(),
            admin,
        };
        let code = init_code(&self.artifacts.timelock, &ctor);
        self.deploy(Step::DeployTimelock, code).await
    }

    async fn deploy_governor(&mut self, token: Address, timelock: Address) -> DeployResult<Address> {
        let code =
            init_code(&self.artifacts.governor, &MyGovernor::constructorCall { token, timelock });
        self.deploy(Step::DeployGovernor, code).await
    }

    async fn deploy_voting(&mut self, timelock: Address) -> DeployResult<Address> {
        let code =
            init_code(&self.artifacts.voting, &Voting::constructorCall { initialOwner: timelock });
        self.deploy(Step::DeployVoting, code).await
    }

    async fn read_roles(&self, timelock: Address) -> DeployResult<TimelockRoles> {
        let roles = TimelockRoles {
            proposer: call_typed(self.client, timelock, Timelock::PROPOSER_ROLECall {}).await?,
            executor: call_typed(self.client, timelock, Timelock::EXECUTOR_ROLECall {}).await?,
            admin: call_typed(self.client, timelock, Timelock::TIMELOCK_ADMIN_ROLECall {}).await?,
        };
        info!(proposer = %roles.proposer, executor = %roles.executor, admin = %roles.admin, "Read timelock roles");
        Ok(roles)
    }

    async fn grant(
        &mut self,
        step: Step,
        timelock: Address,
        role: B256,
        account: Address,
    ) -> DeployResult<()> {
        info!(step = %step, %role, %account, "Granting timelock role");
        self.transact(step, timelock, Timelock::grantRoleCall { role, account }).await
    }

    async fn revoke_admin(
        &mut self,
        timelock: Address,
        role: B256,
        deployer: Address,
    ) -> DeployResult<()> {
        info!(%deployer, "Revoking deployer's TIMELOCK_ADMIN_ROLE");
        self.transact(Step::RevokeAdmin, timelock, Timelock::revokeRoleCall { role, account: deployer })
            .await
    }

    async fn check_roles(
        &self,
        addresses: &GovernanceAddresses,
        roles: &TimelockRoles,
        deployer: Address,
    ) -> DeployResult<()> {
        let expectations = [
            ("governor holds PROPOSER_ROLE", roles.proposer, addresses.governor, true),
            ("anyone holds EXECUTOR_ROLE", roles.executor, Address::ZERO, true),
            ("deployer no longer holds TIMELOCK_ADMIN_ROLE", roles.admin, deployer, false),
        ];

        for (what, role, account, expected) in expectations {
            let held = call_typed(
                self.client,
                addresses.timelock,
                Timelock::hasRoleCall { role, account },
            )
            .await?;
            if held != expected {
                return Err(DeployError::RoleCheck(format!("expected {what}")));
            }
        }

        info!("Timelock roles verified");
        Ok(())
    }
}
