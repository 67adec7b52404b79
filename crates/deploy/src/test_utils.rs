//! Shared test utilities: an in-memory [`ChainClient`] that records every operation.

use std::collections::HashSet;

use alloy_primitives::{Address, B256, Bytes, TxHash, address, keccak256};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    ChainClient, DeployError, DeployResult, DeployedContract, constants::TIMELOCK,
    contracts::Timelock,
};

/// Dev account #0, the mock's sender.
pub(crate) const MOCK_SENDER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// One operation seen by the mock, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Op {
    Deploy { label: String, init_code: Bytes },
    Transact { label: String, to: Address, calldata: Bytes },
    Call { to: Address, selector: [u8; 4] },
}

impl Op {
    /// Label of a deploy or transact operation.
    pub(crate) fn label(&self) -> Option<&str> {
        match self {
            Self::Deploy { label, .. } | Self::Transact { label, .. } => Some(label),
            Self::Call { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    ops: Vec<Op>,
    nonce: u64,
    roles: HashSet<(B256, Address)>,
}

/// Mock chain that assigns `CREATE` addresses, answers timelock role queries
/// from the grants it has seen, and can be told to revert a given step.
#[derive(Debug)]
pub(crate) struct MockChainClient {
    chain_id: u64,
    revert_label: Option<String>,
    raw_call_output: Option<Bytes>,
    ignore_revokes: bool,
    state: Mutex<MockState>,
}

impl MockChainClient {
    pub(crate) fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            revert_label: None,
            raw_call_output: None,
            ignore_revokes: false,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Reverts the deploy or transact operation with this label.
    pub(crate) fn reverting_at(mut self, label: &str) -> Self {
        self.revert_label = Some(label.to_string());
        self
    }

    /// Answers every read-only call with `output`.
    pub(crate) fn with_raw_call_output(mut self, output: Bytes) -> Self {
        self.raw_call_output = Some(output);
        self
    }

    /// Accepts `revokeRole` transactions without applying them.
    pub(crate) fn ignoring_revokes(mut self) -> Self {
        self.ignore_revokes = true;
        self
    }

    /// OpenZeppelin role id: `keccak256(name)`.
    pub(crate) fn role_id(name: &str) -> B256 {
        keccak256(name.as_bytes())
    }

    pub(crate) fn ops(&self) -> Vec<Op> {
        self.state.lock().ops.clone()
    }

    /// Labels of deploy and transact operations, in order.
    pub(crate) fn tx_labels(&self) -> Vec<String> {
        self.ops().iter().filter_map(Op::label).map(str::to_string).collect()
    }

    pub(crate) fn has_role(&self, role: B256, account: Address) -> bool {
        self.state.lock().roles.contains(&(role, account))
    }

    fn next_hash(state: &mut MockState) -> TxHash {
        let hash = keccak256(state.nonce.to_be_bytes());
        state.nonce += 1;
        hash
    }

    fn check_revert(&self, label: &str, state: &mut MockState) -> DeployResult<()> {
        if self.revert_label.as_deref() == Some(label) {
            let tx_hash = Self::next_hash(state);
            return Err(DeployError::Reverted { label: label.to_string(), tx_hash });
        }
        Ok(())
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    fn sender(&self) -> Address {
        MOCK_SENDER
    }

    async fn chain_id(&self) -> DeployResult<u64> {
        Ok(self.chain_id)
    }

    async fn deploy(&self, label: &str, init_code: Bytes) -> DeployResult<DeployedContract> {
        let mut state = self.state.lock();
        state.ops.push(Op::Deploy { label: label.to_string(), init_code });
        self.check_revert(label, &mut state)?;

        let address = MOCK_SENDER.create(state.nonce);
        let tx_hash = Self::next_hash(&mut state);

        // The timelock constructor makes its admin argument an admin.
        if label == TIMELOCK {
            state.roles.insert((Self::role_id("TIMELOCK_ADMIN_ROLE"), MOCK_SENDER));
        }

        Ok(DeployedContract { address, tx_hash })
    }

    async fn transact(&self, label: &str, to: Address, calldata: Bytes) -> DeployResult<TxHash> {
        let mut state = self.state.lock();
        state.ops.push(Op::Transact { label: label.to_string(), to, calldata: calldata.clone() });
        self.check_revert(label, &mut state)?;

        if let Ok(grant) = Timelock::grantRoleCall::abi_decode(&calldata) {
            state.roles.insert((grant.role, grant.account));
        } else if let Ok(revoke) = Timelock::revokeRoleCall::abi_decode(&calldata) {
            if !self.ignore_revokes {
                state.roles.remove(&(revoke.role, revoke.account));
            }
        }

        Ok(Self::next_hash(&mut state))
    }

    async fn call(&self, to: Address, calldata: Bytes) -> DeployResult<Bytes> {
        let mut state = self.state.lock();
        let selector: [u8; 4] = calldata
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| DeployError::Rpc("mock: calldata shorter than a selector".into()))?;
        state.ops.push(Op::Call { to, selector });

        if let Some(output) = &self.raw_call_output {
            return Ok(output.clone());
        }

        let output = match selector {
            Timelock::PROPOSER_ROLECall::SELECTOR => Self::role_id("PROPOSER_ROLE").abi_encode(),
            Timelock::EXECUTOR_ROLECall::SELECTOR => Self::role_id("EXECUTOR_ROLE").abi_encode(),
            Timelock::TIMELOCK_ADMIN_ROLECall::SELECTOR => {
                Self::role_id("TIMELOCK_ADMIN_ROLE").abi_encode()
            }
            Timelock::hasRoleCall::SELECTOR => {
                let query = Timelock::hasRoleCall::abi_decode(&calldata)
                    .map_err(|e| DeployError::Rpc(format!("mock: bad hasRole call: {e}")))?;
                state.roles.contains(&(query.role, query.account)).abi_encode()
            }
            other => return Err(DeployError::Rpc(format!("mock: unexpected selector {other:?}"))),
        };

        Ok(output.into())
    }
}
