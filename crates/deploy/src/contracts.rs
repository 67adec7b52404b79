//! Deploy-time interfaces of the governance contracts.
//!
//! Only the constructors and the handful of methods called during setup are declared.

use alloy_primitives::Bytes;
use alloy_sol_types::{SolConstructor, sol};

use crate::ContractArtifact;

sol! {
    /// ERC-20 votes token.
    contract GovernanceToken {
        /// Delegates the caller's voting power.
        function delegate(address delegatee) external;
    }

    /// Timelock controller holding the governance-owned contracts.
    contract Timelock {
        constructor(uint256 minDelay, address[] proposers, address[] executors, address admin);

        function PROPOSER_ROLE() external view returns (bytes32);
        function EXECUTOR_ROLE() external view returns (bytes32);
        function TIMELOCK_ADMIN_ROLE() external view returns (bytes32);

        function hasRole(bytes32 role, address account) external view returns (bool);
        function grantRole(bytes32 role, address account) external;
        function revokeRole(bytes32 role, address account) external;
    }

    /// Governor voting with the token and executing through the timelock.
    contract MyGovernor {
        constructor(address token, address timelock);
    }

    /// Application contract owned by the timelock.
    contract Voting {
        constructor(address initialOwner);
    }

    /// Standalone voting contract without an owner.
    contract HybridVoting {
        constructor();
    }
}

/// Concatenates an artifact's creation code with ABI-encoded constructor arguments.
pub fn init_code<C: SolConstructor>(artifact: &ContractArtifact, constructor: &C) -> Bytes {
    let args = constructor.abi_encode();
    let mut code = Vec::with_capacity(artifact.bytecode.len() + args.len());
    code.extend_from_slice(&artifact.bytecode);
    code.extend_from_slice(&args);
    code.into()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use alloy_primitives::{Address, U256, address};
    use alloy_sol_types::{SolCall, SolValue};

    use super::*;

    fn artifact(code: &'static [u8]) -> ContractArtifact {
        ContractArtifact {
            name: "Test".to_string(),
            path: PathBuf::from("Test.json"),
            bytecode: Bytes::from_static(code),
        }
    }

    #[test]
    fn governor_init_code_appends_addresses() {
        let token = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
        let timelock = address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512");

        let code = init_code(&artifact(&[0x60, 0x80]), &MyGovernor::constructorCall { token, timelock });

        assert_eq!(&code[..2], &[0x60, 0x80]);
        assert_eq!(&code[2..], (token, timelock).abi_encode_params().as_slice());
    }

    #[test]
    fn timelock_init_code_encodes_empty_role_lists() {
        let admin = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let ctor = Timelock::constructorCall {
            minDelay: U256::from(3600),
            proposers: vec![],
            executors: vec![],
            admin,
        };

        let code = init_code(&artifact(&[0xfe]), &ctor);
        let expected =
            (U256::from(3600), Vec::<Address>::new(), Vec::<Address>::new(), admin).abi_encode_params();
        assert_eq!(&code[1..], expected.as_slice());
    }

    #[test]
    fn delegate_selector() {
        // delegate(address)
        assert_eq!(GovernanceToken::delegateCall::SELECTOR, [0x5c, 0x19, 0xa9, 0x5c]);
    }

    #[test]
    fn role_management_selectors() {
        // grantRole(bytes32,address) / revokeRole(bytes32,address) / hasRole(bytes32,address)
        assert_eq!(Timelock::grantRoleCall::SELECTOR, [0x2f, 0x2f, 0xf1, 0x5d]);
        assert_eq!(Timelock::revokeRoleCall::SELECTOR, [0xd5, 0x47, 0x74, 0x1f]);
        assert_eq!(Timelock::hasRoleCall::SELECTOR, [0x91, 0xd1, 0x48, 0x54]);
    }
}
