//! The chain access seam used by the deployment procedures.

use alloy_network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types_eth::{TransactionReceipt, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::{DeployError, DeployResult, NetworkConfig, TxOptions};

/// A contract created by a confirmed deployment transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeployedContract {
    /// Address of the new contract.
    pub address: Address,
    /// Hash of the creating transaction.
    pub tx_hash: TxHash,
}

/// Access to the target chain on behalf of the deployer account.
///
/// `deploy` and `transact` only return once the transaction is confirmed with a
/// successful status.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Account sending every transaction.
    fn sender(&self) -> Address;

    /// Chain id reported by the endpoint.
    async fn chain_id(&self) -> DeployResult<u64>;

    /// Sends a contract creation transaction and returns the created contract.
    async fn deploy(&self, label: &str, init_code: Bytes) -> DeployResult<DeployedContract>;

    /// Sends a call transaction to `to`.
    async fn transact(&self, label: &str, to: Address, calldata: Bytes) -> DeployResult<TxHash>;

    /// Executes a read-only call against the latest block.
    async fn call(&self, to: Address, calldata: Bytes) -> DeployResult<Bytes>;
}

/// Executes a typed read-only call and decodes its return value.
pub async fn call_typed<C, T>(client: &C, to: Address, call: T) -> DeployResult<T::Return>
where
    C: ChainClient + ?Sized,
    T: SolCall + Send,
{
    let output = client.call(to, call.abi_encode().into()).await?;
    T::abi_decode_returns(&output)
        .map_err(|e| DeployError::Decode { what: T::SIGNATURE, reason: e.to_string() })
}

/// Fails unless the endpoint serves the chain the network is configured for.
///
/// Runs before the first transaction so a mistyped endpoint cannot burn funds on
/// the wrong chain.
pub async fn ensure_chain_id<C>(client: &C, network: &NetworkConfig) -> DeployResult<()>
where
    C: ChainClient + ?Sized,
{
    let actual = client.chain_id().await?;
    if actual != network.chain_id {
        return Err(DeployError::ChainIdMismatch {
            network: network.name.clone(),
            expected: network.chain_id,
            actual,
        });
    }

    info!(network = %network.name, chain_id = actual, deployer = %client.sender(), "Connected");
    Ok(())
}

/// [`ChainClient`] over an HTTP provider signing with a local private key.
#[derive(Clone)]
pub struct AlloyChainClient {
    provider: DynProvider,
    sender: Address,
    tx: TxOptions,
}

impl std::fmt::Debug for AlloyChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlloyChainClient")
            .field("sender", &self.sender)
            .field("tx", &self.tx)
            .finish_non_exhaustive()
    }
}

impl AlloyChainClient {
    /// Creates a client for `rpc_url` signing with `signer`.
    ///
    /// Nonce, gas and fee fields are filled by the provider's recommended fillers.
    pub fn new(rpc_url: Url, signer: PrivateKeySigner, tx: TxOptions) -> Self {
        let sender = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url)
            .erased();

        Self { provider, sender, tx }
    }

    async fn send_and_confirm(
        &self,
        label: &str,
        tx: TransactionRequest,
    ) -> DeployResult<TransactionReceipt> {
        let pending = self
            .provider
            .send_transaction(tx.with_from(self.sender))
            .await
            .map_err(|e| DeployError::Rpc(format!("{label}: send_transaction failed: {e}")))?;

        let tx_hash = *pending.tx_hash();
        debug!(%tx_hash, label, confirmations = self.tx.confirmations, "Transaction sent, waiting for receipt");

        let receipt = pending
            .with_required_confirmations(self.tx.confirmations)
            .with_timeout(self.tx.receipt_timeout)
            .get_receipt()
            .await
            .map_err(|e| DeployError::Rpc(format!("{label}: waiting for {tx_hash} failed: {e}")))?;

        if !receipt.status() {
            return Err(DeployError::Reverted { label: label.to_string(), tx_hash });
        }

        info!(
            %tx_hash,
            label,
            block_number = receipt.block_number(),
            gas_used = receipt.gas_used(),
            "Transaction confirmed"
        );
        Ok(receipt)
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn chain_id(&self) -> DeployResult<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| DeployError::Rpc(format!("get_chain_id failed: {e}")))
    }

    async fn deploy(&self, label: &str, init_code: Bytes) -> DeployResult<DeployedContract> {
        let tx = TransactionRequest::default().with_deploy_code(init_code);
        let receipt = self.send_and_confirm(label, tx).await?;
        let tx_hash = receipt.transaction_hash();

        let address = receipt.contract_address().ok_or_else(|| {
            DeployError::MissingContractAddress { label: label.to_string(), tx_hash }
        })?;

        Ok(DeployedContract { address, tx_hash })
    }

    async fn transact(&self, label: &str, to: Address, calldata: Bytes) -> DeployResult<TxHash> {
        let tx = TransactionRequest::default().with_to(to).with_input(calldata);
        let receipt = self.send_and_confirm(label, tx).await?;
        Ok(receipt.transaction_hash())
    }

    async fn call(&self, to: Address, calldata: Bytes) -> DeployResult<Bytes> {
        let tx = TransactionRequest::default().with_from(self.sender).with_to(to).with_input(calldata);
        self.provider
            .call(tx)
            .await
            .map_err(|e| DeployError::Rpc(format!("eth_call to {to} failed: {e}")))
    }
}
