//! Submission of the contract creation transaction and the wait for its
//! confirmation.

use {
    crate::error::Error,
    alloy::{
        network::TransactionBuilder,
        primitives::{Address, Bytes, TxHash},
        providers::{PendingTransactionBuilder, Provider},
        rpc::types::TransactionRequest,
    },
    anyhow::{Context, Result},
    ethrpc::AlloyProvider,
};

/// Abstracts the node the deployment is sent to.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Node: Send + Sync {
    /// The account that signs and pays for the deployment.
    fn sender(&self) -> Address;

    /// Nonce of the next transaction of `account`, including transactions
    /// that are still pending.
    async fn nonce(&self, account: Address) -> Result<u64>;

    /// Signs and sends the transaction. Returns as soon as the node accepted
    /// it.
    async fn submit(&self, tx: TransactionRequest) -> Result<TxHash>;

    /// Waits until the transaction is included in a block and `confirmations`
    /// blocks (including that one) exist.
    async fn confirm(&self, tx_hash: TxHash, confirmations: u64) -> Result<Confirmation>;
}

/// What the receipt of a mined transaction says about the deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub success: bool,
    pub contract_address: Option<Address>,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// A deployment the node accepted but which is not confirmed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDeployment {
    /// Address the contract will have once mined. Derived from the sender
    /// and the nonce of the creation transaction.
    pub address: Address,
    pub tx_hash: TxHash,
    pub nonce: u64,
}

/// A confirmed deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub address: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

pub struct Deployer<N> {
    node: N,
    confirmations: u64,
}

impl<N: Node> Deployer<N> {
    pub fn new(node: N, confirmations: u64) -> Self {
        Self {
            node,
            confirmations,
        }
    }

    /// Sends the contract creation transaction with `code` as its input.
    ///
    /// The nonce is fixed before submission so the contract address is known
    /// as soon as the node acknowledges the transaction.
    pub async fn submit(&self, code: Bytes) -> Result<PendingDeployment, Error> {
        let sender = self.node.sender();
        let nonce = self
            .node
            .nonce(sender)
            .await
            .context("failed to fetch sender nonce")
            .map_err(Error::Network)?;

        let tx = TransactionRequest::default()
            .with_from(sender)
            .with_nonce(nonce)
            .with_deploy_code(code);
        let tx_hash = self
            .node
            .submit(tx)
            .await
            .context("failed to submit deployment transaction")
            .map_err(Error::Network)?;

        let pending = PendingDeployment {
            address: sender.create(nonce),
            tx_hash,
            nonce,
        };
        tracing::debug!(?pending, %sender, "deployment submitted");
        Ok(pending)
    }

    /// Waits for the deployment to be mined. A reverted deployment is an
    /// error.
    pub async fn confirm(&self, pending: &PendingDeployment) -> Result<Deployment, Error> {
        let confirmation = self
            .node
            .confirm(pending.tx_hash, self.confirmations)
            .await
            .context("failed to wait for deployment confirmation")
            .map_err(Error::Network)?;

        if !confirmation.success {
            return Err(Error::Network(anyhow::anyhow!(
                "deployment transaction {} reverted in block {:?}",
                pending.tx_hash,
                confirmation.block_number,
            )));
        }

        let address = match confirmation.contract_address {
            Some(address) if address != pending.address => {
                tracing::warn!(
                    expected = %pending.address,
                    actual = %address,
                    "contract deployed to unexpected address"
                );
                address
            }
            _ => pending.address,
        };

        let deployment = Deployment {
            address,
            tx_hash: pending.tx_hash,
            block_number: confirmation.block_number,
            gas_used: confirmation.gas_used,
        };
        tracing::info!(?deployment, "deployment confirmed");
        Ok(deployment)
    }
}

/// [`Node`] backed by a JSON-RPC provider that holds the sender's key.
pub struct RpcNode {
    provider: AlloyProvider,
    sender: Address,
}

impl RpcNode {
    pub fn new(provider: AlloyProvider, sender: Address) -> Self {
        Self { provider, sender }
    }
}

#[async_trait::async_trait]
impl Node for RpcNode {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn nonce(&self, account: Address) -> Result<u64> {
        Ok(self.provider.get_transaction_count(account).pending().await?)
    }

    async fn submit(&self, tx: TransactionRequest) -> Result<TxHash> {
        let pending = self.provider.send_transaction(tx).await?;
        Ok(*pending.tx_hash())
    }

    async fn confirm(&self, tx_hash: TxHash, confirmations: u64) -> Result<Confirmation> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(confirmations)
            .get_receipt()
            .await?;
        Ok(Confirmation {
            success: receipt.status(),
            contract_address: receipt.contract_address,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}
