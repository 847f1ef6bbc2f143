//! Batched account reads.

use async_trait::async_trait;
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_config::RpcAccountInfoConfig};
use solana_program::pubkey::Pubkey;
use solana_sdk::{account::Account, commitment_config::CommitmentConfig};

use crate::error::FetchError;

/// Upper bound on keys per `getMultipleAccounts` request.
pub const MAX_MULTIPLE_ACCOUNTS: usize = 100;

/// Raw account as returned by a fetch. `exists == false` means nothing lives at `address`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodedAccount {
    /// The requested address
    pub address: Pubkey,
    /// `false` when no account lives at `address`
    pub exists: bool,
    /// Owning program, default for missing accounts
    pub owner: Pubkey,
    pub lamports: u64,
    /// Raw account data, empty for missing accounts
    pub data: Vec<u8>,
}

impl EncodedAccount {
    pub fn new(address: Pubkey, owner: Pubkey, lamports: u64, data: Vec<u8>) -> Self {
        Self {
            address,
            exists: true,
            owner,
            lamports,
            data,
        }
    }

    /// Placeholder for an address with no account.
    pub fn missing(address: Pubkey) -> Self {
        Self {
            address,
            exists: false,
            owner: Pubkey::default(),
            lamports: 0,
            data: Vec::new(),
        }
    }

    pub fn from_rpc(address: Pubkey, account: Option<Account>) -> Self {
        match account {
            Some(account) => Self::new(address, account.owner, account.lamports, account.data),
            None => Self::missing(address),
        }
    }
}

/// Per-call options handed through to the transport untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchConfig {
    /// Overrides the fetcher's default commitment
    pub commitment: Option<CommitmentConfig>,
    /// Reject responses from nodes behind this slot
    pub min_context_slot: Option<u64>,
}

impl FetchConfig {
    pub fn with_commitment(commitment: CommitmentConfig) -> Self {
        Self {
            commitment: Some(commitment),
            ..Self::default()
        }
    }

    pub fn with_min_context_slot(self, slot: u64) -> Self {
        Self {
            min_context_slot: Some(slot),
            ..self
        }
    }
}

/// Reads many accounts in one round trip.
///
/// Implementations must return exactly one entry per requested address, in
/// request order, marking absent accounts with `exists == false`.
#[async_trait]
pub trait AccountFetcher: Send + Sync {
    async fn fetch_accounts(
        &self,
        addresses: &[Pubkey],
        config: &FetchConfig,
    ) -> Result<Vec<EncodedAccount>, FetchError>;
}

#[async_trait]
impl<T: AccountFetcher + ?Sized> AccountFetcher for std::sync::Arc<T> {
    async fn fetch_accounts(
        &self,
        addresses: &[Pubkey],
        config: &FetchConfig,
    ) -> Result<Vec<EncodedAccount>, FetchError> {
        (**self).fetch_accounts(addresses, config).await
    }
}

#[async_trait]
impl AccountFetcher for RpcClient {
    async fn fetch_accounts(
        &self,
        addresses: &[Pubkey],
        config: &FetchConfig,
    ) -> Result<Vec<EncodedAccount>, FetchError> {
        let rpc_config = RpcAccountInfoConfig {
            commitment: Some(config.commitment.unwrap_or_else(|| self.commitment())),
            min_context_slot: config.min_context_slot,
            ..RpcAccountInfoConfig::default()
        };
        let mut accounts = Vec::with_capacity(addresses.len());
        for chunk in addresses.chunks(MAX_MULTIPLE_ACCOUNTS) {
            let response = self
                .get_multiple_accounts_with_config(chunk, rpc_config.clone())
                .await?;
            if response.value.len() != chunk.len() {
                return Err(FetchError::LengthMismatch {
                    expected: chunk.len(),
                    actual: response.value.len(),
                });
            }
            accounts.extend(
                chunk
                    .iter()
                    .zip(response.value)
                    .map(|(address, account)| EncodedAccount::from_rpc(*address, account)),
            );
        }
        Ok(accounts)
    }
}
