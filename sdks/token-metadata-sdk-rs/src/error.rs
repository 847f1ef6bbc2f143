//! Error types

use std::fmt;

use solana_client::client_error::ClientError;
use solana_program::pubkey::Pubkey;
use thiserror::Error;

/// Accounts a digital asset is assembled from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccountKind {
    Mint,
    Metadata,
    Edition,
    Token,
    TokenRecord,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountKind::Mint => "Mint",
            AccountKind::Metadata => "Metadata",
            AccountKind::Edition => "Edition",
            AccountKind::Token => "Token",
            AccountKind::TokenRecord => "TokenRecord",
        };
        f.write_str(name)
    }
}

/// Transport failures of an `AccountFetcher`.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("ClientError: {0}")]
    ClientError(#[from] Box<ClientError>),

    #[error("fetcher returned {actual} accounts for {expected} addresses")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Error: `{0}`")]
    CustomError(String),
}

impl From<ClientError> for FetchError {
    fn from(err: ClientError) -> Self {
        FetchError::ClientError(Box::new(err))
    }
}

/// Failures of the digital asset readers.
#[derive(Error, Debug)]
pub enum DigitalAssetError {
    /// A required account does not exist.
    #[error("{account} account not found at {address}")]
    AccountNotFound { account: AccountKind, address: Pubkey },

    /// A required account exists but its bytes do not match the layout.
    #[error("failed to decode {account} account at {address}: {reason}")]
    Decode {
        account: AccountKind,
        address: Pubkey,
        reason: String,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl DigitalAssetError {
    pub(crate) fn decode(account: AccountKind, address: Pubkey, reason: impl ToString) -> Self {
        DigitalAssetError::Decode {
            account,
            address,
            reason: reason.to_string(),
        }
    }
}

/// Seed-encoding failures of the PDA deriver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PdaError {
    #[error("seed {index} is {len} bytes, the maximum is 32")]
    SeedTooLong { index: usize, len: usize },

    #[error("{0} seeds supplied, at most 15 fit alongside the bump")]
    TooManySeeds(usize),

    #[error("no viable bump seed")]
    NoViableBump,
}
