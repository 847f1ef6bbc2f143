//! Digital asset composition from raw accounts.
//!
//! These functions are pure: they never fetch, and decoding the same bytes
//! twice yields equal values.

use solana_program::{program_pack::Pack, pubkey::Pubkey};
use spl_token::state::{Account as TokenAccount, Mint};
use token_metadata_interface::state::{Key, Metadata, TokenRecord};

use crate::{
    edition::AssetEdition,
    error::{AccountKind, DigitalAssetError},
    fetch::EncodedAccount,
};

/// A mint with its metadata and, when one exists, its edition.
#[derive(Clone, Debug, PartialEq)]
pub struct DigitalAsset {
    /// The mint address
    pub address: Pubkey,
    pub mint: Mint,
    pub metadata_address: Pubkey,
    pub metadata: Metadata,
    /// `None` when no edition account exists or it holds a non-edition key
    pub edition: Option<AssetEdition>,
}

/// A digital asset seen through one token account holding it.
#[derive(Clone, Debug, PartialEq)]
pub struct DigitalAssetWithToken {
    pub asset: DigitalAsset,
    pub token_address: Pubkey,
    pub token: TokenAccount,
    /// Only present for programmable assets
    pub token_record: Option<TokenRecord>,
}

fn require_exists(account: &EncodedAccount, kind: AccountKind) -> Result<(), DigitalAssetError> {
    if account.exists {
        Ok(())
    } else {
        Err(DigitalAssetError::AccountNotFound {
            account: kind,
            address: account.address,
        })
    }
}

// Token-2022 accounts append extensions after the base layout, so only the
// leading `LEN` bytes are unpacked.
fn unpack_prefix<T: Pack + solana_program::program_pack::IsInitialized>(
    account: &EncodedAccount,
    kind: AccountKind,
) -> Result<T, DigitalAssetError> {
    let data = account
        .data
        .get(..T::LEN)
        .ok_or_else(|| DigitalAssetError::decode(kind, account.address, "account data too small"))?;
    T::unpack(data).map_err(|err| DigitalAssetError::decode(kind, account.address, err))
}

/// Decode a required mint account.
pub fn deserialize_mint(account: &EncodedAccount) -> Result<Mint, DigitalAssetError> {
    require_exists(account, AccountKind::Mint)?;
    unpack_prefix(account, AccountKind::Mint)
}

/// Decode a required token account.
pub fn deserialize_token(account: &EncodedAccount) -> Result<TokenAccount, DigitalAssetError> {
    require_exists(account, AccountKind::Token)?;
    unpack_prefix(account, AccountKind::Token)
}

/// Decode a required metadata account.
pub fn deserialize_metadata(account: &EncodedAccount) -> Result<Metadata, DigitalAssetError> {
    require_exists(account, AccountKind::Metadata)?;
    Metadata::from_bytes(&account.data)
        .map_err(|err| DigitalAssetError::decode(AccountKind::Metadata, account.address, err))
}

/// Decode an optional edition account.
///
/// Missing accounts and non-edition keys are `Ok(None)`; an edition key with
/// malformed bytes is a decode error.
pub fn deserialize_edition(
    account: &EncodedAccount,
) -> Result<Option<AssetEdition>, DigitalAssetError> {
    if !account.exists {
        return Ok(None);
    }
    AssetEdition::from_account_data(account.address, &account.data)
        .map_err(|err| DigitalAssetError::decode(AccountKind::Edition, account.address, err))
}

/// Decode an optional token record; absent unless it exists and decodes.
pub fn deserialize_token_record(account: &EncodedAccount) -> Option<TokenRecord> {
    if !account.exists || Key::from_account_data(&account.data) != Some(Key::TokenRecord) {
        return None;
    }
    TokenRecord::from_bytes(&account.data).ok()
}

/// Assemble a digital asset from its mint, metadata and optional edition accounts.
pub fn deserialize_digital_asset(
    mint: &EncodedAccount,
    metadata: &EncodedAccount,
    edition: Option<&EncodedAccount>,
) -> Result<DigitalAsset, DigitalAssetError> {
    let mint_state = deserialize_mint(mint)?;
    let metadata_state = deserialize_metadata(metadata)?;
    let edition = match edition {
        Some(account) => deserialize_edition(account)?,
        None => None,
    };
    Ok(DigitalAsset {
        address: mint.address,
        mint: mint_state,
        metadata_address: metadata.address,
        metadata: metadata_state,
        edition,
    })
}

/// Assemble a digital asset together with a token account and its optional token record.
pub fn deserialize_digital_asset_with_token(
    mint: &EncodedAccount,
    metadata: &EncodedAccount,
    edition: Option<&EncodedAccount>,
    token: &EncodedAccount,
    token_record: Option<&EncodedAccount>,
) -> Result<DigitalAssetWithToken, DigitalAssetError> {
    let asset = deserialize_digital_asset(mint, metadata, edition)?;
    let token_state = deserialize_token(token)?;
    Ok(DigitalAssetWithToken {
        asset,
        token_address: token.address,
        token: token_state,
        token_record: token_record.and_then(deserialize_token_record),
    })
}
