//! Digital asset readers.
//!
//! Every reader gathers all addresses it needs before issuing one batched
//! fetch. The by-metadata path is the exception: the mint is only known after
//! the metadata account has been read, so it takes two sequential fetches.

use solana_program::pubkey::Pubkey;
use token_metadata_interface::{
    find_associated_token_pda, find_master_edition_pda_with_program,
    find_metadata_pda_with_program, find_token_record_pda_with_program,
    state::{Metadata, TokenRecord},
};
use tracing::{debug, instrument};

use crate::{
    digital_asset::{
        deserialize_digital_asset, deserialize_digital_asset_with_token, deserialize_metadata,
        deserialize_token_record, DigitalAsset, DigitalAssetWithToken,
    },
    error::{DigitalAssetError, FetchError},
    fetch::{AccountFetcher, EncodedAccount, FetchConfig},
};

/// Reads and composes Token Metadata accounts through an [`AccountFetcher`].
///
/// The `program_id` must be the deployed Token Metadata program id.
pub struct TokenMetadataReader<F> {
    pub program_id: Pubkey,
    fetcher: F,
}

impl<F: AccountFetcher> TokenMetadataReader<F> {
    pub fn new(program_id: Pubkey, fetcher: F) -> Self {
        Self {
            program_id,
            fetcher,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn asset_addresses(&self, mint: &Pubkey) -> [Pubkey; 3] {
        let (metadata, _) = find_metadata_pda_with_program(&self.program_id, mint);
        let (edition, _) = find_master_edition_pda_with_program(&self.program_id, mint);
        [*mint, metadata, edition]
    }

    async fn fetch(
        &self,
        addresses: &[Pubkey],
        config: &FetchConfig,
    ) -> Result<Vec<EncodedAccount>, FetchError> {
        debug!(count = addresses.len(), "fetching accounts");
        let accounts = self.fetcher.fetch_accounts(addresses, config).await?;
        if accounts.len() != addresses.len() {
            return Err(FetchError::LengthMismatch {
                expected: addresses.len(),
                actual: accounts.len(),
            });
        }
        Ok(accounts)
    }

    /// Fetch the mint, metadata and edition of `mint` in one round trip.
    #[instrument(skip_all, fields(%mint))]
    pub async fn fetch_digital_asset(
        &self,
        mint: &Pubkey,
        config: &FetchConfig,
    ) -> Result<DigitalAsset, DigitalAssetError> {
        let accounts = self.fetch(&self.asset_addresses(mint), config).await?;
        let [mint, metadata, edition] = <[EncodedAccount; 3]>::try_from(accounts)
            .map_err(|accounts| FetchError::LengthMismatch {
                expected: 3,
                actual: accounts.len(),
            })?;
        deserialize_digital_asset(&mint, &metadata, Some(&edition))
    }

    /// Read the metadata at `metadata` to learn its mint, then fetch the asset.
    #[instrument(skip_all, fields(%metadata))]
    pub async fn fetch_digital_asset_by_metadata(
        &self,
        metadata: &Pubkey,
        config: &FetchConfig,
    ) -> Result<DigitalAsset, DigitalAssetError> {
        let metadata = self.fetch_metadata(metadata, config).await?;
        self.fetch_digital_asset(&metadata.mint, config).await
    }

    /// Fetch many assets in one round trip.
    ///
    /// Best effort: a mint whose mint or metadata account is missing, or whose
    /// accounts fail to decode, is left out of the result, so the output can
    /// be shorter than `mints`. Relative order is preserved. Only a transport
    /// failure fails the whole call.
    #[instrument(skip_all, fields(mints = mints.len()))]
    pub async fn fetch_all_digital_asset(
        &self,
        mints: &[Pubkey],
        config: &FetchConfig,
    ) -> Result<Vec<DigitalAsset>, DigitalAssetError> {
        if mints.is_empty() {
            return Ok(Vec::new());
        }
        let addresses: Vec<Pubkey> = mints
            .iter()
            .flat_map(|mint| self.asset_addresses(mint))
            .collect();
        let accounts = self.fetch(&addresses, config).await?;

        let assets = accounts
            .chunks_exact(3)
            .filter_map(|triple| {
                match deserialize_digital_asset(&triple[0], &triple[1], Some(&triple[2])) {
                    Ok(asset) => Some(asset),
                    Err(err) => {
                        debug!(mint = %triple[0].address, %err, "skipping digital asset");
                        None
                    }
                }
            })
            .collect();
        Ok(assets)
    }

    /// Fetch an asset together with `token` and its token record in one round trip.
    #[instrument(skip_all, fields(%mint, %token))]
    pub async fn fetch_digital_asset_with_token(
        &self,
        mint: &Pubkey,
        token: &Pubkey,
        config: &FetchConfig,
    ) -> Result<DigitalAssetWithToken, DigitalAssetError> {
        let [mint_address, metadata, edition] = self.asset_addresses(mint);
        let (token_record, _) = find_token_record_pda_with_program(&self.program_id, mint, token);
        let accounts = self
            .fetch(
                &[mint_address, metadata, edition, *token, token_record],
                config,
            )
            .await?;
        let [mint, metadata, edition, token, token_record] =
            <[EncodedAccount; 5]>::try_from(accounts).map_err(|accounts| {
                FetchError::LengthMismatch {
                    expected: 5,
                    actual: accounts.len(),
                }
            })?;
        deserialize_digital_asset_with_token(
            &mint,
            &metadata,
            Some(&edition),
            &token,
            Some(&token_record),
        )
    }

    /// Like [`Self::fetch_digital_asset_with_token`] for the owner's associated
    /// token account under the legacy token program.
    pub async fn fetch_digital_asset_with_associated_token(
        &self,
        mint: &Pubkey,
        owner: &Pubkey,
        config: &FetchConfig,
    ) -> Result<DigitalAssetWithToken, DigitalAssetError> {
        self.fetch_digital_asset_with_associated_token_in_program(
            mint,
            owner,
            &spl_token::id(),
            config,
        )
        .await
    }

    /// Like [`Self::fetch_digital_asset_with_associated_token`] for a specific token program.
    pub async fn fetch_digital_asset_with_associated_token_in_program(
        &self,
        mint: &Pubkey,
        owner: &Pubkey,
        token_program: &Pubkey,
        config: &FetchConfig,
    ) -> Result<DigitalAssetWithToken, DigitalAssetError> {
        let (token, _) = find_associated_token_pda(owner, mint, token_program);
        self.fetch_digital_asset_with_token(mint, &token, config)
            .await
    }

    /// Fetch and decode a single metadata account.
    pub async fn fetch_metadata(
        &self,
        metadata: &Pubkey,
        config: &FetchConfig,
    ) -> Result<Metadata, DigitalAssetError> {
        let accounts = self.fetch(std::slice::from_ref(metadata), config).await?;
        let account = first(accounts)?;
        deserialize_metadata(&account)
    }

    /// Fetch the token record of `(mint, token)`, if any.
    pub async fn fetch_token_record(
        &self,
        mint: &Pubkey,
        token: &Pubkey,
        config: &FetchConfig,
    ) -> Result<Option<TokenRecord>, DigitalAssetError> {
        let (record, _) = find_token_record_pda_with_program(&self.program_id, mint, token);
        let accounts = self.fetch(&[record], config).await?;
        Ok(deserialize_token_record(&first(accounts)?))
    }
}

fn first(accounts: Vec<EncodedAccount>) -> Result<EncodedAccount, FetchError> {
    accounts
        .into_iter()
        .next()
        .ok_or(FetchError::LengthMismatch {
            expected: 1,
            actual: 0,
        })
}
