use std::{
    collections::HashMap,
    future::Future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, Once,
    },
};

use async_trait::async_trait;
use solana_program::{program_option::COption, program_pack::Pack, pubkey::Pubkey};
use spl_token::state::{Account as TokenAccount, AccountState, Mint};
use token_metadata_interface::state::{
    Key, Metadata, TokenDelegateRole, TokenRecord, TokenStandard, TokenState, MAX_METADATA_LEN,
};
use token_metadata_sdk::{
    AccountFetcher, EncodedAccount, FetchConfig, FetchError, TokenMetadataClient,
    TokenMetadataReader,
};

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Account store answering batched reads from memory.
///
/// Every `fetch_accounts` call counts as one round trip.
#[derive(Default)]
pub struct MemoryFetcher {
    accounts: Mutex<HashMap<Pubkey, EncodedAccount>>,
    requests: Mutex<Vec<Vec<Pubkey>>>,
    round_trips: AtomicUsize,
    failure: Mutex<Option<String>>,
}

impl MemoryFetcher {
    pub fn insert(&self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        let account = EncodedAccount::new(address, owner, 1_000_000, data);
        self.accounts
            .lock()
            .expect("accounts lock")
            .insert(address, account);
    }

    pub fn remove(&self, address: &Pubkey) {
        self.accounts.lock().expect("accounts lock").remove(address);
    }

    /// Make every subsequent fetch fail at the transport level.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().expect("failure lock") = Some(message.into());
    }

    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Vec<Pubkey>> {
        self.requests.lock().expect("requests lock").clone()
    }

    /// Current state of `address` as a fetch would report it.
    pub fn account(&self, address: &Pubkey) -> EncodedAccount {
        self.accounts
            .lock()
            .expect("accounts lock")
            .get(address)
            .cloned()
            .unwrap_or_else(|| EncodedAccount::missing(*address))
    }
}

#[async_trait]
impl AccountFetcher for MemoryFetcher {
    async fn fetch_accounts(
        &self,
        addresses: &[Pubkey],
        _config: &FetchConfig,
    ) -> Result<Vec<EncodedAccount>, FetchError> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("requests lock")
            .push(addresses.to_vec());
        if let Some(message) = self.failure.lock().expect("failure lock").clone() {
            return Err(FetchError::CustomError(message));
        }
        Ok(addresses.iter().map(|address| self.account(address)).collect())
    }
}

/// Shared state handed to each test body.
pub struct TestContext {
    pub client: TokenMetadataClient,
    pub fetcher: Arc<MemoryFetcher>,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            client: TokenMetadataClient::default(),
            fetcher: Arc::new(MemoryFetcher::default()),
        }
    }

    pub fn program_id(&self) -> Pubkey {
        self.client.program_id
    }

    pub fn reader(&self) -> TokenMetadataReader<Arc<MemoryFetcher>> {
        TokenMetadataReader::new(self.program_id(), self.fetcher.clone())
    }

    pub fn install_mint(&self, mint: Pubkey, authority: Pubkey, supply: u64, decimals: u8) {
        self.fetcher
            .insert(mint, spl_token::id(), mint_bytes(authority, supply, decimals));
    }

    pub fn install_metadata(&self, metadata: &Metadata) -> anyhow::Result<Pubkey> {
        let address = self.client.metadata_pda(&metadata.mint);
        self.fetcher
            .insert(address, self.program_id(), metadata_bytes(metadata)?);
        Ok(address)
    }

    pub fn install_master_edition(
        &self,
        mint: &Pubkey,
        key: Key,
        supply: u64,
        max_supply: Option<u64>,
    ) -> anyhow::Result<Pubkey> {
        let address = self.client.master_edition_pda(mint);
        self.fetcher.insert(
            address,
            self.program_id(),
            master_edition_bytes(key, supply, max_supply)?,
        );
        Ok(address)
    }

    pub fn install_print_edition(
        &self,
        mint: &Pubkey,
        parent: Pubkey,
        number: u64,
    ) -> anyhow::Result<Pubkey> {
        let address = self.client.master_edition_pda(mint);
        self.fetcher
            .insert(address, self.program_id(), print_edition_bytes(parent, number)?);
        Ok(address)
    }

    pub fn install_token(&self, token: Pubkey, mint: Pubkey, owner: Pubkey, amount: u64) {
        self.fetcher
            .insert(token, spl_token::id(), token_bytes(mint, owner, amount));
    }

    pub fn install_token_record(&self, mint: &Pubkey, token: &Pubkey) -> anyhow::Result<Pubkey> {
        let address = self.client.token_record_pda(mint, token);
        self.fetcher
            .insert(address, self.program_id(), token_record_bytes()?);
        Ok(address)
    }

    /// Mint, metadata and a V2 master edition for a one-of-one NFT.
    pub fn install_nft(&self, token_standard: TokenStandard) -> anyhow::Result<Pubkey> {
        let mint = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        self.install_mint(mint, authority, 1, 0);
        self.install_metadata(&sample_metadata(mint, authority, token_standard))?;
        self.install_master_edition(&mint, Key::MasterEditionV2, 0, Some(0))?;
        Ok(mint)
    }

    /// Mint and metadata only.
    pub fn install_fungible(&self, decimals: u8) -> anyhow::Result<Pubkey> {
        let mint = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        self.install_mint(mint, authority, 1_000_000, decimals);
        self.install_metadata(&sample_metadata(mint, authority, TokenStandard::Fungible))?;
        Ok(mint)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TestRunner;

impl TestRunner {
    pub async fn run<F, Fut>(test: F)
    where
        F: FnOnce(TestContext) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        init_tracing();
        if let Err(err) = test(TestContext::new()).await {
            panic!("test failed: {err:?}");
        }
    }
}

pub fn sample_metadata(
    mint: Pubkey,
    update_authority: Pubkey,
    token_standard: TokenStandard,
) -> Metadata {
    Metadata {
        key: Key::MetadataV1,
        update_authority,
        mint,
        name: "Sample Asset".to_string(),
        symbol: "SMPL".to_string(),
        uri: "https://example.com/asset.json".to_string(),
        seller_fee_basis_points: 500,
        creators: None,
        primary_sale_happened: false,
        is_mutable: true,
        edition_nonce: Some(255),
        token_standard: Some(token_standard),
        collection: None,
        uses: None,
        collection_details: None,
        programmable_config: None,
    }
}

pub fn mint_bytes(authority: Pubkey, supply: u64, decimals: u8) -> Vec<u8> {
    let mint = Mint {
        mint_authority: COption::Some(authority),
        supply,
        decimals,
        is_initialized: true,
        freeze_authority: COption::None,
    };
    let mut data = vec![0u8; Mint::LEN];
    mint.pack_into_slice(&mut data);
    data
}

pub fn token_bytes(mint: Pubkey, owner: Pubkey, amount: u64) -> Vec<u8> {
    let account = TokenAccount {
        mint,
        owner,
        amount,
        delegate: COption::None,
        state: AccountState::Initialized,
        is_native: COption::None,
        delegated_amount: 0,
        close_authority: COption::None,
    };
    let mut data = vec![0u8; TokenAccount::LEN];
    account.pack_into_slice(&mut data);
    data
}

/// Metadata serialized and zero-padded to its allocated size.
pub fn metadata_bytes(metadata: &Metadata) -> anyhow::Result<Vec<u8>> {
    let mut data = borsh::to_vec(metadata)?;
    if data.len() < MAX_METADATA_LEN {
        data.resize(MAX_METADATA_LEN, 0);
    }
    Ok(data)
}

pub fn master_edition_bytes(
    key: Key,
    supply: u64,
    max_supply: Option<u64>,
) -> anyhow::Result<Vec<u8>> {
    let mut data = vec![key as u8];
    data.extend(borsh::to_vec(&supply)?);
    data.extend(borsh::to_vec(&max_supply)?);
    Ok(data)
}

pub fn print_edition_bytes(parent: Pubkey, number: u64) -> anyhow::Result<Vec<u8>> {
    let mut data = vec![Key::EditionV1 as u8];
    data.extend(borsh::to_vec(&parent)?);
    data.extend(borsh::to_vec(&number)?);
    Ok(data)
}

pub fn token_record_bytes() -> anyhow::Result<Vec<u8>> {
    let record = TokenRecord {
        key: Key::TokenRecord,
        bump: 254,
        state: TokenState::Unlocked,
        rule_set_revision: None,
        delegate: None,
        delegate_role: None::<TokenDelegateRole>,
        locked_transfer: None,
    };
    Ok(borsh::to_vec(&record)?)
}
