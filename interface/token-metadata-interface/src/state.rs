//! Account layouts

use {
    crate::error::MetadataError,
    borsh::{BorshDeserialize, BorshSerialize},
    num_derive::FromPrimitive,
    num_traits::FromPrimitive,
    solana_program::pubkey::Pubkey,
};

/// Maximum length of the metadata name
pub const MAX_NAME_LENGTH: usize = 32;

/// Maximum length of the metadata symbol
pub const MAX_SYMBOL_LENGTH: usize = 10;

/// Maximum length of the metadata URI
pub const MAX_URI_LENGTH: usize = 200;

/// Maximum number of creators
pub const MAX_CREATOR_LIMIT: usize = 5;

/// Allocated size of a metadata account
pub const MAX_METADATA_LEN: usize = 607 + 72;

/// Allocated size of a master edition account
pub const MAX_MASTER_EDITION_LEN: usize = 1 + 9 + 8 + 264;

/// Allocated size of a print edition account
pub const MAX_EDITION_LEN: usize = 1 + 32 + 8 + 200;

/// Allocated size of a token record account
pub const TOKEN_RECORD_LEN: usize = 80;

/// Account discriminator, always the first byte of program-owned account data.
#[repr(u8)]
#[derive(
    BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Eq, FromPrimitive, Hash, PartialEq,
)]
pub enum Key {
    /// Zeroed account
    Uninitialized,
    /// Numbered print of a master edition
    EditionV1,
    /// Deprecated printable master edition
    MasterEditionV1,
    /// Deprecated reservation list
    ReservationListV1,
    /// Core metadata
    MetadataV1,
    /// Deprecated reservation list
    ReservationListV2,
    /// Current printable master edition
    MasterEditionV2,
    /// Edition marker bitmap
    EditionMarker,
    /// Use authority record
    UseAuthorityRecord,
    /// Collection authority record
    CollectionAuthorityRecord,
    /// Token-owned escrow
    TokenOwnedEscrow,
    /// Programmable token record
    TokenRecord,
    /// Metadata delegate record
    MetadataDelegate,
    /// Edition marker v2
    EditionMarkerV2,
    /// Holder delegate record
    HolderDelegate,
}

impl Key {
    /// Read the discriminator at offset 0; `None` for empty data or unknown values.
    pub fn from_account_data(data: &[u8]) -> Option<Key> {
        data.first().and_then(|byte| Key::from_u8(*byte))
    }
}

/// Asset classification driving which optional accounts and defaults apply.
#[repr(u8)]
#[derive(
    BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Eq, FromPrimitive, Hash, PartialEq,
)]
pub enum TokenStandard {
    /// Ordinary NFT backed by a master edition
    NonFungible,
    /// Semi-fungible asset with metadata and zero decimals
    FungibleAsset,
    /// Fungible token with metadata
    Fungible,
    /// Numbered print of a master edition
    NonFungibleEdition,
    /// NFT with enforced transfer rules
    ProgrammableNonFungible,
    /// Numbered print of a programmable NFT
    ProgrammableNonFungibleEdition,
}

/// A creator share entry.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct Creator {
    /// Creator address
    pub address: Pubkey,
    /// Whether the creator signed the metadata
    pub verified: bool,
    /// Royalty share in percent
    pub share: u8,
}

/// Collection membership reference.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct Collection {
    /// Whether the collection authority verified membership
    pub verified: bool,
    /// Collection mint
    pub key: Pubkey,
}

/// How uses are consumed.
#[repr(u8)]
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub enum UseMethod {
    /// Burn on last use
    Burn,
    /// Multiple uses
    Multiple,
    /// One use
    Single,
}

/// Usage counter.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct Uses {
    /// Consumption method
    pub use_method: UseMethod,
    /// Remaining uses
    pub remaining: u64,
    /// Total uses
    pub total: u64,
}

/// Marks a metadata account as a collection parent.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub enum CollectionDetails {
    /// Sized collection
    V1 {
        /// Number of verified items
        size: u64,
    },
    /// Unsized collection
    V2 {
        /// Reserved
        padding: [u8; 8],
    },
}

/// Programmable NFT configuration.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub enum ProgrammableConfig {
    /// Optional rule set enforced on transfers
    V1 {
        /// Token Auth Rules rule set
        rule_set: Option<Pubkey>,
    },
}

/// Core metadata account keyed by `["metadata", program, mint]`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct Metadata {
    /// Account discriminator, `Key::MetadataV1`
    pub key: Key,
    /// Authority allowed to update the metadata
    pub update_authority: Pubkey,
    /// The mint this metadata belongs to
    pub mint: Pubkey,
    /// Asset name
    pub name: String,
    /// Asset symbol
    pub symbol: String,
    /// Off-chain JSON URI
    pub uri: String,
    /// Royalty in basis points
    pub seller_fee_basis_points: u16,
    /// Creator shares
    pub creators: Option<Vec<Creator>>,
    /// Whether the primary sale happened
    pub primary_sale_happened: bool,
    /// Whether the metadata can still change
    pub is_mutable: bool,
    /// Edition bump, for assets with an edition
    pub edition_nonce: Option<u8>,
    /// Token standard
    pub token_standard: Option<TokenStandard>,
    /// Collection membership
    pub collection: Option<Collection>,
    /// Usage counter
    pub uses: Option<Uses>,
    /// Collection parent details
    pub collection_details: Option<CollectionDetails>,
    /// Programmable configuration
    pub programmable_config: Option<ProgrammableConfig>,
}

impl Metadata {
    /// Decode a metadata account.
    ///
    /// Accounts created by older program versions stop after `is_mutable`; any
    /// trailing field that is missing or unreadable decodes as `None`. Strings
    /// are stored NUL-padded and returned trimmed.
    pub fn from_bytes(data: &[u8]) -> Result<Self, MetadataError> {
        let buf = &mut &data[..];

        let key = Key::deserialize(buf)?;
        if key != Key::MetadataV1 {
            return Err(MetadataError::DataTypeMismatch);
        }
        let update_authority = Pubkey::deserialize(buf)?;
        let mint = Pubkey::deserialize(buf)?;
        let name = trim_padding(String::deserialize(buf)?);
        let symbol = trim_padding(String::deserialize(buf)?);
        let uri = trim_padding(String::deserialize(buf)?);
        let seller_fee_basis_points = u16::deserialize(buf)?;
        let creators = Option::<Vec<Creator>>::deserialize(buf)?;
        let primary_sale_happened = bool::deserialize(buf)?;
        let is_mutable = bool::deserialize(buf)?;

        let edition_nonce = read_trailing(buf);
        let token_standard = read_trailing(buf);
        let collection = read_trailing(buf);
        let uses = read_trailing(buf);
        let collection_details = read_trailing(buf);
        let programmable_config = read_trailing(buf);

        Ok(Self {
            key,
            update_authority,
            mint,
            name,
            symbol,
            uri,
            seller_fee_basis_points,
            creators,
            primary_sale_happened,
            is_mutable,
            edition_nonce,
            token_standard,
            collection,
            uses,
            collection_details,
            programmable_config,
        })
    }
}

fn trim_padding(value: String) -> String {
    value.trim_end_matches('\0').to_string()
}

// Once a trailing field fails to decode, everything after it is treated as absent.
fn read_trailing<T: BorshDeserialize>(buf: &mut &[u8]) -> Option<T> {
    match Option::<T>::deserialize(buf) {
        Ok(value) => value,
        Err(_) => {
            *buf = &[];
            None
        }
    }
}

/// Printable original. V1 and V2 share this prefix; V1's printing mints are not read.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct MasterEdition {
    /// `Key::MasterEditionV1` or `Key::MasterEditionV2`
    pub key: Key,
    /// Number of prints minted so far
    pub supply: u64,
    /// Print cap, `None` for unlimited
    pub max_supply: Option<u64>,
}

impl MasterEdition {
    /// Decode a master edition account (either version).
    pub fn from_bytes(data: &[u8]) -> Result<Self, MetadataError> {
        let edition = Self::deserialize(&mut &data[..])?;
        match edition.key {
            Key::MasterEditionV1 | Key::MasterEditionV2 => Ok(edition),
            _ => Err(MetadataError::DataTypeMismatch),
        }
    }
}

/// Numbered print of a master edition.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct Edition {
    /// `Key::EditionV1`
    pub key: Key,
    /// Master edition account this print was made from
    pub parent: Pubkey,
    /// Print number
    pub edition: u64,
}

impl Edition {
    /// Decode a print edition account.
    pub fn from_bytes(data: &[u8]) -> Result<Self, MetadataError> {
        let edition = Self::deserialize(&mut &data[..])?;
        if edition.key != Key::EditionV1 {
            return Err(MetadataError::DataTypeMismatch);
        }
        Ok(edition)
    }
}

/// Lock state of a programmable token account.
#[repr(u8)]
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenState {
    /// Freely transferable
    Unlocked,
    /// Locked by a delegate
    Locked,
    /// Listed for sale by a delegate
    Listed,
}

/// Role of a token delegate recorded in a `TokenRecord`.
#[repr(u8)]
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenDelegateRole {
    /// Sale delegate
    Sale,
    /// Transfer delegate
    Transfer,
    /// Utility delegate
    Utility,
    /// Staking delegate
    Staking,
    /// Standard SPL delegate
    Standard,
    /// Locked transfer delegate
    LockedTransfer,
    /// Migration delegate
    Migration,
}

/// Per-holding state of a programmable NFT, keyed by `(mint, token account)`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct TokenRecord {
    /// `Key::TokenRecord`
    pub key: Key,
    /// PDA bump
    pub bump: u8,
    /// Lock state
    pub state: TokenState,
    /// Rule set revision used for the last delegate
    pub rule_set_revision: Option<u64>,
    /// Current delegate
    pub delegate: Option<Pubkey>,
    /// Role of the current delegate
    pub delegate_role: Option<TokenDelegateRole>,
    /// Destination locked in by a locked-transfer delegate
    pub locked_transfer: Option<Pubkey>,
}

impl TokenRecord {
    /// Decode a token record account.
    pub fn from_bytes(data: &[u8]) -> Result<Self, MetadataError> {
        let record = Self::deserialize(&mut &data[..])?;
        if record.key != Key::TokenRecord {
            return Err(MetadataError::DataTypeMismatch);
        }
        Ok(record)
    }
}

/// Delegate roles granted by the update authority.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetadataDelegateRole {
    /// Authority item delegate
    AuthorityItem,
    /// Collection delegate
    Collection,
    /// Use delegate
    Use,
    /// Data delegate
    Data,
    /// Programmable config delegate
    ProgrammableConfig,
    /// Data item delegate
    DataItem,
    /// Collection item delegate
    CollectionItem,
    /// Programmable config item delegate
    ProgrammableConfigItem,
}

impl MetadataDelegateRole {
    /// PDA seed for this role
    pub fn seed(&self) -> &'static str {
        match self {
            MetadataDelegateRole::AuthorityItem => "authority_item_delegate",
            MetadataDelegateRole::Collection => "collection_delegate",
            MetadataDelegateRole::Use => "use_delegate",
            MetadataDelegateRole::Data => "data_delegate",
            MetadataDelegateRole::ProgrammableConfig => "programmable_config_delegate",
            MetadataDelegateRole::DataItem => "data_item_delegate",
            MetadataDelegateRole::CollectionItem => "collection_item_delegate",
            MetadataDelegateRole::ProgrammableConfigItem => "prog_config_item_delegate",
        }
    }
}

/// Delegate roles granted by the token holder.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HolderDelegateRole {
    /// Print delegate
    PrintDelegate,
}

impl HolderDelegateRole {
    /// PDA seed for this role
    pub fn seed(&self) -> &'static str {
        match self {
            HolderDelegateRole::PrintDelegate => "print_delegate",
        }
    }
}

/// Authority of a token-owned escrow.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EscrowAuthority {
    /// The holder of the token
    TokenOwner,
    /// A creator of the asset
    Creator(Pubkey),
}

impl EscrowAuthority {
    /// Single-byte seed tag
    pub fn tag(&self) -> u8 {
        match self {
            EscrowAuthority::TokenOwner => 0,
            EscrowAuthority::Creator(_) => 1,
        }
    }
}
