//! Instruction data for the resolver-driven instructions

use {
    crate::{
        error::MetadataError,
        state::{
            Collection, CollectionDetails, Creator, TokenStandard, Uses, MAX_CREATOR_LIMIT,
            MAX_NAME_LENGTH, MAX_SYMBOL_LENGTH, MAX_URI_LENGTH,
        },
    },
    borsh::{BorshDeserialize, BorshSerialize},
    solana_program::pubkey::Pubkey,
    std::collections::BTreeMap,
};

/// Discriminator of the `Create` instruction
pub const CREATE_DISCRIMINATOR: u8 = 42;

/// Discriminator of the `Mint` instruction
pub const MINT_DISCRIMINATOR: u8 = 43;

/// Discriminator of the `Transfer` instruction
pub const TRANSFER_DISCRIMINATOR: u8 = 49;

/// How many prints a master edition allows.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub enum PrintSupply {
    /// No prints
    Zero,
    /// At most this many prints
    Limited(u64),
    /// Unbounded prints
    Unlimited,
}

/// Asset fields written by `Create`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct AssetData {
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
    /// Whether the metadata stays mutable
    pub is_mutable: bool,
    /// Token standard of the new asset
    pub token_standard: TokenStandard,
    /// Collection membership
    pub collection: Option<Collection>,
    /// Usage counter
    pub uses: Option<Uses>,
    /// Set when the asset is a collection parent
    pub collection_details: Option<CollectionDetails>,
    /// Rule set for programmable assets
    pub rule_set: Option<Pubkey>,
}

impl AssetData {
    /// Check the length and share limits the program enforces.
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.name.len() > MAX_NAME_LENGTH {
            return Err(MetadataError::NameTooLong);
        }
        if self.symbol.len() > MAX_SYMBOL_LENGTH {
            return Err(MetadataError::SymbolTooLong);
        }
        if self.uri.len() > MAX_URI_LENGTH {
            return Err(MetadataError::UriTooLong);
        }
        if self.seller_fee_basis_points > 10_000 {
            return Err(MetadataError::InvalidBasisPoints);
        }
        if let Some(creators) = &self.creators {
            if creators.len() > MAX_CREATOR_LIMIT {
                return Err(MetadataError::CreatorsTooLong);
            }
            let total: u16 = creators.iter().map(|c| c.share as u16).sum();
            if !creators.is_empty() && total != 100 {
                return Err(MetadataError::ShareTotalMustBe100);
            }
        }
        Ok(())
    }
}

/// Value attached to an authorization payload key.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub enum PayloadType {
    /// An address
    Pubkey(Pubkey),
    /// PDA seeds
    Seeds(Vec<Vec<u8>>),
    /// Merkle proof
    MerkleProof(Vec<[u8; 32]>),
    /// A number
    Number(u64),
}

/// Authorization payload forwarded to Token Auth Rules.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, Eq, PartialEq)]
pub struct AuthorizationData {
    /// Payload entries, encoded in key order
    pub payload: BTreeMap<String, PayloadType>,
}

/// Arguments of `Create`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub enum CreateArgs {
    /// Version 1
    V1 {
        /// Asset fields
        asset_data: AssetData,
        /// Mint decimals, `None` for non-fungibles
        decimals: Option<u8>,
        /// Print supply, only for non-fungibles
        print_supply: Option<PrintSupply>,
    },
}

/// Arguments of `Mint`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub enum MintArgs {
    /// Version 1
    V1 {
        /// Amount to mint
        amount: u64,
        /// Rule set payload for programmable assets
        authorization_data: Option<AuthorizationData>,
    },
}

/// Arguments of `Transfer`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub enum TransferArgs {
    /// Version 1
    V1 {
        /// Amount to transfer
        amount: u64,
        /// Rule set payload for programmable assets
        authorization_data: Option<AuthorizationData>,
    },
}

/// Instructions built by this crate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MetadataInstruction {
    /// Create metadata (and master edition) for a mint
    Create(CreateArgs),
    /// Mint tokens of an asset
    Mint(MintArgs),
    /// Transfer tokens of an asset
    Transfer(TransferArgs),
}

impl MetadataInstruction {
    /// Leading instruction byte
    pub fn discriminator(&self) -> u8 {
        match self {
            MetadataInstruction::Create(_) => CREATE_DISCRIMINATOR,
            MetadataInstruction::Mint(_) => MINT_DISCRIMINATOR,
            MetadataInstruction::Transfer(_) => TRANSFER_DISCRIMINATOR,
        }
    }

    /// Unpack a byte array into a MetadataInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, MetadataError> {
        let (tag, rest) = input
            .split_first()
            .ok_or(MetadataError::InvalidInstructionData)?;
        let invalid = |_| MetadataError::InvalidInstructionData;
        match *tag {
            CREATE_DISCRIMINATOR => Ok(Self::Create(borsh::from_slice(rest).map_err(invalid)?)),
            MINT_DISCRIMINATOR => Ok(Self::Mint(borsh::from_slice(rest).map_err(invalid)?)),
            TRANSFER_DISCRIMINATOR => {
                Ok(Self::Transfer(borsh::from_slice(rest).map_err(invalid)?))
            }
            _ => Err(MetadataError::InvalidInstructionData),
        }
    }

    /// Pack the MetadataInstruction into a byte array
    pub fn pack(&self) -> Result<Vec<u8>, MetadataError> {
        let mut data = vec![self.discriminator()];
        let written = match self {
            MetadataInstruction::Create(args) => borsh::to_writer(&mut data, args),
            MetadataInstruction::Mint(args) => borsh::to_writer(&mut data, args),
            MetadataInstruction::Transfer(args) => borsh::to_writer(&mut data, args),
        };
        written.map_err(|_| MetadataError::SerializationError)?;
        Ok(data)
    }
}
