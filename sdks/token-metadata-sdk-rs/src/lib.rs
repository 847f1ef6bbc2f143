//! Token Metadata – Rust SDK (client-side helpers)
//!
//! This crate provides:
//! - PDA helpers for every account the Token Metadata program owns
//! - A default-value resolver that fills in omitted instruction accounts and arguments
//! - Instruction builders with correct account ordering and client-side validation
//! - Readers that fetch and compose mint, metadata, edition, token and token record
//!   accounts into one `DigitalAsset` per mint
//!
//! Signers, recent blockhashes, and submission are left to the caller.

pub mod config;
pub mod digital_asset;
pub mod edition;
pub mod error;
pub mod fetch;
pub mod pda;
pub mod reader;
pub mod resolver;

use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};

use token_metadata_interface as program;
use program::{
    instruction::{
        AssetData, AuthorizationData, CreateArgs, MetadataInstruction, MintArgs, PrintSupply,
        TransferArgs,
    },
    spl_associated_token,
    state::{
        Collection, Creator, EscrowAuthority, HolderDelegateRole, MetadataDelegateRole,
        TokenStandard, Uses,
    },
    token_auth_rules,
};

pub use config::SdkConfig;
pub use digital_asset::{
    deserialize_digital_asset, deserialize_digital_asset_with_token, DigitalAsset,
    DigitalAssetWithToken,
};
pub use edition::{select_edition, AssetEdition, EditionKind};
pub use error::{AccountKind, DigitalAssetError, FetchError, PdaError};
pub use fetch::{AccountFetcher, EncodedAccount, FetchConfig};
pub use reader::TokenMetadataReader;
pub use resolver::{is_non_fungible, is_programmable, MintInput, Resolution, ResolveError};

use resolver::{resolve, Field, Resolvable, CREATE_V1, MINT_V1, TRANSFER_V1};

/// Thin client for building PDAs and instructions for the Token Metadata program.
///
/// The `program_id` must be the deployed Token Metadata program id.
pub struct TokenMetadataClient {
    pub program_id: Pubkey,
}

impl Default for TokenMetadataClient {
    fn default() -> Self {
        Self::new(program::id())
    }
}

impl TokenMetadataClient {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    /// Derive the metadata PDA for a given mint.
    pub fn metadata_pda(&self, mint: &Pubkey) -> Pubkey {
        let (pda, _bump) = program::find_metadata_pda_with_program(&self.program_id, mint);
        pda
    }

    /// Derive the metadata PDA for a given mint, with the bump.
    pub fn metadata_pda_and_bump(&self, mint: &Pubkey) -> (Pubkey, u8) {
        program::find_metadata_pda_with_program(&self.program_id, mint)
    }

    /// Derive the master edition (or print edition) PDA for a given mint.
    pub fn master_edition_pda(&self, mint: &Pubkey) -> Pubkey {
        let (pda, _bump) = program::find_master_edition_pda_with_program(&self.program_id, mint);
        pda
    }

    /// Derive the master edition PDA for a given mint, with the bump.
    pub fn master_edition_pda_and_bump(&self, mint: &Pubkey) -> (Pubkey, u8) {
        program::find_master_edition_pda_with_program(&self.program_id, mint)
    }

    /// Derive the edition marker PDA covering `edition_number`.
    pub fn edition_marker_pda(&self, mint: &Pubkey, edition_number: u64) -> Pubkey {
        let (pda, _bump) =
            program::find_edition_marker_pda_with_program(&self.program_id, mint, edition_number);
        pda
    }

    /// Derive the edition marker v2 PDA.
    pub fn edition_marker_v2_pda(&self, mint: &Pubkey) -> Pubkey {
        let (pda, _bump) = program::find_edition_marker_v2_pda_with_program(&self.program_id, mint);
        pda
    }

    /// Derive the token record PDA for a (mint, token account) pair.
    pub fn token_record_pda(&self, mint: &Pubkey, token: &Pubkey) -> Pubkey {
        let (pda, _bump) =
            program::find_token_record_pda_with_program(&self.program_id, mint, token);
        pda
    }

    /// Derive the metadata delegate record PDA for `role`.
    pub fn metadata_delegate_record_pda(
        &self,
        mint: &Pubkey,
        role: MetadataDelegateRole,
        update_authority: &Pubkey,
        delegate: &Pubkey,
    ) -> Pubkey {
        let (pda, _bump) = program::find_metadata_delegate_record_pda_with_program(
            &self.program_id,
            mint,
            role,
            update_authority,
            delegate,
        );
        pda
    }

    /// Derive the holder delegate record PDA for `role`.
    pub fn holder_delegate_record_pda(
        &self,
        mint: &Pubkey,
        role: HolderDelegateRole,
        owner: &Pubkey,
        delegate: &Pubkey,
    ) -> Pubkey {
        let (pda, _bump) = program::find_holder_delegate_record_pda_with_program(
            &self.program_id,
            mint,
            role,
            owner,
            delegate,
        );
        pda
    }

    /// Derive the collection authority record PDA.
    pub fn collection_authority_record_pda(&self, mint: &Pubkey, authority: &Pubkey) -> Pubkey {
        let (pda, _bump) =
            program::find_collection_authority_pda_with_program(&self.program_id, mint, authority);
        pda
    }

    /// Derive the use authority record PDA.
    pub fn use_authority_record_pda(&self, mint: &Pubkey, use_authority: &Pubkey) -> Pubkey {
        let (pda, _bump) = program::find_use_authority_record_pda_with_program(
            &self.program_id,
            mint,
            use_authority,
        );
        pda
    }

    /// Derive the program-wide burner PDA.
    pub fn burner_pda(&self) -> Pubkey {
        let (pda, _bump) = program::find_burner_pda_with_program(&self.program_id);
        pda
    }

    /// Derive the token-owned escrow PDA for `authority`.
    pub fn token_owned_escrow_pda(&self, mint: &Pubkey, authority: &EscrowAuthority) -> Pubkey {
        let (pda, _bump) =
            program::find_token_owned_escrow_pda_with_program(&self.program_id, mint, authority);
        pda
    }

    /// Derive the associated token account of `owner` for `mint` under `token_program`.
    pub fn associated_token_address(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
        token_program: &Pubkey,
    ) -> Pubkey {
        let (ata, _bump) = program::find_associated_token_pda(owner, mint, token_program);
        ata
    }

    /// Derive a PDA under this program from seeds outside the named set.
    pub fn custom_pda(&self, seeds: &[pda::Seed<'_>]) -> Result<(Pubkey, u8), PdaError> {
        pda::derive(seeds, &self.program_id)
    }

    // Absent optional accounts are passed as the program id.
    fn optional_meta(&self, key: Option<Pubkey>, writable: bool) -> AccountMeta {
        match key {
            Some(key) if writable => AccountMeta::new(key, false),
            Some(key) => AccountMeta::new_readonly(key, false),
            None => AccountMeta::new_readonly(self.program_id, false),
        }
    }

    fn authorization_rules_metas(&self, rules: Option<Pubkey>) -> [AccountMeta; 2] {
        [
            self.optional_meta(rules.map(|_| token_auth_rules::id()), false),
            self.optional_meta(rules, false),
        ]
    }

    /// Resolve the accounts and arguments of a Create instruction.
    pub fn resolve_create_v1(&self, params: &CreateV1Params) -> Result<Resolution, ResolveError> {
        let input = Resolution {
            is_collection: params.is_collection,
            mint: Resolvable::Resolved(params.mint),
            authority: Resolvable::Resolved(params.authority),
            payer: params.payer.into(),
            update_authority: params.update_authority.into(),
            token_standard: Resolvable::Resolved(params.token_standard),
            decimals: params.decimals.map(Some).into(),
            print_supply: params.print_supply.clone().map(Some).into(),
            creators: params.creators.clone().into(),
            spl_token_program: params.spl_token_program.into(),
            ..Resolution::new(self.program_id)
        };
        resolve(CREATE_V1, input)
    }

    /// Build a Create (v1) instruction.
    ///
    /// Accounts (strict order):
    /// - metadata_pda (writable)
    /// - master_edition_pda (writable, optional: non-fungibles only)
    /// - mint (writable, signer when supplied as a signer)
    /// - authority (readonly, signer)
    /// - payer (writable, signer)
    /// - update_authority (readonly, signer if `update_authority_as_signer`)
    /// - system_program (readonly)
    /// - sysvar_instructions (readonly)
    /// - spl_token_program (readonly)
    pub fn create_v1_ix(&self, params: CreateV1Params) -> anyhow::Result<Instruction> {
        let resolved = self.resolve_create_v1(&params)?;

        let creators = resolved.creators.require(Field::Creators)?.clone();
        let asset_data = AssetData {
            name: params.name,
            symbol: params.symbol,
            uri: params.uri,
            seller_fee_basis_points: params.seller_fee_basis_points,
            creators: (!creators.is_empty()).then_some(creators),
            primary_sale_happened: params.primary_sale_happened,
            is_mutable: params.is_mutable,
            token_standard: params.token_standard,
            collection: params.collection,
            uses: params.uses,
            collection_details: resolved
                .collection_details
                .require(Field::CollectionDetails)?
                .clone(),
            rule_set: params.rule_set,
        };
        asset_data.validate()?;

        let data = MetadataInstruction::Create(CreateArgs::V1 {
            asset_data,
            decimals: *resolved.decimals.require(Field::Decimals)?,
            print_supply: resolved.print_supply.require(Field::PrintSupply)?.clone(),
        })
        .pack()?;

        let mint = resolved.mint.require(Field::Mint)?;
        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(*resolved.metadata.require(Field::Metadata)?, false),
                self.optional_meta(*resolved.master_edition.require(Field::MasterEdition)?, true),
                AccountMeta::new(mint.pubkey(), mint.is_signer()),
                AccountMeta::new_readonly(*resolved.authority.require(Field::Authority)?, true),
                AccountMeta::new(*resolved.payer.require(Field::Payer)?, true),
                AccountMeta::new_readonly(
                    *resolved.update_authority.require(Field::UpdateAuthority)?,
                    params.update_authority_as_signer,
                ),
                AccountMeta::new_readonly(system_program::id(), false),
                AccountMeta::new_readonly(sysvar::instructions::id(), false),
                AccountMeta::new_readonly(
                    *resolved.spl_token_program.require(Field::SplTokenProgram)?,
                    false,
                ),
            ],
            data,
        })
    }

    /// Create (v1) for an ordinary NFT.
    pub fn create_nft_ix(&self, params: CreateV1Params) -> anyhow::Result<Instruction> {
        self.create_v1_ix(CreateV1Params {
            token_standard: TokenStandard::NonFungible,
            ..params
        })
    }

    /// Create (v1) for a programmable NFT.
    pub fn create_programmable_nft_ix(
        &self,
        params: CreateV1Params,
    ) -> anyhow::Result<Instruction> {
        self.create_v1_ix(CreateV1Params {
            token_standard: TokenStandard::ProgrammableNonFungible,
            ..params
        })
    }

    /// Create (v1) for a fungible token.
    pub fn create_fungible_ix(&self, params: CreateV1Params) -> anyhow::Result<Instruction> {
        self.create_v1_ix(CreateV1Params {
            token_standard: TokenStandard::Fungible,
            ..params
        })
    }

    /// Resolve the accounts of a Mint instruction.
    pub fn resolve_mint_v1(&self, params: &MintV1Params) -> Result<Resolution, ResolveError> {
        let input = Resolution {
            mint: Resolvable::Resolved(MintInput::Address(params.mint)),
            authority: Resolvable::Resolved(params.authority),
            payer: params.payer.into(),
            token_standard: Resolvable::Resolved(params.token_standard),
            token: params.token.into(),
            token_owner: params.token_owner.map(Some).into(),
            spl_token_program: params.spl_token_program.into(),
            ..Resolution::new(self.program_id)
        };
        resolve(MINT_V1, input)
    }

    /// Build a Mint (v1) instruction.
    ///
    /// Accounts (strict order):
    /// - token (writable)
    /// - token_owner (readonly, optional)
    /// - metadata_pda (readonly)
    /// - master_edition_pda (readonly, optional: non-fungibles only)
    /// - token_record_pda (writable, optional: programmable only)
    /// - mint (writable)
    /// - authority (readonly, signer)
    /// - delegate_record (readonly, optional)
    /// - payer (writable, signer)
    /// - system_program, sysvar_instructions, spl_token_program, spl_ata_program (readonly)
    /// - authorization_rules_program, authorization_rules (readonly, optional)
    pub fn mint_v1_ix(&self, params: MintV1Params) -> anyhow::Result<Instruction> {
        anyhow::ensure!(params.amount > 0, "amount must be greater than zero");
        let resolved = self.resolve_mint_v1(&params)?;

        let data = MetadataInstruction::Mint(MintArgs::V1 {
            amount: params.amount,
            authorization_data: params.authorization_data,
        })
        .pack()?;

        let mut accounts = vec![
            AccountMeta::new(*resolved.token.require(Field::Token)?, false),
            self.optional_meta(*resolved.token_owner.require(Field::TokenOwner)?, false),
            AccountMeta::new_readonly(*resolved.metadata.require(Field::Metadata)?, false),
            self.optional_meta(*resolved.master_edition.require(Field::MasterEdition)?, false),
            self.optional_meta(*resolved.token_record.require(Field::TokenRecord)?, true),
            AccountMeta::new(params.mint, false),
            AccountMeta::new_readonly(params.authority, true),
            self.optional_meta(params.delegate_record, false),
            AccountMeta::new(*resolved.payer.require(Field::Payer)?, true),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::instructions::id(), false),
            AccountMeta::new_readonly(
                *resolved.spl_token_program.require(Field::SplTokenProgram)?,
                false,
            ),
            AccountMeta::new_readonly(spl_associated_token::id(), false),
        ];
        accounts.extend(self.authorization_rules_metas(params.authorization_rules));

        Ok(Instruction {
            program_id: self.program_id,
            accounts,
            data,
        })
    }

    /// Resolve the accounts of a Transfer instruction.
    pub fn resolve_transfer_v1(
        &self,
        params: &TransferV1Params,
    ) -> Result<Resolution, ResolveError> {
        let input = Resolution {
            mint: Resolvable::Resolved(MintInput::Address(params.mint)),
            authority: Resolvable::Resolved(params.authority),
            payer: params.payer.into(),
            token_standard: Resolvable::Resolved(params.token_standard),
            token: params.token.into(),
            token_owner: params.token_owner.map(Some).into(),
            destination_owner: Resolvable::Resolved(params.destination_owner),
            destination_token: params.destination_token.into(),
            spl_token_program: params.spl_token_program.into(),
            ..Resolution::new(self.program_id)
        };
        resolve(TRANSFER_V1, input)
    }

    /// Build a Transfer (v1) instruction.
    ///
    /// Accounts (strict order):
    /// - token (writable)
    /// - token_owner (readonly)
    /// - destination_token (writable)
    /// - destination_owner (readonly)
    /// - mint (readonly)
    /// - metadata_pda (writable)
    /// - edition (readonly, optional: non-fungibles only)
    /// - token_record, destination_token_record (writable, optional: programmable only)
    /// - authority (readonly, signer)
    /// - payer (writable, signer)
    /// - system_program, sysvar_instructions, spl_token_program, spl_ata_program (readonly)
    /// - authorization_rules_program, authorization_rules (readonly, optional)
    pub fn transfer_v1_ix(&self, params: TransferV1Params) -> anyhow::Result<Instruction> {
        anyhow::ensure!(params.amount > 0, "amount must be greater than zero");
        let resolved = self.resolve_transfer_v1(&params)?;
        let token_owner = resolved
            .token_owner
            .require(Field::TokenOwner)?
            .ok_or(ResolveError::Unresolved(Field::TokenOwner))?;

        let data = MetadataInstruction::Transfer(TransferArgs::V1 {
            amount: params.amount,
            authorization_data: params.authorization_data,
        })
        .pack()?;

        let mut accounts = vec![
            AccountMeta::new(*resolved.token.require(Field::Token)?, false),
            AccountMeta::new_readonly(token_owner, false),
            AccountMeta::new(
                *resolved.destination_token.require(Field::DestinationToken)?,
                false,
            ),
            AccountMeta::new_readonly(params.destination_owner, false),
            AccountMeta::new_readonly(params.mint, false),
            AccountMeta::new(*resolved.metadata.require(Field::Metadata)?, false),
            self.optional_meta(*resolved.master_edition.require(Field::MasterEdition)?, false),
            self.optional_meta(*resolved.token_record.require(Field::TokenRecord)?, true),
            self.optional_meta(
                *resolved
                    .destination_token_record
                    .require(Field::DestinationTokenRecord)?,
                true,
            ),
            AccountMeta::new_readonly(params.authority, true),
            AccountMeta::new(*resolved.payer.require(Field::Payer)?, true),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::instructions::id(), false),
            AccountMeta::new_readonly(
                *resolved.spl_token_program.require(Field::SplTokenProgram)?,
                false,
            ),
            AccountMeta::new_readonly(spl_associated_token::id(), false),
        ];
        accounts.extend(self.authorization_rules_metas(params.authorization_rules));

        Ok(Instruction {
            program_id: self.program_id,
            accounts,
            data,
        })
    }

    // Transaction patterns (compose instructions; signing and submission left to caller)
    /// Create an asset and mint `amount` to `token_owner` (defaults to the authority).
    ///
    /// Returns: [create_v1, mint_v1].
    pub fn create_and_mint_tx(
        &self,
        params: TxCreateAndMintParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        Ok(self.create_and_mint_tx_with_pdas(params)?.0)
    }

    /// Same as `create_and_mint_tx` but also returns derived PDAs for ergonomics.
    pub fn create_and_mint_tx_with_pdas(
        &self,
        params: TxCreateAndMintParams,
    ) -> anyhow::Result<(Vec<Instruction>, DerivedPdas)> {
        let create_resolved = self.resolve_create_v1(&params.create)?;
        // Mint into the token program the create step chose.
        let mint_params = MintV1Params {
            mint: params.create.mint.pubkey(),
            authority: params.create.authority,
            payer: params.create.payer,
            token: None,
            token_owner: params.token_owner,
            token_standard: params.create.token_standard,
            amount: params.amount,
            delegate_record: None,
            authorization_rules: params.create.rule_set,
            authorization_data: None,
            spl_token_program: Some(
                *create_resolved
                    .spl_token_program
                    .require(Field::SplTokenProgram)?,
            ),
        };
        let mint_resolved = self.resolve_mint_v1(&mint_params)?;

        let pdas = DerivedPdas {
            metadata_pda: *create_resolved.metadata.require(Field::Metadata)?,
            master_edition_pda: *create_resolved
                .master_edition
                .require(Field::MasterEdition)?,
            token: *mint_resolved.token.require(Field::Token)?,
            token_record_pda: *mint_resolved.token_record.require(Field::TokenRecord)?,
        };

        let create_ix = self.create_v1_ix(params.create)?;
        let mint_ix = self.mint_v1_ix(mint_params)?;
        Ok((vec![create_ix, mint_ix], pdas))
    }
}

// === Params ===
/// Parameters for Create (v1).
#[derive(Clone, Debug)]
pub struct CreateV1Params {
    /// Mint account; a signer mint is created by the instruction
    pub mint: MintInput,
    /// Mint authority (must sign)
    pub authority: Pubkey,
    /// Defaults to `authority`
    pub payer: Option<Pubkey>,
    /// Defaults to `authority`
    pub update_authority: Option<Pubkey>,
    /// Whether the update authority signs
    pub update_authority_as_signer: bool,
    /// Asset name (<= MAX_NAME_LENGTH)
    pub name: String,
    /// Asset symbol (<= MAX_SYMBOL_LENGTH)
    pub symbol: String,
    /// Off-chain JSON URI (<= MAX_URI_LENGTH)
    pub uri: String,
    /// Royalty in basis points (<= 10000)
    pub seller_fee_basis_points: u16,
    /// Defaults to the authority as sole verified creator
    pub creators: Option<Vec<Creator>>,
    pub primary_sale_happened: bool,
    pub is_mutable: bool,
    pub token_standard: TokenStandard,
    pub collection: Option<Collection>,
    pub uses: Option<Uses>,
    /// Marks the asset as a collection parent
    pub is_collection: bool,
    pub rule_set: Option<Pubkey>,
    /// Defaults from the token standard
    pub decimals: Option<u8>,
    /// Defaults from the token standard
    pub print_supply: Option<PrintSupply>,
    /// Defaults from the token standard and mint signer-ness
    pub spl_token_program: Option<Pubkey>,
}

impl CreateV1Params {
    /// Minimal parameters; everything else resolves to defaults.
    pub fn new(
        mint: MintInput,
        authority: Pubkey,
        name: impl Into<String>,
        uri: impl Into<String>,
        seller_fee_basis_points: u16,
        token_standard: TokenStandard,
    ) -> Self {
        Self {
            mint,
            authority,
            payer: None,
            update_authority: None,
            update_authority_as_signer: false,
            name: name.into(),
            symbol: String::new(),
            uri: uri.into(),
            seller_fee_basis_points,
            creators: None,
            primary_sale_happened: false,
            is_mutable: true,
            token_standard,
            collection: None,
            uses: None,
            is_collection: false,
            rule_set: None,
            decimals: None,
            print_supply: None,
            spl_token_program: None,
        }
    }
}

/// Parameters for Mint (v1).
#[derive(Clone, Debug)]
pub struct MintV1Params {
    pub mint: Pubkey,
    /// Mint authority (must sign)
    pub authority: Pubkey,
    /// Defaults to `authority`
    pub payer: Option<Pubkey>,
    /// Defaults to the associated token account of `token_owner`
    pub token: Option<Pubkey>,
    /// Defaults to `authority` unless `token` is supplied
    pub token_owner: Option<Pubkey>,
    pub token_standard: TokenStandard,
    pub amount: u64,
    pub delegate_record: Option<Pubkey>,
    pub authorization_rules: Option<Pubkey>,
    pub authorization_data: Option<AuthorizationData>,
    /// Defaults from the token standard
    pub spl_token_program: Option<Pubkey>,
}

/// Parameters for Transfer (v1).
#[derive(Clone, Debug)]
pub struct TransferV1Params {
    pub mint: Pubkey,
    /// Token owner or delegate (must sign)
    pub authority: Pubkey,
    /// Defaults to `authority`
    pub payer: Option<Pubkey>,
    /// Defaults to the associated token account of `token_owner`
    pub token: Option<Pubkey>,
    /// Defaults to `authority`
    pub token_owner: Option<Pubkey>,
    pub destination_owner: Pubkey,
    /// Defaults to the associated token account of `destination_owner`
    pub destination_token: Option<Pubkey>,
    pub token_standard: TokenStandard,
    pub amount: u64,
    pub authorization_rules: Option<Pubkey>,
    pub authorization_data: Option<AuthorizationData>,
    /// Defaults from the token standard
    pub spl_token_program: Option<Pubkey>,
}

/// Parameters for the create-and-mint transaction pattern.
#[derive(Clone, Debug)]
pub struct TxCreateAndMintParams {
    pub create: CreateV1Params,
    /// Amount minted to the token owner
    pub amount: u64,
    /// Defaults to the create authority
    pub token_owner: Option<Pubkey>,
}

/// Convenience return type when a builder returns derived PDAs too.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedPdas {
    /// Derived metadata PDA for the mint
    pub metadata_pda: Pubkey,
    /// Master edition PDA, for non-fungibles
    pub master_edition_pda: Option<Pubkey>,
    /// Token account receiving the minted amount
    pub token: Pubkey,
    /// Token record PDA, for programmable assets
    pub token_record_pda: Option<Pubkey>,
}
