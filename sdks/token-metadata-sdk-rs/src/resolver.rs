//! Default-value resolution for instruction accounts and arguments.
//!
//! Callers fill in what they know; a pipeline of [`Stage`]s derives the rest.
//! Each stage writes one [`Field`], declares the fields it reads, and returns a
//! new [`Resolution`] instead of mutating the previous one. Stages run in
//! order, skip fields the caller already supplied, and fail fast when a field
//! they read has not been resolved yet.

use solana_program::pubkey::Pubkey;
use thiserror::Error;
use token_metadata_interface::{
    find_associated_token_pda, find_master_edition_pda_with_program,
    find_metadata_pda_with_program, find_token_record_pda_with_program,
    instruction::PrintSupply,
    spl_token_2022,
    state::{CollectionDetails, Creator, TokenStandard},
};
use tracing::trace;

/// `true` for the NFT-like standards, which carry a master edition and no decimals.
pub fn is_non_fungible(token_standard: TokenStandard) -> bool {
    match token_standard {
        TokenStandard::NonFungible
        | TokenStandard::NonFungibleEdition
        | TokenStandard::ProgrammableNonFungible => true,
        TokenStandard::Fungible
        | TokenStandard::FungibleAsset
        | TokenStandard::ProgrammableNonFungibleEdition => false,
    }
}

/// `true` only for `ProgrammableNonFungible`, the one standard that carries token records.
pub fn is_programmable(token_standard: TokenStandard) -> bool {
    token_standard == TokenStandard::ProgrammableNonFungible
}

/// The mint as supplied by the caller: a keypair that will sign, or a plain address.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MintInput {
    /// A new mint whose keypair signs the transaction
    Signer(Pubkey),
    /// An existing mint referenced by address
    Address(Pubkey),
}

impl MintInput {
    /// The mint address either way.
    pub fn pubkey(&self) -> Pubkey {
        match self {
            MintInput::Signer(key) | MintInput::Address(key) => *key,
        }
    }

    pub fn is_signer(&self) -> bool {
        matches!(self, MintInput::Signer(_))
    }
}

/// Names of the resolvable fields.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Field {
    Mint,
    Authority,
    Payer,
    UpdateAuthority,
    TokenStandard,
    Decimals,
    PrintSupply,
    CollectionDetails,
    Creators,
    Metadata,
    MasterEdition,
    SplTokenProgram,
    TokenOwner,
    Token,
    TokenRecord,
    DestinationOwner,
    DestinationToken,
    DestinationTokenRecord,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// A required field was neither supplied nor derivable.
    #[error("{0:?} is unresolved")]
    Unresolved(Field),

    /// A stage ran before a field it reads.
    #[error("{needed_by:?} reads {field:?}, which is not resolved yet")]
    MissingDependency { field: Field, needed_by: Field },
}

/// A field that is either still open or holds its final value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resolvable<T> {
    Unresolved,
    Resolved(T),
}

impl<T> Default for Resolvable<T> {
    fn default() -> Self {
        Resolvable::Unresolved
    }
}

impl<T> From<Option<T>> for Resolvable<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Resolvable::Resolved(value),
            None => Resolvable::Unresolved,
        }
    }
}

impl<T> Resolvable<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolvable::Resolved(_))
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Resolvable::Resolved(value) => Some(value),
            Resolvable::Unresolved => None,
        }
    }

    /// The resolved value, or `ResolveError::Unresolved(field)`.
    pub fn require(&self, field: Field) -> Result<&T, ResolveError> {
        self.get().ok_or(ResolveError::Unresolved(field))
    }
}

/// Everything resolved so far.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Resolution {
    pub program_id: Pubkey,
    pub is_collection: bool,
    pub mint: Resolvable<MintInput>,
    pub authority: Resolvable<Pubkey>,
    pub payer: Resolvable<Pubkey>,
    pub update_authority: Resolvable<Pubkey>,
    pub token_standard: Resolvable<TokenStandard>,
    pub decimals: Resolvable<Option<u8>>,
    pub print_supply: Resolvable<Option<PrintSupply>>,
    pub collection_details: Resolvable<Option<CollectionDetails>>,
    pub creators: Resolvable<Vec<Creator>>,
    pub metadata: Resolvable<Pubkey>,
    pub master_edition: Resolvable<Option<Pubkey>>,
    pub spl_token_program: Resolvable<Pubkey>,
    /// `Resolved(None)` when an explicit token account was supplied.
    pub token_owner: Resolvable<Option<Pubkey>>,
    pub token: Resolvable<Pubkey>,
    pub token_record: Resolvable<Option<Pubkey>>,
    pub destination_owner: Resolvable<Pubkey>,
    pub destination_token: Resolvable<Pubkey>,
    pub destination_token_record: Resolvable<Option<Pubkey>>,
}

impl Resolution {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            ..Self::default()
        }
    }

    pub fn is_resolved(&self, field: Field) -> bool {
        match field {
            Field::Mint => self.mint.is_resolved(),
            Field::Authority => self.authority.is_resolved(),
            Field::Payer => self.payer.is_resolved(),
            Field::UpdateAuthority => self.update_authority.is_resolved(),
            Field::TokenStandard => self.token_standard.is_resolved(),
            Field::Decimals => self.decimals.is_resolved(),
            Field::PrintSupply => self.print_supply.is_resolved(),
            Field::CollectionDetails => self.collection_details.is_resolved(),
            Field::Creators => self.creators.is_resolved(),
            Field::Metadata => self.metadata.is_resolved(),
            Field::MasterEdition => self.master_edition.is_resolved(),
            Field::SplTokenProgram => self.spl_token_program.is_resolved(),
            Field::TokenOwner => self.token_owner.is_resolved(),
            Field::Token => self.token.is_resolved(),
            Field::TokenRecord => self.token_record.is_resolved(),
            Field::DestinationOwner => self.destination_owner.is_resolved(),
            Field::DestinationToken => self.destination_token.is_resolved(),
            Field::DestinationTokenRecord => self.destination_token_record.is_resolved(),
        }
    }

    fn mint_key(&self) -> Result<Pubkey, ResolveError> {
        Ok(self.mint.require(Field::Mint)?.pubkey())
    }

    fn standard(&self) -> Result<TokenStandard, ResolveError> {
        self.token_standard.require(Field::TokenStandard).copied()
    }
}

/// One step of a resolution pipeline.
#[derive(Clone, Copy)]
pub struct Stage {
    pub writes: Field,
    pub reads: &'static [Field],
    run: fn(&Resolution) -> Result<Resolution, ResolveError>,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("writes", &self.writes)
            .field("reads", &self.reads)
            .finish()
    }
}

impl Stage {
    pub const fn new(
        writes: Field,
        reads: &'static [Field],
        run: fn(&Resolution) -> Result<Resolution, ResolveError>,
    ) -> Self {
        Self { writes, reads, run }
    }
}

/// Run `stages` in order over `input`.
pub fn resolve(stages: &[Stage], input: Resolution) -> Result<Resolution, ResolveError> {
    let mut current = input;
    for stage in stages {
        if current.is_resolved(stage.writes) {
            trace!(field = ?stage.writes, "supplied by caller");
            continue;
        }
        if let Some(field) = stage
            .reads
            .iter()
            .copied()
            .find(|field| !current.is_resolved(*field))
        {
            return Err(ResolveError::MissingDependency {
                field,
                needed_by: stage.writes,
            });
        }
        current = (stage.run)(&current)?;
        trace!(field = ?stage.writes, "resolved default");
    }
    Ok(current)
}

/// Accounts and arguments of `Create`.
pub const CREATE_V1: &[Stage] = &[
    Stage::new(Field::Payer, &[Field::Authority], payer_from_authority),
    Stage::new(Field::UpdateAuthority, &[Field::Authority], update_authority_from_authority),
    Stage::new(Field::Metadata, &[Field::Mint], metadata_from_mint),
    Stage::new(Field::Decimals, &[Field::TokenStandard], decimals_from_standard),
    Stage::new(Field::PrintSupply, &[Field::TokenStandard], print_supply_from_standard),
    Stage::new(Field::CollectionDetails, &[], collection_details_from_flag),
    Stage::new(Field::Creators, &[Field::Authority], creators_from_authority),
    Stage::new(
        Field::MasterEdition,
        &[Field::TokenStandard, Field::Mint],
        master_edition_for_non_fungible,
    ),
    Stage::new(
        Field::SplTokenProgram,
        &[Field::TokenStandard, Field::Mint],
        spl_token_program_from_standard_and_mint,
    ),
];

/// Accounts of `Mint`.
pub const MINT_V1: &[Stage] = &[
    Stage::new(Field::Payer, &[Field::Authority], payer_from_authority),
    Stage::new(Field::TokenOwner, &[Field::Authority], token_owner_unless_token_supplied),
    Stage::new(
        Field::SplTokenProgram,
        &[Field::TokenStandard, Field::Mint],
        spl_token_program_from_standard_and_mint,
    ),
    Stage::new(
        Field::Token,
        &[Field::Mint, Field::TokenOwner, Field::SplTokenProgram],
        token_from_owner,
    ),
    Stage::new(Field::Metadata, &[Field::Mint], metadata_from_mint),
    Stage::new(
        Field::MasterEdition,
        &[Field::TokenStandard, Field::Mint],
        master_edition_for_non_fungible,
    ),
    Stage::new(
        Field::TokenRecord,
        &[Field::TokenStandard, Field::Mint, Field::Token],
        token_record_for_programmable,
    ),
];

/// Accounts of `Transfer`.
pub const TRANSFER_V1: &[Stage] = &[
    Stage::new(Field::Payer, &[Field::Authority], payer_from_authority),
    Stage::new(Field::TokenOwner, &[Field::Authority], token_owner_from_authority),
    Stage::new(
        Field::SplTokenProgram,
        &[Field::TokenStandard, Field::Mint],
        spl_token_program_from_standard_and_mint,
    ),
    Stage::new(
        Field::Token,
        &[Field::Mint, Field::TokenOwner, Field::SplTokenProgram],
        token_from_owner,
    ),
    Stage::new(
        Field::DestinationToken,
        &[Field::Mint, Field::DestinationOwner, Field::SplTokenProgram],
        destination_token_from_owner,
    ),
    Stage::new(Field::Metadata, &[Field::Mint], metadata_from_mint),
    Stage::new(
        Field::MasterEdition,
        &[Field::TokenStandard, Field::Mint],
        master_edition_for_non_fungible,
    ),
    Stage::new(
        Field::TokenRecord,
        &[Field::TokenStandard, Field::Mint, Field::Token],
        token_record_for_programmable,
    ),
    Stage::new(
        Field::DestinationTokenRecord,
        &[Field::TokenStandard, Field::Mint, Field::DestinationToken],
        destination_token_record_for_programmable,
    ),
];

fn payer_from_authority(r: &Resolution) -> Result<Resolution, ResolveError> {
    let authority = *r.authority.require(Field::Authority)?;
    Ok(Resolution {
        payer: Resolvable::Resolved(authority),
        ..r.clone()
    })
}

fn update_authority_from_authority(r: &Resolution) -> Result<Resolution, ResolveError> {
    let authority = *r.authority.require(Field::Authority)?;
    Ok(Resolution {
        update_authority: Resolvable::Resolved(authority),
        ..r.clone()
    })
}

fn metadata_from_mint(r: &Resolution) -> Result<Resolution, ResolveError> {
    let (metadata, _) = find_metadata_pda_with_program(&r.program_id, &r.mint_key()?);
    Ok(Resolution {
        metadata: Resolvable::Resolved(metadata),
        ..r.clone()
    })
}

fn decimals_from_standard(r: &Resolution) -> Result<Resolution, ResolveError> {
    let decimals = if is_non_fungible(r.standard()?) {
        None
    } else {
        Some(0)
    };
    Ok(Resolution {
        decimals: Resolvable::Resolved(decimals),
        ..r.clone()
    })
}

fn print_supply_from_standard(r: &Resolution) -> Result<Resolution, ResolveError> {
    let print_supply = is_non_fungible(r.standard()?).then_some(PrintSupply::Zero);
    Ok(Resolution {
        print_supply: Resolvable::Resolved(print_supply),
        ..r.clone()
    })
}

fn collection_details_from_flag(r: &Resolution) -> Result<Resolution, ResolveError> {
    let details = r
        .is_collection
        .then_some(CollectionDetails::V2 { padding: [0; 8] });
    Ok(Resolution {
        collection_details: Resolvable::Resolved(details),
        ..r.clone()
    })
}

fn creators_from_authority(r: &Resolution) -> Result<Resolution, ResolveError> {
    let authority = *r.authority.require(Field::Authority)?;
    Ok(Resolution {
        creators: Resolvable::Resolved(vec![Creator {
            address: authority,
            verified: true,
            share: 100,
        }]),
        ..r.clone()
    })
}

fn master_edition_for_non_fungible(r: &Resolution) -> Result<Resolution, ResolveError> {
    let master_edition = if is_non_fungible(r.standard()?) {
        Some(find_master_edition_pda_with_program(&r.program_id, &r.mint_key()?).0)
    } else {
        None
    };
    Ok(Resolution {
        master_edition: Resolvable::Resolved(master_edition),
        ..r.clone()
    })
}

// Non-fungibles and signer mints name Token-2022 explicitly; everything else
// stays on the legacy token program.
fn spl_token_program_from_standard_and_mint(r: &Resolution) -> Result<Resolution, ResolveError> {
    let mint = r.mint.require(Field::Mint)?;
    let program = if is_non_fungible(r.standard()?) || mint.is_signer() {
        spl_token_2022::id()
    } else {
        spl_token::id()
    };
    Ok(Resolution {
        spl_token_program: Resolvable::Resolved(program),
        ..r.clone()
    })
}

fn token_owner_unless_token_supplied(r: &Resolution) -> Result<Resolution, ResolveError> {
    let owner = if r.token.is_resolved() {
        None
    } else {
        Some(*r.authority.require(Field::Authority)?)
    };
    Ok(Resolution {
        token_owner: Resolvable::Resolved(owner),
        ..r.clone()
    })
}

fn token_owner_from_authority(r: &Resolution) -> Result<Resolution, ResolveError> {
    let authority = *r.authority.require(Field::Authority)?;
    Ok(Resolution {
        token_owner: Resolvable::Resolved(Some(authority)),
        ..r.clone()
    })
}

fn token_from_owner(r: &Resolution) -> Result<Resolution, ResolveError> {
    let owner = r
        .token_owner
        .require(Field::TokenOwner)?
        .ok_or(ResolveError::Unresolved(Field::TokenOwner))?;
    let program = r.spl_token_program.require(Field::SplTokenProgram)?;
    let (token, _) = find_associated_token_pda(&owner, &r.mint_key()?, program);
    Ok(Resolution {
        token: Resolvable::Resolved(token),
        ..r.clone()
    })
}

fn destination_token_from_owner(r: &Resolution) -> Result<Resolution, ResolveError> {
    let owner = r.destination_owner.require(Field::DestinationOwner)?;
    let program = r.spl_token_program.require(Field::SplTokenProgram)?;
    let (token, _) = find_associated_token_pda(owner, &r.mint_key()?, program);
    Ok(Resolution {
        destination_token: Resolvable::Resolved(token),
        ..r.clone()
    })
}

fn token_record_for_programmable(r: &Resolution) -> Result<Resolution, ResolveError> {
    let record = if is_programmable(r.standard()?) {
        let token = r.token.require(Field::Token)?;
        Some(find_token_record_pda_with_program(&r.program_id, &r.mint_key()?, token).0)
    } else {
        None
    };
    Ok(Resolution {
        token_record: Resolvable::Resolved(record),
        ..r.clone()
    })
}

fn destination_token_record_for_programmable(
    r: &Resolution,
) -> Result<Resolution, ResolveError> {
    let record = if is_programmable(r.standard()?) {
        let token = r.destination_token.require(Field::DestinationToken)?;
        Some(find_token_record_pda_with_program(&r.program_id, &r.mint_key()?, token).0)
    } else {
        None
    };
    Ok(Resolution {
        destination_token_record: Resolvable::Resolved(record),
        ..r.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(token_standard: TokenStandard) -> Resolution {
        Resolution {
            mint: Resolvable::Resolved(MintInput::Address(Pubkey::new_unique())),
            authority: Resolvable::Resolved(Pubkey::new_unique()),
            token_standard: Resolvable::Resolved(token_standard),
            ..Resolution::new(token_metadata_interface::id())
        }
    }

    #[test]
    fn stages_only_read_fields_written_earlier_or_supplied() {
        let supplied = [
            Field::Mint,
            Field::Authority,
            Field::TokenStandard,
            Field::Token,
            Field::DestinationOwner,
        ];
        for pipeline in [CREATE_V1, MINT_V1, TRANSFER_V1] {
            let mut written: Vec<Field> = supplied.to_vec();
            for stage in pipeline {
                for read in stage.reads {
                    assert!(written.contains(read), "{stage:?} reads {read:?} too early");
                }
                written.push(stage.writes);
            }
        }
    }

    #[test]
    fn predicates_split_nft_like_from_programmable() {
        use TokenStandard::*;
        let nft_like: Vec<_> = [
            NonFungible,
            FungibleAsset,
            Fungible,
            NonFungibleEdition,
            ProgrammableNonFungible,
            ProgrammableNonFungibleEdition,
        ]
        .into_iter()
        .filter(|standard| is_non_fungible(*standard))
        .collect();
        assert_eq!(
            nft_like,
            vec![NonFungible, NonFungibleEdition, ProgrammableNonFungible]
        );

        assert!(is_programmable(ProgrammableNonFungible));
        assert!(!is_programmable(ProgrammableNonFungibleEdition));
        assert!(!is_programmable(NonFungibleEdition));
    }

    #[test]
    fn supplied_fields_are_kept() {
        let decimals = Resolvable::Resolved(Some(6));
        let input = Resolution {
            decimals: decimals.clone(),
            ..create_input(TokenStandard::NonFungible)
        };
        let resolved = resolve(CREATE_V1, input).unwrap();
        assert_eq!(resolved.decimals, decimals);
    }

    #[test]
    fn missing_dependency_fails_fast() {
        let input = Resolution {
            token_standard: Resolvable::Unresolved,
            ..create_input(TokenStandard::Fungible)
        };
        assert_eq!(
            resolve(CREATE_V1, input),
            Err(ResolveError::MissingDependency {
                field: Field::TokenStandard,
                needed_by: Field::Decimals,
            })
        );
    }
}
