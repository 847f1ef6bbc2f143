#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Token Metadata program interface: account layouts, PDA seeds and instruction data.

pub mod error;
pub mod instruction;
pub mod state;

use solana_program::pubkey::Pubkey;

use crate::state::{EscrowAuthority, HolderDelegateRole, MetadataDelegateRole};

solana_program::declare_id!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Token-2022 program id
pub mod spl_token_2022 {
    solana_program::declare_id!("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");
}

/// Associated Token Account program id
pub mod spl_associated_token {
    solana_program::declare_id!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");
}

/// Token Auth Rules program id
pub mod token_auth_rules {
    solana_program::declare_id!("auth9SigNpDKz4sJJ1DfCTuZrZNSAgh9sFD3rboVmgg");
}

/// Prefix seed shared by every account owned by the program
pub const PREFIX: &[u8] = b"metadata";

/// Seed for master edition, print edition and edition marker accounts
pub const EDITION: &[u8] = b"edition";

/// Seed for the edition marker v2 account
pub const MARKER: &[u8] = b"marker";

/// Seed for token record accounts
pub const TOKEN_RECORD_SEED: &[u8] = b"token_record";

/// Seed for collection authority records
pub const COLLECTION_AUTHORITY: &[u8] = b"collection_authority";

/// Seed for use authority records
pub const USER: &[u8] = b"user";

/// Seed for the burner account
pub const BURN: &[u8] = b"burn";

/// Seed for token-owned escrow accounts
pub const ESCROW_POSTFIX: &[u8] = b"escrow";

/// Number of editions tracked by one edition marker account
pub const EDITION_MARKER_BIT_SIZE: u64 = 248;

/// Derive the `Metadata` PDA for a given mint
pub fn find_metadata_pda_with_program(program_id: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PREFIX, program_id.as_ref(), mint.as_ref()], program_id)
}

/// Derive the master edition (or print edition) PDA for a given mint
pub fn find_master_edition_pda_with_program(program_id: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[PREFIX, program_id.as_ref(), mint.as_ref(), EDITION],
        program_id,
    )
}

/// Derive the edition marker PDA tracking `edition_number` of a master edition mint
pub fn find_edition_marker_pda_with_program(
    program_id: &Pubkey,
    mint: &Pubkey,
    edition_number: u64,
) -> (Pubkey, u8) {
    let marker = (edition_number / EDITION_MARKER_BIT_SIZE).to_string();
    Pubkey::find_program_address(
        &[
            PREFIX,
            program_id.as_ref(),
            mint.as_ref(),
            EDITION,
            marker.as_bytes(),
        ],
        program_id,
    )
}

/// Derive the edition marker v2 PDA for a master edition mint
pub fn find_edition_marker_v2_pda_with_program(program_id: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[PREFIX, program_id.as_ref(), mint.as_ref(), EDITION, MARKER],
        program_id,
    )
}

/// Derive the `TokenRecord` PDA for a (mint, token account) pair
pub fn find_token_record_pda_with_program(
    program_id: &Pubkey,
    mint: &Pubkey,
    token: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            PREFIX,
            program_id.as_ref(),
            mint.as_ref(),
            TOKEN_RECORD_SEED,
            token.as_ref(),
        ],
        program_id,
    )
}

/// Derive the metadata delegate record PDA
pub fn find_metadata_delegate_record_pda_with_program(
    program_id: &Pubkey,
    mint: &Pubkey,
    role: MetadataDelegateRole,
    update_authority: &Pubkey,
    delegate: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            PREFIX,
            program_id.as_ref(),
            mint.as_ref(),
            role.seed().as_bytes(),
            update_authority.as_ref(),
            delegate.as_ref(),
        ],
        program_id,
    )
}

/// Derive the holder delegate record PDA
pub fn find_holder_delegate_record_pda_with_program(
    program_id: &Pubkey,
    mint: &Pubkey,
    role: HolderDelegateRole,
    owner: &Pubkey,
    delegate: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            PREFIX,
            program_id.as_ref(),
            mint.as_ref(),
            role.seed().as_bytes(),
            owner.as_ref(),
            delegate.as_ref(),
        ],
        program_id,
    )
}

/// Derive the collection authority record PDA
pub fn find_collection_authority_pda_with_program(
    program_id: &Pubkey,
    mint: &Pubkey,
    collection_authority: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            PREFIX,
            program_id.as_ref(),
            mint.as_ref(),
            COLLECTION_AUTHORITY,
            collection_authority.as_ref(),
        ],
        program_id,
    )
}

/// Derive the use authority record PDA
pub fn find_use_authority_record_pda_with_program(
    program_id: &Pubkey,
    mint: &Pubkey,
    use_authority: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            PREFIX,
            program_id.as_ref(),
            mint.as_ref(),
            USER,
            use_authority.as_ref(),
        ],
        program_id,
    )
}

/// Derive the program-wide burner PDA
pub fn find_burner_pda_with_program(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PREFIX, program_id.as_ref(), BURN], program_id)
}

/// Derive the token-owned escrow PDA.
///
/// The creator address is only part of the seeds for `EscrowAuthority::Creator`.
pub fn find_token_owned_escrow_pda_with_program(
    program_id: &Pubkey,
    mint: &Pubkey,
    authority: &EscrowAuthority,
) -> (Pubkey, u8) {
    let tag = [authority.tag()];
    match authority {
        EscrowAuthority::TokenOwner => Pubkey::find_program_address(
            &[
                PREFIX,
                program_id.as_ref(),
                mint.as_ref(),
                &tag,
                ESCROW_POSTFIX,
            ],
            program_id,
        ),
        EscrowAuthority::Creator(creator) => Pubkey::find_program_address(
            &[
                PREFIX,
                program_id.as_ref(),
                mint.as_ref(),
                &tag,
                creator.as_ref(),
                ESCROW_POSTFIX,
            ],
            program_id,
        ),
    }
}

/// Derive the canonical associated token account for `(owner, mint)` under `token_program`
pub fn find_associated_token_pda(
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
        &spl_associated_token::id(),
    )
}
