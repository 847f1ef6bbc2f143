use solana_program::pubkey::Pubkey;
use token_metadata_interface::{
    find_master_edition_pda_with_program,
    state::{EscrowAuthority, HolderDelegateRole, MetadataDelegateRole},
};
use token_metadata_sdk::{
    pda::{derive, Seed},
    PdaError, TokenMetadataClient,
};

#[test]
fn generic_derivation_matches_named_helpers() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();
    let mint = Pubkey::new_unique();

    let derived = derive(
        &[
            Seed::Literal("metadata"),
            Seed::ProgramId,
            Seed::Address(&mint),
            Seed::Literal("edition"),
        ],
        &client.program_id,
    )?;

    assert_eq!(
        derived,
        find_master_edition_pda_with_program(&client.program_id, &mint)
    );
    assert_eq!(derived.0, client.master_edition_pda(&mint));
    Ok(())
}

#[test]
fn associated_token_matches_generic_derivation() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();
    let owner = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    let program = spl_token::id();

    let (ata, _) = derive(
        &[
            Seed::Address(&owner),
            Seed::Address(&program),
            Seed::Address(&mint),
        ],
        &token_metadata_interface::spl_associated_token::id(),
    )?;

    assert_eq!(client.associated_token_address(&owner, &mint, &program), ata);
    Ok(())
}

#[test]
fn derivation_is_deterministic_and_program_scoped() {
    let mint = Pubkey::new_unique();
    let client = TokenMetadataClient::default();
    let other = TokenMetadataClient::new(Pubkey::new_unique());

    assert_eq!(client.metadata_pda(&mint), client.metadata_pda(&mint));
    assert_ne!(client.metadata_pda(&mint), other.metadata_pda(&mint));
}

#[test]
fn edition_markers_cover_248_editions_each() {
    let client = TokenMetadataClient::default();
    let mint = Pubkey::new_unique();

    assert_eq!(
        client.edition_marker_pda(&mint, 1),
        client.edition_marker_pda(&mint, 247)
    );
    assert_ne!(
        client.edition_marker_pda(&mint, 247),
        client.edition_marker_pda(&mint, 248)
    );
}

#[test]
fn delegate_and_escrow_records_are_distinct_per_role() {
    let client = TokenMetadataClient::default();
    let mint = Pubkey::new_unique();
    let authority = Pubkey::new_unique();
    let delegate = Pubkey::new_unique();

    let collection = client.metadata_delegate_record_pda(
        &mint,
        MetadataDelegateRole::Collection,
        &authority,
        &delegate,
    );
    let data = client.metadata_delegate_record_pda(
        &mint,
        MetadataDelegateRole::Data,
        &authority,
        &delegate,
    );
    let print = client.holder_delegate_record_pda(
        &mint,
        HolderDelegateRole::PrintDelegate,
        &authority,
        &delegate,
    );
    assert_ne!(collection, data);
    assert_ne!(collection, print);

    let owner_escrow = client.token_owned_escrow_pda(&mint, &EscrowAuthority::TokenOwner);
    let creator_escrow =
        client.token_owned_escrow_pda(&mint, &EscrowAuthority::Creator(authority));
    assert_ne!(owner_escrow, creator_escrow);
}

#[test]
fn oversized_seeds_are_rejected() {
    let program_id = Pubkey::new_unique();
    let long = "x".repeat(33);

    assert_eq!(
        derive(&[Seed::Literal(&long)], &program_id),
        Err(PdaError::SeedTooLong { index: 0, len: 33 })
    );
}

#[test]
fn custom_pda_derives_under_the_client_program() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();
    let mint = Pubkey::new_unique();

    let (metadata, _) = client.custom_pda(&[
        Seed::Literal("metadata"),
        Seed::ProgramId,
        Seed::Address(&mint),
    ])?;
    assert_eq!(metadata, client.metadata_pda(&mint));

    let long = "x".repeat(40);
    assert_eq!(
        client.custom_pda(&[Seed::Literal("metadata"), Seed::Literal(&long)]),
        Err(PdaError::SeedTooLong { index: 1, len: 40 })
    );
    Ok(())
}
