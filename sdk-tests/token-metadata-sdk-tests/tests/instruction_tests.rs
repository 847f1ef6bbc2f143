use solana_program::{pubkey::Pubkey, system_program, sysvar};
use token_metadata_interface::{
    instruction::{CreateArgs, MetadataInstruction, MintArgs, PrintSupply, CREATE_DISCRIMINATOR},
    spl_associated_token, spl_token_2022,
    state::{CollectionDetails, Creator, TokenStandard},
};
use token_metadata_sdk::{
    CreateV1Params, MintInput, MintV1Params, ResolveError, TokenMetadataClient, TransferV1Params,
    TxCreateAndMintParams,
};

const ALL_STANDARDS: [TokenStandard; 6] = [
    TokenStandard::NonFungible,
    TokenStandard::FungibleAsset,
    TokenStandard::Fungible,
    TokenStandard::NonFungibleEdition,
    TokenStandard::ProgrammableNonFungible,
    TokenStandard::ProgrammableNonFungibleEdition,
];

fn create_params(mint: MintInput, token_standard: TokenStandard) -> CreateV1Params {
    CreateV1Params::new(
        mint,
        Pubkey::new_unique(),
        "My Asset",
        "https://example.com/asset.json",
        500,
        token_standard,
    )
}

fn mint_params(token_standard: TokenStandard) -> MintV1Params {
    MintV1Params {
        mint: Pubkey::new_unique(),
        authority: Pubkey::new_unique(),
        payer: None,
        token: None,
        token_owner: None,
        token_standard,
        amount: 1,
        delegate_record: None,
        authorization_rules: None,
        authorization_data: None,
        spl_token_program: None,
    }
}

fn transfer_params(token_standard: TokenStandard) -> TransferV1Params {
    TransferV1Params {
        mint: Pubkey::new_unique(),
        authority: Pubkey::new_unique(),
        payer: None,
        token: None,
        token_owner: None,
        destination_owner: Pubkey::new_unique(),
        destination_token: None,
        token_standard,
        amount: 1,
        authorization_rules: None,
        authorization_data: None,
        spl_token_program: None,
    }
}

#[test]
fn decimals_and_print_supply_follow_the_standard() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();
    for standard in ALL_STANDARDS {
        let params = create_params(MintInput::Address(Pubkey::new_unique()), standard);
        let resolved = client.resolve_create_v1(&params)?;
        let nft = matches!(
            standard,
            TokenStandard::NonFungible
                | TokenStandard::NonFungibleEdition
                | TokenStandard::ProgrammableNonFungible
        );
        let (decimals, print_supply) = if nft {
            (None, Some(PrintSupply::Zero))
        } else {
            (Some(0), None)
        };
        assert_eq!(resolved.decimals.get(), Some(&decimals), "{standard:?}");
        assert_eq!(resolved.print_supply.get(), Some(&print_supply), "{standard:?}");
        assert_eq!(
            resolved.master_edition.get().map(Option::is_some),
            Some(nft),
            "{standard:?}"
        );
    }
    Ok(())
}

#[test]
fn explicit_decimals_and_print_supply_are_kept() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();
    let mut params = create_params(
        MintInput::Address(Pubkey::new_unique()),
        TokenStandard::NonFungible,
    );
    params.decimals = Some(3);
    params.print_supply = Some(PrintSupply::Limited(10));

    let resolved = client.resolve_create_v1(&params)?;

    assert_eq!(resolved.decimals.get(), Some(&Some(3)));
    assert_eq!(resolved.print_supply.get(), Some(&Some(PrintSupply::Limited(10))));
    Ok(())
}

#[test]
fn authority_fills_payer_update_authority_and_creators() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();
    let params = create_params(
        MintInput::Address(Pubkey::new_unique()),
        TokenStandard::Fungible,
    );
    let authority = params.authority;

    let resolved = client.resolve_create_v1(&params)?;

    assert_eq!(resolved.payer.get(), Some(&authority));
    assert_eq!(resolved.update_authority.get(), Some(&authority));
    assert_eq!(
        resolved.creators.get(),
        Some(&vec![Creator {
            address: authority,
            verified: true,
            share: 100,
        }])
    );
    assert_eq!(resolved.collection_details.get(), Some(&None));
    Ok(())
}

#[test]
fn collection_flag_adds_collection_details() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();
    let mut params = create_params(
        MintInput::Address(Pubkey::new_unique()),
        TokenStandard::NonFungible,
    );
    params.is_collection = true;

    let resolved = client.resolve_create_v1(&params)?;

    assert_eq!(
        resolved.collection_details.get(),
        Some(&Some(CollectionDetails::V2 { padding: [0; 8] }))
    );
    Ok(())
}

#[test]
fn spl_token_program_depends_on_standard_and_mint_signer() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();
    let cases = [
        (TokenStandard::Fungible, false, spl_token::id()),
        (TokenStandard::FungibleAsset, false, spl_token::id()),
        (TokenStandard::Fungible, true, spl_token_2022::id()),
        (TokenStandard::NonFungible, false, spl_token_2022::id()),
    ];
    for (standard, signer, expected) in cases {
        let key = Pubkey::new_unique();
        let mint = if signer {
            MintInput::Signer(key)
        } else {
            MintInput::Address(key)
        };
        let resolved = client.resolve_create_v1(&create_params(mint, standard))?;
        assert_eq!(resolved.spl_token_program.get(), Some(&expected), "{standard:?}");
    }

    let mut params = create_params(
        MintInput::Signer(Pubkey::new_unique()),
        TokenStandard::NonFungible,
    );
    params.spl_token_program = Some(spl_token::id());
    let resolved = client.resolve_create_v1(&params)?;
    assert_eq!(resolved.spl_token_program.get(), Some(&spl_token::id()));
    Ok(())
}

#[test]
fn token_record_only_for_exactly_programmable_non_fungible() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();

    let edition = client.resolve_mint_v1(&mint_params(TokenStandard::NonFungibleEdition))?;
    assert_eq!(edition.token_record.get(), Some(&None));

    let programmable_edition =
        client.resolve_mint_v1(&mint_params(TokenStandard::ProgrammableNonFungibleEdition))?;
    assert_eq!(programmable_edition.token_record.get(), Some(&None));

    let params = mint_params(TokenStandard::ProgrammableNonFungible);
    let programmable = client.resolve_mint_v1(&params)?;
    let token = *programmable.token.get().expect("token");
    assert_eq!(
        programmable.token_record.get(),
        Some(&Some(client.token_record_pda(&params.mint, &token)))
    );
    Ok(())
}

#[test]
fn mint_token_defaults_to_authority_ata() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();
    let params = mint_params(TokenStandard::Fungible);

    let resolved = client.resolve_mint_v1(&params)?;

    assert_eq!(resolved.token_owner.get(), Some(&Some(params.authority)));
    assert_eq!(
        resolved.token.get(),
        Some(&client.associated_token_address(
            &params.authority,
            &params.mint,
            &spl_token::id()
        ))
    );
    Ok(())
}

#[test]
fn mint_with_explicit_token_leaves_owner_out() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();
    let token = Pubkey::new_unique();
    let mut params = mint_params(TokenStandard::Fungible);
    params.token = Some(token);

    let ix = client.mint_v1_ix(params)?;

    assert_eq!(ix.accounts[0].pubkey, token);
    assert_eq!(ix.accounts[1].pubkey, client.program_id);
    assert!(!ix.accounts[1].is_writable);
    Ok(())
}

#[test]
fn create_accounts_are_ordered_with_placeholders() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();
    let mint = Pubkey::new_unique();
    let params = create_params(MintInput::Signer(mint), TokenStandard::Fungible);
    let authority = params.authority;

    let ix = client.create_v1_ix(params)?;

    assert_eq!(ix.program_id, client.program_id);
    let keys: Vec<Pubkey> = ix.accounts.iter().map(|meta| meta.pubkey).collect();
    assert_eq!(
        keys,
        vec![
            client.metadata_pda(&mint),
            client.program_id,
            mint,
            authority,
            authority,
            authority,
            system_program::id(),
            sysvar::instructions::id(),
            spl_token_2022::id(),
        ]
    );
    assert!(ix.accounts[2].is_signer && ix.accounts[2].is_writable);
    assert!(ix.accounts[3].is_signer && !ix.accounts[3].is_writable);
    assert!(ix.accounts[4].is_signer && ix.accounts[4].is_writable);
    assert!(!ix.accounts[5].is_signer);

    assert_eq!(ix.data[0], CREATE_DISCRIMINATOR);
    match MetadataInstruction::unpack(&ix.data)? {
        MetadataInstruction::Create(CreateArgs::V1 {
            asset_data,
            decimals,
            print_supply,
        }) => {
            assert_eq!(asset_data.name, "My Asset");
            assert_eq!(asset_data.token_standard, TokenStandard::Fungible);
            assert_eq!(decimals, Some(0));
            assert_eq!(print_supply, None);
        }
        other => panic!("unexpected instruction {other:?}"),
    }
    Ok(())
}

#[test]
fn create_nft_includes_master_edition() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();
    let mint = Pubkey::new_unique();

    let ix = client.create_nft_ix(create_params(
        MintInput::Address(mint),
        TokenStandard::Fungible,
    ))?;

    assert_eq!(ix.accounts[1].pubkey, client.master_edition_pda(&mint));
    assert!(ix.accounts[1].is_writable);
    assert!(!ix.accounts[2].is_signer);
    Ok(())
}

#[test]
fn create_rejects_invalid_asset_data() {
    let client = TokenMetadataClient::default();

    let mut long_name = create_params(
        MintInput::Address(Pubkey::new_unique()),
        TokenStandard::NonFungible,
    );
    long_name.name = "x".repeat(33);
    assert!(client.create_v1_ix(long_name).is_err());

    let mut fee = create_params(
        MintInput::Address(Pubkey::new_unique()),
        TokenStandard::NonFungible,
    );
    fee.seller_fee_basis_points = 10_001;
    assert!(client.create_v1_ix(fee).is_err());

    let mut shares = create_params(
        MintInput::Address(Pubkey::new_unique()),
        TokenStandard::NonFungible,
    );
    shares.creators = Some(vec![Creator {
        address: Pubkey::new_unique(),
        verified: false,
        share: 60,
    }]);
    assert!(client.create_v1_ix(shares).is_err());
}

#[test]
fn programmable_mint_carries_token_record() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();
    let params = mint_params(TokenStandard::ProgrammableNonFungible);
    let (mint, authority) = (params.mint, params.authority);

    let ix = client.mint_v1_ix(params)?;

    assert_eq!(ix.accounts.len(), 15);
    let token = client.associated_token_address(&authority, &mint, &spl_token_2022::id());
    assert_eq!(ix.accounts[0].pubkey, token);
    assert_eq!(ix.accounts[3].pubkey, client.master_edition_pda(&mint));
    assert_eq!(ix.accounts[4].pubkey, client.token_record_pda(&mint, &token));
    assert!(ix.accounts[4].is_writable);
    assert_eq!(ix.accounts[12].pubkey, spl_associated_token::id());
    assert_eq!(ix.accounts[13].pubkey, client.program_id);
    assert_eq!(ix.accounts[14].pubkey, client.program_id);

    match MetadataInstruction::unpack(&ix.data)? {
        MetadataInstruction::Mint(MintArgs::V1 { amount, .. }) => assert_eq!(amount, 1),
        other => panic!("unexpected instruction {other:?}"),
    }
    Ok(())
}

#[test]
fn mint_rejects_zero_amount() {
    let client = TokenMetadataClient::default();
    let mut params = mint_params(TokenStandard::Fungible);
    params.amount = 0;
    assert!(client.mint_v1_ix(params).is_err());
}

#[test]
fn transfer_resolves_both_token_accounts() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();
    let params = transfer_params(TokenStandard::ProgrammableNonFungible);
    let (mint, authority, destination) = (params.mint, params.authority, params.destination_owner);
    let rules = Pubkey::new_unique();

    let ix = client.transfer_v1_ix(TransferV1Params {
        authorization_rules: Some(rules),
        ..params
    })?;

    let program = spl_token_2022::id();
    let source = client.associated_token_address(&authority, &mint, &program);
    let target = client.associated_token_address(&destination, &mint, &program);
    assert_eq!(ix.accounts.len(), 17);
    assert_eq!(ix.accounts[0].pubkey, source);
    assert_eq!(ix.accounts[1].pubkey, authority);
    assert_eq!(ix.accounts[2].pubkey, target);
    assert_eq!(ix.accounts[3].pubkey, destination);
    assert_eq!(ix.accounts[7].pubkey, client.token_record_pda(&mint, &source));
    assert_eq!(ix.accounts[8].pubkey, client.token_record_pda(&mint, &target));
    assert!(ix.accounts[9].is_signer);
    assert_eq!(ix.accounts[15].pubkey, token_metadata_interface::token_auth_rules::id());
    assert_eq!(ix.accounts[16].pubkey, rules);
    Ok(())
}

#[test]
fn programmable_edition_transfer_has_no_token_records() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();

    let ix = client.transfer_v1_ix(transfer_params(
        TokenStandard::ProgrammableNonFungibleEdition,
    ))?;

    assert_eq!(ix.accounts[7].pubkey, client.program_id);
    assert_eq!(ix.accounts[8].pubkey, client.program_id);
    Ok(())
}

#[test]
fn fungible_transfer_has_no_edition_or_records() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();

    let ix = client.transfer_v1_ix(transfer_params(TokenStandard::Fungible))?;

    for index in [6, 7, 8, 15, 16] {
        assert_eq!(ix.accounts[index].pubkey, client.program_id, "account {index}");
    }
    Ok(())
}

#[test]
fn create_and_mint_share_one_token_program() -> anyhow::Result<()> {
    let client = TokenMetadataClient::default();
    let mint = Pubkey::new_unique();
    let create = create_params(MintInput::Signer(mint), TokenStandard::Fungible);
    let authority = create.authority;

    let (ixs, pdas) = client.create_and_mint_tx_with_pdas(TxCreateAndMintParams {
        create,
        amount: 1_000,
        token_owner: None,
    })?;

    assert_eq!(ixs.len(), 2);
    assert_eq!(pdas.metadata_pda, client.metadata_pda(&mint));
    assert_eq!(pdas.master_edition_pda, None);
    assert_eq!(pdas.token_record_pda, None);
    assert_eq!(
        pdas.token,
        client.associated_token_address(&authority, &mint, &spl_token_2022::id())
    );
    assert_eq!(ixs[0].accounts[8].pubkey, spl_token_2022::id());
    assert_eq!(ixs[1].accounts[11].pubkey, spl_token_2022::id());
    assert_eq!(ixs[1].accounts[0].pubkey, pdas.token);
    Ok(())
}

#[test]
fn unresolved_errors_name_the_field() {
    let err = ResolveError::Unresolved(token_metadata_sdk::resolver::Field::Token);
    assert_eq!(err.to_string(), "Token is unresolved");
}
