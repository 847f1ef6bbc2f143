//! Generic program-derived address derivation.
//!
//! The named helpers on [`crate::TokenMetadataClient`] cover every account the
//! program owns and derive through the interface crate directly. [`derive`] is
//! the extension point for seeds outside that set, reached through
//! [`crate::TokenMetadataClient::custom_pda`].

use solana_program::pubkey::{Pubkey, MAX_SEEDS, MAX_SEED_LEN};

use crate::error::PdaError;

/// One seed of a PDA derivation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Seed<'a> {
    /// UTF-8 literal such as `"metadata"`
    Literal(&'a str),
    /// Raw 32-byte address
    Address(&'a Pubkey),
    /// Single-byte tag (delegate role, authority type)
    Byte(u8),
    /// The id of the program the address is derived under
    ProgramId,
}

impl Seed<'_> {
    fn encode(&self, program_id: &Pubkey) -> Vec<u8> {
        match self {
            Seed::Literal(s) => s.as_bytes().to_vec(),
            Seed::Address(key) => key.to_bytes().to_vec(),
            Seed::Byte(b) => vec![*b],
            Seed::ProgramId => program_id.to_bytes().to_vec(),
        }
    }
}

/// Derive `(address, bump)` for `seeds` under `program_id`.
pub fn derive(seeds: &[Seed<'_>], program_id: &Pubkey) -> Result<(Pubkey, u8), PdaError> {
    if seeds.len() >= MAX_SEEDS {
        return Err(PdaError::TooManySeeds(seeds.len()));
    }
    let encoded: Vec<Vec<u8>> = seeds.iter().map(|s| s.encode(program_id)).collect();
    if let Some((index, seed)) = encoded
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(PdaError::SeedTooLong {
            index,
            len: seed.len(),
        });
    }
    let refs: Vec<&[u8]> = encoded.iter().map(Vec::as_slice).collect();
    Pubkey::try_find_program_address(&refs, program_id).ok_or(PdaError::NoViableBump)
}

#[cfg(test)]
mod tests {
    use super::*;
    use token_metadata_interface::{
        find_metadata_pda_with_program, find_token_record_pda_with_program,
    };

    #[test]
    fn matches_named_metadata_helper() {
        let program_id = token_metadata_interface::id();
        let mint = Pubkey::new_unique();
        let derived = derive(
            &[Seed::Literal("metadata"), Seed::ProgramId, Seed::Address(&mint)],
            &program_id,
        )
        .unwrap();
        assert_eq!(derived, find_metadata_pda_with_program(&program_id, &mint));
    }

    #[test]
    fn matches_named_token_record_helper() {
        let program_id = token_metadata_interface::id();
        let mint = Pubkey::new_unique();
        let token = Pubkey::new_unique();
        let derived = derive(
            &[
                Seed::Literal("metadata"),
                Seed::ProgramId,
                Seed::Address(&mint),
                Seed::Literal("token_record"),
                Seed::Address(&token),
            ],
            &program_id,
        )
        .unwrap();
        assert_eq!(
            derived,
            find_token_record_pda_with_program(&program_id, &mint, &token)
        );
    }

    #[test]
    fn deterministic() {
        let program_id = Pubkey::new_unique();
        let seeds = [Seed::Literal("escrow"), Seed::Byte(1)];
        assert_eq!(
            derive(&seeds, &program_id).unwrap(),
            derive(&seeds, &program_id).unwrap()
        );
    }

    #[test]
    fn rejects_long_seed() {
        let long = "x".repeat(33);
        let err = derive(&[Seed::Byte(0), Seed::Literal(&long)], &Pubkey::new_unique());
        assert_eq!(err, Err(PdaError::SeedTooLong { index: 1, len: 33 }));
    }

    #[test]
    fn rejects_too_many_seeds() {
        let seeds = [Seed::Byte(0); 16];
        assert_eq!(
            derive(&seeds, &Pubkey::new_unique()),
            Err(PdaError::TooManySeeds(16))
        );
    }
}
