//! Edition variant selection from the leading `Key` byte.

use solana_program::pubkey::Pubkey;
use token_metadata_interface::{
    error::MetadataError,
    state::{Edition, Key, MasterEdition},
};

/// Which edition shape an account holds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EditionKind {
    Master,
    Print,
}

/// Map a discriminator byte to an edition shape.
///
/// Any byte that is not a master edition (either version) or a print edition
/// yields `None`: the account holds something else, or nothing at all.
pub fn select_edition(discriminator: u8) -> Option<EditionKind> {
    match Key::from_account_data(&[discriminator])? {
        Key::MasterEditionV1 | Key::MasterEditionV2 => Some(EditionKind::Master),
        Key::EditionV1 => Some(EditionKind::Print),
        Key::Uninitialized
        | Key::ReservationListV1
        | Key::MetadataV1
        | Key::ReservationListV2
        | Key::EditionMarker
        | Key::UseAuthorityRecord
        | Key::CollectionAuthorityRecord
        | Key::TokenOwnedEscrow
        | Key::TokenRecord
        | Key::MetadataDelegate
        | Key::EditionMarkerV2
        | Key::HolderDelegate => None,
    }
}

/// Edition attached to a digital asset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AssetEdition {
    /// The printable original
    Master {
        address: Pubkey,
        edition: MasterEdition,
    },
    /// A numbered print
    Print { address: Pubkey, edition: Edition },
}

impl AssetEdition {
    /// Decode `data` as an edition. `Ok(None)` when the key byte is not an edition.
    pub fn from_account_data(address: Pubkey, data: &[u8]) -> Result<Option<Self>, MetadataError> {
        let Some(kind) = data.first().copied().and_then(select_edition) else {
            return Ok(None);
        };
        let edition = match kind {
            EditionKind::Master => AssetEdition::Master {
                address,
                edition: MasterEdition::from_bytes(data)?,
            },
            EditionKind::Print => AssetEdition::Print {
                address,
                edition: Edition::from_bytes(data)?,
            },
        };
        Ok(Some(edition))
    }

    /// `true` for master editions, `false` for prints.
    pub fn is_original(&self) -> bool {
        matches!(self, AssetEdition::Master { .. })
    }

    pub fn address(&self) -> Pubkey {
        match self {
            AssetEdition::Master { address, .. } | AssetEdition::Print { address, .. } => *address,
        }
    }

    pub fn kind(&self) -> EditionKind {
        match self {
            AssetEdition::Master { .. } => EditionKind::Master,
            AssetEdition::Print { .. } => EditionKind::Print,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_master_for_both_versions() {
        assert_eq!(select_edition(Key::MasterEditionV1 as u8), Some(EditionKind::Master));
        assert_eq!(select_edition(Key::MasterEditionV2 as u8), Some(EditionKind::Master));
    }

    #[test]
    fn selects_print() {
        assert_eq!(select_edition(Key::EditionV1 as u8), Some(EditionKind::Print));
    }

    #[test]
    fn everything_else_is_absent() {
        for byte in 0..=u8::MAX {
            let expected = matches!(byte, 1 | 2 | 6);
            assert_eq!(select_edition(byte).is_some(), expected, "byte {byte}");
        }
    }

    #[test]
    fn empty_data_is_absent() {
        assert_eq!(
            AssetEdition::from_account_data(Pubkey::new_unique(), &[]),
            Ok(None)
        );
    }

    #[test]
    fn truncated_master_edition_is_an_error() {
        let data = [Key::MasterEditionV2 as u8, 1, 0];
        assert_eq!(
            AssetEdition::from_account_data(Pubkey::new_unique(), &data),
            Err(MetadataError::DeserializationError)
        );
    }
}
