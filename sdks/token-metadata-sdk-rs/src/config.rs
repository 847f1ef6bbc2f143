//! Environment-driven SDK configuration.

use std::str::FromStr;

use anyhow::Context;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_program::pubkey::Pubkey;
use solana_sdk::commitment_config::CommitmentConfig;

use crate::reader::TokenMetadataReader;

pub const RPC_URL_ENV: &str = "TOKEN_METADATA_RPC_URL";
pub const PROGRAM_ID_ENV: &str = "TOKEN_METADATA_PROGRAM_ID";
pub const COMMITMENT_ENV: &str = "TOKEN_METADATA_COMMITMENT";

pub const DEFAULT_RPC_URL: &str = "http://localhost:8899";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SdkConfig {
    pub rpc_url: String,
    pub program_id: Pubkey,
    pub commitment: CommitmentConfig,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            program_id: token_metadata_interface::id(),
            commitment: CommitmentConfig::confirmed(),
        }
    }
}

impl SdkConfig {
    /// Load `.env` if present, then read the `TOKEN_METADATA_*` variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source; unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let rpc_url = lookup(RPC_URL_ENV).unwrap_or(defaults.rpc_url);

        let program_id = match lookup(PROGRAM_ID_ENV) {
            Some(value) => Pubkey::from_str(value.trim())
                .with_context(|| format!("{PROGRAM_ID_ENV} must be a base-58 address"))?,
            None => defaults.program_id,
        };

        let commitment = match lookup(COMMITMENT_ENV) {
            Some(value) => CommitmentConfig::from_str(value.trim()).map_err(|_| {
                anyhow::anyhow!("{COMMITMENT_ENV} must be processed, confirmed or finalized")
            })?,
            None => defaults.commitment,
        };

        Ok(Self {
            rpc_url,
            program_id,
            commitment,
        })
    }

    pub fn rpc_client(&self) -> RpcClient {
        RpcClient::new_with_commitment(self.rpc_url.clone(), self.commitment)
    }

    /// A reader backed by this config's RPC endpoint.
    pub fn reader(&self) -> TokenMetadataReader<RpcClient> {
        TokenMetadataReader::new(self.program_id, self.rpc_client())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        let config = SdkConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SdkConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let program_id = Pubkey::new_unique();
        let vars = HashMap::from([
            (RPC_URL_ENV, "https://rpc.example".to_string()),
            (PROGRAM_ID_ENV, program_id.to_string()),
            (COMMITMENT_ENV, "finalized".to_string()),
        ]);
        let config = SdkConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        assert_eq!(config.rpc_url, "https://rpc.example");
        assert_eq!(config.program_id, program_id);
        assert_eq!(config.commitment, CommitmentConfig::finalized());
    }

    #[test]
    fn rejects_bad_program_id() {
        let err = SdkConfig::from_lookup(|key| (key == PROGRAM_ID_ENV).then(|| "nope".into()));
        assert!(err.is_err());
    }
}
