//! Configuration for payment-sender.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Chain id of a local development chain.
pub const DEFAULT_CHAIN_ID: u64 = 1337;

/// Ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// EIP712 domain configuration.
    #[serde(default)]
    pub domain: DomainConfig,

    /// Initial signer and token.
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Deployment-specific EIP712 domain fields.
///
/// The domain name and version are fixed by the voucher format and are not
/// configurable; see [`crate::voucher::payment_domain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Chain identifier.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Address of the ledger. Derived from the deployer when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifying_contract: Option<Address>,
}

/// Initial payment configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Address whose signatures are honoured.
    #[serde(default)]
    pub voucher_signer: Address,

    /// ERC20 token paid out on release.
    #[serde(default)]
    pub payment_token: Address,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            domain: DomainConfig::default(),
            payment: PaymentConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            verifying_contract: None,
        }
    }
}

const fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default location of the CLI configuration file.
#[must_use]
pub fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "payment-sender")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("payment-sender.toml"))
}

impl LedgerConfig {
    /// Create a configuration for the given signer and token on a chain.
    #[must_use]
    pub fn new(chain_id: u64, voucher_signer: Address, payment_token: Address) -> Self {
        Self {
            domain: DomainConfig {
                chain_id,
                ..DomainConfig::default()
            },
            payment: PaymentConfig {
                voucher_signer,
                payment_token,
            },
            ..Self::default()
        }
    }

    /// Check that the domain can be signed under.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain id is zero.
    pub fn validate(&self) -> crate::Result<()> {
        if self.domain.chain_id == 0 {
            return Err(crate::Error::Config("chain id must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: &Path) -> crate::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
