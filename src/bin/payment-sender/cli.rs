//! Command-line interface definition.

use alloy::primitives::{Address, U256};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use payment_sender::config::default_config_path;
use payment_sender::LedgerConfig;
use std::path::PathBuf;

/// Issue and check vouchers for a voucher payment ledger.
#[derive(Parser, Debug)]
#[command(name = "payment-sender")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(long, short, global = true, env = "PAYMENT_SENDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level, overriding the configuration file.
    #[arg(long, global = true, env = "RUST_LOG")]
    pub log_level: Option<String>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a configuration file for a deployed ledger.
    Init {
        /// Address whose signatures the ledger honours.
        #[arg(long)]
        signer: Address,

        /// ERC20 token the ledger pays out.
        #[arg(long)]
        token: Address,

        /// Address of the ledger.
        #[arg(long)]
        contract: Address,

        /// Chain identifier.
        #[arg(long, default_value = "1337")]
        chain_id: u64,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Sign a voucher with the voucher signer key.
    Sign {
        /// Hex-encoded secp256k1 private key.
        #[arg(long, env = "PAYMENT_SENDER_SIGNER_KEY", hide_env_values = true)]
        key: String,

        #[command(flatten)]
        voucher: VoucherArgs,
    },

    /// Recover the signer of a voucher and compare it with the configured signer.
    Recover {
        /// Hex-encoded 65-byte signature.
        #[arg(long)]
        signature: String,

        #[command(flatten)]
        voucher: VoucherArgs,
    },
}

/// Voucher fields and domain overrides.
#[derive(clap::Args, Debug)]
pub struct VoucherArgs {
    /// Account the voucher pays.
    #[arg(long)]
    pub payee: Address,

    /// Payee nonce the voucher is issued for.
    #[arg(long)]
    pub nonce: U256,

    /// Amount of payment token.
    #[arg(long)]
    pub amount: U256,

    /// Ledger address, overriding the configuration file.
    #[arg(long)]
    pub contract: Option<Address>,

    /// Chain identifier, overriding the configuration file.
    #[arg(long)]
    pub chain_id: Option<u64>,
}

impl Cli {
    /// Path of the configuration file in use.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }

    /// Log filter in effect: the command line first, then the configuration
    /// file, then `info`.
    pub fn log_level<'a>(&'a self, config: Option<&'a LedgerConfig>) -> &'a str {
        self.log_level
            .as_deref()
            .or_else(|| config.map(|config| config.log_level.as_str()))
            .unwrap_or("info")
    }

    /// Load the configuration file, falling back to defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded.
    pub fn load_config(&self) -> color_eyre::Result<LedgerConfig> {
        let path = self.config_path();
        if path.exists() {
            LedgerConfig::from_file(&path)
                .wrap_err_with(|| format!("failed to load {}", path.display()))
        } else {
            Ok(LedgerConfig::default())
        }
    }
}

impl VoucherArgs {
    /// Apply domain overrides on top of `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if no ledger address is known.
    pub fn resolve(
        &self,
        mut config: LedgerConfig,
    ) -> color_eyre::Result<(LedgerConfig, Address)> {
        if let Some(chain_id) = self.chain_id {
            config.domain.chain_id = chain_id;
        }
        if let Some(contract) = self.contract {
            config.domain.verifying_contract = Some(contract);
        }
        config.validate()?;
        let contract = config
            .domain
            .verifying_contract
            .ok_or_else(|| eyre!("ledger address unknown: pass --contract or run init"))?;
        Ok((config, contract))
    }
}

/// Decode a 0x-prefixed or bare hex string.
///
/// # Errors
///
/// Returns an error if the string is not valid hex.
pub fn decode_hex(value: &str) -> color_eyre::Result<Vec<u8>> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits).wrap_err("invalid hex")
}
