//! payment-sender CLI entry point.

mod cli;

use alloy::signers::local::PrivateKeySigner;
use clap::Parser;
use cli::{decode_hex, Cli, Command};
use color_eyre::eyre::{bail, WrapErr};
use payment_sender::voucher::payment_domain;
use payment_sender::{recover_signer, sign_voucher, LedgerConfig, PaymentVoucher};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> color_eyre::Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = cli.load_config();

    // Logs go to stderr so stdout carries only command output
    let filter = EnvFilter::new(cli.log_level(config.as_ref().ok()));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    info!("payment-sender v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Command::Init {
            signer,
            token,
            contract,
            chain_id,
            force,
        } => {
            let path = cli.config_path();
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            let mut config = LedgerConfig::new(*chain_id, *signer, *token);
            config.domain.verifying_contract = Some(*contract);
            config.validate()?;
            config.to_file(&path)?;
            info!("Wrote configuration to {}", path.display());
            println!("{}", path.display());
        }
        Command::Sign { key, voucher } => {
            let signer: PrivateKeySigner = key
                .trim()
                .trim_start_matches("0x")
                .parse()
                .wrap_err("invalid signer key")?;
            let (config, contract) = voucher.resolve(config?)?;
            if !config.payment.voucher_signer.is_zero()
                && config.payment.voucher_signer != signer.address()
            {
                warn!(
                    "Signing as {} but the configured voucher signer is {}",
                    signer.address(),
                    config.payment.voucher_signer
                );
            }

            let domain = payment_domain(config.domain.chain_id, contract);
            let payment = PaymentVoucher::new(voucher.payee, voucher.nonce, voucher.amount);
            let signature = sign_voucher(&signer, &domain, &payment)?;
            println!("0x{}", hex::encode(signature.as_bytes()));
        }
        Command::Recover { signature, voucher } => {
            let bytes = decode_hex(signature)?;
            let (config, contract) = voucher.resolve(config?)?;

            let domain = payment_domain(config.domain.chain_id, contract);
            let payment = PaymentVoucher::new(voucher.payee, voucher.nonce, voucher.amount);
            let recovered = recover_signer(&domain, &payment, &bytes)?;
            println!("{recovered}");

            let expected = config.payment.voucher_signer;
            if !expected.is_zero() && expected != recovered {
                bail!("voucher signed by {recovered}, configured signer is {expected}");
            }
        }
    }

    Ok(())
}
