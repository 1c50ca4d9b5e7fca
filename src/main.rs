use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use textbook_rsa::{RsaConfig, RsaService};

/// Textbook RSA key generation, encryption and decryption.
#[derive(Parser)]
#[command(name = "textbook-rsa", version)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Generate a key pair and print it as JSON with decimal n, e and d.
    Keygen {
        /// Modulus size in bits
        #[arg(long)]
        bits: Option<u64>,
        /// First public exponent to try (default 65537)
        #[arg(long)]
        exponent: Option<u64>,
    },
    /// Encrypt text under a public key; prints base64.
    Encrypt {
        #[arg(long)]
        e: String,
        #[arg(long)]
        n: String,
        plaintext: String,
    },
    /// Decrypt base64 text under a private key.
    Decrypt {
        #[arg(long)]
        d: String,
        #[arg(long)]
        n: String,
        /// Print the recovered bytes as hex instead of text
        #[arg(long = "hex")]
        as_hex: bool,
        ciphertext: String,
    },
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Cmd::Keygen { bits, exponent } => {
            let mut config = RsaConfig::default();
            if let Some(e) = exponent {
                config = config.with_public_exponent(e);
            }
            if let Some(bits) = bits {
                config = config.with_default_key_bits(bits);
            }
            let service = RsaService::new(config).context("invalid key generation settings")?;
            let keys = service.generate_default_key_pair().with_context(|| {
                format!(
                    "failed to generate a {}-bit key pair",
                    service.config().default_key_bits
                )
            })?;
            println!("{}", serde_json::to_string_pretty(&keys)?);
        }
        Cmd::Encrypt { e, n, plaintext } => {
            let ciphertext = RsaService::default()
                .encrypt(&plaintext, &e, &n)
                .context("encryption failed")?;
            println!("{}", ciphertext);
        }
        Cmd::Decrypt { d, n, as_hex, ciphertext } => {
            let service = RsaService::default();
            if as_hex {
                let bytes = service
                    .decrypt_bytes(&ciphertext, &d, &n)
                    .context("decryption failed")?;
                println!("{}", hex::encode(bytes));
            } else {
                let plaintext = service
                    .decrypt(&ciphertext, &d, &n)
                    .context("decryption failed")?;
                println!("{}", plaintext);
            }
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
