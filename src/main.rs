//! phrase-seal - passphrase-derived text envelopes.
//!
//! Seals short text values into base64 AES-256-GCM envelopes using a key
//! derived from a passphrase, and opens them again.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use phrase_seal::{Alphabet, CipherConfig, StatefulCipher};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted before prompting for a passphrase.
const PASSPHRASE_ENV: &str = "PHRASE_SEAL_PASSPHRASE";

#[derive(Parser)]
#[command(name = "phrase-seal")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Seal text with a passphrase-derived AES-256-GCM key",
    long_about = "Encrypts short text values into base64 envelopes (nonce || ciphertext || tag) under a key derived from a passphrase."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Common {
    /// Use the standard base64 alphabet instead of URL-safe
    #[arg(long)]
    standard: bool,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt text into an envelope
    Encrypt {
        /// Text to encrypt (default: stdin)
        text: Option<String>,

        #[command(flatten)]
        common: Common,
    },

    /// Decrypt an envelope back into text
    Decrypt {
        /// Envelope to decrypt (default: stdin)
        envelope: Option<String>,

        /// Guess the alphabet from the envelope characters
        #[arg(long, conflicts_with = "standard")]
        detect: bool,

        #[command(flatten)]
        common: Common,
    },

    /// Derive the key and print it (requires --extractable)
    Derive {
        /// Mark the key extractable so it can be printed
        #[arg(long)]
        extractable: bool,

        #[command(flatten)]
        common: Common,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Encrypt { text, common } => cmd_encrypt(text, &common).await,

        Commands::Decrypt {
            envelope,
            detect,
            common,
        } => cmd_decrypt(envelope, detect, &common).await,

        Commands::Derive {
            extractable,
            common,
        } => cmd_derive(extractable, &common).await,
    }
}

fn load_config(common: &Common) -> anyhow::Result<CipherConfig> {
    let mut config = match &common.config {
        Some(path) => CipherConfig::from_json_file(path)?,
        None => CipherConfig::default(),
    };
    if common.standard {
        config.alphabet = Alphabet::Standard;
    }
    Ok(config)
}

fn read_passphrase() -> anyhow::Result<String> {
    if let Ok(passphrase) = std::env::var(PASSPHRASE_ENV) {
        return Ok(passphrase);
    }

    match rpassword::prompt_password("Passphrase: ") {
        Ok(passphrase) => Ok(passphrase),
        Err(_) => {
            eprint!("Passphrase: ");
            io::stderr().flush()?;
            let mut passphrase = String::new();
            io::stdin().read_line(&mut passphrase)?;
            Ok(passphrase.trim_end_matches(&['\r', '\n'][..]).to_string())
        }
    }
}

fn read_input(arg: Option<String>) -> anyhow::Result<String> {
    match arg {
        Some(value) => Ok(value),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading stdin")?;
            Ok(buffer.trim_end_matches(&['\r', '\n'][..]).to_string())
        }
    }
}

async fn cmd_encrypt(text: Option<String>, common: &Common) -> anyhow::Result<()> {
    let config = load_config(common)?;
    let plaintext = read_input(text)?;
    let cipher = StatefulCipher::new(&read_passphrase()?, config);

    println!("{}", cipher.encrypt(&plaintext).await?);

    Ok(())
}

async fn cmd_decrypt(envelope: Option<String>, detect: bool, common: &Common) -> anyhow::Result<()> {
    let config = load_config(common)?;
    let sealed = read_input(envelope)?;
    let alphabet = if detect {
        Alphabet::detect(&sealed)
    } else {
        config.alphabet
    };
    let cipher = StatefulCipher::new(&read_passphrase()?, config);

    println!("{}", cipher.decrypt_with(&sealed, alphabet).await?);

    Ok(())
}

async fn cmd_derive(extractable: bool, common: &Common) -> anyhow::Result<()> {
    let mut config = load_config(common)?;
    config.extractable |= extractable;

    if !config.extractable {
        bail!("refusing to print a non-extractable key; pass --extractable");
    }

    let cipher = StatefulCipher::new(&read_passphrase()?, config);
    let key = cipher.key().await?;

    println!("{}", hex::encode(key.export()?));

    Ok(())
}
