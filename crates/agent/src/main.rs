//! # DOCI Agent CLI
//!
//! Command-line client for the DOCI decentralized publishing platform.
//!
//! ## Commands
//!
//! - `cv-status --wallet <ADDRESS>`: check whether a wallet has a
//!   registered CV and may submit manuscripts
//! - `profile show --wallet <ADDRESS>`: display a researcher profile
//! - `submit --file <PDF> --title <T> --author <A>... --abstract <TEXT>
//!   --category <C>... [--keyword <K>...] --keypair <FILE>`:
//!   run the full submission workflow (CV gate, sponsored fee payment,
//!   manuscript upload)
//! - `sponsor health`: gas sponsor service health
//! - `sponsor stats`: aggregate sponsorship statistics
//!
//! ## Configuration
//!
//! `--config <FILE>` points at a TOML file; environment variables
//! override it:
//!
//! - `DOCI_BACKEND_ENDPOINT`: platform backend base URL
//! - `DOCI_RPC_ENDPOINT`: chain RPC endpoint
//! - `DOCI_ESCROW_ADDRESS`: fee escrow account (base58)
//! - `DOCI_FEE_TOKEN_MINT`: fee token mint (base58)
//! - `DOCI_SESSION_TOKEN`: bearer token for authenticated endpoints
//!
//! ## Exit Codes
//!
//! - 0: success
//! - 1: sponsor unhealthy / generic failure
//! - 2: invalid input (file rules, form fields)
//! - 3: CV registration required
//! - 4: authentication required
//! - 5: wallet problem (missing, invalid address)
//! - 6: transient network/service failure (retry is reasonable)
//! - 7: payment or sponsorship rejected
//! - 8: another submission is already in flight

mod cmd_profile;
mod cmd_sponsor;
mod cmd_submit;
mod context;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use doci_common::ClientError;
use tracing_subscriber::EnvFilter;

use crate::cmd_submit::SubmitArgs;

#[derive(Parser)]
#[command(name = "doci", version, about = "DOCI publishing platform CLI")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check CV registration status for a wallet
    CvStatus {
        /// Wallet address (base58)
        #[arg(long)]
        wallet: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Researcher profile commands
    Profile {
        #[command(subcommand)]
        profile_cmd: ProfileCommands,
    },

    /// Submit a manuscript (gate → sponsored payment → upload)
    Submit {
        /// Manuscript file (PDF)
        #[arg(long)]
        file: PathBuf,
        /// Manuscript title
        #[arg(long)]
        title: String,
        /// Author name (repeatable)
        #[arg(long = "author", required = true)]
        authors: Vec<String>,
        /// Abstract text
        #[arg(long = "abstract")]
        abstract_text: String,
        /// Category (repeatable)
        #[arg(long = "category", required = true)]
        categories: Vec<String>,
        /// Keyword (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,
        /// File holding the wallet's hex-encoded 32-byte secret seed.
        /// Submitting without one fails with the wallet-not-connected
        /// error, mirroring a disconnected wallet in the web client.
        #[arg(long)]
        keypair: Option<PathBuf>,
        /// Bearer session token (falls back to DOCI_SESSION_TOKEN)
        #[arg(long)]
        session_token: Option<String>,
    },

    /// Gas sponsor service commands
    Sponsor {
        #[command(subcommand)]
        sponsor_cmd: SponsorCommands,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show a researcher profile
    Show {
        /// Wallet address (base58)
        #[arg(long)]
        wallet: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SponsorCommands {
    /// Sponsor service health
    Health,
    /// Aggregate sponsorship statistics
    Stats,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            report(&err);
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = context::load_config(cli.config.as_ref())?;

    match cli.cmd {
        Commands::CvStatus { wallet, json } => {
            cmd_profile::handle_cv_status(&config, &wallet, json).await?;
        }
        Commands::Profile { profile_cmd } => match profile_cmd {
            ProfileCommands::Show { wallet, json } => {
                cmd_profile::handle_profile_show(&config, &wallet, json).await?;
            }
        },
        Commands::Submit {
            file,
            title,
            authors,
            abstract_text,
            categories,
            keywords,
            keypair,
            session_token,
        } => {
            cmd_submit::handle_submit(
                &config,
                SubmitArgs {
                    file,
                    title,
                    authors,
                    abstract_text,
                    categories,
                    keywords,
                    keypair,
                    session_token,
                },
            )
            .await?;
        }
        Commands::Sponsor { sponsor_cmd } => match sponsor_cmd {
            SponsorCommands::Health => {
                if !cmd_sponsor::handle_health(&config).await? {
                    return Ok(ExitCode::FAILURE);
                }
            }
            SponsorCommands::Stats => {
                cmd_sponsor::handle_stats(&config).await?;
            }
        },
    }
    Ok(ExitCode::SUCCESS)
}

/// Human-readable failure report; taxonomy errors get their redirect
/// hints, everything else prints the error chain.
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<ClientError>() {
        Some(client_err) => {
            eprintln!("error: {}", client_err);
            if let Some(hint) = client_err.redirect_hint() {
                eprintln!("hint: visit {} first", hint);
            }
            if client_err.is_retryable() {
                eprintln!("hint: this looks transient; retrying may succeed");
            }
        }
        None => {
            eprintln!("error: {:#}", err);
        }
    }
}

/// Maps the error taxonomy onto stable exit codes for scripting.
fn exit_code(err: &anyhow::Error) -> u8 {
    let Some(client_err) = err.downcast_ref::<ClientError>() else {
        return 1;
    };
    match client_err {
        ClientError::ValidationError(_) => 2,
        ClientError::CvRequired { .. } => 3,
        ClientError::AuthRequired => 4,
        ClientError::WalletNotConnected
        | ClientError::MissingWallet
        | ClientError::InvalidWalletAddress { .. } => 5,
        ClientError::NetworkError(_)
        | ClientError::RateLimited
        | ClientError::ServiceUnavailable
        | ClientError::PinningServiceError(_) => 6,
        ClientError::PaymentRejected(_) | ClientError::SponsorshipRejected(_) => 7,
        ClientError::SubmissionInFlight => 8,
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
