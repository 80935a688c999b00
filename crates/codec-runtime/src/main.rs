//! # qr-token
//!
//! Command-line front end for the token codec.
//!
//! ```text
//! qr-token keygen
//! qr-token generate --origin farm-7 --payload '{"sku":"A-100"}' --ttl-ms 86400000
//! qr-token decode <TOKEN> [--envelope] [--no-verify]
//! qr-token verify <TOKEN>
//! ```
//!
//! Tokens and JSON go to stdout; logs go to stderr.
//!
//! ## Issuance limits
//!
//! Rate-limit buckets live in process memory, so each invocation starts with
//! a fresh budget and one-shot `generate` calls are never limited. Per-origin
//! limiting only holds in a long-lived host that shares one
//! `TokenCodecService` across requests.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use codec_runtime::{load_config, parse_map, read_token, render_json};
use shared_crypto::{EncryptionKey, MacKey};
use shared_types::time::now_epoch_millis;
use token_codec::{validate_generate_request, GenerateRequest, TokenCodecApi, TokenCodecService};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "qr-token",
    version,
    about = "Secure, compact tokens for product-identity QR codes"
)]
struct Cli {
    /// Path to a JSON config file. QRT_* environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue a token for a JSON payload.
    ///
    /// The rate limit is per process; separate invocations do not share a budget.
    Generate {
        /// Origin the issuance is charged to.
        #[arg(long)]
        origin: String,
        /// Payload as a JSON object.
        #[arg(long)]
        payload: String,
        /// Signed metadata as a JSON object.
        #[arg(long)]
        metadata: Option<String>,
        /// Absolute expiry, epoch milliseconds.
        #[arg(long, conflicts_with = "ttl_ms")]
        expires_at: Option<u64>,
        /// Expiry relative to now, milliseconds.
        #[arg(long)]
        ttl_ms: Option<u64>,
    },

    /// Decode a token and print its payload.
    Decode {
        /// Token text, or `-` to read stdin.
        token: String,
        /// Print the full envelope (timestamps and metadata).
        #[arg(long)]
        envelope: bool,
        /// Skip tag and expiry checks.
        #[arg(long)]
        no_verify: bool,
    },

    /// Check a token without printing its content. Exits non-zero unless valid.
    Verify {
        /// Token text, or `-` to read stdin.
        token: String,
    },

    /// Print fresh random keys as environment assignments.
    Keygen,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();

    if matches!(cli.cmd, Commands::Keygen) {
        println!("QRT_SIGNING_KEY={}", hex::encode(MacKey::generate().as_bytes()));
        println!(
            "QRT_ENCRYPTION_KEY={}",
            hex::encode(EncryptionKey::generate().as_bytes())
        );
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(cli.config.as_deref())?;
    let codec = TokenCodecService::from_config(&config).context("build codec")?;
    info!(
        encryption = codec.encryption_enabled(),
        window_ms = config.rate_limit.window_ms,
        max_requests = config.rate_limit.max_requests,
        "Token codec ready"
    );

    match cli.cmd {
        Commands::Generate {
            origin,
            payload,
            metadata,
            expires_at,
            ttl_ms,
        } => {
            let now = now_epoch_millis();
            let mut request = GenerateRequest::new(origin, parse_map(&payload, "payload")?);
            if let Some(metadata) = metadata {
                request = request.with_metadata(parse_map(&metadata, "metadata")?);
            }
            if let Some(at) = expires_at.or(ttl_ms.map(|ttl| now.saturating_add(ttl))) {
                request = request.expires_at(at);
            }

            validate_generate_request(&request, now, codec.limits().max_depth)
                .context("invalid request")?;
            let token = codec.generate(&request).context("generate token")?;
            println!("{token}");
        }

        Commands::Decode {
            token,
            envelope,
            no_verify,
        } => {
            let token = read_token(&token, std::io::stdin())?;
            let verify = !no_verify;
            let output = if envelope {
                render_json(&codec.decode_envelope(&token, verify).context("decode token")?)?
            } else {
                render_json(&codec.decode(&token, verify).context("decode token")?)?
            };
            println!("{output}");
        }

        Commands::Verify { token } => {
            let token = read_token(&token, std::io::stdin())?;
            let status = codec.verify(&token);
            println!("{status}");
            if !status.is_valid() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Keygen => {}
    }

    Ok(ExitCode::SUCCESS)
}

/// `RUST_LOG` if set, else `info`. Writes to stderr.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
