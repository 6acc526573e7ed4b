//! licensify: issue and verify RSA-signed software licenses.
//!
//! Usage:
//!   licensify keygen --out-dir keys
//!   licensify sign --private-key keys/private.pem -a id=abc-123 -a product=Pro
//!   licensify verify --public-key keys/public.pem --license license.json
//!   licensify serve --private-key keys/private.pem --public-key keys/public.pem --api-key s3cret
//!
//! Keys can also be passed inline as base64-wrapped PEM
//! (`--private-key-b64`, `--public-key-b64`).

use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use licensify::{Signer, Verifier, keys::DEFAULT_KEY_BITS};
use licensify_cli::{AppState, KeySource, build_router, commands};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "licensify")]
#[command(about = "Issue and verify RSA-signed software licenses")]
struct Args {
    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
struct PrivateKeyArgs {
    /// Path to a PKCS#8 PEM private key
    #[arg(long)]
    private_key: Option<PathBuf>,

    /// Base64-wrapped PKCS#8 PEM private key
    #[arg(long)]
    private_key_b64: Option<String>,
}

#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
struct PublicKeyArgs {
    /// Path to a PKIX PEM public key
    #[arg(long)]
    public_key: Option<PathBuf>,

    /// Base64-wrapped PKIX PEM public key
    #[arg(long)]
    public_key_b64: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an RSA key pair (private.pem, public.pem)
    Keygen {
        /// Modulus size in bits
        #[arg(short, long, default_value_t = DEFAULT_KEY_BITS)]
        bits: usize,

        /// Directory to write the keys into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Sign a license and write the signature file
    Sign {
        #[command(flatten)]
        key: PrivateKeyArgs,

        /// License attribute as KEY=VALUE (repeatable)
        #[arg(short = 'a', long = "attr", value_parser = commands::parse_attribute)]
        attributes: Vec<(String, String)>,

        /// Add a random `id` attribute unless one is given
        #[arg(long)]
        with_id: bool,

        /// Output file
        #[arg(short, long, default_value = "license.json")]
        out: PathBuf,
    },

    /// Verify a signature file
    Verify {
        #[command(flatten)]
        key: PublicKeyArgs,

        /// Signature file to check
        #[arg(short, long, default_value = "license.json")]
        license: PathBuf,
    },

    /// Print the attributes and digest of a signature file without verifying it
    Inspect {
        /// Signature file to read
        #[arg(short, long, default_value = "license.json")]
        license: PathBuf,
    },

    /// Run the HTTP signing and verification API
    Serve {
        #[command(flatten)]
        private: PrivateKeyArgs,

        #[command(flatten)]
        public: PublicKeyArgs,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: IpAddr,

        /// Key required in the API-KEY header of sign requests; a random
        /// one is generated and logged when omitted
        #[arg(long, env = "LICENSIFY_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// HTTP port
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

impl PrivateKeyArgs {
    fn source(self) -> Result<KeySource> {
        KeySource::from_args(self.private_key, self.private_key_b64)
    }
}

impl PublicKeyArgs {
    fn source(self) -> Result<KeySource> {
        KeySource::from_args(self.public_key, self.public_key_b64)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    match args.command {
        Command::Keygen { bits, out_dir } => {
            let (private, public) = commands::keygen(&out_dir, bits)?;
            println!("Private key: {}", private.display());
            println!("Public key:  {}", public.display());
        }
        Command::Sign {
            key,
            attributes,
            with_id,
            out,
        } => {
            let license = commands::build_license(attributes, with_id);
            let signature = commands::sign(&key.source()?, &license, &out)?;
            println!("Sig: {}", signature.sig());
        }
        Command::Verify { key, license } => {
            if commands::verify(&key.source()?, &license)? {
                println!("valid");
            } else {
                warn!("Signature check failed for {}", license.display());
                println!("invalid");
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Inspect { license } => {
            let inspection = commands::inspect(&license)?;
            for (key, value) in &inspection.attributes {
                println!("{key} = {value}");
            }
            println!("digest: {}", inspection.digest_hex);
            if inspection.ambiguous {
                warn!("Attributes contain ':' or ','; the signed form may be ambiguous");
            }
        }
        Command::Serve {
            private,
            public,
            bind,
            port,
            api_key,
        } => {
            let addr = SocketAddr::new(bind, port);
            serve(private.source()?, public.source()?, api_key, addr).await?
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn serve(
    private: KeySource,
    public: KeySource,
    api_key: Option<String>,
    addr: SocketAddr,
) -> Result<()> {
    let signer = Signer::new(private.load_private()?);
    let verifier = Verifier::new(public.load_public()?);
    info!(
        "Loaded {}-bit signing key and {}-bit verification key",
        signer.key_bits(),
        verifier.key_bits()
    );

    let api_key = match api_key.filter(|key| !key.is_empty()) {
        Some(key) => key,
        None => {
            let key = Uuid::new_v4().to_string();
            warn!("No API key configured, generated one for this run: {}", key);
            key
        }
    };

    let state = Arc::new(AppState::new(signer, verifier, &api_key)?);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP API listening on {}", addr);
    axum::serve(listener, app).await.context("HTTP server failed")
}
