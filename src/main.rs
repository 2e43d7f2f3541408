//! Heir Vault CLI Application
//!
//! Runs the vault service and offers offline helpers for heirs.

use alloy_primitives::Address;
use clap::{Parser, Subcommand};
use heir_vault::api::{create_router, describe_routes, ApiState};
use heir_vault::cli;
use heir_vault::config::{parse_address_list, ServiceConfig};
use heir_vault::storage::Storage;
use heir_vault::vault::SystemClock;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "heir-vault")]
#[command(version)]
#[command(about = "Custodial succession vault with heir quorum and release delay", long_about = None)]
struct Cli {
    /// Data directory for the vault snapshot
    #[arg(short, long, default_value = ".heir_vault_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Candidate tokens for balance discovery (comma-separated addresses)
        #[arg(long)]
        tokens: Option<String>,

        /// Number of snapshot backups to keep (0 disables backups)
        #[arg(long, default_value = "5")]
        max_backups: usize,
    },

    /// Print the message heirs must sign
    Digest {
        /// Vault address
        #[arg(short, long)]
        vault: Address,

        /// Current vault nonce
        #[arg(short, long)]
        nonce: u64,

        /// Release destination
        #[arg(long)]
        destination: Address,
    },

    /// Sign a release authorization with a private key
    Sign {
        /// Hex private key
        #[arg(short, long)]
        key: String,

        /// Vault address
        #[arg(short, long)]
        vault: Address,

        /// Current vault nonce
        #[arg(short, long)]
        nonce: u64,

        /// Release destination
        #[arg(long)]
        destination: Address,
    },

    /// Show vault state from the saved snapshot
    Info {
        /// Vault address (all vaults if omitted)
        #[arg(short, long)]
        vault: Option<Address>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            tokens,
            max_backups,
        } => {
            let config = ServiceConfig {
                data_dir: cli.data_dir,
                port,
                token_catalog: match tokens {
                    Some(list) => parse_address_list(&list)?,
                    None => Vec::new(),
                },
                backup_enabled: max_backups > 0,
                max_backups,
            };
            run_server(config)?;
        }

        Commands::Digest {
            vault,
            nonce,
            destination,
        } => {
            cli::cmd_digest(&vault, nonce, &destination)?;
        }

        Commands::Sign {
            key,
            vault,
            nonce,
            destination,
        } => {
            cli::cmd_sign(&key, &vault, nonce, &destination)?;
        }

        Commands::Info { vault } => {
            cli::cmd_info(&cli.data_dir, vault.as_ref())?;
        }
    }

    Ok(())
}

fn run_server(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let storage = Arc::new(Storage::new(config.storage())?);
        let manager = storage.load_or_default()?;

        let addr = config.bind_address();
        let port = config.port;
        if !config.token_catalog.is_empty() {
            log::info!("Token catalog: {} candidate(s)", config.token_catalog.len());
        }

        let state = ApiState::new(manager, Some(storage.clone()), Arc::new(SystemClock), config);
        let shutdown_state = state.clone();
        let app = create_router(state);

        println!("🚀 Vault service starting on http://localhost:{}", port);
        println!();
        println!("📖 Available endpoints:");
        for (method, path, description) in describe_routes() {
            println!("   {:<5}{:<34}- {}", method, path, description);
        }
        println!();

        // Handle Ctrl+C with a final save
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            println!("\n📴 Shutting down vault service...");

            let manager = shutdown_state.manager.read().await;
            match storage.save(&manager) {
                Ok(()) => println!("✅ Snapshot saved"),
                Err(e) => log::error!("Failed to save snapshot on shutdown: {}", e),
            }
            std::process::exit(0);
        });

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}
