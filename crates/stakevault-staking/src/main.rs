use {
    anyhow::{Context, Result},
    clap::Parser,
    stakevault_common::config::LedgerConfig,
    stakevault_staking::{InMemoryTransferService, StakingConfig, StakingError, StakingService},
    stakevault_store::{LedgerStoreFactory, VaultStoreFactory},
    std::sync::Arc,
    tracing::{info, warn},
};

#[derive(Parser)]
#[command(name = "stakevault", about = "Custodial staking ledger service")]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "stakevault.json")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = LedgerConfig::from_file(&args.config).context("Failed to load configuration")?;

    let mut store_settings = config.store.clone();
    store_settings.db_path = config.data_dir.join(&store_settings.db_path);
    let store = VaultStoreFactory::new(store_settings)
        .create_store()
        .await
        .context("Failed to open ledger store")?;

    let staking_config = StakingConfig {
        controller: config.staking.controller()?,
        fee_vault: config.staking.fee_vault()?,
        initial_fee_bps: config.staking.initial_fee_bps,
    };
    let controller = staking_config.controller;

    let transfers = Arc::new(InMemoryTransferService::new());
    let service = StakingService::new(staking_config, store.clone(), transfers);

    if let Some(mint) = config.staking.asset_mint()? {
        match service.initialize(mint, controller).await {
            Ok(custody) => info!(%mint, %custody, "vault ready"),
            Err(StakingError::VaultExists(_)) => info!(%mint, "vault already initialized"),
            Err(e) => {
                warn!(%mint, error = %e, "vault initialization failed");
                return Err(e.into());
            }
        }
    }

    info!("Staking ledger service started");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down staking ledger service...");

    store.close().await?;
    Ok(())
}
