use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use foliotrack_core::discovery::{TickerDiscoveryService, TickerDiscoveryServiceTrait};
use foliotrack_core::enrichment::{HoldingsEnrichmentService, HoldingsEnrichmentServiceTrait};
use foliotrack_core::holdings::{HoldingService, HoldingServiceTrait};
use foliotrack_core::import::{HoldingsImportService, HoldingsImportServiceTrait};
use foliotrack_core::market_data::MarketDataClient;
use foliotrack_core::portfolios::{PortfolioService, PortfolioServiceTrait};
use foliotrack_market_data::provider::yahoo::YahooProvider;
use foliotrack_market_data::MarketDataProvider;
use foliotrack_storage_sqlite::holdings::HoldingRepository;
use foliotrack_storage_sqlite::portfolios::PortfolioRepository;
use foliotrack_storage_sqlite::{create_pool, init, run_migrations, spawn_writer};

pub struct AppState {
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    pub holding_service: Arc<dyn HoldingServiceTrait>,
    pub enrichment_service: Arc<dyn HoldingsEnrichmentServiceTrait>,
    pub discovery_service: Arc<dyn TickerDiscoveryServiceTrait>,
    pub import_service: Arc<dyn HoldingsImportServiceTrait>,
}

pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    init(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let pool = create_pool(&config.db_path)?;
    run_migrations(&pool)?;
    let writer = spawn_writer((*pool).clone());

    let portfolio_repository = Arc::new(PortfolioRepository::new(pool.clone(), writer.clone()));
    let holding_repository = Arc::new(HoldingRepository::new(pool.clone(), writer.clone()));

    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooProvider::new()?);
    let client = Arc::new(MarketDataClient::new(provider));

    let portfolio_service = Arc::new(PortfolioService::new(portfolio_repository));
    let holding_service = Arc::new(HoldingService::new(holding_repository.clone()));
    let enrichment_service = Arc::new(HoldingsEnrichmentService::new(
        client.clone(),
        holding_repository.clone(),
    ));
    let discovery_service = Arc::new(TickerDiscoveryService::new(
        client,
        holding_repository.clone(),
    ));
    let import_service = Arc::new(HoldingsImportService::new(holding_repository));

    Ok(Arc::new(AppState {
        portfolio_service,
        holding_service,
        enrichment_service,
        discovery_service,
        import_service,
    }))
}
