//! Application wiring: builds [`AppState`] from [`Config`] by constructing the
//! SQLite pool, every repository, the three portfolio engines, and the sync
//! orchestrator, then hands the whole graph to the API layer as `Arc<AppState>`.

use std::sync::Arc;

use aggregator_core::accounts::{AccountRepositoryTrait, AccountService, ProviderRegistryTrait};
use aggregator_core::activities::ActivityRepositoryTrait;
use aggregator_core::assets::{
    AssetClassRepositoryTrait, AssetClassService, SecurityRepositoryTrait, SecurityService,
};
use aggregator_core::portfolio::lots::{LotReconciliationEngine, LotRepositoryTrait};
use aggregator_core::portfolio::returns::ReturnsEngine;
use aggregator_core::portfolio::snapshot::SnapshotRepositoryTrait;
use aggregator_core::portfolio::valuation::{ValuationEngine, ValuationRepositoryTrait};
use aggregator_core::settings::{PreferenceRepositoryTrait, SettingsService};
use aggregator_core::sync::{ProviderAdapter, SyncOrchestrator, SyncSessionRepositoryTrait};
use aggregator_market_data::NullPriceHistoryProvider;
use aggregator_storage_sqlite::accounts::{AccountRepository, ProviderRegistryRepository};
use aggregator_storage_sqlite::activities::ActivityRepository;
use aggregator_storage_sqlite::assets::AssetRepository;
use aggregator_storage_sqlite::portfolio::lots::LotRepository;
use aggregator_storage_sqlite::portfolio::snapshot::SnapshotRepository;
use aggregator_storage_sqlite::portfolio::valuation::ValuationRepository;
use aggregator_storage_sqlite::settings::PreferenceRepository;
use aggregator_storage_sqlite::sync::SyncSessionRepository;
use aggregator_storage_sqlite::{create_pool, run_migrations, spawn_writer, DbPool};

use crate::config::Config;

pub struct AppState {
    pub accounts: Arc<dyn AccountRepositoryTrait>,
    pub account_service: AccountService,
    pub activities: Arc<dyn ActivityRepositoryTrait>,
    pub securities: Arc<dyn SecurityRepositoryTrait>,
    pub security_service: SecurityService,
    pub asset_classes: Arc<dyn AssetClassRepositoryTrait>,
    pub asset_class_service: AssetClassService,
    pub snapshots: Arc<dyn SnapshotRepositoryTrait>,
    pub lots: Arc<dyn LotRepositoryTrait>,
    pub dhv: Arc<dyn ValuationRepositoryTrait>,
    pub provider_registry: Arc<dyn ProviderRegistryTrait>,
    pub preferences: Arc<dyn PreferenceRepositoryTrait>,
    pub settings_service: SettingsService,
    pub valuation_engine: Arc<ValuationEngine>,
    pub lot_engine: Arc<LotReconciliationEngine>,
    pub returns_engine: ReturnsEngine,
    pub orchestrator: Arc<SyncOrchestrator>,
    #[allow(dead_code)]
    pub db_pool: Arc<DbPool>,
}

/// Bridges `log` records (used by `core`/`connect`/`storage-sqlite`) into the
/// `tracing` subscriber this binary installs, matching the teacher's split
/// between a facade crate for libraries and a concrete subscriber at the edge.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
    let _ = tracing_log::LogTracer::init();
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = aggregator_storage_sqlite::init(&config.database_url)?;
    let pool = create_pool(&db_path)?;
    run_migrations(&pool)?;
    let writer = spawn_writer((*pool).clone());

    let accounts: Arc<dyn AccountRepositoryTrait> =
        Arc::new(AccountRepository::new(pool.clone(), writer.clone()));
    let activities: Arc<dyn ActivityRepositoryTrait> =
        Arc::new(ActivityRepository::new(pool.clone(), writer.clone()));
    let asset_repo = Arc::new(AssetRepository::new(pool.clone(), writer.clone()));
    let securities: Arc<dyn SecurityRepositoryTrait> = asset_repo.clone();
    let asset_classes: Arc<dyn AssetClassRepositoryTrait> = asset_repo;
    let snapshots: Arc<dyn SnapshotRepositoryTrait> =
        Arc::new(SnapshotRepository::new(pool.clone(), writer.clone()));
    let lots: Arc<dyn LotRepositoryTrait> =
        Arc::new(LotRepository::new(pool.clone(), writer.clone()));
    let dhv: Arc<dyn ValuationRepositoryTrait> =
        Arc::new(ValuationRepository::new(pool.clone(), writer.clone()));
    let provider_registry: Arc<dyn ProviderRegistryTrait> =
        Arc::new(ProviderRegistryRepository::new(pool.clone(), writer.clone()));
    let preferences: Arc<dyn PreferenceRepositoryTrait> =
        Arc::new(PreferenceRepository::new(pool.clone(), writer.clone()));
    let sessions: Arc<dyn SyncSessionRepositoryTrait> =
        Arc::new(SyncSessionRepository::new(pool.clone(), writer.clone()));

    let account_service = AccountService::new(accounts.clone());
    let security_service = SecurityService::new(securities.clone());
    let asset_class_service = AssetClassService::new(asset_classes.clone());
    let settings_service = SettingsService::new(preferences.clone());

    let valuation_engine = Arc::new(ValuationEngine::new(
        accounts.clone(),
        snapshots.clone(),
        securities.clone(),
        dhv.clone(),
        Arc::new(NullPriceHistoryProvider),
        None,
    ));
    let lot_engine = Arc::new(LotReconciliationEngine::new(
        snapshots.clone(),
        activities.clone(),
        lots.clone(),
    ));
    let returns_engine = ReturnsEngine::new(
        accounts.clone(),
        snapshots.clone(),
        activities.clone(),
        dhv.clone(),
    );

    // No concrete provider adapters are wired yet (spec.md §1 scopes them
    // out); the orchestrator still runs with zero providers so a manual
    // `POST /api/sync` is a no-op rather than an error.
    let providers: Vec<Arc<dyn ProviderAdapter>> = Vec::new();
    let orchestrator = Arc::new(SyncOrchestrator::new(
        providers,
        provider_registry.clone(),
        accounts.clone(),
        activities.clone(),
        snapshots.clone(),
        securities.clone(),
        sessions,
        valuation_engine.clone(),
        lot_engine.clone(),
    ));

    Ok(Arc::new(AppState {
        accounts,
        account_service,
        activities,
        securities,
        security_service,
        asset_classes,
        asset_class_service,
        snapshots,
        lots,
        dhv,
        provider_registry,
        preferences,
        settings_service,
        valuation_engine,
        lot_engine,
        returns_engine,
        orchestrator,
        db_pool: pool,
    }))
}
