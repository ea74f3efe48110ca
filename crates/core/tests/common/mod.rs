//! Shared harness for the scenario tests: a tempfile-backed SQLite database
//! wired up exactly like `apps/server`'s `build_state`, minus the HTTP layer.

use std::sync::Arc;

use aggregator_core::accounts::{AccountRepositoryTrait, ProviderRegistryTrait};
use aggregator_core::activities::ActivityRepositoryTrait;
use aggregator_core::assets::{AssetClassRepositoryTrait, SecurityRepositoryTrait};
use aggregator_core::portfolio::lots::{LotReconciliationEngine, LotRepositoryTrait};
use aggregator_core::portfolio::returns::ReturnsEngine;
use aggregator_core::portfolio::snapshot::SnapshotRepositoryTrait;
use aggregator_core::portfolio::valuation::{ValuationEngine, ValuationRepositoryTrait};
use aggregator_core::sync::{ProviderAdapter, SyncOrchestrator, SyncSessionRepositoryTrait};
use aggregator_market_data::{NullPriceHistoryProvider, PriceHistoryProvider};
use aggregator_storage_sqlite::accounts::{AccountRepository, ProviderRegistryRepository};
use aggregator_storage_sqlite::activities::ActivityRepository;
use aggregator_storage_sqlite::assets::AssetRepository;
use aggregator_storage_sqlite::portfolio::lots::LotRepository;
use aggregator_storage_sqlite::portfolio::snapshot::SnapshotRepository;
use aggregator_storage_sqlite::portfolio::valuation::ValuationRepository;
use aggregator_storage_sqlite::sync::SyncSessionRepository;
use aggregator_storage_sqlite::{create_pool, run_migrations, spawn_writer};

/// Keeps the backing `TempDir` alive for the harness's lifetime; the
/// database file is deleted on drop.
pub struct Harness {
    _tempdir: tempfile::TempDir,
    pub accounts: Arc<dyn AccountRepositoryTrait>,
    pub activities: Arc<dyn ActivityRepositoryTrait>,
    pub securities: Arc<dyn SecurityRepositoryTrait>,
    pub asset_classes: Arc<dyn AssetClassRepositoryTrait>,
    pub snapshots: Arc<dyn SnapshotRepositoryTrait>,
    pub lots: Arc<dyn LotRepositoryTrait>,
    pub dhv: Arc<dyn ValuationRepositoryTrait>,
    pub provider_registry: Arc<dyn ProviderRegistryTrait>,
    pub sessions: Arc<dyn SyncSessionRepositoryTrait>,
    pub lot_engine: Arc<LotReconciliationEngine>,
    pub returns_engine: ReturnsEngine,
}

impl Harness {
    pub fn new() -> Self {
        let tempdir = tempfile::tempdir().expect("create tempdir");
        let db_path = tempdir.path().join("aggregator.db");
        let resolved = aggregator_storage_sqlite::init(db_path.to_str().unwrap()).expect("init db path");
        let pool = create_pool(&resolved).expect("create pool");
        run_migrations(&pool).expect("run migrations");
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
        let sessions: Arc<dyn SyncSessionRepositoryTrait> =
            Arc::new(SyncSessionRepository::new(pool.clone(), writer.clone()));

        let lot_engine = Arc::new(LotReconciliationEngine::new(
            snapshots.clone(),
            activities.clone(),
            lots.clone(),
        ));
        let returns_engine =
            ReturnsEngine::new(accounts.clone(), snapshots.clone(), activities.clone(), dhv.clone());

        Self {
            _tempdir: tempdir,
            accounts,
            activities,
            securities,
            asset_classes,
            snapshots,
            lots,
            dhv,
            provider_registry,
            sessions,
            lot_engine,
            returns_engine,
        }
    }

    pub fn valuation_engine(&self, equity_prices: Arc<dyn PriceHistoryProvider>) -> ValuationEngine {
        ValuationEngine::new(
            self.accounts.clone(),
            self.snapshots.clone(),
            self.securities.clone(),
            self.dhv.clone(),
            equity_prices,
            None,
        )
    }

    /// Builds a full `SyncOrchestrator` wired against this harness's
    /// repositories, an internal `ValuationEngine` using a null price
    /// provider, and the shared `lot_engine`.
    pub fn orchestrator(&self, providers: Vec<Arc<dyn ProviderAdapter>>) -> SyncOrchestrator {
        let valuation = Arc::new(self.valuation_engine(Arc::new(NullPriceHistoryProvider)));
        SyncOrchestrator::new(
            providers,
            self.provider_registry.clone(),
            self.accounts.clone(),
            self.activities.clone(),
            self.snapshots.clone(),
            self.securities.clone(),
            self.sessions.clone(),
            valuation,
            self.lot_engine.clone(),
        )
    }
}
