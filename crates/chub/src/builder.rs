use crate::RulesEngine;
use crate::error::{EngineError, EngineErrorExt};
use chub_catalog::CourseStore;
use chub_domain::config::EngineConfig;
use chub_kernel::clock::{Clock, SystemClock};
use chub_ledger::{Ledger, MemoryStore, PersistenceStore};
use chub_purchases::{DecliningGateway, PaymentGateway};
use chub_registration::{LogNotifier, Notifier};
use private::Sealed;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default)]
pub struct NoCatalog;
#[derive(Debug)]
pub struct WithCatalog(Arc<dyn CourseStore>);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoCatalog {}
impl Sealed for WithCatalog {}

/// Assembles a [`RulesEngine`].
///
/// The catalog is the only mandatory collaborator. Everything else falls back to a default:
/// the system clock, a gateway that declines every charge, a notifier that only logs, a fresh
/// in-memory store and [`EngineConfig::default`].
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct EngineBuilder<C: Sealed = NoCatalog> {
    catalog: C,
    clock: Option<Arc<dyn Clock>>,
    payments: Option<Arc<dyn PaymentGateway>>,
    notifier: Option<Arc<dyn Notifier>>,
    store: Option<Arc<dyn PersistenceStore>>,
    config: EngineConfig,
}

impl EngineBuilder<NoCatalog> {
    #[must_use = "Creates a new engine builder"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the course catalog the engine reads from"]
    pub fn catalog(self, catalog: Arc<dyn CourseStore>) -> EngineBuilder<WithCatalog> {
        EngineBuilder {
            catalog: WithCatalog(catalog),
            clock: self.clock,
            payments: self.payments,
            notifier: self.notifier,
            store: self.store,
            config: self.config,
        }
    }
}

#[allow(private_bounds)]
impl<C: Sealed> EngineBuilder<C> {
    #[must_use = "Sets the clock used for timestamps and the confirmation window"]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use = "Sets the payment gateway charged on purchase"]
    pub fn payments(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.payments = Some(gateway);
        self
    }

    #[must_use = "Sets the notifier that sends confirmation emails"]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[must_use = "Sets the persistence store backing the ledger"]
    pub fn store(mut self, store: Arc<dyn PersistenceStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use = "Sets the engine configuration"]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }
}

impl EngineBuilder<WithCatalog> {
    /// Opens the ledger and initializes every feature slice over it.
    ///
    /// # Errors
    /// Returns [`EngineError::Ledger`] if the persistence store cannot be scanned.
    pub fn build(self) -> Result<RulesEngine, EngineError> {
        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let ledger =
            Ledger::builder().store(store).open().context("Opening the interaction ledger")?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let payments = self.payments.unwrap_or_else(|| Arc::new(DecliningGateway));
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(LogNotifier));
        let config = self.config;

        let catalog = chub_catalog::init(self.catalog.0, &config);
        let view = catalog.view();

        let engine = RulesEngine {
            bookmarks: chub_bookmarks::init(ledger.clone(), Arc::clone(&view), Arc::clone(&clock)),
            purchases: chub_purchases::init(ledger.clone(), view, payments, Arc::clone(&clock)),
            reviews: chub_reviews::init(ledger.clone(), Arc::clone(&clock)),
            registration: chub_registration::init(
                ledger.clone(),
                notifier,
                clock,
                config.policy.clone(),
            ),
            catalog,
            ledger,
            config,
        };

        info!("Rules engine assembled");
        Ok(engine)
    }
}
