//! Lazy, memoizing access to generated data.
//!
//! Nothing is generated until first asked for. The first request for a
//! key schedules generation on the blocking pool; every other request for
//! that key, concurrent or later, receives the same `Arc`.
//!
//! A scheduled generation runs to completion even if every requester is
//! dropped, so the result still lands in the cache. A generation that
//! panics evicts its key and fails the waiters with `GenerationAborted`.

use crate::{
    campaign::{self, Campaign},
    config::GeneratorConfig,
    customer::{self, Customer},
    dataset::DatasetMode,
    error::{SynthError, SynthResult},
    insight::{self, AiInsights},
    metrics::{self, DashboardMetrics},
    rng::{GeneratorSlot, RngBank},
    transaction::{self, Transaction},
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

type Slot<T> = watch::Receiver<Option<Arc<T>>>;

// ── Generic cache ────────────────────────────────────────────────────────────

pub struct GenerationCache<T> {
    name: &'static str,
    entries: Mutex<HashMap<String, Slot<T>>>,
}

impl<T: Send + Sync + 'static> GenerationCache<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cached value for `key`, or schedule `generate` and await it.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn get_or_generate<F>(&self, key: &str, generate: F) -> SynthResult<Arc<T>>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let mut rx = self.subscribe(key, generate);
        let value = match rx.wait_for(|v| v.is_some()).await {
            Ok(slot) => (*slot).clone(),
            Err(_) => None,
        };
        match value {
            Some(v) => Ok(v),
            None => {
                self.evict_failed(key);
                Err(SynthError::GenerationAborted {
                    key: format!("{}/{key}", self.name),
                })
            }
        }
    }

    fn subscribe<F>(&self, key: &str, generate: F) -> Slot<T>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(rx) = entries.get(key) {
            log::debug!("{}: cache hit for '{key}'", self.name);
            return rx.clone();
        }

        log::debug!("{}: generating '{key}'", self.name);
        let (tx, rx) = watch::channel(None);
        entries.insert(key.to_string(), rx.clone());

        let name = self.name;
        let key = key.to_string();
        tokio::spawn(async move {
            match tokio::task::spawn_blocking(generate).await {
                Ok(value) => {
                    tx.send_replace(Some(Arc::new(value)));
                    log::debug!("{name}: '{key}' ready");
                }
                // Dropping `tx` wakes the waiters with a closed channel.
                Err(e) => log::warn!("{name}: generation of '{key}' aborted: {e}"),
            }
        });
        rx
    }

    /// Removes `key` only if its generation ended without a value.
    fn evict_failed(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let failed = entries
            .get(key)
            .is_some_and(|rx| rx.has_changed().is_err() && rx.borrow().is_none());
        if failed {
            entries.remove(key);
        }
    }

    /// Completed value for `key`, without scheduling anything.
    pub fn peek(&self, key: &str) -> Option<Arc<T>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).and_then(|rx| rx.borrow().clone())
    }

    /// Forget `key`. An in-flight generation still completes for the
    /// callers already waiting on it.
    pub fn invalidate(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    /// Keys present, pending or complete.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Data provider ────────────────────────────────────────────────────────────

/// Memoized generators keyed by their size arguments.
///
/// Each key draws from its own RNG stream, so a value depends only on the
/// seed and the key, never on request order.
pub struct LazyDataProvider {
    config: Arc<GeneratorConfig>,
    rng_bank: RngBank,
    now: DateTime<Utc>,
    customers: GenerationCache<Vec<Customer>>,
    transactions: GenerationCache<Vec<Transaction>>,
    campaigns: GenerationCache<Vec<Campaign>>,
    metrics: GenerationCache<DashboardMetrics>,
    insights: GenerationCache<AiInsights>,
}

impl LazyDataProvider {
    pub fn new(config: GeneratorConfig, rng_bank: RngBank, now: DateTime<Utc>) -> SynthResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            rng_bank,
            now,
            customers: GenerationCache::new("customers"),
            transactions: GenerationCache::new("transactions"),
            campaigns: GenerationCache::new("campaigns"),
            metrics: GenerationCache::new("metrics"),
            insights: GenerationCache::new("insights"),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub async fn customers(&self, count: usize) -> SynthResult<Arc<Vec<Customer>>> {
        let key = format!("customers:{count}");
        let config = Arc::clone(&self.config);
        let mut rng = self.rng_bank.for_key(GeneratorSlot::Customer, &key);
        let now = self.now;
        self.customers
            .get_or_generate(&key, move || {
                customer::generate_customers(&config, count, now, &mut rng)
            })
            .await
    }

    /// Transactions over the customer set of size `customer_count`.
    pub async fn transactions(
        &self,
        customer_count: usize,
        count: usize,
    ) -> SynthResult<Arc<Vec<Transaction>>> {
        let customers = self.customers(customer_count).await?;
        let key = format!("transactions:{customer_count}:{count}");
        let config = Arc::clone(&self.config);
        let mut rng = self.rng_bank.for_key(GeneratorSlot::Transaction, &key);
        let now = self.now;
        self.transactions
            .get_or_generate(&key, move || {
                transaction::generate_transactions(&config, &customers, count, now, &mut rng)
            })
            .await
    }

    pub async fn campaigns(&self, count: usize) -> SynthResult<Arc<Vec<Campaign>>> {
        let key = format!("campaigns:{count}");
        let config = Arc::clone(&self.config);
        let mut rng = self.rng_bank.for_key(GeneratorSlot::Campaign, &key);
        let now = self.now;
        self.campaigns
            .get_or_generate(&key, move || {
                campaign::generate_campaigns(&config, count, now, &mut rng)
            })
            .await
    }

    pub async fn dashboard_metrics(
        &self,
        customer_count: usize,
        transaction_count: usize,
    ) -> SynthResult<Arc<DashboardMetrics>> {
        let customers = self.customers(customer_count).await?;
        let transactions = self.transactions(customer_count, transaction_count).await?;
        let key = format!("metrics:{customer_count}:{transaction_count}");
        let now = self.now;
        let window = self.config.active_window_days;
        self.metrics
            .get_or_generate(&key, move || {
                metrics::generate_dashboard_metrics(&customers, &transactions, now, window)
            })
            .await
    }

    pub async fn ai_insights(&self, customer_count: usize) -> SynthResult<Arc<AiInsights>> {
        let customers = self.customers(customer_count).await?;
        let key = format!("insights:{customer_count}");
        let config = Arc::clone(&self.config);
        let mut rng = self.rng_bank.for_key(GeneratorSlot::Insight, &key);
        self.insights
            .get_or_generate(&key, move || {
                insight::generate_ai_insights(&config, &customers, &mut rng)
            })
            .await
    }

    /// Dashboard metrics at the configured size for `mode`.
    pub async fn metrics_for(&self, mode: DatasetMode) -> SynthResult<Arc<DashboardMetrics>> {
        let sizes = mode.sizes(&self.config);
        let (customers, transactions) = (sizes.customers, sizes.transactions);
        self.dashboard_metrics(customers, transactions).await
    }

    pub async fn insights_for(&self, mode: DatasetMode) -> SynthResult<Arc<AiInsights>> {
        let customers = mode.sizes(&self.config).customers;
        self.ai_insights(customers).await
    }

    /// Drop every memoized value.
    pub fn clear(&self) {
        self.customers.clear();
        self.transactions.clear();
        self.campaigns.clear();
        self.metrics.clear();
        self.insights.clear();
        log::info!("provider caches cleared");
    }

    pub fn cached_customers(&self, count: usize) -> Option<Arc<Vec<Customer>>> {
        self.customers.peek(&format!("customers:{count}"))
    }
}
