//! A complete generated dataset and the fixture/enhanced toggle.

use crate::{
    campaign::Campaign,
    config::{DatasetSizes, GeneratorConfig},
    customer::Customer,
    error::SynthResult,
    game::GameMetrics,
    lottery::LotteryDraw,
    metrics::{self, DashboardMetrics},
    revenue::RevenuePoint,
    transaction::Transaction,
    types::Seed,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that selects the enhanced dataset.
pub const ENHANCED_ENV_VAR: &str = "CRM_SYNTH_ENHANCED";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DatasetMode {
    /// Small static-sized dataset for demos and tests.
    #[default]
    Fixture,
    /// Large volume dataset.
    Enhanced,
}

impl DatasetMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixture => "fixture",
            Self::Enhanced => "enhanced",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixture" => Some(Self::Fixture),
            "enhanced" => Some(Self::Enhanced),
            _ => None,
        }
    }

    /// Enhanced when the toggle reads `1`, `true` or `yes`; fixture otherwise.
    pub fn from_flag(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes") => Self::Enhanced,
            _ => Self::Fixture,
        }
    }

    pub fn from_env() -> Self {
        let value = std::env::var(ENHANCED_ENV_VAR).ok();
        let mode = Self::from_flag(value.as_deref());
        log::debug!("dataset mode from {ENHANCED_ENV_VAR}: {}", mode.as_str());
        mode
    }

    pub fn sizes<'a>(&self, config: &'a GeneratorConfig) -> &'a DatasetSizes {
        match self {
            Self::Fixture => &config.fixture,
            Self::Enhanced => &config.enhanced,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub mode: DatasetMode,
    pub seed: Seed,
    pub generated_at: DateTime<Utc>,
    pub customers: Vec<Customer>,
    /// Newest first.
    pub transactions: Vec<Transaction>,
    pub campaigns: Vec<Campaign>,
    pub games: Vec<GameMetrics>,
    pub lottery_draws: Vec<LotteryDraw>,
    /// Oldest first.
    pub revenue: Vec<RevenuePoint>,
}

impl Dataset {
    pub fn find_customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn transactions_for<'a>(&'a self, customer_id: &'a str) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions
            .iter()
            .filter(move |t| t.customer_id == customer_id)
    }

    pub fn dashboard_metrics(&self, active_window_days: u32) -> DashboardMetrics {
        metrics::generate_dashboard_metrics(
            &self.customers,
            &self.transactions,
            self.generated_at,
            active_window_days,
        )
    }

    pub fn to_json(&self) -> SynthResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> SynthResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> SynthResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("dataset written to {}", path.display());
        Ok(())
    }
}
