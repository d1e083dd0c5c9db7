//! The synthesizer: single entry point to every generator.
//!
//! RULES:
//!   - All randomness flows through the RngBank.
//!   - Each generator slot counts its own calls, so repeated calls draw
//!     fresh values while a whole session stays reproducible per seed.
//!   - "Now" is fixed at construction; nothing reads the wall clock
//!     during generation.

use crate::{
    campaign::{self, Campaign},
    config::GeneratorConfig,
    customer::{self, Customer},
    dataset::{Dataset, DatasetMode},
    error::SynthResult,
    game::{self, GameMetrics},
    insight::{self, AiInsights},
    lottery::{self, LotteryDraw},
    metrics::{self, DashboardMetrics},
    revenue::{self, RevenuePoint},
    rng::{GeneratorSlot, RngBank, SampleRng},
    transaction::{self, Transaction},
    types::Seed,
};
use chrono::{DateTime, Utc};

pub struct Synthesizer {
    config: GeneratorConfig,
    rng_bank: RngBank,
    now: DateTime<Utc>,
    calls: [u64; GeneratorSlot::COUNT],
}

impl Synthesizer {
    /// Validates `config` up front so generation itself cannot fail.
    pub fn new(config: GeneratorConfig, seed: Seed, now: DateTime<Utc>) -> SynthResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng_bank: RngBank::new(seed),
            now,
            calls: [0; GeneratorSlot::COUNT],
        })
    }

    /// Built-in config, given seed and reference time.
    pub fn with_defaults(seed: Seed, now: DateTime<Utc>) -> Self {
        Self {
            config: GeneratorConfig::builtin(),
            rng_bank: RngBank::new(seed),
            now,
            calls: [0; GeneratorSlot::COUNT],
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn seed(&self) -> Seed {
        self.rng_bank.master_seed()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn next_rng(&mut self, slot: GeneratorSlot) -> SampleRng {
        let call = &mut self.calls[slot as usize];
        let rng = self.rng_bank.for_generator(slot, *call);
        *call += 1;
        rng
    }

    pub fn generate_customers(&mut self, count: usize) -> Vec<Customer> {
        let mut rng = self.next_rng(GeneratorSlot::Customer);
        customer::generate_customers(&self.config, count, self.now, &mut rng)
    }

    pub fn generate_transactions(&mut self, customers: &[Customer], count: usize) -> Vec<Transaction> {
        let mut rng = self.next_rng(GeneratorSlot::Transaction);
        transaction::generate_transactions(&self.config, customers, count, self.now, &mut rng)
    }

    pub fn generate_campaigns(&mut self, count: usize) -> Vec<Campaign> {
        let mut rng = self.next_rng(GeneratorSlot::Campaign);
        campaign::generate_campaigns(&self.config, count, self.now, &mut rng)
    }

    pub fn generate_game_metrics(&mut self) -> Vec<GameMetrics> {
        let mut rng = self.next_rng(GeneratorSlot::Game);
        game::generate_game_metrics(&self.config, &mut rng)
    }

    pub fn generate_lottery_draws(&mut self, count: usize) -> Vec<LotteryDraw> {
        let mut rng = self.next_rng(GeneratorSlot::Lottery);
        lottery::generate_lottery_draws(&self.config, count, self.now, &mut rng)
    }

    pub fn generate_revenue_series(&mut self, days: usize) -> Vec<RevenuePoint> {
        let mut rng = self.next_rng(GeneratorSlot::Revenue);
        revenue::generate_revenue_series(&self.config, days, self.now, &mut rng)
    }

    /// Pure fold; consumes no randomness.
    pub fn generate_dashboard_metrics(
        &self,
        customers: &[Customer],
        transactions: &[Transaction],
    ) -> DashboardMetrics {
        metrics::generate_dashboard_metrics(
            customers,
            transactions,
            self.now,
            self.config.active_window_days,
        )
    }

    pub fn generate_ai_insights(&mut self, customers: &[Customer]) -> AiInsights {
        let mut rng = self.next_rng(GeneratorSlot::Insight);
        insight::generate_ai_insights(&self.config, customers, &mut rng)
    }

    /// Every entity set for `mode`, sized from the config.
    pub fn build_dataset(&mut self, mode: DatasetMode) -> Dataset {
        let sizes = *mode.sizes(&self.config);
        log::info!(
            "building {} dataset: {} customers, {} transactions, {} campaigns",
            mode.as_str(),
            sizes.customers,
            sizes.transactions,
            sizes.campaigns
        );

        let customers = self.generate_customers(sizes.customers);
        let transactions = self.generate_transactions(&customers, sizes.transactions);
        let dataset = Dataset {
            mode,
            seed: self.seed(),
            generated_at: self.now,
            campaigns: self.generate_campaigns(sizes.campaigns),
            games: self.generate_game_metrics(),
            lottery_draws: self.generate_lottery_draws(sizes.lottery_draws),
            revenue: self.generate_revenue_series(sizes.revenue_days),
            customers,
            transactions,
        };

        log::info!("{} dataset ready (seed={})", mode.as_str(), dataset.seed);
        dataset
    }
}
