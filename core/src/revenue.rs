//! Daily revenue series for the finance charts.

use crate::{
    config::GeneratorConfig,
    rng::RandomSource,
    sampler,
    types::{round_cents, Money},
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub deposits: Money,
    pub withdrawals: Money,
    /// Gross gaming revenue.
    pub ggr: Money,
    pub bonus_cost: Money,
    /// Net gaming revenue: GGR minus bonus cost.
    pub ngr: Money,
    pub active_players: u64,
}

/// `days` consecutive points ending on `now`'s date, oldest first.
pub fn generate_revenue_series<R: RandomSource + ?Sized>(
    config: &GeneratorConfig,
    days: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<RevenuePoint> {
    let p = &config.revenue;
    let today = now.date_naive();

    let series: Vec<RevenuePoint> = (0..days)
        .map(|i| {
            let date = today - Duration::days((days - 1 - i) as i64);
            let trend = 1.0 + p.daily_growth * i as f64;
            let weekend = match date.weekday() {
                Weekday::Sat | Weekday::Sun => 1.0 + p.weekend_uplift,
                _ => 1.0,
            };
            let noise = 1.0 + sampler::uniform(-p.noise, p.noise, rng);
            let scale = trend * weekend * noise;

            let deposits = round_cents(p.base_deposits * scale);
            let withdrawals = round_cents(deposits * p.withdrawal_ratio.sample(rng));
            let ggr = round_cents(deposits * p.ggr_margin.sample(rng));
            let bonus_cost = round_cents(ggr * p.bonus_ratio.sample(rng));
            RevenuePoint {
                date,
                deposits,
                withdrawals,
                ggr,
                bonus_cost,
                ngr: round_cents(ggr - bonus_cost),
                active_players: (p.base_active_players * scale).round() as u64,
            }
        })
        .collect();

    log::debug!("revenue: generated {days}-day series");
    series
}

/// Sum of NGR over a series.
pub fn total_ngr(series: &[RevenuePoint]) -> Money {
    round_cents(series.iter().map(|p| p.ngr).sum())
}
