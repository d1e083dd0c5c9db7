//! Lottery draw history for the lottery dashboard panel.
//!
//! Draws cycle through the configured lotteries; each lottery keeps
//! its own cadence counting back from the reference time.

use crate::{
    config::{GeneratorConfig, LotteryProfile},
    ids,
    rng::RandomSource,
    sampler,
    types::{round_cents, EntityId, Money},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LotteryDraw {
    pub id: EntityId,
    pub lottery: String,
    pub draw_date: DateTime<Utc>,
    /// Sorted ascending, distinct, within `1..=pool_size`.
    pub numbers: Vec<u32>,
    pub bonus_numbers: Vec<u32>,
    pub jackpot: Money,
    pub tickets_sold: u64,
    /// Index 0 is the jackpot tier.
    pub winners_per_tier: Vec<u64>,
}

impl LotteryDraw {
    pub fn jackpot_won(&self) -> bool {
        self.winners_per_tier.first().copied().unwrap_or(0) > 0
    }
}

/// `count` draws, newest first, spread round-robin over the lotteries.
pub fn generate_lottery_draws<R: RandomSource + ?Sized>(
    config: &GeneratorConfig,
    count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<LotteryDraw> {
    if config.lotteries.is_empty() {
        return Vec::new();
    }

    let mut draws: Vec<LotteryDraw> = (0..count)
        .map(|i| {
            let lottery = &config.lotteries[i % config.lotteries.len()];
            let nth = (i / config.lotteries.len()) as i64;
            let draw_date = now - Duration::days(nth * i64::from(lottery.draw_interval_days.max(1)));
            generate_draw(lottery, draw_date, rng)
        })
        .collect();

    draws.sort_by(|a, b| b.draw_date.cmp(&a.draw_date));
    log::debug!("lottery: generated {} draws", draws.len());
    draws
}

pub fn generate_draw<R: RandomSource + ?Sized>(
    lottery: &LotteryProfile,
    draw_date: DateTime<Utc>,
    rng: &mut R,
) -> LotteryDraw {
    let numbers = draw_numbers(lottery.pool_size, lottery.picks, rng);
    let bonus_numbers = draw_numbers(lottery.bonus_pool_size, lottery.bonus_picks, rng);
    let tickets_sold = lottery.tickets_sold.sample(rng).floor() as u64;

    let tiers = lottery.prize_tiers.max(1);
    let mut winners_per_tier = Vec::with_capacity(tiers as usize);
    winners_per_tier.push(if rng.chance(lottery.jackpot_hit_probability) {
        sampler::uniform_int(1, 2, rng)
    } else {
        0
    });
    // Lower tiers win roughly ten times as often as the tier above.
    for tier in 2..=tiers {
        let odds = 10f64.powi(tier as i32 - tiers as i32 - 1);
        let winners = tickets_sold as f64 * odds * sampler::uniform(0.5, 1.5, rng);
        winners_per_tier.push(winners.floor() as u64);
    }

    LotteryDraw {
        id: ids::entity_id("drw", rng),
        lottery: lottery.name.clone(),
        draw_date,
        numbers,
        bonus_numbers,
        jackpot: round_cents(lottery.jackpot.sample(rng)),
        tickets_sold,
        winners_per_tier,
    }
}

/// `picks` distinct numbers from `1..=pool`, sorted.
fn draw_numbers<R: RandomSource + ?Sized>(pool: u32, picks: u32, rng: &mut R) -> Vec<u32> {
    let balls: Vec<u32> = (1..=pool).collect();
    let mut numbers: Vec<u32> = sampler::pick_distinct(&balls, picks as usize, rng)
        .into_iter()
        .copied()
        .collect();
    numbers.sort_unstable();
    numbers
}
