//! Lottery draws and the daily revenue series.

mod common;

use chrono::{Datelike, Duration, Weekday};
use common::fixed_now;
use crm_synth_core::{
    config::GeneratorConfig,
    lottery,
    revenue,
    rng::SampleRng,
};

#[test]
fn draws_pick_sorted_distinct_numbers_within_the_pool() {
    let config = GeneratorConfig::builtin();
    let mut rng = SampleRng::new(42, 0);
    let draws = lottery::generate_lottery_draws(&config, 300, fixed_now(), &mut rng);
    assert_eq!(draws.len(), 300);

    for d in &draws {
        let profile = config
            .lotteries
            .iter()
            .find(|l| l.name == d.lottery)
            .expect("configured lottery");
        assert_eq!(d.numbers.len(), profile.picks as usize);
        assert_eq!(d.bonus_numbers.len(), profile.bonus_picks as usize);
        assert!(d.numbers.windows(2).all(|w| w[0] < w[1]), "{:?}", d.numbers);
        assert!(d.numbers.iter().all(|n| (1..=profile.pool_size).contains(n)));
        assert!(d.bonus_numbers.iter().all(|n| (1..=profile.bonus_pool_size).contains(n)));
        assert_eq!(d.winners_per_tier.len(), profile.prize_tiers as usize);
        assert!(profile.jackpot.contains(d.jackpot));
    }
    assert!(draws.windows(2).all(|w| w[0].draw_date >= w[1].draw_date));
}

#[test]
fn each_lottery_keeps_its_own_cadence() {
    let config = GeneratorConfig::builtin();
    let mut rng = SampleRng::new(7, 0);
    let draws = lottery::generate_lottery_draws(&config, 30, fixed_now(), &mut rng);

    for profile in &config.lotteries {
        let dates: Vec<_> = draws
            .iter()
            .filter(|d| d.lottery == profile.name)
            .map(|d| d.draw_date)
            .collect();
        assert_eq!(dates.len(), 10);
        for w in dates.windows(2) {
            assert_eq!(w[0] - w[1], Duration::days(i64::from(profile.draw_interval_days)));
        }
    }
}

#[test]
fn no_lotteries_no_draws() {
    let mut config = GeneratorConfig::builtin();
    config.lotteries.clear();
    let mut rng = SampleRng::new(1, 0);
    assert!(lottery::generate_lottery_draws(&config, 10, fixed_now(), &mut rng).is_empty());
}

#[test]
fn revenue_series_is_consecutive_and_ends_today() {
    let config = GeneratorConfig::builtin();
    let mut rng = SampleRng::new(3, 0);
    let series = revenue::generate_revenue_series(&config, 60, fixed_now(), &mut rng);

    assert_eq!(series.len(), 60);
    assert_eq!(series.last().map(|p| p.date), Some(fixed_now().date_naive()));
    assert!(series.windows(2).all(|w| w[1].date - w[0].date == Duration::days(1)));
}

#[test]
fn ngr_is_ggr_minus_bonus_cost() {
    let config = GeneratorConfig::builtin();
    let mut rng = SampleRng::new(5, 0);
    for p in revenue::generate_revenue_series(&config, 90, fixed_now(), &mut rng) {
        assert!((p.ngr - (p.ggr - p.bonus_cost)).abs() < 0.006, "{}", p.date);
        assert!(p.withdrawals < p.deposits);
        assert!(p.ggr > 0.0 && p.ngr > 0.0);
    }
}

#[test]
fn weekends_outperform_weekdays_on_average() {
    let config = GeneratorConfig::builtin();
    let mut rng = SampleRng::new(9, 0);
    let series = revenue::generate_revenue_series(&config, 140, fixed_now(), &mut rng);

    let mean = |weekend: bool| {
        let days: Vec<f64> = series
            .iter()
            .filter(|p| matches!(p.date.weekday(), Weekday::Sat | Weekday::Sun) == weekend)
            .map(|p| p.deposits)
            .collect();
        days.iter().sum::<f64>() / days.len() as f64
    };
    assert!(mean(true) > mean(false));
}
