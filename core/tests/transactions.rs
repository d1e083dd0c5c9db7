//! Transaction generation over a customer set.

mod common;

use chrono::Duration;
use common::fixed_now;
use crm_synth_core::{
    config::GeneratorConfig,
    customer,
    game,
    rng::SampleRng,
    transaction::{self, TransactionKind, TransactionStatus},
};
use std::collections::HashSet;

fn sample(seed: u64, customers: usize, count: usize) -> (Vec<customer::Customer>, Vec<transaction::Transaction>) {
    let config = GeneratorConfig::builtin();
    let mut rng = SampleRng::new(seed, 0);
    let customers = customer::generate_customers(&config, customers, fixed_now(), &mut rng);
    let txns = transaction::generate_transactions(&config, &customers, count, fixed_now(), &mut rng);
    (customers, txns)
}

#[test]
fn every_transaction_references_a_generated_customer() {
    let (customers, txns) = sample(42, 50, 500);
    assert_eq!(txns.len(), 500);
    let ids: HashSet<&str> = customers.iter().map(|c| c.id.as_str()).collect();
    for t in &txns {
        assert!(ids.contains(t.customer_id.as_str()), "{} has unknown customer", t.id);
        assert!(t.amount > 0.0);
    }
}

#[test]
fn timestamps_stay_in_history_window_and_sort_newest_first() {
    let config = GeneratorConfig::builtin();
    let (customers, txns) = sample(7, 40, 800);
    let window_start = fixed_now() - Duration::days(i64::from(config.transactions.history_days));

    for t in &txns {
        let owner = customers.iter().find(|c| c.id == t.customer_id).expect("owner");
        assert!(t.timestamp >= window_start);
        assert!(t.timestamp >= owner.registered_at);
        assert!(t.timestamp <= fixed_now());
    }
    assert!(txns.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
}

#[test]
fn only_gameplay_has_games_and_only_cashier_has_payment_methods() {
    let config = GeneratorConfig::builtin();
    let (_, txns) = sample(9, 30, 1_000);
    for t in &txns {
        if t.kind.is_gameplay() {
            let name = t.game_name.as_deref().expect("bet/win names a game");
            let profile = config.game(name).expect("catalog game");
            assert_eq!(t.game_category, Some(profile.category));
        } else {
            assert!(t.game_name.is_none() && t.game_category.is_none());
        }
        assert_eq!(t.payment_method.is_some(), t.kind.is_cashier(), "{:?}", t.kind);
    }
}

#[test]
fn kind_and_status_mix_follow_weights() {
    let (_, txns) = sample(13, 100, 20_000);
    let share = |pred: &dyn Fn(&transaction::Transaction) -> bool| {
        txns.iter().filter(|t| pred(t)).count() as f64 / txns.len() as f64
    };
    assert!((share(&|t| t.kind == TransactionKind::Bet) - 0.50).abs() < 0.02);
    assert!((share(&|t| t.kind == TransactionKind::Bonus) - 0.05).abs() < 0.01);
    assert!((share(&|t| t.status == TransactionStatus::Completed) - 0.75).abs() < 0.02);
}

#[test]
fn favourite_game_dominates_a_customers_play() {
    let config = GeneratorConfig::builtin();
    let (customers, txns) = sample(17, 5, 5_000);
    for c in &customers {
        let plays: Vec<_> = txns
            .iter()
            .filter(|t| t.customer_id == c.id && t.kind.is_gameplay())
            .collect();
        let on_favourite = plays
            .iter()
            .filter(|t| t.game_name.as_deref() == Some(c.favorite_game.as_str()))
            .count() as f64;
        let expected_min = config.transactions.favorite_game_bias * 0.8;
        assert!(on_favourite / plays.len() as f64 > expected_min, "{}", c.id);
    }
}

#[test]
fn no_customers_means_no_transactions() {
    let config = GeneratorConfig::builtin();
    let mut rng = SampleRng::new(1, 0);
    assert!(transaction::generate_transactions(&config, &[], 100, fixed_now(), &mut rng).is_empty());
}

#[test]
fn game_summary_folds_completed_gameplay_only() {
    let config = GeneratorConfig::builtin();
    let (_, txns) = sample(23, 50, 3_000);
    let summary = game::summarize_games(&config, &txns);

    let bets: f64 = txns
        .iter()
        .filter(|t| t.kind == TransactionKind::Bet && t.is_completed())
        .map(|t| t.amount)
        .sum();
    let summed: f64 = summary.iter().map(|g| g.total_bets).sum();
    assert!((bets - summed).abs() < 0.05, "bets {bets} vs summary {summed}");
    assert!(summary.windows(2).all(|w| w[0].name < w[1].name));
    assert!(summary.iter().any(|g| (g.popularity - 100.0).abs() < f64::EPSILON));
}

#[test]
fn catalog_game_metrics_are_consistent() {
    let config = GeneratorConfig::builtin();
    let mut rng = SampleRng::new(29, 0);
    let games = game::generate_game_metrics(&config, &mut rng);
    assert_eq!(games.len(), config.games.len());
    for g in &games {
        let p = config.game(&g.name).expect("catalog game");
        assert!(p.rtp.contains(g.rtp));
        assert!((g.revenue - (g.total_bets - g.total_wins)).abs() < 0.011);
        assert!((0.0..=100.0).contains(&g.popularity));
    }
}
