use crate::{
    config::GeneratorConfig,
    rng::RandomSource,
    transaction::{Transaction, TransactionKind},
    types::{round_cents, Money},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum GameCategory {
    Slots,
    LiveCasino,
    Table,
    Poker,
    Sports,
    Lottery,
}

impl GameCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slots => "slots",
            Self::LiveCasino => "live_casino",
            Self::Table => "table",
            Self::Poker => "poker",
            Self::Sports => "sports",
            Self::Lottery => "lottery",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameMetrics {
    pub game_id: String,
    pub name: String,
    pub category: GameCategory,
    pub active_players: u64,
    pub total_bets: Money,
    pub total_wins: Money,
    /// Gross gaming revenue: bets minus wins.
    pub revenue: Money,
    /// 0..=100, relative to the most-played game in the set.
    pub popularity: f64,
    pub rtp: f64,
}

/// One record per catalog game.
pub fn generate_game_metrics<R: RandomSource + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Vec<GameMetrics> {
    let mut games: Vec<GameMetrics> = config
        .games
        .iter()
        .map(|g| {
            let active_players = g.players.sample(rng).floor() as u64;
            let total_bets = round_cents(active_players as f64 * g.bets_per_player.sample(rng));
            let rtp = g.rtp.sample(rng);
            let total_wins = round_cents(total_bets * rtp);
            GameMetrics {
                game_id: g.game_id.clone(),
                name: g.name.clone(),
                category: g.category,
                active_players,
                total_bets,
                total_wins,
                revenue: round_cents(total_bets - total_wins),
                popularity: 0.0,
                rtp,
            }
        })
        .collect();

    assign_popularity(&mut games);
    log::debug!("game: generated metrics for {} games", games.len());
    games
}

/// Fold completed bet/win transactions into per-game metrics.
/// Transactions without a game are skipped; games are ordered by name.
pub fn summarize_games(config: &GeneratorConfig, transactions: &[Transaction]) -> Vec<GameMetrics> {
    #[derive(Default)]
    struct Acc<'a> {
        category: Option<GameCategory>,
        players: HashSet<&'a str>,
        bets: Money,
        wins: Money,
    }

    let mut by_game: BTreeMap<&str, Acc<'_>> = BTreeMap::new();
    for txn in transactions.iter().filter(|t| t.is_completed()) {
        let Some(name) = txn.game_name.as_deref() else {
            continue;
        };
        let acc = by_game.entry(name).or_default();
        acc.category = acc.category.or(txn.game_category);
        acc.players.insert(txn.customer_id.as_str());
        match txn.kind {
            TransactionKind::Bet => acc.bets += txn.amount,
            TransactionKind::Win => acc.wins += txn.amount,
            _ => {}
        }
    }

    let mut games: Vec<GameMetrics> = by_game
        .into_iter()
        .map(|(name, acc)| {
            let profile = config.game(name);
            let rtp = if acc.bets > 0.0 { acc.wins / acc.bets } else { 0.0 };
            GameMetrics {
                game_id: profile.map(|p| p.game_id.clone()).unwrap_or_else(|| name.to_string()),
                name: name.to_string(),
                category: acc
                    .category
                    .or_else(|| profile.map(|p| p.category))
                    .unwrap_or(GameCategory::Slots),
                active_players: acc.players.len() as u64,
                total_bets: round_cents(acc.bets),
                total_wins: round_cents(acc.wins),
                revenue: round_cents(acc.bets - acc.wins),
                popularity: 0.0,
                rtp,
            }
        })
        .collect();

    assign_popularity(&mut games);
    games
}

fn assign_popularity(games: &mut [GameMetrics]) {
    let max_players = games.iter().map(|g| g.active_players).max().unwrap_or(0);
    for g in games.iter_mut() {
        g.popularity = if max_players == 0 {
            0.0
        } else {
            (g.active_players as f64 / max_players as f64 * 1_000.0).round() / 10.0
        };
    }
}
