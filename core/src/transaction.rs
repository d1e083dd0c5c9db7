use crate::{
    config::GeneratorConfig,
    customer::Customer,
    game::GameCategory,
    ids,
    rng::RandomSource,
    sampler,
    types::{round_cents, EntityId, Money},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Bet,
    Win,
    Bonus,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Bet => "bet",
            Self::Win => "win",
            Self::Bonus => "bonus",
        }
    }

    /// Bets and wins are tied to a game.
    pub fn is_gameplay(&self) -> bool {
        matches!(self, Self::Bet | Self::Win)
    }

    /// Deposits and withdrawals go through a payment method.
    pub fn is_cashier(&self) -> bool {
        matches!(self, Self::Deposit | Self::Withdrawal)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: EntityId,
    /// Soft reference; nothing checks the customer exists.
    pub customer_id: EntityId,
    pub kind: TransactionKind,
    pub amount: Money,
    pub status: TransactionStatus,
    pub game_category: Option<GameCategory>,
    pub game_name: Option<String>,
    pub payment_method: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }
}

/// Generate `count` transactions spread over `customers`, newest first.
/// An empty customer list yields no transactions.
pub fn generate_transactions<R: RandomSource + ?Sized>(
    config: &GeneratorConfig,
    customers: &[Customer],
    count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Transaction> {
    if customers.is_empty() || config.transactions.kind_weights.is_empty() {
        return Vec::new();
    }

    let profile = &config.transactions;
    let window_start = now - Duration::days(i64::from(profile.history_days));
    let mut txns = Vec::with_capacity(count);

    for _ in 0..count {
        let Some(customer) = sampler::pick(customers, rng) else {
            break;
        };
        let Some(&kind) = sampler::weighted_pair(&profile.kind_weights, rng) else {
            break;
        };
        let status = sampler::weighted_pair(&profile.status_weights, rng)
            .copied()
            .unwrap_or(TransactionStatus::Completed);
        let amount = round_cents(profile.amounts.for_kind(kind).sample(rng));

        let (game_category, game_name) = if kind.is_gameplay() {
            // Favourite game most of the time, anything else otherwise.
            let favored = if rng.chance(profile.favorite_game_bias) {
                config.game(&customer.favorite_game)
            } else {
                None
            };
            let game = favored.or_else(|| sampler::pick(&config.games, rng));
            match game {
                Some(g) => (Some(g.category), Some(g.name.clone())),
                None => (None, None),
            }
        } else {
            (None, None)
        };

        let payment_method = if kind.is_cashier() {
            sampler::pick(&profile.payment_methods, rng).cloned()
        } else {
            None
        };

        // Never before the customer registered.
        let earliest = window_start.max(customer.registered_at);
        let timestamp = sampler::date_between(earliest, now, rng);

        txns.push(Transaction {
            id: ids::entity_id("txn", rng),
            customer_id: customer.id.clone(),
            kind,
            amount,
            status,
            game_category,
            game_name,
            payment_method,
            timestamp,
        });
    }

    txns.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    log::debug!(
        "transaction: generated {} transactions for {} customers",
        txns.len(),
        customers.len()
    );
    txns
}
