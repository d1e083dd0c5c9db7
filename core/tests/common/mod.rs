//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use crm_synth_core::{
    customer::{Consent, Customer, Segment},
    transaction::{Transaction, TransactionKind, TransactionStatus},
};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// A customer with neutral financials; tests override what they need.
pub fn customer(id: &str, segment: Segment, churn_score: f64) -> Customer {
    let now = fixed_now();
    Customer {
        id: id.to_string(),
        first_name: "Test".into(),
        last_name: id.to_string(),
        email: format!("{id}@example.com"),
        phone: "+44 000 0000000".into(),
        country: "GB".into(),
        registered_at: now - Duration::days(400),
        last_login_at: now - Duration::days(2),
        segment,
        vip_level: None,
        lifetime_value: 1_000.0,
        total_deposits: 2_000.0,
        total_withdrawals: 500.0,
        total_bets: 4_000.0,
        total_wins: 3_000.0,
        total_losses: 1_000.0,
        churn_score,
        favorite_game: "Starburst".into(),
        consent: Consent::default(),
    }
}

pub fn txn(
    customer_id: &str,
    kind: TransactionKind,
    amount: f64,
    status: TransactionStatus,
    age: Duration,
) -> Transaction {
    Transaction {
        id: format!("txn_{customer_id}_{}", age.num_minutes()),
        customer_id: customer_id.to_string(),
        kind,
        amount,
        status,
        game_category: None,
        game_name: None,
        payment_method: None,
        timestamp: fixed_now() - age,
    }
}
