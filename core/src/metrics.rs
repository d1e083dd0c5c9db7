//! Dashboard-level aggregates.
//!
//! Every function here is a pure fold over its inputs: one pass per
//! metric, no caching, inputs untouched.

use crate::{
    customer::{Customer, Segment},
    transaction::{Transaction, TransactionKind},
    types::{round_cents, Money},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricsWindow {
    Daily,
    Weekly,
    Monthly,
}

impl MetricsWindow {
    pub fn days(&self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Monthly => 30,
        }
    }

    /// `(now - window, now]`.
    pub fn contains(&self, ts: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        ts <= now && ts > now - Duration::days(self.days())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardMetrics {
    pub generated_at: DateTime<Utc>,
    pub total_customers: usize,
    pub active_customers: usize,
    pub vip_customers: usize,
    /// GGR over all completed transactions.
    pub total_revenue: Money,
    pub daily_revenue: Money,
    pub weekly_revenue: Money,
    pub monthly_revenue: Money,
    pub total_deposits: Money,
    pub total_withdrawals: Money,
    pub bonus_cost: Money,
    pub average_ltv: Money,
    pub average_churn_score: f64,
    /// Churned-segment share of customers.
    pub churn_rate: f64,
    /// Share of customers with at least one completed deposit.
    pub conversion_rate: f64,
    pub segment_counts: BTreeMap<Segment, usize>,
}

/// Gross gaming revenue (completed bets minus completed wins) of the
/// transactions `filter` accepts.
pub fn gross_gaming_revenue<F>(transactions: &[Transaction], filter: F) -> Money
where
    F: Fn(&Transaction) -> bool,
{
    let ggr: Money = transactions
        .iter()
        .filter(|&t| t.is_completed() && filter(t))
        .map(|t| match t.kind {
            TransactionKind::Bet => t.amount,
            TransactionKind::Win => -t.amount,
            _ => 0.0,
        })
        .sum();
    round_cents(ggr)
}

pub fn revenue_in_window(transactions: &[Transaction], now: DateTime<Utc>, window: MetricsWindow) -> Money {
    gross_gaming_revenue(transactions, |t| window.contains(t.timestamp, now))
}

/// Sum of completed transactions of one kind.
pub fn completed_total(transactions: &[Transaction], kind: TransactionKind) -> Money {
    round_cents(
        transactions
            .iter()
            .filter(|t| t.kind == kind && t.is_completed())
            .map(|t| t.amount)
            .sum(),
    )
}

pub fn churn_rate(customers: &[Customer]) -> f64 {
    share(customers, |c| c.segment == Segment::Churned)
}

/// Depositor conversion: customers with a completed deposit.
pub fn conversion_rate(customers: &[Customer], transactions: &[Transaction]) -> f64 {
    let depositors: HashSet<&str> = transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Deposit && t.is_completed())
        .map(|t| t.customer_id.as_str())
        .collect();
    share(customers, |c| depositors.contains(c.id.as_str()))
}

pub fn segment_counts(customers: &[Customer]) -> BTreeMap<Segment, usize> {
    let mut counts: BTreeMap<Segment, usize> = Segment::ALL.iter().map(|s| (*s, 0)).collect();
    for c in customers {
        *counts.entry(c.segment).or_default() += 1;
    }
    counts
}

fn share<F: Fn(&Customer) -> bool>(customers: &[Customer], pred: F) -> f64 {
    if customers.is_empty() {
        return 0.0;
    }
    customers.iter().filter(|&c| pred(c)).count() as f64 / customers.len() as f64
}

fn mean<F: Fn(&Customer) -> f64>(customers: &[Customer], field: F) -> f64 {
    if customers.is_empty() {
        return 0.0;
    }
    customers.iter().map(field).sum::<f64>() / customers.len() as f64
}

pub fn generate_dashboard_metrics(
    customers: &[Customer],
    transactions: &[Transaction],
    now: DateTime<Utc>,
    active_window_days: u32,
) -> DashboardMetrics {
    DashboardMetrics {
        generated_at: now,
        total_customers: customers.len(),
        active_customers: customers
            .iter()
            .filter(|c| c.is_active(now, active_window_days))
            .count(),
        vip_customers: customers.iter().filter(|c| c.is_vip()).count(),
        total_revenue: gross_gaming_revenue(transactions, |_| true),
        daily_revenue: revenue_in_window(transactions, now, MetricsWindow::Daily),
        weekly_revenue: revenue_in_window(transactions, now, MetricsWindow::Weekly),
        monthly_revenue: revenue_in_window(transactions, now, MetricsWindow::Monthly),
        total_deposits: completed_total(transactions, TransactionKind::Deposit),
        total_withdrawals: completed_total(transactions, TransactionKind::Withdrawal),
        bonus_cost: completed_total(transactions, TransactionKind::Bonus),
        average_ltv: round_cents(mean(customers, |c| c.lifetime_value)),
        average_churn_score: mean(customers, |c| c.churn_score),
        churn_rate: churn_rate(customers),
        conversion_rate: conversion_rate(customers, transactions),
        segment_counts: segment_counts(customers),
    }
}
