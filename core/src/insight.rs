//! "AI" insight panels.
//!
//! Table-driven randomized labelling over generated customers:
//!   1. Churn predictions for customers above the churn threshold
//!   2. LTV predictions from segment growth multipliers
//!   3. One recommendation per populated segment
//!   4. Responsible-gambling risk flags from the financial fields
//!
//! No model is trained and no accuracy figure is produced.
//! Every list is capped at `InsightProfile::max_records`.

use crate::{
    config::{GeneratorConfig, InsightProfile},
    customer::{Customer, Segment},
    ids,
    rng::RandomSource,
    sampler,
    types::{round_cents, EntityId, Money},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const CRITICAL_CHURN_SCORE: f64 = 0.85;
pub const HIGH_CHURN_SCORE: f64 = 0.70;

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_churn_score(score: f64) -> Self {
        if score >= CRITICAL_CHURN_SCORE {
            Self::Critical
        } else if score >= HIGH_CHURN_SCORE {
            Self::High
        } else {
            Self::Medium
        }
    }

    /// Same bands as churn, with `Low` below 0.5.
    pub fn from_risk_score(score: f64) -> Self {
        if score < 0.5 {
            Self::Low
        } else {
            Self::from_churn_score(score)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChurnPrediction {
    pub id: EntityId,
    pub customer_id: EntityId,
    pub customer_name: String,
    pub segment: Segment,
    pub churn_score: f64,
    pub risk_level: RiskLevel,
    /// One or two distinct entries from the factor catalog.
    pub factors: Vec<String>,
    pub recommendation: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LtvPrediction {
    pub customer_id: EntityId,
    pub customer_name: String,
    pub segment: Segment,
    pub current_ltv: Money,
    pub predicted_ltv: Money,
    pub horizon_months: u32,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Retention,
    Reactivation,
    VipUpgrade,
    Engagement,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: EntityId,
    pub kind: RecommendationKind,
    pub segment: Segment,
    pub title: String,
    pub target_customers: usize,
    pub expected_impact: Money,
    pub priority: RiskLevel,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
    /// Losses exceed the configured share of deposits.
    HighLossRatio,
    /// Withdrawals exceed deposits, which only the generator allows.
    WithdrawalsExceedDeposits,
    HighChurnScore,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub customer_id: EntityId,
    pub customer_name: String,
    pub score: f64,
    pub risk_level: RiskLevel,
    pub flags: Vec<RiskFlag>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AiInsights {
    pub churn_predictions: Vec<ChurnPrediction>,
    pub ltv_predictions: Vec<LtvPrediction>,
    pub recommendations: Vec<Recommendation>,
    pub risk_assessments: Vec<RiskAssessment>,
}

// ── Derivation ───────────────────────────────────────────────────────────────

pub fn generate_ai_insights<R: RandomSource + ?Sized>(
    config: &GeneratorConfig,
    customers: &[Customer],
    rng: &mut R,
) -> AiInsights {
    let insights = AiInsights {
        churn_predictions: churn_predictions(&config.insights, customers, rng),
        ltv_predictions: ltv_predictions(config, customers, rng),
        recommendations: recommendations(&config.insights, customers, rng),
        risk_assessments: risk_assessments(&config.insights, customers),
    };
    log::debug!(
        "insight: {} churn, {} ltv, {} recommendations, {} risk",
        insights.churn_predictions.len(),
        insights.ltv_predictions.len(),
        insights.recommendations.len(),
        insights.risk_assessments.len(),
    );
    insights
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

pub fn churn_predictions<R: RandomSource + ?Sized>(
    profile: &InsightProfile,
    customers: &[Customer],
    rng: &mut R,
) -> Vec<ChurnPrediction> {
    let mut at_risk: Vec<&Customer> = customers
        .iter()
        .filter(|c| c.churn_score > profile.churn_threshold)
        .collect();
    at_risk.sort_by(|a, b| desc(a.churn_score, b.churn_score));
    at_risk.truncate(profile.max_records);

    at_risk
        .into_iter()
        .map(|c| {
            let factor_count = sampler::uniform_int(1, 2, rng) as usize;
            let factors = sampler::pick_distinct(&profile.churn_factors, factor_count, rng)
                .into_iter()
                .cloned()
                .collect();
            let recommendation = sampler::pick(&profile.churn_recommendations, rng)
                .cloned()
                .unwrap_or_default();
            ChurnPrediction {
                id: ids::entity_id("chp", rng),
                customer_id: c.id.clone(),
                customer_name: c.full_name(),
                segment: c.segment,
                churn_score: c.churn_score,
                risk_level: RiskLevel::from_churn_score(c.churn_score),
                factors,
                recommendation,
                confidence: round3(profile.confidence.sample(rng)),
            }
        })
        .collect()
}

pub fn ltv_predictions<R: RandomSource + ?Sized>(
    config: &GeneratorConfig,
    customers: &[Customer],
    rng: &mut R,
) -> Vec<LtvPrediction> {
    let profile = &config.insights;
    let mut top: Vec<&Customer> = customers.iter().collect();
    top.sort_by(|a, b| desc(a.lifetime_value, b.lifetime_value));
    top.truncate(profile.max_records);

    top.into_iter()
        .map(|c| {
            let growth = config
                .segment(c.segment)
                .map(|s| s.ltv_growth.sample(rng))
                .unwrap_or(1.0);
            LtvPrediction {
                customer_id: c.id.clone(),
                customer_name: c.full_name(),
                segment: c.segment,
                current_ltv: c.lifetime_value,
                predicted_ltv: round_cents(c.lifetime_value * growth),
                horizon_months: profile.ltv_horizon_months,
                confidence: round3(profile.confidence.sample(rng)),
            }
        })
        .collect()
}

pub fn recommendations<R: RandomSource + ?Sized>(
    profile: &InsightProfile,
    customers: &[Customer],
    rng: &mut R,
) -> Vec<Recommendation> {
    let mut out = Vec::new();
    for segment in [Segment::AtRisk, Segment::Churned, Segment::HighValue, Segment::Regular] {
        let members: Vec<&Customer> = customers.iter().filter(|c| c.segment == segment).collect();
        if members.is_empty() {
            continue;
        }
        let (kind, title, priority) = match segment {
            Segment::AtRisk => (
                RecommendationKind::Retention,
                "Launch retention offer for at-risk players",
                RiskLevel::High,
            ),
            Segment::Churned => (
                RecommendationKind::Reactivation,
                "Win back churned players with a reactivation bonus",
                RiskLevel::Medium,
            ),
            Segment::HighValue => (
                RecommendationKind::VipUpgrade,
                "Review high-value players for VIP tier upgrade",
                RiskLevel::Medium,
            ),
            Segment::Regular => (
                RecommendationKind::Engagement,
                "Grow engagement with personalised game suggestions",
                RiskLevel::Low,
            ),
        };
        let total_ltv: Money = members.iter().map(|c| c.lifetime_value).sum();
        out.push(Recommendation {
            id: ids::entity_id("rec", rng),
            kind,
            segment,
            title: title.to_string(),
            target_customers: members.len(),
            expected_impact: round_cents(total_ltv * profile.impact_uplift.sample(rng)),
            priority,
        });
    }
    out.truncate(profile.max_records);
    out
}

/// Deterministic: flags come from the financial fields only.
pub fn risk_assessments(profile: &InsightProfile, customers: &[Customer]) -> Vec<RiskAssessment> {
    let mut assessed: Vec<RiskAssessment> = customers
        .iter()
        .filter_map(|c| {
            let loss_ratio = if c.total_deposits > 0.0 {
                c.total_losses / c.total_deposits
            } else {
                0.0
            };
            let mut flags = Vec::new();
            if loss_ratio > profile.loss_ratio_threshold {
                flags.push(RiskFlag::HighLossRatio);
            }
            if c.total_withdrawals > c.total_deposits {
                flags.push(RiskFlag::WithdrawalsExceedDeposits);
            }
            if flags.is_empty() {
                return None;
            }
            if c.churn_score > profile.churn_threshold {
                flags.push(RiskFlag::HighChurnScore);
            }
            let score = round3((0.6 * loss_ratio.min(1.0) + 0.4 * c.churn_score).min(1.0));
            Some(RiskAssessment {
                customer_id: c.id.clone(),
                customer_name: c.full_name(),
                score,
                risk_level: RiskLevel::from_risk_score(score),
                flags,
            })
        })
        .collect();

    assessed.sort_by(|a, b| desc(a.score, b.score));
    assessed.truncate(profile.max_records);
    assessed
}

fn round3(x: f64) -> f64 {
    (x * 1_000.0).round() / 1_000.0
}
