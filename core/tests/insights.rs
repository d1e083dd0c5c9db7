//! Insight panels: churn threshold, caps, catalogs and risk flags.

mod common;

use common::customer;
use crm_synth_core::{
    config::GeneratorConfig,
    customer::Segment,
    insight::{self, RecommendationKind, RiskFlag, RiskLevel},
    rng::SampleRng,
    synthesizer::Synthesizer,
};

#[test]
fn churn_predictions_cover_only_customers_above_threshold() {
    let config = GeneratorConfig::builtin();
    let customers = vec![
        customer("low", Segment::Regular, 0.30),
        customer("edge", Segment::AtRisk, 0.60),
        customer("mid", Segment::AtRisk, 0.72),
        customer("top", Segment::Churned, 0.95),
    ];
    let mut rng = SampleRng::new(1, 0);
    let preds = insight::churn_predictions(&config.insights, &customers, &mut rng);

    let ids: Vec<&str> = preds.iter().map(|p| p.customer_id.as_str()).collect();
    assert_eq!(ids, vec!["top", "mid"], "strictly above 0.6, highest first");
    assert_eq!(preds[0].risk_level, RiskLevel::Critical);
    assert_eq!(preds[1].risk_level, RiskLevel::High);
}

#[test]
fn churn_predictions_are_capped_and_sorted() {
    let mut synth = Synthesizer::with_defaults(42, common::fixed_now());
    let customers = synth.generate_customers(2_000);
    let insights = synth.generate_ai_insights(&customers);
    let config = synth.config();

    let preds = &insights.churn_predictions;
    assert_eq!(preds.len(), config.insights.max_records);
    assert!(preds.windows(2).all(|w| w[0].churn_score >= w[1].churn_score));

    for p in preds {
        assert!(p.churn_score > config.insights.churn_threshold);
        assert!((1..=2).contains(&p.factors.len()), "{} factors", p.factors.len());
        if p.factors.len() == 2 {
            assert_ne!(p.factors[0], p.factors[1]);
        }
        for f in &p.factors {
            assert!(config.insights.churn_factors.contains(f), "unknown factor {f}");
        }
        assert!(config.insights.churn_recommendations.contains(&p.recommendation));
        assert!(config.insights.confidence.contains(p.confidence));
    }
}

#[test]
fn no_prediction_when_nobody_is_at_risk() {
    let config = GeneratorConfig::builtin();
    let customers: Vec<_> = (0..10)
        .map(|i| customer(&format!("c{i}"), Segment::Regular, 0.4))
        .collect();
    let mut rng = SampleRng::new(2, 0);
    assert!(insight::churn_predictions(&config.insights, &customers, &mut rng).is_empty());
}

#[test]
fn ltv_predictions_use_segment_growth() {
    let config = GeneratorConfig::builtin();
    let mut high = customer("high", Segment::HighValue, 0.1);
    high.lifetime_value = 50_000.0;
    let mut lapsed = customer("lapsed", Segment::Churned, 0.9);
    lapsed.lifetime_value = 1_000.0;
    let mut rng = SampleRng::new(3, 0);
    let preds = insight::ltv_predictions(&config, &[lapsed, high], &mut rng);

    assert_eq!(preds[0].customer_id, "high", "ordered by current LTV");
    assert!(preds[0].predicted_ltv > preds[0].current_ltv);
    assert!(preds[1].predicted_ltv < preds[1].current_ltv);
    assert!(preds.iter().all(|p| p.horizon_months == config.insights.ltv_horizon_months));
}

#[test]
fn one_recommendation_per_populated_segment() {
    let config = GeneratorConfig::builtin();
    let customers = vec![
        customer("a", Segment::AtRisk, 0.7),
        customer("b", Segment::AtRisk, 0.65),
        customer("c", Segment::Regular, 0.3),
    ];
    let mut rng = SampleRng::new(4, 0);
    let recs = insight::recommendations(&config.insights, &customers, &mut rng);

    assert_eq!(recs.len(), 2);
    let retention = recs
        .iter()
        .find(|r| r.kind == RecommendationKind::Retention)
        .expect("at-risk recommendation");
    assert_eq!(retention.target_customers, 2);
    assert!(retention.expected_impact > 0.0);
    assert!(recs.iter().all(|r| r.kind != RecommendationKind::VipUpgrade));
}

#[test]
fn risk_assessment_flags_withdrawals_exceeding_deposits() {
    let config = GeneratorConfig::builtin();
    let mut odd = customer("odd", Segment::Regular, 0.3);
    odd.total_deposits = 1_000.0;
    odd.total_withdrawals = 4_000.0;
    odd.total_losses = 100.0;
    let mut heavy = customer("heavy", Segment::AtRisk, 0.75);
    heavy.total_deposits = 1_000.0;
    heavy.total_losses = 950.0;
    let calm = customer("calm", Segment::Regular, 0.3);

    let assessed = insight::risk_assessments(&config.insights, &[odd, heavy, calm]);
    assert_eq!(assessed.len(), 2, "calm customer carries no flags");

    let heavy = assessed.iter().find(|a| a.customer_id == "heavy").expect("heavy flagged");
    assert_eq!(heavy.flags, vec![RiskFlag::HighLossRatio, RiskFlag::HighChurnScore]);
    let odd = assessed.iter().find(|a| a.customer_id == "odd").expect("odd flagged");
    assert_eq!(odd.flags, vec![RiskFlag::WithdrawalsExceedDeposits]);
    assert!(heavy.score > odd.score);
    assert_eq!(assessed[0].customer_id, "heavy");
}

#[test]
fn empty_population_yields_empty_insights() {
    let mut synth = Synthesizer::with_defaults(5, common::fixed_now());
    let insights = synth.generate_ai_insights(&[]);
    assert!(insights.churn_predictions.is_empty());
    assert!(insights.ltv_predictions.is_empty());
    assert!(insights.recommendations.is_empty());
    assert!(insights.risk_assessments.is_empty());
}
