use crate::{
    config::{GeneratorConfig, SegmentProfile},
    ids,
    name_generator::NameGenerator,
    rng::RandomSource,
    sampler,
    types::{round_cents, EntityId, Money},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How far back registration dates reach.
pub const MAX_TENURE_DAYS: f64 = 1_095.0;
/// Youngest possible account.
pub const MIN_TENURE_DAYS: f64 = 30.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Segment {
    HighValue,
    Regular,
    AtRisk,
    Churned,
}

impl Segment {
    pub const ALL: [Segment; 4] = [Self::HighValue, Self::Regular, Self::AtRisk, Self::Churned];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighValue => "high-value",
            Self::Regular => "regular",
            Self::AtRisk => "at-risk",
            Self::Churned => "churned",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|seg| seg.as_str() == s)
            .ok_or_else(|| format!("unknown segment '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum VipLevel {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl VipLevel {
    pub const ALL: [VipLevel; 5] = [
        Self::Bronze,
        Self::Silver,
        Self::Gold,
        Self::Platinum,
        Self::Diamond,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
            Self::Diamond => "diamond",
        }
    }
}

impl FromStr for VipLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lvl| lvl.as_str() == s)
            .ok_or_else(|| format!("unknown vip level '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Consent {
    pub email: bool,
    pub sms: bool,
    pub push: bool,
}

/// A generated player record.
///
/// Financial fields are drawn independently; nothing ties
/// `total_withdrawals` to `total_deposits`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub registered_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
    pub segment: Segment,
    pub vip_level: Option<VipLevel>,
    pub lifetime_value: Money,
    pub total_deposits: Money,
    pub total_withdrawals: Money,
    pub total_bets: Money,
    pub total_wins: Money,
    pub total_losses: Money,
    pub churn_score: f64,
    pub favorite_game: String,
    pub consent: Consent,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_vip(&self) -> bool {
        self.vip_level.is_some()
    }

    /// Whether `churn_score` still sits in its segment's band.
    /// Nothing re-checks this after a record is mutated.
    pub fn churn_band_holds(&self, config: &GeneratorConfig) -> bool {
        (0.0..=1.0).contains(&self.churn_score)
            && config
                .segment(self.segment)
                .map(|p| p.churn_score.contains(self.churn_score))
                .unwrap_or(true)
    }

    pub fn is_active(&self, now: DateTime<Utc>, window_days: u32) -> bool {
        (now - self.last_login_at).num_days() < i64::from(window_days)
    }
}

/// Generate exactly `count` customers.
pub fn generate_customers<R: RandomSource + ?Sized>(
    config: &GeneratorConfig,
    count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Customer> {
    let mut customers = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(profile) = pick_segment(config, rng) else {
            log::warn!("customer: no segments configured, nothing generated");
            return customers;
        };
        customers.push(generate_customer(config, profile, now, rng));
    }
    log::debug!("customer: generated {count} customers");
    customers
}

/// One customer in the given segment.
pub fn generate_customer<R: RandomSource + ?Sized>(
    config: &GeneratorConfig,
    profile: &SegmentProfile,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Customer {
    let identity = NameGenerator::generate_identity(&config.email_domains, rng);
    let country = sampler::pick(&config.countries, rng)
        .cloned()
        .unwrap_or_else(|| "GB".into());

    let registered_at = sampler::days_ago(now, MIN_TENURE_DAYS, MAX_TENURE_DAYS, rng);
    let last_login_at = sampler::days_ago(
        now,
        profile.last_login_days.min,
        profile.last_login_days.max,
        rng,
    )
    .max(registered_at);

    let vip_level = if rng.chance(profile.vip_probability) {
        sampler::weighted_pair(&profile.vip_level_weights, rng).copied()
    } else {
        None
    };

    let favorite_game = sampler::pick(&config.games, rng)
        .map(|g| g.name.clone())
        .unwrap_or_default();

    // Each field independently from the segment range.
    let lifetime_value = round_cents(profile.lifetime_value.sample(rng));
    let total_deposits = round_cents(profile.total_deposits.sample(rng));
    let total_withdrawals = round_cents(profile.total_withdrawals.sample(rng));
    let total_bets = round_cents(profile.total_bets.sample(rng));
    let total_wins = round_cents(profile.total_wins.sample(rng));
    let total_losses = round_cents(profile.total_losses.sample(rng));
    let churn_score = (profile.churn_score.sample(rng) * 1_000.0).round() / 1_000.0;

    let consent = Consent {
        email: rng.chance(0.70),
        sms: rng.chance(0.45),
        push: rng.chance(0.55),
    };

    Customer {
        id: ids::entity_id("cus", rng),
        first_name: identity.first_name.to_string(),
        last_name: identity.last_name.to_string(),
        email: identity.email,
        phone: identity.phone,
        country,
        registered_at,
        last_login_at,
        segment: profile.segment,
        vip_level,
        lifetime_value,
        total_deposits,
        total_withdrawals,
        total_bets,
        total_wins,
        total_losses,
        churn_score,
        favorite_game,
        consent,
    }
}

/// Cumulative thresholds on a single uniform draw, in config order.
/// Rolls past the last band land in the last segment.
pub fn pick_segment<'a, R: RandomSource + ?Sized>(
    config: &'a GeneratorConfig,
    rng: &mut R,
) -> Option<&'a SegmentProfile> {
    let roll = rng.next_f64();
    let mut cumulative = 0.0;
    for seg in &config.segments {
        cumulative += seg.population_share;
        if roll < cumulative {
            return Some(seg);
        }
    }
    config.segments.last()
}
