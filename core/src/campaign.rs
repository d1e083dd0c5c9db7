use crate::{
    config::GeneratorConfig,
    customer::Segment,
    ids,
    rng::RandomSource,
    sampler,
    types::{round_cents, EntityId, Money},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CampaignChannel {
    Email,
    Sms,
    Push,
    Social,
}

impl CampaignChannel {
    pub const ALL: [CampaignChannel; 4] = [Self::Email, Self::Sms, Self::Push, Self::Social];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Push => "push",
            Self::Social => "social",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Sms => "SMS",
            Self::Push => "Push",
            Self::Social => "Social",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

/// Funnel counters. `sent >= opened >= clicked >= converted` holds by
/// construction; there is no runtime check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Funnel {
    pub sent: u64,
    pub opened: u64,
    pub clicked: u64,
    pub converted: u64,
}

impl Funnel {
    pub fn is_monotone(&self) -> bool {
        self.sent >= self.opened && self.opened >= self.clicked && self.clicked >= self.converted
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub id: EntityId,
    pub name: String,
    pub channel: CampaignChannel,
    pub status: CampaignStatus,
    pub target_segment: Segment,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub funnel: Funnel,
    pub revenue: Money,
    pub cost: Money,
    /// Percent; always `derived_roi()` of the stored revenue and cost.
    pub roi: f64,
}

impl Campaign {
    pub fn derived_roi(&self) -> f64 {
        roi(self.revenue, self.cost)
    }

    pub fn open_rate(&self) -> f64 {
        ratio(self.funnel.opened, self.funnel.sent)
    }

    pub fn click_rate(&self) -> f64 {
        ratio(self.funnel.clicked, self.funnel.opened)
    }

    pub fn conversion_rate(&self) -> f64 {
        ratio(self.funnel.converted, self.funnel.clicked)
    }
}

/// `(revenue - cost) / cost * 100`. Cost is positive for every
/// generated campaign.
pub fn roi(revenue: Money, cost: Money) -> f64 {
    (revenue - cost) / cost * 100.0
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Floor of `fraction` of `of`; never exceeds `of`.
fn fraction_of(of: u64, fraction: f64) -> u64 {
    ((of as f64 * fraction).floor() as u64).min(of)
}

pub fn generate_campaigns<R: RandomSource + ?Sized>(
    config: &GeneratorConfig,
    count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Campaign> {
    let profile = &config.campaigns;
    let mut campaigns = Vec::with_capacity(count);

    for _ in 0..count {
        let channel = sampler::pick(&CampaignChannel::ALL, rng)
            .copied()
            .unwrap_or(CampaignChannel::Email);
        let status = sampler::weighted_pair(&profile.status_weights, rng)
            .copied()
            .unwrap_or(CampaignStatus::Draft);
        let target_segment = sampler::pick(&Segment::ALL, rng)
            .copied()
            .unwrap_or(Segment::Regular);
        let theme = sampler::pick(&profile.themes, rng)
            .map(String::as_str)
            .unwrap_or("Campaign");

        let start_date = sampler::days_ago(now, 0.0, f64::from(profile.start_window_days), rng);
        let duration = profile.duration_days.sample(rng);
        let end_date = start_date + Duration::seconds((duration * 86_400.0) as i64);

        // Drafts have not sent anything yet.
        let funnel = if status == CampaignStatus::Draft {
            Funnel::default()
        } else {
            let sent = profile.sent.sample(rng).floor() as u64;
            let opened = fraction_of(sent, profile.open_fraction.sample(rng));
            let clicked = fraction_of(opened, profile.click_fraction.sample(rng));
            let converted = fraction_of(clicked, profile.conversion_fraction.sample(rng));
            Funnel {
                sent,
                opened,
                clicked,
                converted,
            }
        };

        let per_send = profile.cost_per_send.for_channel(channel).sample(rng);
        let cost = round_cents(profile.setup_cost.sample(rng) + funnel.sent as f64 * per_send);
        let revenue = round_cents(funnel.converted as f64 * profile.order_value.sample(rng));

        campaigns.push(Campaign {
            id: ids::entity_id("cmp", rng),
            name: format!("{theme} ({})", channel.label()),
            channel,
            status,
            target_segment,
            start_date,
            end_date,
            funnel,
            revenue,
            cost,
            roi: roi(revenue, cost),
        });
    }

    log::debug!("campaign: generated {count} campaigns");
    campaigns
}
