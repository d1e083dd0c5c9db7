use crate::{
    campaign::{CampaignChannel, CampaignStatus},
    customer::{Segment, VipLevel},
    error::{SynthError, SynthResult},
    game::GameCategory,
    rng::RandomSource,
    sampler,
    transaction::{TransactionKind, TransactionStatus},
};
use serde::{Deserialize, Serialize};

/// Inclusive-exclusive `[min, max)` range a field is drawn from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> f64 {
        sampler::uniform(self.min, self.max, rng)
    }

    /// Closed check; rounding can land a draw exactly on `max`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentProfile {
    pub segment: Segment,
    pub population_share: f64,
    pub churn_score: ValueRange,
    pub lifetime_value: ValueRange,
    pub total_deposits: ValueRange,
    pub total_withdrawals: ValueRange,
    pub total_bets: ValueRange,
    pub total_wins: ValueRange,
    pub total_losses: ValueRange,
    pub vip_probability: f64,
    pub vip_level_weights: Vec<(VipLevel, f64)>,
    /// Days since last login.
    pub last_login_days: ValueRange,
    /// Multiplier range for the LTV prediction panel.
    pub ltv_growth: ValueRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameProfile {
    pub game_id: String,
    pub name: String,
    pub category: GameCategory,
    pub players: ValueRange,
    pub bets_per_player: ValueRange,
    pub rtp: ValueRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindAmounts {
    pub deposit: ValueRange,
    pub withdrawal: ValueRange,
    pub bet: ValueRange,
    pub win: ValueRange,
    pub bonus: ValueRange,
}

impl KindAmounts {
    pub fn for_kind(&self, kind: TransactionKind) -> ValueRange {
        match kind {
            TransactionKind::Deposit => self.deposit,
            TransactionKind::Withdrawal => self.withdrawal,
            TransactionKind::Bet => self.bet,
            TransactionKind::Win => self.win,
            TransactionKind::Bonus => self.bonus,
        }
    }

    fn all(&self) -> [ValueRange; 5] {
        [self.deposit, self.withdrawal, self.bet, self.win, self.bonus]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionProfile {
    pub kind_weights: Vec<(TransactionKind, f64)>,
    pub status_weights: Vec<(TransactionStatus, f64)>,
    pub amounts: KindAmounts,
    /// How far back transaction timestamps reach.
    pub history_days: u32,
    /// Probability a bet/win lands on the customer's favourite game.
    pub favorite_game_bias: f64,
    pub payment_methods: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelCosts {
    pub email: ValueRange,
    pub sms: ValueRange,
    pub push: ValueRange,
    pub social: ValueRange,
}

impl ChannelCosts {
    pub fn for_channel(&self, channel: CampaignChannel) -> ValueRange {
        match channel {
            CampaignChannel::Email => self.email,
            CampaignChannel::Sms => self.sms,
            CampaignChannel::Push => self.push,
            CampaignChannel::Social => self.social,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignProfile {
    pub status_weights: Vec<(CampaignStatus, f64)>,
    pub sent: ValueRange,
    pub open_fraction: ValueRange,
    pub click_fraction: ValueRange,
    pub conversion_fraction: ValueRange,
    pub order_value: ValueRange,
    pub setup_cost: ValueRange,
    pub cost_per_send: ChannelCosts,
    pub duration_days: ValueRange,
    /// How far back campaign start dates reach.
    pub start_window_days: u32,
    pub themes: Vec<String>,
}

impl CampaignProfile {
    fn ranges(&self) -> [ValueRange; 11] {
        let costs = &self.cost_per_send;
        [
            self.sent,
            self.open_fraction,
            self.click_fraction,
            self.conversion_fraction,
            self.order_value,
            self.setup_cost,
            self.duration_days,
            costs.email,
            costs.sms,
            costs.push,
            costs.social,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightProfile {
    /// Customers strictly above this score get a churn prediction.
    pub churn_threshold: f64,
    /// Cap on each insight list.
    pub max_records: usize,
    pub churn_factors: Vec<String>,
    pub churn_recommendations: Vec<String>,
    pub confidence: ValueRange,
    pub ltv_horizon_months: u32,
    pub impact_uplift: ValueRange,
    /// Losses / deposits above this ratio raise a risk flag.
    pub loss_ratio_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotteryProfile {
    pub name: String,
    pub pool_size: u32,
    pub picks: u32,
    pub bonus_pool_size: u32,
    pub bonus_picks: u32,
    pub draw_interval_days: u32,
    pub jackpot: ValueRange,
    pub tickets_sold: ValueRange,
    pub prize_tiers: u32,
    pub jackpot_hit_probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueProfile {
    pub base_deposits: f64,
    pub withdrawal_ratio: ValueRange,
    /// GGR as a share of deposits.
    pub ggr_margin: ValueRange,
    /// Bonus cost as a share of GGR.
    pub bonus_ratio: ValueRange,
    pub weekend_uplift: f64,
    pub daily_growth: f64,
    /// Symmetric multiplicative noise, e.g. 0.1 = ±10%.
    pub noise: f64,
    pub base_active_players: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetSizes {
    pub customers: usize,
    pub transactions: usize,
    pub campaigns: usize,
    pub lottery_draws: usize,
    pub revenue_days: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Ordered: segment bands are cumulative thresholds in this order.
    pub segments: Vec<SegmentProfile>,
    pub games: Vec<GameProfile>,
    pub transactions: TransactionProfile,
    pub campaigns: CampaignProfile,
    pub insights: InsightProfile,
    pub lotteries: Vec<LotteryProfile>,
    pub revenue: RevenueProfile,
    pub fixture: DatasetSizes,
    pub enhanced: DatasetSizes,
    pub countries: Vec<String>,
    pub email_domains: Vec<String>,
    /// Login recency that counts a customer as active.
    pub active_window_days: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl GeneratorConfig {
    /// Load from a JSON file with the same shape as `builtin()`.
    pub fn load(path: &str) -> SynthResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GeneratorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::info!("loaded generator config from {path}");
        Ok(config)
    }

    pub fn segment(&self, segment: Segment) -> Option<&SegmentProfile> {
        self.segments.iter().find(|s| s.segment == segment)
    }

    pub fn game(&self, name: &str) -> Option<&GameProfile> {
        self.games.iter().find(|g| g.name == name)
    }

    /// Reject configs the generators cannot draw from.
    pub fn validate(&self) -> SynthResult<()> {
        fn invalid(reason: impl Into<String>) -> SynthError {
            SynthError::InvalidConfig { reason: reason.into() }
        }

        if self.segments.is_empty() {
            return Err(invalid("no segments configured"));
        }
        if let Some(seg) = self.segments.iter().find(|s| s.population_share < 0.0) {
            return Err(invalid(format!(
                "negative population share in segment {}",
                seg.segment.as_str()
            )));
        }
        let share: f64 = self.segments.iter().map(|s| s.population_share).sum();
        if share > 1.0 + 1e-9 {
            return Err(invalid(format!("segment shares sum to {share:.4} > 1")));
        }
        for seg in &self.segments {
            let ranges = [
                seg.churn_score,
                seg.lifetime_value,
                seg.total_deposits,
                seg.total_withdrawals,
                seg.total_bets,
                seg.total_wins,
                seg.total_losses,
                seg.last_login_days,
                seg.ltv_growth,
            ];
            if ranges.iter().any(|r| !r.is_ordered()) {
                return Err(invalid(format!("inverted range in segment {}", seg.segment.as_str())));
            }
            if seg.churn_score.min < 0.0 || seg.churn_score.max > 1.0 {
                return Err(invalid(format!(
                    "churn band outside [0,1] in segment {}",
                    seg.segment.as_str()
                )));
            }
        }
        if share < 1.0 - 1e-9 {
            log::warn!("segment shares sum to {share:.4}; remainder falls to the last segment");
        }
        if self.games.is_empty() {
            return Err(invalid("game catalog is empty"));
        }
        if let Some(game) = self
            .games
            .iter()
            .find(|g| [g.players, g.bets_per_player, g.rtp].iter().any(|r| !r.is_ordered()))
        {
            return Err(invalid(format!("inverted range for game {}", game.name)));
        }
        if self.transactions.amounts.all().iter().any(|r| !r.is_ordered()) {
            return Err(invalid("inverted transaction amount range"));
        }
        if self.transactions.kind_weights.is_empty() || self.transactions.status_weights.is_empty() {
            return Err(invalid("transaction weight tables are empty"));
        }
        if self.campaigns.status_weights.is_empty() || self.campaigns.themes.is_empty() {
            return Err(invalid("campaign tables are empty"));
        }
        if self.campaigns.ranges().iter().any(|r| !r.is_ordered()) {
            return Err(invalid("inverted range in campaign profile"));
        }
        if self.campaigns.setup_cost.min <= 0.0 {
            return Err(invalid("campaign setup cost must be positive"));
        }
        if self.insights.churn_factors.is_empty() || self.insights.churn_recommendations.is_empty() {
            return Err(invalid("insight catalogs are empty"));
        }
        if !self.insights.confidence.is_ordered() || !self.insights.impact_uplift.is_ordered() {
            return Err(invalid("inverted range in insight profile"));
        }
        for lottery in &self.lotteries {
            if lottery.picks == 0
                || lottery.picks > lottery.pool_size
                || lottery.bonus_picks > lottery.bonus_pool_size
            {
                return Err(invalid(format!("lottery {} picks exceed its pool", lottery.name)));
            }
            if !lottery.jackpot.is_ordered() || !lottery.tickets_sold.is_ordered() {
                return Err(invalid(format!("inverted range for lottery {}", lottery.name)));
            }
        }
        let revenue = &self.revenue;
        if [revenue.withdrawal_ratio, revenue.ggr_margin, revenue.bonus_ratio]
            .iter()
            .any(|r| !r.is_ordered())
        {
            return Err(invalid("inverted range in revenue profile"));
        }
        if self.countries.is_empty() || self.email_domains.is_empty() {
            return Err(invalid("contact catalogs are empty"));
        }
        Ok(())
    }

    /// Hardcoded defaults. `data/generator_config.json` mirrors these.
    pub fn builtin() -> Self {
        use CampaignStatus as CS;
        use TransactionKind as TK;
        use TransactionStatus as TS;
        use VipLevel::*;

        let r = ValueRange::new;

        let segments = vec![
            SegmentProfile {
                segment: Segment::Churned,
                population_share: 0.05,
                churn_score: r(0.8, 1.0),
                lifetime_value: r(50.0, 2_000.0),
                total_deposits: r(100.0, 3_000.0),
                total_withdrawals: r(0.0, 1_500.0),
                total_bets: r(200.0, 8_000.0),
                total_wins: r(100.0, 6_000.0),
                total_losses: r(100.0, 3_000.0),
                vip_probability: 0.02,
                vip_level_weights: vec![(Bronze, 80.0), (Silver, 20.0)],
                last_login_days: r(60.0, 365.0),
                ltv_growth: r(0.2, 0.5),
            },
            SegmentProfile {
                segment: Segment::AtRisk,
                population_share: 0.15,
                churn_score: r(0.6, 0.8),
                lifetime_value: r(200.0, 5_000.0),
                total_deposits: r(500.0, 8_000.0),
                total_withdrawals: r(100.0, 4_000.0),
                total_bets: r(1_000.0, 20_000.0),
                total_wins: r(500.0, 15_000.0),
                total_losses: r(300.0, 6_000.0),
                vip_probability: 0.10,
                vip_level_weights: vec![(Bronze, 60.0), (Silver, 30.0), (Gold, 10.0)],
                last_login_days: r(14.0, 60.0),
                ltv_growth: r(0.6, 0.9),
            },
            SegmentProfile {
                segment: Segment::HighValue,
                population_share: 0.08,
                churn_score: r(0.0, 0.3),
                lifetime_value: r(10_000.0, 100_000.0),
                total_deposits: r(15_000.0, 150_000.0),
                total_withdrawals: r(5_000.0, 80_000.0),
                total_bets: r(50_000.0, 500_000.0),
                total_wins: r(30_000.0, 400_000.0),
                total_losses: r(5_000.0, 60_000.0),
                vip_probability: 0.90,
                vip_level_weights: vec![(Silver, 20.0), (Gold, 40.0), (Platinum, 30.0), (Diamond, 10.0)],
                last_login_days: r(0.0, 7.0),
                ltv_growth: r(1.1, 1.5),
            },
            SegmentProfile {
                segment: Segment::Regular,
                population_share: 0.72,
                churn_score: r(0.2, 0.6),
                lifetime_value: r(500.0, 10_000.0),
                total_deposits: r(1_000.0, 15_000.0),
                total_withdrawals: r(200.0, 8_000.0),
                total_bets: r(2_000.0, 50_000.0),
                total_wins: r(1_000.0, 40_000.0),
                total_losses: r(500.0, 10_000.0),
                vip_probability: 0.05,
                vip_level_weights: vec![(Bronze, 70.0), (Silver, 25.0), (Gold, 5.0)],
                last_login_days: r(0.0, 14.0),
                ltv_growth: r(1.0, 1.3),
            },
        ];

        let game = |id: &str, name: &str, category, players, bets, rtp| GameProfile {
            game_id: id.into(),
            name: name.into(),
            category,
            players,
            bets_per_player: bets,
            rtp,
        };
        let games = vec![
            game("mega-fortune", "Mega Fortune", GameCategory::Slots, r(800.0, 4_000.0), r(50.0, 400.0), r(0.94, 0.97)),
            game("starburst", "Starburst", GameCategory::Slots, r(1_500.0, 6_000.0), r(30.0, 250.0), r(0.95, 0.97)),
            game("book-of-dead", "Book of Dead", GameCategory::Slots, r(1_000.0, 5_000.0), r(40.0, 300.0), r(0.94, 0.965)),
            game("lightning-roulette", "Lightning Roulette", GameCategory::LiveCasino, r(600.0, 3_000.0), r(100.0, 800.0), r(0.95, 0.973)),
            game("live-blackjack", "Live Blackjack", GameCategory::LiveCasino, r(400.0, 2_500.0), r(150.0, 1_200.0), r(0.97, 0.995)),
            game("texas-holdem", "Texas Hold'em", GameCategory::Poker, r(300.0, 1_800.0), r(80.0, 900.0), r(0.95, 0.98)),
            game("football-betting", "Football Betting", GameCategory::Sports, r(2_000.0, 9_000.0), r(40.0, 350.0), r(0.90, 0.95)),
            game("euro-jackpot", "EuroJackpot", GameCategory::Lottery, r(3_000.0, 12_000.0), r(5.0, 40.0), r(0.45, 0.55)),
            game("baccarat", "Baccarat", GameCategory::Table, r(200.0, 1_200.0), r(200.0, 1_500.0), r(0.98, 0.989)),
        ];

        Self {
            segments,
            games,
            transactions: TransactionProfile {
                kind_weights: vec![
                    (TK::Bet, 50.0),
                    (TK::Win, 25.0),
                    (TK::Deposit, 12.0),
                    (TK::Withdrawal, 8.0),
                    (TK::Bonus, 5.0),
                ],
                status_weights: vec![
                    (TS::Completed, 75.0),
                    (TS::Pending, 20.0),
                    (TS::Failed, 4.0),
                    (TS::Cancelled, 1.0),
                ],
                amounts: KindAmounts {
                    deposit: r(10.0, 2_000.0),
                    withdrawal: r(20.0, 5_000.0),
                    bet: r(1.0, 500.0),
                    win: r(2.0, 2_500.0),
                    bonus: r(5.0, 200.0),
                },
                history_days: 90,
                favorite_game_bias: 0.6,
                payment_methods: vec![
                    "card".into(),
                    "bank_transfer".into(),
                    "e_wallet".into(),
                    "crypto".into(),
                    "paysafecard".into(),
                ],
            },
            campaigns: CampaignProfile {
                status_weights: vec![
                    (CS::Draft, 10.0),
                    (CS::Active, 40.0),
                    (CS::Paused, 15.0),
                    (CS::Completed, 35.0),
                ],
                sent: r(1_000.0, 50_000.0),
                open_fraction: r(0.15, 0.45),
                click_fraction: r(0.05, 0.25),
                conversion_fraction: r(0.02, 0.20),
                order_value: r(20.0, 200.0),
                setup_cost: r(100.0, 1_000.0),
                cost_per_send: ChannelCosts {
                    email: r(0.005, 0.02),
                    sms: r(0.03, 0.08),
                    push: r(0.001, 0.005),
                    social: r(0.02, 0.10),
                },
                duration_days: r(7.0, 60.0),
                start_window_days: 120,
                themes: vec![
                    "Welcome Bonus".into(),
                    "Weekend Reload".into(),
                    "VIP Cashback".into(),
                    "Win-Back".into(),
                    "Free Spins Friday".into(),
                    "Champions League Boost".into(),
                    "Jackpot Alert".into(),
                    "Birthday Treat".into(),
                ],
            },
            insights: InsightProfile {
                churn_threshold: 0.6,
                max_records: 50,
                churn_factors: vec![
                    "Declining session frequency".into(),
                    "Reduced deposit amounts".into(),
                    "Long time since last login".into(),
                    "Increased withdrawal activity".into(),
                    "Extended losing streak".into(),
                    "Unresolved support ticket".into(),
                    "Bonus offers ignored".into(),
                    "Shift to lower stakes".into(),
                ],
                churn_recommendations: vec![
                    "Send personalised reload bonus".into(),
                    "Offer free spins on favourite game".into(),
                    "Assign VIP account manager".into(),
                    "Schedule retention call".into(),
                    "Enrol in loyalty challenge".into(),
                    "Send cashback on recent losses".into(),
                ],
                confidence: r(0.65, 0.95),
                ltv_horizon_months: 12,
                impact_uplift: r(0.03, 0.12),
                loss_ratio_threshold: 0.8,
            },
            lotteries: vec![
                LotteryProfile {
                    name: "EuroMillions".into(),
                    pool_size: 50,
                    picks: 5,
                    bonus_pool_size: 12,
                    bonus_picks: 2,
                    draw_interval_days: 3,
                    jackpot: r(17_000_000.0, 240_000_000.0),
                    tickets_sold: r(5_000_000.0, 40_000_000.0),
                    prize_tiers: 13,
                    jackpot_hit_probability: 0.12,
                },
                LotteryProfile {
                    name: "Lotto 6/49".into(),
                    pool_size: 49,
                    picks: 6,
                    bonus_pool_size: 10,
                    bonus_picks: 1,
                    draw_interval_days: 3,
                    jackpot: r(1_000_000.0, 20_000_000.0),
                    tickets_sold: r(1_000_000.0, 8_000_000.0),
                    prize_tiers: 9,
                    jackpot_hit_probability: 0.2,
                },
                LotteryProfile {
                    name: "Powerball".into(),
                    pool_size: 69,
                    picks: 5,
                    bonus_pool_size: 26,
                    bonus_picks: 1,
                    draw_interval_days: 2,
                    jackpot: r(20_000_000.0, 800_000_000.0),
                    tickets_sold: r(10_000_000.0, 90_000_000.0),
                    prize_tiers: 9,
                    jackpot_hit_probability: 0.05,
                },
            ],
            revenue: RevenueProfile {
                base_deposits: 250_000.0,
                withdrawal_ratio: r(0.55, 0.75),
                ggr_margin: r(0.25, 0.35),
                bonus_ratio: r(0.08, 0.15),
                weekend_uplift: 0.25,
                daily_growth: 0.002,
                noise: 0.10,
                base_active_players: 12_000.0,
            },
            fixture: DatasetSizes {
                customers: 50,
                transactions: 500,
                campaigns: 12,
                lottery_draws: 12,
                revenue_days: 30,
            },
            enhanced: DatasetSizes {
                customers: 25_000,
                transactions: 500_000,
                campaigns: 200,
                lottery_draws: 104,
                revenue_days: 365,
            },
            countries: vec![
                "GB".into(),
                "IE".into(),
                "DE".into(),
                "SE".into(),
                "FI".into(),
                "NL".into(),
                "MT".into(),
                "CA".into(),
            ],
            email_domains: vec![
                "gmail.com".into(),
                "outlook.com".into(),
                "yahoo.com".into(),
                "icloud.com".into(),
                "proton.me".into(),
            ],
            active_window_days: 30,
        }
    }
}
