use serde::Serialize;

use super::money::{round_won, safe_amount};

/// Tier boundaries in won, from a national household-wealth survey.
const DIAMOND_FLOOR: f64 = 3_000_000_000.0;
const GOLD_FLOOR: f64 = 1_000_000_000.0;

/// Percentile-band boundaries for the piecewise mapping, in won.
const BAND_300M: f64 = 300_000_000.0;
const BAND_100M: f64 = 100_000_000.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Gold,
    Diamond,
}

impl Tier {
    /// Headline "top N%" attached to each tier label.
    pub fn percent(self) -> f64 {
        match self {
            Tier::Diamond => 1.0,
            Tier::Gold => 10.0,
            Tier::Bronze => 65.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NetWorthInputs {
    pub financial_assets: f64,
    pub real_estate: f64,
    pub rent_deposit: f64,
    pub other_assets: f64,
    pub loans: f64,
    pub tenant_deposit: f64,
    /// Monthly savings assumed for the next-tier roadmap.
    pub monthly_savings: f64,
    /// Annual growth assumption for the roadmap, in percent.
    pub annual_rate_percent: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextTier {
    pub tier: Tier,
    pub target: i64,
    pub amount_needed: i64,
    /// None when the savings and growth assumptions can never close the gap.
    pub months_to_reach: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthResult {
    pub net_worth: i64,
    pub total_assets: i64,
    pub total_liabilities: i64,
    /// Estimated "top N%" population percentile.
    pub percentile: f64,
    pub tier: Tier,
    pub tier_percent: f64,
    /// None at the top tier.
    pub next_tier: Option<NextTier>,
}

fn tier_for(net_worth: f64) -> Tier {
    if net_worth >= DIAMOND_FLOOR {
        Tier::Diamond
    } else if net_worth >= GOLD_FLOOR {
        Tier::Gold
    } else {
        Tier::Bronze
    }
}

/// Piecewise-linear interpolation from net worth to an estimated population
/// percentile, five bands with survey-derived slopes. Indebted households
/// land at a flat 98.
fn percentile_for(v: f64) -> f64 {
    if v >= DIAMOND_FLOOR {
        (1.0 - (v - DIAMOND_FLOOR) / 10_000_000_000.0).max(0.1)
    } else if v >= GOLD_FLOOR {
        1.0 + 9.0 * (DIAMOND_FLOOR - v) / 2_000_000_000.0
    } else if v >= BAND_300M {
        10.0 + 30.0 * (GOLD_FLOOR - v) / 700_000_000.0
    } else if v >= BAND_100M {
        40.0 + 25.0 * (BAND_300M - v) / 200_000_000.0
    } else if v >= 0.0 {
        65.0 + 30.0 * (BAND_100M - v) / 100_000_000.0
    } else {
        98.0
    }
}

/// Future-value-of-annuity inversion: months until monthly savings `p`
/// growing at monthly rate `r` lift `present` to `target`. None when the
/// growth can never overcome the gap.
fn months_to_target(present: f64, target: f64, p: f64, r: f64) -> Option<u32> {
    if r <= 0.0 {
        if p <= 0.0 {
            return None;
        }
        let months = (target - present) / p;
        return months.is_finite().then(|| months.max(0.0).ceil() as u32);
    }

    let numer = target + p / r;
    let denom = present + p / r;
    if denom <= 0.0 {
        return None;
    }
    let months = (numer / denom).ln() / (1.0 + r).ln();
    if !months.is_finite() {
        return None;
    }
    Some(months.max(0.0).ceil() as u32)
}

/// Map a household balance sheet to a net-worth percentile, a tier label, and
/// a closed-form roadmap to the next tier.
pub fn run_networth(inputs: &NetWorthInputs) -> NetWorthResult {
    let total_assets = safe_amount(inputs.financial_assets)
        + safe_amount(inputs.real_estate)
        + safe_amount(inputs.rent_deposit)
        + safe_amount(inputs.other_assets);
    let total_liabilities = safe_amount(inputs.loans) + safe_amount(inputs.tenant_deposit);
    let net_worth = total_assets - total_liabilities;

    let tier = tier_for(net_worth);
    let percentile = percentile_for(net_worth);

    let next_tier = match tier {
        Tier::Diamond => None,
        Tier::Gold | Tier::Bronze => {
            let (next, target) = if net_worth < GOLD_FLOOR {
                (Tier::Gold, GOLD_FLOOR)
            } else {
                (Tier::Diamond, DIAMOND_FLOOR)
            };
            let monthly_rate = inputs.annual_rate_percent / 100.0 / 12.0;
            Some(NextTier {
                tier: next,
                target: round_won(target),
                amount_needed: round_won(target - net_worth),
                months_to_reach: months_to_target(
                    net_worth,
                    target,
                    safe_amount(inputs.monthly_savings),
                    monthly_rate,
                ),
            })
        }
    };

    NetWorthResult {
        net_worth: round_won(net_worth),
        total_assets: round_won(total_assets),
        total_liabilities: round_won(total_liabilities),
        percentile,
        tier,
        tier_percent: tier.percent(),
        next_tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(net_worth: f64) -> NetWorthInputs {
        NetWorthInputs {
            financial_assets: net_worth,
            real_estate: 0.0,
            rent_deposit: 0.0,
            other_assets: 0.0,
            loans: 0.0,
            tenant_deposit: 0.0,
            monthly_savings: 3_000_000.0,
            annual_rate_percent: 5.0,
        }
    }

    #[test]
    fn nets_assets_against_liabilities() {
        let result = run_networth(&NetWorthInputs {
            financial_assets: 50_000_000.0,
            real_estate: 300_000_000.0,
            rent_deposit: 100_000_000.0,
            other_assets: 50_000_000.0,
            loans: 120_000_000.0,
            tenant_deposit: 80_000_000.0,
            monthly_savings: 0.0,
            annual_rate_percent: 5.0,
        });
        assert_eq!(result.total_assets, 500_000_000);
        assert_eq!(result.total_liabilities, 200_000_000);
        assert_eq!(result.net_worth, 300_000_000);
    }

    #[test]
    fn percentile_band_boundaries_interpolate_continuously() {
        assert_eq!(percentile_for(DIAMOND_FLOOR), 1.0);
        assert_eq!(percentile_for(GOLD_FLOOR), 10.0);
        assert_eq!(percentile_for(BAND_300M), 40.0);
        assert_eq!(percentile_for(BAND_100M), 65.0);
        assert_eq!(percentile_for(0.0), 95.0);
        assert_eq!(percentile_for(-1.0), 98.0);
    }

    #[test]
    fn percentile_has_a_floor_above_the_top_band() {
        assert!(percentile_for(50_000_000_000.0) >= 0.1);
    }

    #[test]
    fn tier_labels_follow_the_thresholds() {
        assert_eq!(run_networth(&inputs(3_000_000_000.0)).tier, Tier::Diamond);
        assert_eq!(run_networth(&inputs(1_000_000_000.0)).tier, Tier::Gold);
        assert_eq!(run_networth(&inputs(999_999_999.0)).tier, Tier::Bronze);
        assert_eq!(run_networth(&inputs(0.0)).tier, Tier::Bronze);
    }

    #[test]
    fn top_tier_has_no_next_goal() {
        let result = run_networth(&inputs(5_000_000_000.0));
        assert!(result.next_tier.is_none());
    }

    #[test]
    fn bronze_targets_gold_and_gold_targets_diamond() {
        let bronze = run_networth(&inputs(200_000_000.0));
        let next = bronze.next_tier.expect("bronze has a next tier");
        assert_eq!(next.tier, Tier::Gold);
        assert_eq!(next.target, 1_000_000_000);
        assert_eq!(next.amount_needed, 800_000_000);
        assert!(next.months_to_reach.is_some());

        let gold = run_networth(&inputs(1_500_000_000.0));
        let next = gold.next_tier.expect("gold has a next tier");
        assert_eq!(next.tier, Tier::Diamond);
    }

    #[test]
    fn roadmap_is_infeasible_without_savings_or_growth_headroom() {
        let mut stalled = inputs(200_000_000.0);
        stalled.monthly_savings = 0.0;
        stalled.annual_rate_percent = 0.0;
        let result = run_networth(&stalled);
        let next = result.next_tier.expect("bronze has a next tier");
        assert_eq!(next.months_to_reach, None);
    }

    #[test]
    fn roadmap_matches_the_annuity_inversion() {
        // 200M at 5%/yr plus 3M/month to reach 1B.
        let result = run_networth(&inputs(200_000_000.0));
        let months = result
            .next_tier
            .and_then(|n| n.months_to_reach)
            .expect("feasible roadmap");

        let r: f64 = 0.05 / 12.0;
        let expected = ((1_000_000_000.0 + 3_000_000.0 / r) / (200_000_000.0 + 3_000_000.0 / r))
            .ln()
            / (1.0 + r).ln();
        assert_eq!(months, expected.ceil() as u32);
    }

    #[test]
    fn growth_alone_can_carry_the_roadmap() {
        let mut no_savings = inputs(200_000_000.0);
        no_savings.monthly_savings = 0.0;
        let result = run_networth(&no_savings);
        let months = result
            .next_tier
            .and_then(|n| n.months_to_reach)
            .expect("compounding alone still reaches the target");
        // ceil(ln(5) / ln(1 + 0.05/12)) = 388 months.
        assert_eq!(months, 388);
    }
}
