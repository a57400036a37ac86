use serde::{Deserialize, Serialize};

use super::growth::monthly_step;
use super::money::{round_won, safe_amount};

/// Annual tax-free gain-harvesting allowance on directly held foreign stock.
const HARVEST_ALLOWANCE: f64 = 2_500_000.0;

/// Capital-gains rate on the unharvested gain at exit.
const CAPITAL_GAINS_RATE: f64 = 0.22;

/// Miscellaneous-income rate on total accumulated interest (early pension
/// withdrawal, no harvesting benefit).
const MISC_INCOME_RATE: f64 = 0.165;

/// Gift-tax exemption over a rolling 10-year window, by recipient age.
pub const GIFT_EXEMPTION_MINOR: f64 = 20_000_000.0;
pub const GIFT_EXEMPTION_ADULT: f64 = 50_000_000.0;
const ADULT_AGE: u32 = 19;

#[derive(Debug, Clone, Copy)]
pub struct KidsInputs {
    pub current_age: u32,
    pub target_age: u32,
    pub initial_amount: f64,
    pub monthly_amount: f64,
    pub rate_percent: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KidsPoint {
    pub age: u32,
    pub balance: i64,
    pub principal: i64,
    pub interest: i64,
    /// Liquidation value under annual gain harvesting plus capital-gains tax.
    pub after_tax_harvest: i64,
    /// Liquidation value under flat miscellaneous-income tax on all interest.
    pub after_tax_misc: i64,
    pub harvest_tax: i64,
    pub misc_tax: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KidsResult {
    pub yearly: Vec<KidsPoint>,
    pub final_balance: i64,
    pub final_after_tax_harvest: i64,
    pub final_after_tax_misc: i64,
    pub total_principal: i64,
    pub total_interest: i64,
    /// Advisory only: contributions over ten years versus the exemption tier.
    pub gift_limit_exceeded: bool,
    pub gift_exempt_limit: i64,
}

/// Project a minor's investment account with two exit-tax scenarios: annual
/// gain harvesting against a tax-free allowance (capital-gains exit) versus
/// flat miscellaneous-income tax on all interest. Both read the same pre-tax
/// balance each year.
pub fn run_kids(inputs: &KidsInputs) -> KidsResult {
    let initial = safe_amount(inputs.initial_amount);
    let monthly = safe_amount(inputs.monthly_amount);
    let monthly_rate = inputs.rate_percent / 100.0 / 12.0;
    let duration = inputs.target_age.saturating_sub(inputs.current_age);

    let mut balance = initial;
    let mut principal = initial;
    // Harvesting resets the taxable basis: each year the basis steps up by the
    // realized (tax-free) gain, in addition to tracking contributions.
    let mut cost_basis = initial;

    let mut yearly = Vec::with_capacity(duration as usize + 1);
    yearly.push(KidsPoint {
        age: inputs.current_age,
        balance: round_won(balance),
        principal: round_won(principal),
        interest: 0,
        after_tax_harvest: round_won(balance),
        after_tax_misc: round_won(balance),
        harvest_tax: 0,
        misc_tax: 0,
    });

    for year in 1..=duration {
        for _ in 0..12 {
            balance = monthly_step(balance, monthly, monthly_rate);
            principal += monthly;
            cost_basis += monthly;
        }

        let total_interest = balance - principal;

        // Realize up to the allowance and buy back, stepping up the basis.
        let unrealized = (balance - cost_basis).max(0.0);
        let harvested = unrealized.min(HARVEST_ALLOWANCE);
        cost_basis += harvested;

        let harvest_taxable = (balance - cost_basis).max(0.0);
        let harvest_tax = harvest_taxable * CAPITAL_GAINS_RATE;

        let misc_taxable = total_interest.max(0.0);
        let misc_tax = misc_taxable * MISC_INCOME_RATE;

        yearly.push(KidsPoint {
            age: inputs.current_age + year,
            balance: round_won(balance),
            principal: round_won(principal),
            interest: round_won(total_interest),
            after_tax_harvest: round_won(balance - harvest_tax),
            after_tax_misc: round_won(balance - misc_tax),
            harvest_tax: round_won(harvest_tax),
            misc_tax: round_won(misc_tax),
        });
    }

    let last = yearly[yearly.len() - 1];

    let ten_year_principal = initial + monthly * 12.0 * 10.0;
    let gift_exempt_limit = if inputs.current_age >= ADULT_AGE {
        GIFT_EXEMPTION_ADULT
    } else {
        GIFT_EXEMPTION_MINOR
    };

    KidsResult {
        final_balance: last.balance,
        final_after_tax_harvest: last.after_tax_harvest,
        final_after_tax_misc: last.after_tax_misc,
        total_principal: last.principal,
        total_interest: last.interest,
        gift_limit_exceeded: ten_year_principal > gift_exempt_limit,
        gift_exempt_limit: round_won(gift_exempt_limit),
        yearly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_inputs() -> KidsInputs {
        KidsInputs {
            current_age: 5,
            target_age: 20,
            initial_amount: 5_000_000.0,
            monthly_amount: 200_000.0,
            rate_percent: 7.0,
        }
    }

    #[test]
    fn target_age_at_or_below_current_emits_only_start_point() {
        let mut inputs = base_inputs();
        inputs.target_age = 5;
        let result = run_kids(&inputs);
        assert_eq!(result.yearly.len(), 1);
        assert_eq!(result.final_balance, 5_000_000);

        inputs.target_age = 3;
        assert_eq!(run_kids(&inputs).yearly.len(), 1);
    }

    #[test]
    fn harvesting_beats_or_matches_misc_income_taxation() {
        let result = run_kids(&base_inputs());
        for point in &result.yearly {
            assert!(point.after_tax_harvest >= point.after_tax_misc);
            assert!(point.harvest_tax <= point.misc_tax);
        }
    }

    #[test]
    fn small_gains_are_fully_sheltered_by_the_allowance() {
        // Gains stay under 2.5M a year, so harvesting wipes the basis gap and
        // the capital-gains exit owes nothing.
        let inputs = KidsInputs {
            current_age: 5,
            target_age: 10,
            initial_amount: 10_000_000.0,
            monthly_amount: 0.0,
            rate_percent: 3.0,
        };
        let result = run_kids(&inputs);
        for point in &result.yearly {
            assert_eq!(point.harvest_tax, 0);
        }
        assert!(result.final_after_tax_misc < result.final_balance);
    }

    #[test]
    fn zero_rate_means_no_tax_under_either_exit() {
        let mut inputs = base_inputs();
        inputs.rate_percent = 0.0;
        let result = run_kids(&inputs);
        for point in &result.yearly {
            assert_eq!(point.interest, 0);
            assert_eq!(point.harvest_tax, 0);
            assert_eq!(point.misc_tax, 0);
            assert_eq!(point.after_tax_harvest, point.balance);
        }
    }

    #[test]
    fn gift_limit_uses_minor_tier_below_adult_age() {
        // 5M + 200k * 120 = 29M > 20M minor exemption.
        let result = run_kids(&base_inputs());
        assert!(result.gift_limit_exceeded);
        assert_eq!(result.gift_exempt_limit, 20_000_000);
    }

    #[test]
    fn gift_limit_uses_adult_tier_from_nineteen() {
        let mut inputs = base_inputs();
        inputs.current_age = 19;
        inputs.target_age = 30;
        // 29M over ten years clears the 50M adult exemption.
        let result = run_kids(&inputs);
        assert!(!result.gift_limit_exceeded);
        assert_eq!(result.gift_exempt_limit, 50_000_000);
    }

    #[test]
    fn principal_tracks_contributions_monthly() {
        let result = run_kids(&base_inputs());
        let year3 = result.yearly[3];
        assert_eq!(year3.principal, 5_000_000 + 200_000 * 36);
    }
}
