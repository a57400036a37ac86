use serde::{Deserialize, Serialize};

use super::money::{round_won, safe_amount};

#[derive(Debug, Clone, Copy)]
pub struct GrowthInputs {
    pub initial_amount: f64,
    pub monthly_amount: f64,
    pub years: u32,
    pub rate_percent: f64,
}

/// One row per simulated year, year 0 included. Amounts are whole won.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPoint {
    pub year: u32,
    pub balance: i64,
    pub principal: i64,
    pub interest: i64,
    pub simple_balance: i64,
    pub simple_interest: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthResult {
    pub yearly: Vec<GrowthPoint>,
    pub total_balance: i64,
    pub total_principal: i64,
    pub total_interest: i64,
    pub total_simple_interest: i64,
}

/// One month of the shared compounding recurrence: interest accrues on the
/// balance as it stood at the start of the month, then the contribution lands.
/// A deposit therefore earns nothing until the following month. The tax and
/// minor's-account projections reuse this exact step so all three engines
/// walk the same growth path.
pub(crate) fn monthly_step(balance: f64, contribution: f64, monthly_rate: f64) -> f64 {
    let with_interest = balance + balance * monthly_rate;
    with_interest + contribution
}

/// Project monthly-compounded growth of a principal plus recurring
/// contribution, with a parallel simple-interest baseline for comparison.
pub fn run_growth(inputs: &GrowthInputs) -> GrowthResult {
    let initial = safe_amount(inputs.initial_amount);
    let monthly = safe_amount(inputs.monthly_amount);
    let rate = inputs.rate_percent / 100.0;
    let monthly_rate = rate / 12.0;

    let mut balance = initial;
    let mut principal = initial;

    let mut yearly = Vec::with_capacity(inputs.years as usize + 1);
    yearly.push(GrowthPoint {
        year: 0,
        balance: round_won(balance),
        principal: round_won(principal),
        interest: 0,
        simple_balance: round_won(balance),
        simple_interest: 0,
    });

    for year in 1..=inputs.years {
        for _ in 0..12 {
            balance = monthly_step(balance, monthly, monthly_rate);
            principal += monthly;
        }

        // Simple-interest reference, closed form per year. The lump sum earns
        // full annual simple interest; the k-th of n monthly deposits sits for
        // n-k whole months, so the deposit stream earns
        // monthly * (rate/12) * n(n-1)/2 in total.
        let n = (year * 12) as f64;
        let lump_interest = initial * rate * year as f64;
        let deposit_interest = monthly * monthly_rate * (n * (n - 1.0) / 2.0);
        let simple_principal = initial + monthly * n;
        let simple_balance = simple_principal + lump_interest + deposit_interest;

        yearly.push(GrowthPoint {
            year,
            balance: round_won(balance),
            principal: round_won(principal),
            interest: round_won(balance - principal),
            simple_balance: round_won(simple_balance),
            simple_interest: round_won(lump_interest + deposit_interest),
        });
    }

    let last = yearly[yearly.len() - 1];
    GrowthResult {
        total_balance: round_won(balance),
        total_principal: round_won(principal),
        total_interest: round_won(balance - principal),
        total_simple_interest: last.simple_balance - last.principal,
        yearly,
    }
}
