use serde::{Deserialize, Serialize};

use super::growth::monthly_step;
use super::money::{round_won, safe_amount};

#[derive(Debug, Clone, Copy)]
pub struct TaxInputs {
    pub initial_amount: f64,
    pub monthly_amount: f64,
    pub years: u32,
    pub rate_percent: f64,
    /// Flat rate on gains in a regular taxable account, e.g. 15.4.
    pub general_tax_rate_percent: f64,
    /// Flat rate on gains in the tax-advantaged account, e.g. 0 or 9.9.
    pub preferential_tax_rate_percent: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxPoint {
    pub year: u32,
    pub general_balance: i64,
    pub preferential_balance: i64,
    pub principal: i64,
    pub general_tax: i64,
    pub preferential_tax: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResult {
    pub yearly: Vec<TaxPoint>,
    pub total_general: i64,
    pub total_preferential: i64,
    pub total_principal: i64,
    pub total_tax_saved: i64,
}

/// Compare the same pre-tax compounding path under two flat tax rates applied
/// to the accumulated gain at each year checkpoint, as if liquidated that
/// year. Tax never touches principal, and both scenarios share one growth
/// path; this is not an annually-realized tax model.
pub fn run_tax_comparison(inputs: &TaxInputs) -> TaxResult {
    let initial = safe_amount(inputs.initial_amount);
    let monthly = safe_amount(inputs.monthly_amount);
    let monthly_rate = inputs.rate_percent / 100.0 / 12.0;
    let general_rate = inputs.general_tax_rate_percent / 100.0;
    let preferential_rate = inputs.preferential_tax_rate_percent / 100.0;

    let mut balance = initial;
    let mut principal = initial;

    let mut yearly = Vec::with_capacity(inputs.years as usize + 1);
    yearly.push(TaxPoint {
        year: 0,
        general_balance: round_won(balance),
        preferential_balance: round_won(balance),
        principal: round_won(principal),
        general_tax: 0,
        preferential_tax: 0,
    });

    for year in 1..=inputs.years {
        for _ in 0..12 {
            balance = monthly_step(balance, monthly, monthly_rate);
            principal += monthly;
        }

        let gain = (balance - principal).max(0.0);
        let general_tax = gain * general_rate;
        let preferential_tax = gain * preferential_rate;

        yearly.push(TaxPoint {
            year,
            general_balance: round_won(balance - general_tax),
            preferential_balance: round_won(balance - preferential_tax),
            principal: round_won(principal),
            general_tax: round_won(general_tax),
            preferential_tax: round_won(preferential_tax),
        });
    }

    let last = yearly[yearly.len() - 1];
    TaxResult {
        total_general: last.general_balance,
        total_preferential: last.preferential_balance,
        total_principal: last.principal,
        total_tax_saved: last.preferential_balance - last.general_balance,
        yearly,
    }
}
