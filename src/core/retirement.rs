use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::money::{round_won, safe_amount};

/// Simulation horizon: annual steps run from the current age through this age.
pub const LIFE_EXPECTANCY: u32 = 85;

/// Fixed annual inflation applied to the target expense, in percent.
const INFLATION_RATE_PERCENT: f64 = 2.5;

/// Rule-of-thumb lump sum behind the readiness score: 25 years of expenses.
const READINESS_EXPENSE_MULTIPLE: f64 = 25.0;

const READINESS_SCORE_CAP: i64 = 150;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WithdrawalStrategy {
    /// Split the remaining balance evenly over the months left to the horizon,
    /// recomputed every year from the then-current balance.
    Uniform,
    /// Withdraw the inflation-adjusted target expense, capped at the balance.
    Target,
}

#[derive(Debug, Clone, Copy)]
pub struct RetirementInputs {
    pub current_age: u32,
    pub retire_age: u32,
    pub target_monthly_expense: f64,
    pub safe_assets: f64,
    pub invest_assets: f64,
    pub safe_rate_percent: f64,
    pub invest_rate_percent: f64,
    pub monthly_contribution: f64,
    pub withdrawal_strategy: WithdrawalStrategy,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("current age ({current_age}) must be below the retirement age ({retire_age})")]
    RetirementAgeNotAfterCurrent { current_age: u32, retire_age: u32 },
    #[error("retirement age ({retire_age}) must not exceed the simulation horizon ({LIFE_EXPECTANCY})")]
    RetirementAgeBeyondHorizon { retire_age: u32 },
}

/// One simulated year. Expense, withdrawal and shortfall are monthly figures
/// in that year's nominal won.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgePoint {
    pub age: u32,
    pub balance: i64,
    pub safe: i64,
    pub invest: i64,
    pub expense: i64,
    pub withdrawal: i64,
    pub shortfall: i64,
    pub is_retired: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementResult {
    pub years: Vec<AgePoint>,
    pub total_at_retirement: i64,
    /// Average monthly shortfall over the retired years, restated in
    /// present-value won.
    pub avg_monthly_shortfall: i64,
    pub depletion_age: Option<u32>,
    /// Bounded heuristic in [0, 150]: assets at retirement versus 25 years of
    /// target expenses.
    pub readiness_score: i64,
}

/// Deterministic market perturbation on the invest-pool return, a function of
/// elapsed years only. Repeated runs are exactly reproducible; this is a
/// waveform, not randomness, and must not be swapped for an RNG.
fn market_factor(year_index: u32) -> f64 {
    let t = year_index as f64;
    let trend = (t * 0.5).sin();
    let noise = (t * 1.5).cos() * 0.3;
    (trend + noise) * 0.05
}

fn grow(pool: f64, rate_percent: f64) -> f64 {
    safe_amount(pool * (1.0 + rate_percent / 100.0))
}

/// Two-phase annual drawdown simulation: accumulate until the retirement age,
/// then decumulate to age 85 under the chosen withdrawal strategy.
pub fn run_retirement(inputs: &RetirementInputs) -> Result<RetirementResult, SimulationError> {
    if inputs.current_age >= inputs.retire_age {
        return Err(SimulationError::RetirementAgeNotAfterCurrent {
            current_age: inputs.current_age,
            retire_age: inputs.retire_age,
        });
    }
    // The annual loop runs through LIFE_EXPECTANCY; a later retirement age
    // would leave no retired years to simulate.
    if inputs.retire_age > LIFE_EXPECTANCY {
        return Err(SimulationError::RetirementAgeBeyondHorizon {
            retire_age: inputs.retire_age,
        });
    }

    let monthly_contribution = safe_amount(inputs.monthly_contribution);
    let target_monthly = safe_amount(inputs.target_monthly_expense);

    let mut pool_safe = safe_amount(inputs.safe_assets);
    let mut pool_invest = safe_amount(inputs.invest_assets);

    let mut years = Vec::with_capacity((LIFE_EXPECTANCY - inputs.current_age) as usize + 1);
    let mut total_shortfall_pv = 0.0;
    let mut retired_months = 0u32;
    let mut depletion_age = None;
    let mut total_at_retirement = 0i64;

    for age in inputs.current_age..=LIFE_EXPECTANCY {
        let is_retired = age >= inputs.retire_age;
        let year_index = age - inputs.current_age;

        let inflation_factor =
            (1.0 + INFLATION_RATE_PERCENT / 100.0).powi(year_index as i32);
        let annual_expense_need = target_monthly * 12.0 * inflation_factor;

        let safe_rate = inputs.safe_rate_percent;
        let invest_rate = inputs.invest_rate_percent + market_factor(year_index) * 100.0;

        let mut withdrawal = 0.0;
        let mut yearly_shortfall = 0.0;

        if !is_retired {
            // Accumulation: grow both pools, then add the year's contributions
            // split by the pools' post-growth proportion.
            pool_safe = grow(pool_safe, safe_rate);
            pool_invest = grow(pool_invest, invest_rate);

            let total = pool_safe + pool_invest;
            let safe_share = if total > 0.0 { pool_safe / total } else { 0.5 };
            let annual_contribution = monthly_contribution * 12.0;
            pool_safe = safe_amount(pool_safe + annual_contribution * safe_share);
            pool_invest = safe_amount(pool_invest + annual_contribution * (1.0 - safe_share));
        } else {
            retired_months += 12;

            pool_safe = grow(pool_safe, safe_rate);
            pool_invest = grow(pool_invest, invest_rate);

            let total_liquid = pool_safe + pool_invest;
            // Balances below half a won count as depleted; a full-drain
            // withdrawal can leave float residue behind.
            if round_won(total_liquid) > 0 {
                withdrawal = match inputs.withdrawal_strategy {
                    WithdrawalStrategy::Uniform => {
                        let months_remaining =
                            (((LIFE_EXPECTANCY - age + 1) * 12).max(1)) as f64;
                        total_liquid / months_remaining * 12.0
                    }
                    WithdrawalStrategy::Target => annual_expense_need.min(total_liquid),
                };

                // Take the withdrawal pro-rata from each pool's share of the
                // liquid total immediately before withdrawal.
                let safe_share = pool_safe / total_liquid;
                pool_safe = safe_amount(pool_safe - withdrawal * safe_share);
                pool_invest = safe_amount(pool_invest - withdrawal * (1.0 - safe_share));
            } else if depletion_age.is_none() {
                depletion_age = Some(age);
            }

            yearly_shortfall = (annual_expense_need - withdrawal).max(0.0);
            // De-inflate before averaging so the summary reads in today's won.
            total_shortfall_pv += yearly_shortfall / inflation_factor;
        }

        if age == inputs.retire_age {
            total_at_retirement = round_won(pool_safe + pool_invest);
        }

        years.push(AgePoint {
            age,
            balance: round_won(pool_safe + pool_invest),
            safe: round_won(pool_safe),
            invest: round_won(pool_invest),
            expense: round_won(annual_expense_need / 12.0),
            withdrawal: round_won(withdrawal / 12.0),
            shortfall: round_won(yearly_shortfall / 12.0),
            is_retired,
        });
    }

    let avg_monthly_shortfall = if retired_months > 0 {
        round_won(total_shortfall_pv / (retired_months as f64 / 12.0) / 12.0)
    } else {
        0
    };

    let needed_lump_sum = target_monthly * 12.0 * READINESS_EXPENSE_MULTIPLE;
    let readiness_score = if total_at_retirement > 0 && needed_lump_sum > 0.0 {
        let raw = (total_at_retirement as f64 / needed_lump_sum * 100.0).round() as i64;
        raw.clamp(0, READINESS_SCORE_CAP)
    } else {
        0
    };

    Ok(RetirementResult {
        years,
        total_at_retirement,
        avg_monthly_shortfall,
        depletion_age,
        readiness_score,
    })
}
