use serde::{Deserialize, Serialize};

use super::money::{round_won, safe_amount};

/// Simulation cap: 100 years of monthly steps.
const MAX_MONTHS: u32 = 1200;

/// Months of chart continuity recorded past the achievement point.
const POST_ACHIEVEMENT_MONTHS: u32 = 240;

/// Fixed annual inflation assumption used to derive the real return.
const INFLATION_RATE: f64 = 0.025;

#[derive(Debug, Clone, Copy)]
pub struct FireInputs {
    pub monthly_income: f64,
    pub monthly_expense: f64,
    pub current_assets: f64,
    pub expected_return_percent: f64,
    pub target_monthly_expense: f64,
    pub current_age: u32,
    pub withdrawal_rate_percent: f64,
    /// Calendar anchor for the projection; the caller supplies "now".
    pub start_year: i16,
    pub start_month: u8,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirePoint {
    pub month_index: u32,
    pub year: i16,
    pub month: u8,
    pub age: u32,
    pub assets: i64,
    pub fi_number: i64,
    pub is_achieved: bool,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TimeToAchieve {
    pub years: u32,
    pub months: u32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i16,
    pub month: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireResult {
    pub monthly_savings: i64,
    pub savings_rate_percent: f64,
    pub fi_number: i64,
    pub points: Vec<FirePoint>,
    pub time_to_achieve: Option<TimeToAchieve>,
    pub achieved_date: Option<YearMonth>,
    pub feasible: bool,
}

fn calendar_at(start_year: i16, start_month: u8, month_index: u32) -> (i16, u8) {
    // Out-of-range anchors clamp to a valid calendar month.
    let start_month = start_month.clamp(1, 12);
    let total = (start_month as u32 - 1) + month_index;
    let year = start_year + (total / 12) as i16;
    let month = (total % 12) as u8 + 1;
    (year, month)
}

/// Project real (inflation-adjusted) portfolio growth until the FI number is
/// crossed, then keep yearly snapshots for 20 further years of chart
/// continuity.
pub fn run_fire(inputs: &FireInputs) -> FireResult {
    let income = safe_amount(inputs.monthly_income);
    let expense = safe_amount(inputs.monthly_expense);
    let assets = safe_amount(inputs.current_assets);
    let target_monthly = safe_amount(inputs.target_monthly_expense);

    let monthly_savings = (income - expense).max(0.0);
    let savings_rate_percent = if income > 0.0 {
        monthly_savings / income * 100.0
    } else {
        0.0
    };

    // Annual target expense divided by the withdrawal rate, so any rate works,
    // not just the 4%-rule multiples.
    let withdrawal_rate = inputs.withdrawal_rate_percent / 100.0;
    let fi_number = if withdrawal_rate > 0.0 {
        target_monthly * 12.0 / withdrawal_rate
    } else {
        0.0
    };

    // Real return via (1 + nominal) / (1 + inflation) - 1, then a plain
    // division by 12. The division is an approximation kept for parity with
    // the published figures; do not "fix" it into monthly compounding.
    let nominal = inputs.expected_return_percent / 100.0;
    let real_annual = (1.0 + nominal) / (1.0 + INFLATION_RATE) - 1.0;
    let monthly_real = real_annual / 12.0;

    let mut balance = assets;
    let mut achieved_index: Option<u32> = None;
    let mut points = Vec::new();

    for i in 0..MAX_MONTHS {
        let (year, month) = calendar_at(inputs.start_year, inputs.start_month, i);
        let age = inputs.current_age + i / 12;

        // Achievement is checked against the pre-growth balance and captured
        // exactly once, with its own data point.
        if achieved_index.is_none() && balance >= fi_number {
            achieved_index = Some(i);
            points.push(FirePoint {
                month_index: i,
                year,
                month,
                age,
                assets: round_won(balance),
                fi_number: round_won(fi_number),
                is_achieved: true,
            });
        } else if let Some(at) = achieved_index {
            if i - at >= POST_ACHIEVEMENT_MONTHS {
                break;
            }
        }

        let is_start_of_year = month == 1;
        let duplicate = points.last().is_some_and(|p| p.month_index == i);
        if (is_start_of_year || i == 0) && !duplicate {
            points.push(FirePoint {
                month_index: i,
                year,
                month,
                age,
                assets: round_won(balance),
                fi_number: round_won(fi_number),
                is_achieved: achieved_index.is_some_and(|at| at <= i),
            });
        }

        balance += balance * monthly_real + monthly_savings;
    }

    let time_to_achieve = achieved_index.map(|at| TimeToAchieve {
        years: at / 12,
        months: at % 12,
    });
    let achieved_date = achieved_index.map(|at| {
        let (year, month) = calendar_at(inputs.start_year, inputs.start_month, at);
        YearMonth { year, month }
    });

    FireResult {
        monthly_savings: round_won(monthly_savings),
        savings_rate_percent,
        fi_number: round_won(fi_number),
        points,
        time_to_achieve,
        achieved_date,
        feasible: achieved_index.is_some(),
    }
}
