use serde::{Deserialize, Serialize};

use super::money::{round_won, safe_amount};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthMode {
    /// Keep-or-lose check for dependent coverage under a family member's
    /// workplace plan.
    Dependent,
    /// Extra monthly premium on an employee's non-salary income.
    Employee,
}

/// Classification outcome, ordered so a later rule can only escalate.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Safe,
    Warning,
    Danger,
}

/// Statutory brackets and rates. These model a government schedule that
/// changes over time, so they are injected rather than baked into the rules;
/// `Default` carries the current law. All amounts are annual won.
#[derive(Debug, Clone, Copy)]
pub struct HealthThresholds {
    /// Combined annual income above which dependent status is lost.
    pub dependent_income_ceiling: f64,
    /// Financial (interest + dividend) income ceiling for dependents.
    pub dependent_financial_income_ceiling: f64,
    /// Unregistered rental income level that risks disqualification.
    pub dependent_rental_income_ceiling: f64,
    /// Freelance/business income ceiling without business registration.
    pub dependent_freelance_income_ceiling: f64,
    /// Property tax base above which the income test tightens.
    pub dependent_property_ceiling_low: f64,
    /// Property tax base above which status is lost outright.
    pub dependent_property_ceiling_high: f64,
    /// Income ceiling applied inside the mid-tier property band.
    pub dependent_property_income_ceiling: f64,
    /// Share of a jeonse deposit counted as property.
    pub jeonse_conversion_ratio: f64,
    /// Non-salary income floor before an employee owes an extra premium.
    pub employee_income_floor: f64,
    /// Monthly premium rate on the income above the floor.
    pub employee_premium_rate: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            dependent_income_ceiling: 20_000_000.0,
            dependent_financial_income_ceiling: 20_000_000.0,
            dependent_rental_income_ceiling: 4_000_000.0,
            dependent_freelance_income_ceiling: 5_000_000.0,
            dependent_property_ceiling_low: 540_000_000.0,
            dependent_property_ceiling_high: 900_000_000.0,
            dependent_property_income_ceiling: 10_000_000.0,
            jeonse_conversion_ratio: 0.3,
            employee_income_floor: 20_000_000.0,
            employee_premium_rate: 0.0709,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HealthInputs {
    pub mode: HealthMode,
    pub business_registered: bool,
    pub has_employed_spouse: bool,
    pub annual_rental_income: f64,
    pub business_income: f64,
    pub financial_income: f64,
    pub pension_income: f64,
    pub other_income: f64,
    pub property_value: f64,
    pub jeonse_deposit: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeBreakdown {
    pub financial: i64,
    pub rental: i64,
    pub business: i64,
    pub pension: i64,
    pub other: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResult {
    pub status: HealthStatus,
    /// One entry per triggered rule, in rule-evaluation order.
    pub reasons: Vec<String>,
    pub description: String,
    pub monthly_premium: i64,
    pub total_income: i64,
    pub property_base: i64,
    pub income_breakdown: IncomeBreakdown,
}

struct Evaluation {
    status: HealthStatus,
    reasons: Vec<String>,
}

impl Evaluation {
    fn new() -> Self {
        Self {
            status: HealthStatus::Safe,
            reasons: Vec::new(),
        }
    }

    /// Status is monotonically non-decreasing across the rule sequence; a
    /// Warning rule firing after a Danger rule never downgrades the result.
    fn escalate(&mut self, to: HealthStatus, reason: impl Into<String>) {
        self.status = self.status.max(to);
        self.reasons.push(reason.into());
    }
}

/// Rule-based eligibility and premium check against the national health
/// insurance brackets. Pure evaluation, no iteration.
pub fn classify_health(inputs: &HealthInputs, thresholds: &HealthThresholds) -> HealthResult {
    let rental = safe_amount(inputs.annual_rental_income);
    let business = safe_amount(inputs.business_income);
    let financial = safe_amount(inputs.financial_income);
    let pension = safe_amount(inputs.pension_income);
    let other = safe_amount(inputs.other_income);
    let property = safe_amount(inputs.property_value);
    let jeonse = safe_amount(inputs.jeonse_deposit);

    // Jeonse deposits count partially toward the property base.
    let property_base = property + jeonse * thresholds.jeonse_conversion_ratio;
    let total_income = financial + rental + business + pension + other;

    let mut eval = Evaluation::new();
    let mut monthly_premium = 0.0;
    let description;

    match inputs.mode {
        HealthMode::Dependent => {
            if !inputs.has_employed_spouse {
                eval.escalate(
                    HealthStatus::Danger,
                    "Dependent coverage requires a spouse or family member enrolled as a workplace subscriber; without one you move to regional coverage.",
                );
            }

            if inputs.business_registered {
                if business > 0.0 || rental > 0.0 {
                    eval.escalate(
                        HealthStatus::Danger,
                        "With a registered business, any business or rental income disqualifies dependent status.",
                    );
                }
            } else {
                if rental > thresholds.dependent_rental_income_ceiling {
                    eval.escalate(
                        HealthStatus::Warning,
                        "Unregistered rental income above the annual ceiling risks disqualification, subject to NHIS review.",
                    );
                }
                if business > thresholds.dependent_freelance_income_ceiling {
                    eval.escalate(
                        HealthStatus::Danger,
                        "Freelance or business income above the annual ceiling disqualifies dependent status.",
                    );
                }
            }

            if financial > thresholds.dependent_financial_income_ceiling {
                eval.escalate(
                    HealthStatus::Danger,
                    "Annual financial income (interest plus dividends) above the ceiling disqualifies dependent status.",
                );
            }

            if total_income > thresholds.dependent_income_ceiling {
                eval.escalate(
                    HealthStatus::Danger,
                    "Combined annual income above the ceiling disqualifies dependent status.",
                );
            }

            if property_base > thresholds.dependent_property_ceiling_high {
                eval.escalate(
                    HealthStatus::Danger,
                    "Property base (tax base plus converted jeonse deposit) above the upper ceiling disqualifies dependent status.",
                );
            } else if property_base > thresholds.dependent_property_ceiling_low
                && total_income > thresholds.dependent_property_income_ceiling
            {
                eval.escalate(
                    HealthStatus::Danger,
                    "Property base in the middle band combined with income above its ceiling disqualifies dependent status.",
                );
            }

            description = match eval.status {
                HealthStatus::Danger => {
                    "Dependent status cannot be kept; expect a switch to regional coverage.".to_string()
                }
                HealthStatus::Warning => {
                    "Caution: income or property sits close to a disqualification line.".to_string()
                }
                HealthStatus::Safe => {
                    "Dependent status can be kept under the current brackets.".to_string()
                }
            };
        }
        HealthMode::Employee => {
            if total_income > thresholds.employee_income_floor {
                let excess = total_income - thresholds.employee_income_floor;
                monthly_premium = (excess / 12.0 * thresholds.employee_premium_rate).floor();
                eval.escalate(
                    HealthStatus::Warning,
                    "Non-salary income above the annual floor incurs an extra income-based premium.",
                );
                description = "Non-salary income exceeds the floor; an extra monthly premium applies.".to_string();
            } else {
                description = "Non-salary income is at or below the floor; no extra premium applies.".to_string();
            }
        }
    }

    HealthResult {
        status: eval.status,
        reasons: eval.reasons,
        description,
        monthly_premium: round_won(monthly_premium),
        total_income: round_won(total_income),
        property_base: round_won(property_base),
        income_breakdown: IncomeBreakdown {
            financial: round_won(financial),
            rental: round_won(rental),
            business: round_won(business),
            pension: round_won(pension),
            other: round_won(other),
        },
    }
}
