mod fire;
mod growth;
mod health;
mod kids;
mod lottery;
mod money;
mod networth;
mod retirement;
mod tax;

pub use fire::{FireInputs, FirePoint, FireResult, TimeToAchieve, YearMonth, run_fire};
pub use growth::{GrowthInputs, GrowthPoint, GrowthResult, run_growth};
pub use health::{
    HealthInputs, HealthMode, HealthResult, HealthStatus, HealthThresholds, IncomeBreakdown,
    classify_health,
};
pub use kids::{KidsInputs, KidsPoint, KidsResult, run_kids, GIFT_EXEMPTION_ADULT, GIFT_EXEMPTION_MINOR};
pub use lottery::{LotteryInputs, LotteryResult, run_lottery, TOTAL_COMBINATIONS};
pub use money::{format_grouped, format_krw};
pub use networth::{NetWorthInputs, NetWorthResult, NextTier, Tier, run_networth};
pub use retirement::{
    AgePoint, RetirementInputs, RetirementResult, SimulationError, WithdrawalStrategy,
    run_retirement, LIFE_EXPECTANCY,
};
pub use tax::{TaxInputs, TaxPoint, TaxResult, run_tax_comparison};
