use serde::Serialize;

use super::money::{round_won, safe_amount};

/// Number of 6-of-45 combinations.
pub const TOTAL_COMBINATIONS: u64 = 8_145_060;

/// Progressive prize tax: 22% up to the bracket, 33% on the excess.
const TAX_BRACKET: f64 = 300_000_000.0;
const TAX_RATE_LOW: f64 = 0.22;
const TAX_RATE_HIGH: f64 = 0.33;

/// Reference odds of being struck by lightning, for the comparison stat.
const LIGHTNING_ODDS: f64 = 6_000_000.0;

const WEEKS_PER_YEAR: f64 = 52.0;

#[derive(Debug, Clone, Copy)]
pub struct LotteryInputs {
    pub weekly_games: u32,
    pub prize_amount: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotteryResult {
    pub probability_percent: f64,
    pub years_to_win: f64,
    pub prize_amount: i64,
    pub total_tax: i64,
    pub after_tax_amount: i64,
    /// 1-in-N odds of a first-prize win across the purchased games.
    pub odds: f64,
    /// How many times less likely than a lightning strike.
    pub relative_to_lightning: f64,
}

/// Closed-form win probability, expected time to a win, and post-tax prize.
/// No iteration and no state.
pub fn run_lottery(inputs: &LotteryInputs) -> LotteryResult {
    let games = inputs.weekly_games.max(1) as f64;
    let combinations = TOTAL_COMBINATIONS as f64;

    let probability_percent = inputs.weekly_games as f64 / combinations * 100.0;
    let odds = combinations / games;
    let years_to_win = odds / WEEKS_PER_YEAR;

    let prize = safe_amount(inputs.prize_amount);
    let mut tax = 0.0;
    if prize > 0.0 {
        tax += prize.min(TAX_BRACKET) * TAX_RATE_LOW;
    }
    if prize > TAX_BRACKET {
        tax += (prize - TAX_BRACKET) * TAX_RATE_HIGH;
    }

    LotteryResult {
        probability_percent,
        years_to_win,
        prize_amount: round_won(prize),
        total_tax: round_won(tax),
        after_tax_amount: round_won(prize - tax),
        odds,
        relative_to_lightning: odds / LIGHTNING_ODDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    #[test]
    fn single_game_odds_match_the_combination_count() {
        let result = run_lottery(&LotteryInputs {
            weekly_games: 1,
            prize_amount: 0.0,
        });
        assert_eq!(result.odds, TOTAL_COMBINATIONS as f64);
        assert!((result.years_to_win - TOTAL_COMBINATIONS as f64 / 52.0).abs() < 1e-6);
    }

    #[test]
    fn zero_games_is_floored_to_one_for_time_estimates() {
        let result = run_lottery(&LotteryInputs {
            weekly_games: 0,
            prize_amount: 100_000_000.0,
        });
        assert_eq!(result.probability_percent, 0.0);
        assert_eq!(result.odds, TOTAL_COMBINATIONS as f64);
    }

    #[test]
    fn prize_below_bracket_is_taxed_at_the_low_rate() {
        let result = run_lottery(&LotteryInputs {
            weekly_games: 5,
            prize_amount: 200_000_000.0,
        });
        assert_eq!(result.total_tax, 44_000_000);
        assert_eq!(result.after_tax_amount, 156_000_000);
    }

    #[test]
    fn prize_above_bracket_pays_the_high_rate_on_the_excess() {
        // 2.0e9: 3e8 * 22% + 1.7e9 * 33% = 66M + 561M = 627M
        let result = run_lottery(&LotteryInputs {
            weekly_games: 5,
            prize_amount: 2_000_000_000.0,
        });
        assert_eq!(result.total_tax, 627_000_000);
        assert_eq!(result.after_tax_amount, 1_373_000_000);
    }

    proptest! {
        #[test]
        fn probability_scales_linearly_and_years_inversely(
            games in 1u32..10_000,
        ) {
            let one = run_lottery(&LotteryInputs { weekly_games: games, prize_amount: 0.0 });
            let two = run_lottery(&LotteryInputs { weekly_games: games * 2, prize_amount: 0.0 });
            prop_assert!((two.probability_percent - one.probability_percent * 2.0).abs() < 1e-9);
            prop_assert!((two.years_to_win - one.years_to_win / 2.0).abs() < 1e-6);
        }
    }
}
