use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    FireInputs, GrowthInputs, HealthInputs, HealthMode, HealthThresholds, KidsInputs,
    LotteryInputs, NetWorthInputs, RetirementInputs, TaxInputs, WithdrawalStrategy,
    classify_health, run_fire, run_growth, run_kids, run_lottery, run_networth, run_retirement,
    run_tax_comparison,
};

const MAX_PROJECTION_YEARS: u32 = 100;
const MAX_AGE: u32 = 120;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("wonplan API listening on http://{addr}");

    axum::serve(listener, app).await
}

fn router() -> Router {
    Router::new()
        .route("/api/growth", get(growth_get).post(growth_post))
        .route(
            "/api/retirement",
            get(retirement_get).post(retirement_post),
        )
        .route("/api/fire", get(fire_get).post(fire_post))
        .route("/api/tax", get(tax_get).post(tax_post))
        .route("/api/kids", get(kids_get).post(kids_post))
        .route("/api/health", get(health_get).post(health_post))
        .route("/api/lottery", get(lottery_get).post(lottery_post))
        .route("/api/networth", get(networth_get).post(networth_post))
        .fallback(not_found)
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn require_finite(name: &str, value: f64) -> Result<f64, String> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{name} must be a finite number"))
    }
}

fn require_rate(name: &str, value: f64) -> Result<f64, String> {
    let value = require_finite(name, value)?;
    if (-100.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{name} must be between -100 and 100"))
    }
}

// ---------------------------------------------------------------------------
// Growth
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GrowthPayload {
    initial_amount: Option<f64>,
    monthly_amount: Option<f64>,
    years: Option<u32>,
    rate: Option<f64>,
}

fn build_growth_inputs(payload: GrowthPayload) -> Result<GrowthInputs, String> {
    let years = payload.years.unwrap_or(10);
    if years > MAX_PROJECTION_YEARS {
        return Err(format!("years must be <= {MAX_PROJECTION_YEARS}"));
    }
    Ok(GrowthInputs {
        initial_amount: payload.initial_amount.unwrap_or(10_000_000.0),
        monthly_amount: payload.monthly_amount.unwrap_or(500_000.0),
        years,
        rate_percent: require_rate("rate", payload.rate.unwrap_or(5.0))?,
    })
}

async fn growth_get(Query(payload): Query<GrowthPayload>) -> Response {
    growth_impl(payload)
}

async fn growth_post(Json(payload): Json<GrowthPayload>) -> Response {
    growth_impl(payload)
}

fn growth_impl(payload: GrowthPayload) -> Response {
    match build_growth_inputs(payload) {
        Ok(inputs) => json_response(StatusCode::OK, run_growth(&inputs)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

// ---------------------------------------------------------------------------
// Retirement
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RetirementPayload {
    current_age: Option<u32>,
    retire_age: Option<u32>,
    target_monthly_expense: Option<f64>,
    safe_assets: Option<f64>,
    invest_assets: Option<f64>,
    safe_rate: Option<f64>,
    invest_rate: Option<f64>,
    monthly_contribution: Option<f64>,
    withdrawal_strategy: Option<WithdrawalStrategy>,
}

fn build_retirement_inputs(payload: RetirementPayload) -> Result<RetirementInputs, String> {
    let current_age = payload.current_age.unwrap_or(40);
    let retire_age = payload.retire_age.unwrap_or(60);
    if current_age > MAX_AGE || retire_age > MAX_AGE {
        return Err(format!("ages must be <= {MAX_AGE}"));
    }
    Ok(RetirementInputs {
        current_age,
        retire_age,
        target_monthly_expense: payload.target_monthly_expense.unwrap_or(3_000_000.0),
        safe_assets: payload.safe_assets.unwrap_or(100_000_000.0),
        invest_assets: payload.invest_assets.unwrap_or(100_000_000.0),
        safe_rate_percent: require_rate("safeRate", payload.safe_rate.unwrap_or(3.0))?,
        invest_rate_percent: require_rate("investRate", payload.invest_rate.unwrap_or(6.0))?,
        monthly_contribution: payload.monthly_contribution.unwrap_or(1_000_000.0),
        withdrawal_strategy: payload
            .withdrawal_strategy
            .unwrap_or(WithdrawalStrategy::Target),
    })
}

async fn retirement_get(Query(payload): Query<RetirementPayload>) -> Response {
    retirement_impl(payload)
}

async fn retirement_post(Json(payload): Json<RetirementPayload>) -> Response {
    retirement_impl(payload)
}

fn retirement_impl(payload: RetirementPayload) -> Response {
    let inputs = match build_retirement_inputs(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    match run_retirement(&inputs) {
        Ok(result) => json_response(StatusCode::OK, result),
        // A structurally valid request with an impossible parameter
        // combination; the engine refuses before simulating.
        Err(e) => error_response(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// FIRE
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FirePayload {
    monthly_income: Option<f64>,
    monthly_expense: Option<f64>,
    current_assets: Option<f64>,
    expected_return: Option<f64>,
    target_monthly_expense: Option<f64>,
    current_age: Option<u32>,
    withdrawal_rate: Option<f64>,
    start_year: Option<i16>,
    start_month: Option<u8>,
}

fn build_fire_inputs(payload: FirePayload) -> Result<FireInputs, String> {
    let withdrawal_rate = require_finite("withdrawalRate", payload.withdrawal_rate.unwrap_or(4.0))?;
    if !(0.0..=100.0).contains(&withdrawal_rate) {
        return Err("withdrawalRate must be between 0 and 100".to_string());
    }
    let start_month = payload.start_month.unwrap_or_else(current_month);
    if !(1..=12).contains(&start_month) {
        return Err("startMonth must be between 1 and 12".to_string());
    }
    Ok(FireInputs {
        monthly_income: payload.monthly_income.unwrap_or(4_000_000.0),
        monthly_expense: payload.monthly_expense.unwrap_or(2_500_000.0),
        current_assets: payload.current_assets.unwrap_or(50_000_000.0),
        expected_return_percent: require_rate(
            "expectedReturn",
            payload.expected_return.unwrap_or(7.0),
        )?,
        target_monthly_expense: payload.target_monthly_expense.unwrap_or(2_500_000.0),
        current_age: payload.current_age.unwrap_or(35).min(MAX_AGE),
        withdrawal_rate_percent: withdrawal_rate,
        start_year: payload.start_year.unwrap_or_else(current_year),
        start_month,
    })
}

fn current_year() -> i16 {
    jiff::Zoned::now().year()
}

fn current_month() -> u8 {
    jiff::Zoned::now().month() as u8
}

async fn fire_get(Query(payload): Query<FirePayload>) -> Response {
    fire_impl(payload)
}

async fn fire_post(Json(payload): Json<FirePayload>) -> Response {
    fire_impl(payload)
}

fn fire_impl(payload: FirePayload) -> Response {
    match build_fire_inputs(payload) {
        Ok(inputs) => json_response(StatusCode::OK, run_fire(&inputs)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

// ---------------------------------------------------------------------------
// Tax comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TaxPayload {
    initial_amount: Option<f64>,
    monthly_amount: Option<f64>,
    years: Option<u32>,
    rate: Option<f64>,
    general_tax_rate: Option<f64>,
    preferential_tax_rate: Option<f64>,
}

fn build_tax_inputs(payload: TaxPayload) -> Result<TaxInputs, String> {
    let years = payload.years.unwrap_or(10);
    if years > MAX_PROJECTION_YEARS {
        return Err(format!("years must be <= {MAX_PROJECTION_YEARS}"));
    }
    let general = require_finite("generalTaxRate", payload.general_tax_rate.unwrap_or(15.4))?;
    let preferential = require_finite(
        "preferentialTaxRate",
        payload.preferential_tax_rate.unwrap_or(0.0),
    )?;
    for (name, rate) in [
        ("generalTaxRate", general),
        ("preferentialTaxRate", preferential),
    ] {
        if !(0.0..=100.0).contains(&rate) {
            return Err(format!("{name} must be between 0 and 100"));
        }
    }
    Ok(TaxInputs {
        initial_amount: payload.initial_amount.unwrap_or(10_000_000.0),
        monthly_amount: payload.monthly_amount.unwrap_or(500_000.0),
        years,
        rate_percent: require_rate("rate", payload.rate.unwrap_or(6.0))?,
        general_tax_rate_percent: general,
        preferential_tax_rate_percent: preferential,
    })
}

async fn tax_get(Query(payload): Query<TaxPayload>) -> Response {
    tax_impl(payload)
}

async fn tax_post(Json(payload): Json<TaxPayload>) -> Response {
    tax_impl(payload)
}

fn tax_impl(payload: TaxPayload) -> Response {
    match build_tax_inputs(payload) {
        Ok(inputs) => json_response(StatusCode::OK, run_tax_comparison(&inputs)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

// ---------------------------------------------------------------------------
// Minor's account
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct KidsPayload {
    current_age: Option<u32>,
    target_age: Option<u32>,
    initial_amount: Option<f64>,
    monthly_amount: Option<f64>,
    rate: Option<f64>,
}

fn build_kids_inputs(payload: KidsPayload) -> Result<KidsInputs, String> {
    let current_age = payload.current_age.unwrap_or(5);
    let target_age = payload.target_age.unwrap_or(20);
    if target_age > MAX_AGE {
        return Err(format!("targetAge must be <= {MAX_AGE}"));
    }
    Ok(KidsInputs {
        current_age,
        target_age,
        initial_amount: payload.initial_amount.unwrap_or(5_000_000.0),
        monthly_amount: payload.monthly_amount.unwrap_or(200_000.0),
        rate_percent: require_rate("rate", payload.rate.unwrap_or(7.0))?,
    })
}

async fn kids_get(Query(payload): Query<KidsPayload>) -> Response {
    kids_impl(payload)
}

async fn kids_post(Json(payload): Json<KidsPayload>) -> Response {
    kids_impl(payload)
}

fn kids_impl(payload: KidsPayload) -> Response {
    match build_kids_inputs(payload) {
        Ok(inputs) => json_response(StatusCode::OK, run_kids(&inputs)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

// ---------------------------------------------------------------------------
// Health insurance
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct HealthPayload {
    mode: Option<HealthMode>,
    business_registered: Option<bool>,
    has_employed_spouse: Option<bool>,
    annual_rental_income: Option<f64>,
    business_income: Option<f64>,
    financial_income: Option<f64>,
    pension_income: Option<f64>,
    other_income: Option<f64>,
    property_value: Option<f64>,
    jeonse_deposit: Option<f64>,

    // Bracket overrides; everything else stays at the statutory defaults.
    dependent_income_ceiling: Option<f64>,
    dependent_property_ceiling_low: Option<f64>,
    dependent_property_ceiling_high: Option<f64>,
    employee_income_floor: Option<f64>,
    employee_premium_rate: Option<f64>,
}

fn build_health_request(payload: HealthPayload) -> Result<(HealthInputs, HealthThresholds), String> {
    let mut thresholds = HealthThresholds::default();
    if let Some(v) = payload.dependent_income_ceiling {
        thresholds.dependent_income_ceiling = require_finite("dependentIncomeCeiling", v)?;
    }
    if let Some(v) = payload.dependent_property_ceiling_low {
        thresholds.dependent_property_ceiling_low =
            require_finite("dependentPropertyCeilingLow", v)?;
    }
    if let Some(v) = payload.dependent_property_ceiling_high {
        thresholds.dependent_property_ceiling_high =
            require_finite("dependentPropertyCeilingHigh", v)?;
    }
    if let Some(v) = payload.employee_income_floor {
        thresholds.employee_income_floor = require_finite("employeeIncomeFloor", v)?;
    }
    if let Some(v) = payload.employee_premium_rate {
        let rate = require_finite("employeePremiumRate", v)?;
        if !(0.0..=1.0).contains(&rate) {
            return Err("employeePremiumRate must be between 0 and 1".to_string());
        }
        thresholds.employee_premium_rate = rate;
    }
    if thresholds.dependent_property_ceiling_high < thresholds.dependent_property_ceiling_low {
        return Err(
            "dependentPropertyCeilingHigh must be >= dependentPropertyCeilingLow".to_string(),
        );
    }

    let inputs = HealthInputs {
        mode: payload.mode.unwrap_or(HealthMode::Dependent),
        business_registered: payload.business_registered.unwrap_or(false),
        has_employed_spouse: payload.has_employed_spouse.unwrap_or(true),
        annual_rental_income: payload.annual_rental_income.unwrap_or(0.0),
        business_income: payload.business_income.unwrap_or(0.0),
        financial_income: payload.financial_income.unwrap_or(0.0),
        pension_income: payload.pension_income.unwrap_or(0.0),
        other_income: payload.other_income.unwrap_or(0.0),
        property_value: payload.property_value.unwrap_or(0.0),
        jeonse_deposit: payload.jeonse_deposit.unwrap_or(0.0),
    };
    Ok((inputs, thresholds))
}

async fn health_get(Query(payload): Query<HealthPayload>) -> Response {
    health_impl(payload)
}

async fn health_post(Json(payload): Json<HealthPayload>) -> Response {
    health_impl(payload)
}

fn health_impl(payload: HealthPayload) -> Response {
    match build_health_request(payload) {
        Ok((inputs, thresholds)) => {
            json_response(StatusCode::OK, classify_health(&inputs, &thresholds))
        }
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

// ---------------------------------------------------------------------------
// Lottery
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LotteryPayload {
    weekly_games: Option<u32>,
    prize_amount: Option<f64>,
}

fn build_lottery_inputs(payload: LotteryPayload) -> Result<LotteryInputs, String> {
    Ok(LotteryInputs {
        weekly_games: payload.weekly_games.unwrap_or(5),
        prize_amount: require_finite(
            "prizeAmount",
            payload.prize_amount.unwrap_or(2_000_000_000.0),
        )?,
    })
}

async fn lottery_get(Query(payload): Query<LotteryPayload>) -> Response {
    lottery_impl(payload)
}

async fn lottery_post(Json(payload): Json<LotteryPayload>) -> Response {
    lottery_impl(payload)
}

fn lottery_impl(payload: LotteryPayload) -> Response {
    match build_lottery_inputs(payload) {
        Ok(inputs) => json_response(StatusCode::OK, run_lottery(&inputs)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

// ---------------------------------------------------------------------------
// Net worth
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct NetWorthPayload {
    financial_assets: Option<f64>,
    real_estate: Option<f64>,
    rent_deposit: Option<f64>,
    other_assets: Option<f64>,
    loans: Option<f64>,
    tenant_deposit: Option<f64>,
    monthly_savings: Option<f64>,
    annual_rate: Option<f64>,
}

fn build_networth_inputs(payload: NetWorthPayload) -> Result<NetWorthInputs, String> {
    Ok(NetWorthInputs {
        financial_assets: payload.financial_assets.unwrap_or(50_000_000.0),
        real_estate: payload.real_estate.unwrap_or(300_000_000.0),
        rent_deposit: payload.rent_deposit.unwrap_or(100_000_000.0),
        other_assets: payload.other_assets.unwrap_or(50_000_000.0),
        loans: payload.loans.unwrap_or(0.0),
        tenant_deposit: payload.tenant_deposit.unwrap_or(0.0),
        monthly_savings: payload.monthly_savings.unwrap_or(3_000_000.0),
        annual_rate_percent: require_rate("annualRate", payload.annual_rate.unwrap_or(5.0))?,
    })
}

async fn networth_get(Query(payload): Query<NetWorthPayload>) -> Response {
    networth_impl(payload)
}

async fn networth_post(Json(payload): Json<NetWorthPayload>) -> Response {
    networth_impl(payload)
}

fn networth_impl(payload: NetWorthPayload) -> Response {
    match build_networth_inputs(payload) {
        Ok(inputs) => json_response(StatusCode::OK, run_networth(&inputs)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HealthStatus;

    #[test]
    fn growth_payload_parses_camel_case_keys() {
        let json = r#"{
          "initialAmount": 20000000,
          "monthlyAmount": 1000000,
          "years": 15,
          "rate": 6.5
        }"#;
        let payload: GrowthPayload = serde_json::from_str(json).expect("json should parse");
        let inputs = build_growth_inputs(payload).expect("valid inputs");
        assert_eq!(inputs.initial_amount, 20_000_000.0);
        assert_eq!(inputs.years, 15);
        assert_eq!(inputs.rate_percent, 6.5);
    }

    #[test]
    fn growth_rejects_oversized_horizon() {
        let payload: GrowthPayload =
            serde_json::from_str(r#"{"years": 101}"#).expect("json should parse");
        let err = build_growth_inputs(payload).expect_err("must reject");
        assert!(err.contains("years"));
    }

    #[test]
    fn retirement_payload_accepts_kebab_case_strategy() {
        let payload: RetirementPayload =
            serde_json::from_str(r#"{"withdrawalStrategy": "uniform"}"#).expect("json should parse");
        let inputs = build_retirement_inputs(payload).expect("valid inputs");
        assert_eq!(inputs.withdrawal_strategy, WithdrawalStrategy::Uniform);
    }

    #[test]
    fn retirement_defaults_produce_a_runnable_simulation() {
        let inputs = build_retirement_inputs(RetirementPayload::default()).expect("valid inputs");
        let result = run_retirement(&inputs).expect("defaults simulate");
        assert!(!result.years.is_empty());
    }

    #[test]
    fn fire_rejects_out_of_range_withdrawal_rate() {
        let payload: FirePayload =
            serde_json::from_str(r#"{"withdrawalRate": 250}"#).expect("json should parse");
        let err = build_fire_inputs(payload).expect_err("must reject");
        assert!(err.contains("withdrawalRate"));
    }

    #[test]
    fn fire_defaults_anchor_to_the_current_calendar() {
        let inputs = build_fire_inputs(FirePayload::default()).expect("valid inputs");
        assert!((1..=12).contains(&inputs.start_month));
        assert!(inputs.start_year >= 2024);
    }

    #[test]
    fn tax_rejects_non_finite_rates() {
        let payload = TaxPayload {
            general_tax_rate: Some(f64::NAN),
            ..TaxPayload::default()
        };
        let err = build_tax_inputs(payload).expect_err("must reject");
        assert!(err.contains("generalTaxRate"));
    }

    #[test]
    fn health_threshold_overrides_apply() {
        let json = r#"{
          "mode": "employee",
          "financialIncome": 15000000,
          "employeeIncomeFloor": 10000000
        }"#;
        let payload: HealthPayload = serde_json::from_str(json).expect("json should parse");
        let (inputs, thresholds) = build_health_request(payload).expect("valid request");
        let result = classify_health(&inputs, &thresholds);
        assert_eq!(result.status, HealthStatus::Warning);
        assert!(result.monthly_premium > 0);
    }

    #[test]
    fn health_rejects_inverted_property_ceilings() {
        let json = r#"{
          "dependentPropertyCeilingLow": 900000000,
          "dependentPropertyCeilingHigh": 540000000
        }"#;
        let payload: HealthPayload = serde_json::from_str(json).expect("json should parse");
        let err = build_health_request(payload).expect_err("must reject");
        assert!(err.contains("dependentPropertyCeilingHigh"));
    }

    #[test]
    fn growth_response_serializes_camel_case_fields() {
        let inputs = build_growth_inputs(GrowthPayload::default()).expect("valid inputs");
        let json = serde_json::to_string(&run_growth(&inputs)).expect("result should serialize");
        assert!(json.contains("\"yearly\""));
        assert!(json.contains("\"simpleBalance\""));
        assert!(json.contains("\"totalInterest\""));
    }

    #[test]
    fn retirement_response_serializes_camel_case_fields() {
        let inputs = build_retirement_inputs(RetirementPayload::default()).expect("valid inputs");
        let result = run_retirement(&inputs).expect("defaults simulate");
        let json = serde_json::to_string(&result).expect("result should serialize");
        assert!(json.contains("\"totalAtRetirement\""));
        assert!(json.contains("\"avgMonthlyShortfall\""));
        assert!(json.contains("\"depletionAge\""));
        assert!(json.contains("\"readinessScore\""));
        assert!(json.contains("\"isRetired\""));
    }

    #[test]
    fn fire_response_reports_feasibility_fields() {
        let inputs = build_fire_inputs(FirePayload::default()).expect("valid inputs");
        let json = serde_json::to_string(&run_fire(&inputs)).expect("result should serialize");
        assert!(json.contains("\"fiNumber\""));
        assert!(json.contains("\"timeToAchieve\""));
        assert!(json.contains("\"feasible\""));
    }

    #[test]
    fn networth_tier_serializes_lowercase() {
        let inputs = build_networth_inputs(NetWorthPayload::default()).expect("valid inputs");
        let json = serde_json::to_string(&run_networth(&inputs)).expect("result should serialize");
        assert!(json.contains("\"tier\""));
        assert!(json.contains("\"nextTier\""));
    }
}
