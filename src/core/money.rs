/// Numeric hygiene applied to every money input before use: NaN, infinities
/// and negative amounts collapse to zero so the simulations stay total
/// functions over their declared domain.
pub(crate) fn safe_amount(value: f64) -> f64 {
    if !value.is_finite() { 0.0 } else { value.max(0.0) }
}

/// Round a working `f64` balance to whole won at a presentation boundary.
pub(crate) fn round_won(value: f64) -> i64 {
    value.round() as i64
}

/// Group an integer amount with thousands separators.
pub fn format_grouped(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if negative {
        format!("-{out}")
    } else {
        out
    }
}

/// Korean three-tier currency display. The breakpoints are a compatibility
/// contract with the chart/table consumers:
/// at least 1억 renders as "X.XX억원", at least 1만 as "X,XXX만원",
/// anything smaller as the raw amount in 원.
pub fn format_krw(amount: i64) -> String {
    if amount >= 100_000_000 {
        format!("{:.2}억원", amount as f64 / 100_000_000.0)
    } else if amount >= 10_000 {
        format!("{}만원", format_grouped(amount / 10_000))
    } else {
        format!("{}원", format_grouped(amount))
    }
}
