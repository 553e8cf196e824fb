/// Format a number for display.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        let s = format!("{:.10}", n);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Format a number as an evaluator operand.
///
/// Operands are always written in floating-point form so the evaluator never
/// falls back to integer division, and negatives are parenthesised so they
/// can follow any operator.
pub fn format_operand(n: f64) -> String {
    let mut s = n.abs().to_string();
    if !s.contains('.') {
        s.push_str(".0");
    }
    if n.is_sign_negative() && n != 0.0 {
        format!("(-{})", s)
    } else {
        s
    }
}
