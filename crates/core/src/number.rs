/// Shortest decimal text for a float that still reads back as a float.
///
/// Integral values keep a trailing `.0` so a re-read does not infer an
/// integer column. Very large and very small magnitudes use exponent form
/// (`3e50`, `1.5e-7`).
pub fn format_float(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    let abs = n.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        return format!("{:e}", n);
    }

    let text = format!("{}", n);
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}
