// format.rs

/// `1234567.8` -> `"$1,234,568"`. Negative amounts keep their sign in
/// front unless they round to zero.
pub fn money(amount: f64) -> String {
    let digits = grouped(amount.abs());
    if amount < 0.0 && digits != "0" {
        format!("-${digits}")
    } else {
        format!("${digits}")
    }
}

/// Rounds to a whole number and inserts thousands separators.
pub fn grouped(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    if value < 0.0 && out != "0" {
        out.insert(0, '-');
    }
    out
}

/// A fraction shown as a percentage: `0.0547` -> `"5.47%"`.
pub fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// An already-percent value with an explicit sign: `4.2` -> `"+4.2%"`.
pub fn signed_pct(pct: f64) -> String {
    format!("{pct:+.1}%")
}

pub fn days(value: Option<f64>) -> String {
    match value {
        Some(d) => format!("{d:.0}"),
        None => "N/A".to_string(),
    }
}
