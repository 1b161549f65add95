// Display helpers shared by the CLI and the dashboard.

/// Renders a value with a fixed number of decimals and `,` thousand grouping.
/// Missing values render as an en-dash placeholder.
pub fn format_value(value: Option<f64>, decimals: usize) -> String {
    let Some(v) = value else {
        return "–".to_string();
    };
    let fixed = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (fixed.clone(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if v < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Renders a ratio (0.125) as a percentage ("12.50%").
pub fn format_percent(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}%", decimals, v * 100.0),
        None => "–".to_string(),
    }
}
