//! Number formatting for tool output
//!
//! Missing values render as `-`. Tushare reports most amounts in 万 (1e4).

/// Fixed-point number, `-` when missing
pub fn fmt_num(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}

/// Two-decimal number, `-` when missing
pub fn fmt(value: Option<f64>) -> String {
    fmt_num(value, 2)
}

/// Amount in 万, shown in 亿 once |v| reaches 10000
pub fn fmt_amount(value: Option<f64>) -> String {
    match value {
        Some(v) if v.abs() >= 10000.0 => format!("{:.2}亿", v / 10000.0),
        Some(v) => format!("{:.0}万", v),
        None => "-".to_string(),
    }
}

/// Market value in 万元, shown in 亿元 once it reaches 10000
pub fn fmt_mv(value: Option<f64>) -> String {
    match value {
        Some(v) if v >= 10000.0 => format!("{:.2} 亿元", v / 10000.0),
        Some(v) => format!("{:.2} 万元", v),
        None => "-".to_string(),
    }
}

/// Label for a `limit` code; unknown codes pass through
pub fn limit_label(code: &str) -> String {
    match code {
        "U" => "涨停".to_string(),
        "D" => "跌停".to_string(),
        "Z" => "炸板".to_string(),
        other => other.to_string(),
    }
}
