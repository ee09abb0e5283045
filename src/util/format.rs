use lazy_static::lazy_static;
use num_format::{CustomFormat, Grouping, ToFormattedString};

#[rustfmt::skip]
lazy_static! {
    /// `1_920_000` style digit grouping for step and episode counters
    static ref COUNTER_FORMAT: CustomFormat = CustomFormat::builder()
        .grouping(Grouping::Standard)
        .minus_sign("-")
        .separator("_")
        .build()
        .unwrap_or_default();
}

pub fn counter<N: ToFormattedString>(n: N) -> String { n.to_formatted_string(&*COUNTER_FORMAT) }

/// Share of `count` in `total`, e.g. `37.5%`; `-` for an empty total
pub fn percentage(
    count: usize,
    total: usize,
) -> String {
    if total == 0 {
        "-".to_string()
    } else {
        format!("{:.1}%", 100.0 * count as f64 / total as f64)
    }
}
