use regex::Regex;
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?(?:[0-9]+(?:\.[0-9]*)?|[0-9]*\.[0-9]+)(?:[eE][-+]?[0-9]+)?")
        .expect("numeric token pattern is valid")
});

/// Extracts every decimal number in `ascii_data`, in order.
///
/// Anything between numbers (separators, units, headers) is skipped.
pub fn parse_ascii(ascii_data: &str) -> Vec<f64> {
    NUMBER
        .find_iter(ascii_data)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}
