//! Magnitude strings
//!
//! Firmware reports difficulties as human-suffixed strings (`"1.23M"`). Two
//! parsers exist on purpose: a lenient one for live device responses and a
//! strict one used while replaying the log, which keeps replay deterministic.
//! Neither ever fails; unparseable input yields `0.0`.

use once_cell::sync::Lazy;
use regex::Regex;

static CANONICAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\d.]+)([kMG]?)$").expect("canonical magnitude pattern is valid")
});

/// Multiplier for a single-character unit suffix (case-sensitive)
fn suffix_multiplier(suffix: char) -> Option<f64> {
    match suffix {
        'k' => Some(1e3),
        'M' => Some(1e6),
        'G' => Some(1e9),
        _ => None,
    }
}

/// Lenient parser used on live device responses
///
/// Spaces are dropped and `,` is read as a decimal separator. A trailing
/// `k`/`M`/`G` scales the value; otherwise a plain float is tried, then the
/// same with any trailing non-numeric run stripped.
pub fn parse_magnitude(input: &str) -> f64 {
    let s: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if let Some(last) = s.chars().last() {
        if let Some(multiplier) = suffix_multiplier(last) {
            return s[..s.len() - last.len_utf8()]
                .parse::<f64>()
                .map(|v| v * multiplier)
                .unwrap_or(0.0);
        }
    }

    if let Ok(v) = s.parse::<f64>() {
        return v;
    }

    let numeric = s.trim_end_matches(|c: char| !c.is_ascii_digit());
    numeric.parse::<f64>().unwrap_or(0.0)
}

/// Strict parser used during log replay
///
/// Commas are thousands separators and are removed along with spaces. The
/// remainder must be `<digits-and-dots><optional k|M|G>`; anything else falls
/// back to a plain float parse.
pub fn parse_canonical(input: &str) -> f64 {
    let s: String = input
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    let Some(caps) = CANONICAL.captures(&s) else {
        return s.parse::<f64>().unwrap_or(0.0);
    };

    let Ok(number) = caps[1].parse::<f64>() else {
        return 0.0;
    };

    caps[2]
        .chars()
        .next()
        .and_then(suffix_multiplier)
        .map_or(number, |m| number * m)
}

/// Format a value with the largest unit that keeps it at or above 1
pub fn format_magnitude(value: f64) -> String {
    if value >= 1e9 {
        format!("{:.2}G", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.2}k", value / 1e3)
    } else {
        format!("{:.2}", value)
    }
}
