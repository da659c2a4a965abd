use chrono::DateTime;

use crate::constants::DATE_FORMAT;
use crate::constants::INVALID_DATE;
use crate::constants::LABEL_MAX_FULL_LENGTH;
use crate::constants::LABEL_PREFIX_CHARS;
use crate::constants::LABEL_SUFFIX_CHARS;
use crate::constants::MAX_VALID_TIMESTAMP;
use crate::constants::SOMPI_PER_KAS;

pub fn sompi_to_kas(sompi: u64) -> f64 {
    sompi as f64 / SOMPI_PER_KAS
}

/// Validate a unix timestamp (seconds) and render it as a UTC date.
///
/// Anything outside `[0, MAX_VALID_TIMESTAMP]` collapses to `(0, "invalid")`.
pub fn normalize_timestamp(timestamp: i64) -> (i64, String) {
    if !(0..=MAX_VALID_TIMESTAMP).contains(&timestamp) {
        tracing::warn!("invalid_timestamp::{}::using_zero", timestamp);
        return (0, INVALID_DATE.to_string());
    }

    match DateTime::from_timestamp(timestamp, 0) {
        Some(date) => (timestamp, date.format(DATE_FORMAT).to_string()),
        None => {
            tracing::warn!("timestamp_conversion_failed::{}::using_zero", timestamp);
            (0, INVALID_DATE.to_string())
        },
    }
}

/// Shorten an address for display: `kaspa:qz0c...j5aat` style.
pub fn format_address_label(address: &str) -> String {
    if address.is_empty() {
        return "Unknown".to_string();
    }

    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= LABEL_MAX_FULL_LENGTH {
        return address.to_string();
    }

    let prefix: String = chars[..LABEL_PREFIX_CHARS].iter().collect();
    let suffix: String = chars[chars.len() - LABEL_SUFFIX_CHARS..].iter().collect();
    format!("{}...{}", prefix, suffix)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (ddof = 0)
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// `stddev / mean`, undefined for empty input or a non-positive mean
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    if mean <= 0.0 {
        return None;
    }
    Some(std_dev(values)? / mean)
}
