use chrono::{Datelike, NaiveDate};
use num_traits::ToPrimitive;
use serde::Serialize;
use sqlx::types::BigDecimal;

const POSITIVE_WORDS: [&str; 9] = [
    "good",
    "great",
    "excellent",
    "awesome",
    "amazing",
    "perfect",
    "outstanding",
    "professional",
    "recommend",
];

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct BidComparison {
    pub count: i64,
    pub lowest: f64,
    pub highest: f64,
    pub average: f64,
}

/// Places a bid against the other bids on the same tender.
///
/// The average is the midpoint between the other bids' mean and this bid,
/// not the mean of all bids.
pub fn compare_bid(others: &[f64], price: f64) -> BidComparison {
    if others.is_empty() {
        return BidComparison {
            count: 1,
            lowest: price,
            highest: price,
            average: price,
        };
    }

    let lowest = others.iter().copied().fold(price, f64::min);
    let highest = others.iter().copied().fold(price, f64::max);
    let others_avg = others.iter().sum::<f64>() / others.len() as f64;

    BidComparison {
        count: others.len() as i64 + 1,
        lowest,
        highest,
        average: (others_avg + price) / 2.0,
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn success_rate(awarded: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(awarded as f64 / total as f64 * 100.0, 1)
}

pub fn completion_percentage(total_payments: f64, contract_value: f64) -> f64 {
    if contract_value <= 0.0 {
        return 0.0;
    }
    round_to(total_payments / contract_value * 100.0, 2)
}

/// Human label for the mean hours between a ticket opening and its reply.
pub fn response_time_label(average_hours: Option<f64>) -> String {
    match average_hours {
        None => "No replies yet".to_string(),
        Some(hours) if hours < 1.0 => "Less than 1 hour".to_string(),
        Some(hours) if hours < 24.0 => format!("{} hours", hours.round() as i64),
        Some(hours) => format!("{} days", (hours / 24.0).round() as i64),
    }
}

pub fn is_positive_comment(comment: &str) -> bool {
    let lowered = comment.to_lowercase();
    POSITIVE_WORDS.iter().any(|word| lowered.contains(word))
}

/// First `max` characters followed by "..." when the text is longer.
pub fn excerpt(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max).collect();
    format!("{}...", head)
}

pub fn money(value: &Option<BigDecimal>) -> f64 {
    value.as_ref().and_then(|v| v.to_f64()).unwrap_or(0.0)
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct MonthSlot {
    pub year: i32,
    pub month: u32,
    pub label: &'static str,
}

/// The twelve calendar months ending with the month of `today`, oldest first.
pub fn trailing_months(today: NaiveDate) -> Vec<MonthSlot> {
    let current = today.year() * 12 + today.month0() as i32;
    (0..12)
        .rev()
        .map(|back| {
            let index = current - back;
            let month0 = index.rem_euclid(12) as u32;
            MonthSlot {
                year: index.div_euclid(12),
                month: month0 + 1,
                label: MONTH_LABELS[month0 as usize],
            }
        })
        .collect()
}

/// Spreads `(year, month, value)` rows over the month slots, zero-filling gaps.
pub fn fill_series(months: &[MonthSlot], rows: &[(i32, i32, f64)]) -> Vec<f64> {
    months
        .iter()
        .map(|slot| {
            rows.iter()
                .filter(|(year, month, _)| *year == slot.year && *month as u32 == slot.month)
                .map(|(_, _, value)| *value)
                .sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_uses_midpoint_average() {
        let cmp = compare_bid(&[100.0, 200.0, 300.0], 150.0);
        assert_eq!(
            cmp,
            BidComparison {
                count: 4,
                lowest: 100.0,
                highest: 300.0,
                average: 175.0,
            }
        );
    }

    #[test]
    fn lone_bid_compares_to_itself() {
        let cmp = compare_bid(&[], 420.0);
        assert_eq!(cmp.count, 1);
        assert_eq!(cmp.lowest, 420.0);
        assert_eq!(cmp.highest, 420.0);
        assert_eq!(cmp.average, 420.0);
    }

    #[test]
    fn success_rate_handles_zero_and_rounds() {
        assert_eq!(success_rate(0, 0), 0.0);
        assert_eq!(success_rate(2, 8), 25.0);
        assert_eq!(success_rate(1, 3), 33.3);
    }

    #[test]
    fn completion_is_zero_without_contract_value() {
        assert_eq!(completion_percentage(500.0, 0.0), 0.0);
        assert_eq!(completion_percentage(500.0, -1.0), 0.0);
        assert_eq!(completion_percentage(1.0, 3.0), 33.33);
    }

    #[test]
    fn response_time_buckets() {
        assert_eq!(response_time_label(None), "No replies yet");
        assert_eq!(response_time_label(Some(0.4)), "Less than 1 hour");
        assert_eq!(response_time_label(Some(5.6)), "6 hours");
        assert_eq!(response_time_label(Some(60.0)), "3 days");
    }

    #[test]
    fn positive_words_match_case_insensitively() {
        assert!(is_positive_comment("Very PROFESSIONAL delivery"));
        assert!(!is_positive_comment("late and incomplete"));
    }

    #[test]
    fn excerpt_appends_ellipsis_only_when_cut() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn trailing_months_cross_year_boundary() {
        let months = trailing_months(NaiveDate::from_ymd_opt(2025, 2, 14).unwrap());
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], MonthSlot { year: 2024, month: 3, label: "Mar" });
        assert_eq!(months[11], MonthSlot { year: 2025, month: 2, label: "Feb" });
    }

    #[test]
    fn fill_series_zero_fills_missing_months() {
        let months = trailing_months(NaiveDate::from_ymd_opt(2025, 2, 14).unwrap());
        let series = fill_series(&months, &[(2025, 1, 4.0), (2024, 3, 2.5)]);
        assert_eq!(series[0], 2.5);
        assert_eq!(series[10], 4.0);
        assert_eq!(series.iter().sum::<f64>(), 6.5);
    }
}
