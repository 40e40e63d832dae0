//! Calendar-month aggregation of transaction history
//!
//! Pure transformations: group transactions by month, pick the most recent
//! baseline window, and derive the per-month cash-flow aggregates the
//! forecaster consumes.

use std::collections::BTreeMap;

use crate::config::AnalysisConfig;
use crate::models::{MonthKey, MonthlyAggregate, Transaction};

/// Trim a raw category label. Missing labels collapse to the empty string.
pub fn normalize_category(raw: &str) -> &str {
    raw.trim()
}

/// Group transactions by calendar month, keep the most recent
/// `config.baseline_months` months present in the data (fewer when history
/// is shorter), and aggregate each. Returned in chronological order.
pub fn baseline_aggregates(
    transactions: &[Transaction],
    config: &AnalysisConfig,
) -> Vec<MonthlyAggregate> {
    let mut by_month: BTreeMap<MonthKey, Vec<&Transaction>> = BTreeMap::new();
    for tx in transactions {
        by_month
            .entry(MonthKey::from_date(tx.date))
            .or_default()
            .push(tx);
    }

    // Most recent N, then back to ascending
    let mut months: Vec<MonthKey> = by_month
        .keys()
        .rev()
        .take(config.baseline_months)
        .copied()
        .collect();
    months.reverse();

    months
        .into_iter()
        .map(|month| aggregate_month(month, &by_month[&month], config))
        .collect()
}

fn aggregate_month(
    month: MonthKey,
    transactions: &[&Transaction],
    config: &AnalysisConfig,
) -> MonthlyAggregate {
    let mut income = 0.0;
    let mut fixed_expense = 0.0;
    let mut variable_expense = 0.0;
    let mut category_spend: BTreeMap<String, f64> = BTreeMap::new();

    for tx in transactions {
        if tx.amount > 0.0 {
            income += tx.amount;
        } else if tx.amount < 0.0 {
            let category = normalize_category(&tx.category);
            let outflow = -tx.amount;
            if config.is_fixed(category) {
                fixed_expense += outflow;
            } else {
                variable_expense += outflow;
            }
            *category_spend.entry(category.to_string()).or_insert(0.0) += outflow;
        }
    }

    MonthlyAggregate {
        month,
        income,
        fixed_expense,
        variable_expense,
        category_spend,
    }
}

/// Per-category monthly spend history across the baseline window.
///
/// A category only has entries for the months it actually saw spend in, so
/// vector lengths vary by category.
pub fn category_history(aggregates: &[MonthlyAggregate]) -> BTreeMap<String, Vec<f64>> {
    let mut history: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for aggregate in aggregates {
        for (category, spend) in &aggregate.category_spend {
            history.entry(category.clone()).or_default().push(*spend);
        }
    }
    history
}

/// Monthly savings capacity for each baseline month: income - fixed - variable.
pub fn monthly_capacity(aggregates: &[MonthlyAggregate]) -> Vec<f64> {
    aggregates
        .iter()
        .map(|a| a.income - a.fixed_expense - a.variable_expense)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(date: &str, amount: f64, category: &str) -> Transaction {
        Transaction {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            amount,
            merchant: "TEST".to_string(),
            category: category.to_string(),
            account: "checking".to_string(),
        }
    }

    #[test]
    fn test_baseline_window_keeps_most_recent_three_ascending() {
        let txns = vec![
            tx("2026-01-10", -50.0, "Dining"),
            tx("2026-04-10", -50.0, "Dining"),
            tx("2026-02-10", -50.0, "Dining"),
            tx("2026-03-10", -50.0, "Dining"),
        ];
        let aggregates = baseline_aggregates(&txns, &AnalysisConfig::default());
        let months: Vec<String> = aggregates.iter().map(|a| a.month.to_string()).collect();
        assert_eq!(months, vec!["2026-02", "2026-03", "2026-04"]);
    }

    #[test]
    fn test_short_history_uses_all_months() {
        let txns = vec![tx("2026-03-05", 2000.0, "")];
        let aggregates = baseline_aggregates(&txns, &AnalysisConfig::default());
        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].income, 2000.0);
    }

    #[test]
    fn test_income_fixed_variable_split() {
        let txns = vec![
            tx("2026-03-01", 3000.0, ""),
            tx("2026-03-02", -1200.0, "Rent"),
            tx("2026-03-03", -80.0, " Utilities "),
            tx("2026-03-04", -150.0, "Dining"),
            tx("2026-03-05", -90.0, "Groceries"),
        ];
        let aggregates = baseline_aggregates(&txns, &AnalysisConfig::default());
        assert_eq!(aggregates.len(), 1);
        let agg = &aggregates[0];
        assert_eq!(agg.income, 3000.0);
        // Category labels are trimmed before the fixed-set lookup
        assert_eq!(agg.fixed_expense, 1280.0);
        assert_eq!(agg.variable_expense, 240.0);
        assert_eq!(agg.category_spend["Utilities"], 80.0);
        assert_eq!(agg.category_spend["Dining"], 150.0);
    }

    #[test]
    fn test_category_spend_includes_fixed_categories() {
        let txns = vec![
            tx("2026-03-02", -15.99, "Subscriptions"),
            tx("2026-03-20", -9.99, "Subscriptions"),
        ];
        let aggregates = baseline_aggregates(&txns, &AnalysisConfig::default());
        assert_eq!(aggregates[0].category_spend["Subscriptions"], 25.98);
    }

    #[test]
    fn test_category_history_skips_absent_months() {
        let txns = vec![
            tx("2026-01-10", -100.0, "Dining"),
            tx("2026-02-10", -60.0, "Shopping"),
            tx("2026-03-10", -120.0, "Dining"),
        ];
        let aggregates = baseline_aggregates(&txns, &AnalysisConfig::default());
        let history = category_history(&aggregates);
        assert_eq!(history["Dining"], vec![100.0, 120.0]);
        assert_eq!(history["Shopping"], vec![60.0]);
    }

    #[test]
    fn test_monthly_capacity() {
        let txns = vec![
            tx("2026-03-01", 3000.0, ""),
            tx("2026-03-02", -1200.0, "Rent"),
            tx("2026-03-04", -300.0, "Dining"),
        ];
        let aggregates = baseline_aggregates(&txns, &AnalysisConfig::default());
        assert_eq!(monthly_capacity(&aggregates), vec![1500.0]);
    }

    #[test]
    fn test_empty_history_yields_empty_baseline() {
        let aggregates = baseline_aggregates(&[], &AnalysisConfig::default());
        assert!(aggregates.is_empty());
        assert!(monthly_capacity(&aggregates).is_empty());
    }
}
