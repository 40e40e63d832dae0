//! Process-wide analysis configuration
//!
//! Category sets and lever constants are fixed at startup and never mutated.
//! They live here rather than as literals inside the engines so tests can
//! swap them out and deployments can localize the vocabulary.

use std::collections::HashSet;

/// Tunable knobs for forecast analysis and suggestion generation.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Categories treated as fixed (non-trimmable) expenses
    pub fixed_categories: HashSet<String>,
    /// Categories eligible for variable-trim suggestions
    pub discretionary_categories: HashSet<String>,
    /// Number of most-recent calendar months used as the baseline window
    pub baseline_months: usize,
    /// Fraction of a category's median spend proposed as a trim
    pub trim_fraction: f64,
    /// Minimum monthly impact claimed by the subscription-cleanup lever
    pub subscription_floor: f64,
    /// Fraction of the Subscriptions median proposed as cleanup savings
    pub subscription_cut: f64,
    /// Maximum monthly impact claimed by the subscription-cleanup lever
    pub subscription_cap: f64,
    /// Flat monthly amount proposed by the income lever
    pub income_boost: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let fixed = [
            "Rent",
            "Mortgage",
            "Loan",
            "Utilities",
            "Internet",
            "Phone",
            "Insurance",
            "Tuition",
            "Subscriptions",
        ];
        let discretionary = [
            "Dining",
            "Restaurants",
            "Shopping",
            "Rideshare",
            "Entertainment",
            "Travel",
            "Hobbies",
        ];

        Self {
            fixed_categories: fixed.iter().map(|s| s.to_string()).collect(),
            discretionary_categories: discretionary.iter().map(|s| s.to_string()).collect(),
            baseline_months: 3,
            trim_fraction: 0.20,
            subscription_floor: 15.0,
            subscription_cut: 0.25,
            subscription_cap: 30.0,
            income_boost: 100.0,
        }
    }
}

impl AnalysisConfig {
    /// Whether a normalized category counts as a fixed expense.
    pub fn is_fixed(&self, category: &str) -> bool {
        self.fixed_categories.contains(category)
    }

    /// Whether a normalized category is eligible for trim suggestions.
    pub fn is_discretionary(&self, category: &str) -> bool {
        self.discretionary_categories.contains(category)
    }
}
