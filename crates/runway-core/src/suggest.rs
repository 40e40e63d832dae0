//! Suggestion engine
//!
//! Ranks behavior-change levers to close a monthly funding gap: greedy
//! variable trims over discretionary categories, a subscription cleanup
//! pass, and the timeline/income fallback levers. Augmentation backends can
//! append further suggestions; their failure never fails the analysis.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::augment::{AugmentContext, SuggestionAugmentor};
use crate::config::AnalysisConfig;
use crate::models::{LeverType, MonthKey, ResolvedGoal, Suggestion};
use crate::stats::{median, round_cents};

/// Friendly title and behavior tip per discretionary category. Categories
/// outside the table fall back to generic cap phrasing.
const CATEGORY_VOCAB: &[(&str, &str, &str)] = &[
    (
        "Dining",
        "Cook in a little more often",
        "Swap a couple of takeout meals each week for home-cooked ones",
    ),
    (
        "Restaurants",
        "Make restaurant nights an occasion",
        "Keep one favorite spot per week and brown-bag the rest",
    ),
    (
        "Shopping",
        "Try a 48-hour cart rule",
        "Leave non-essentials in the cart for two days before buying",
    ),
    (
        "Rideshare",
        "Batch trips or take transit once a week",
        "Replace one or two rides a week with transit, walking, or carpooling",
    ),
    (
        "Entertainment",
        "Pick one night out, make the rest free",
        "Swap a paid outing for a free event or a night in each week",
    ),
    (
        "Travel",
        "Shift one trip to the off-season",
        "Book ahead and favor off-peak dates for planned trips",
    ),
    (
        "Hobbies",
        "Use what you have this month",
        "Pause new gear purchases and work through the backlog first",
    ),
];

fn vocab_for(category: &str) -> Option<(&'static str, &'static str)> {
    CATEGORY_VOCAB
        .iter()
        .find(|(name, _, _)| *name == category)
        .map(|(_, title, tip)| (*title, *tip))
}

/// Generates gap-closing suggestions. Holds the augmentation backend.
pub struct SuggestionEngine {
    augmentor: Box<dyn SuggestionAugmentor>,
}

impl SuggestionEngine {
    pub fn new(augmentor: Box<dyn SuggestionAugmentor>) -> Self {
        Self { augmentor }
    }

    /// Produce the ordered suggestion list for a positive monthly gap.
    pub async fn generate(
        &self,
        config: &AnalysisConfig,
        goal: &ResolvedGoal,
        history: &BTreeMap<String, Vec<f64>>,
        baseline_months: &[MonthKey],
        p50: f64,
        gap: f64,
    ) -> Vec<Suggestion> {
        let mut suggestions = variable_trims(config, goal, history, gap);
        if let Some(cleanup) = subscription_cleanup(config, history) {
            suggestions.push(cleanup);
        }
        suggestions.push(timeline_lever(goal));
        suggestions.push(income_lever(config));

        let ctx = AugmentContext {
            goal,
            category_history: history,
            baseline_months,
            p50,
            gap,
        };
        match self.augmentor.generate(&ctx).await {
            Ok(extra) => {
                debug!(count = extra.len(), "Augmentation suggestions merged");
                suggestions.extend(extra);
            }
            Err(e) => {
                warn!(error = %e, "Suggestion augmentation failed; continuing without it");
            }
        }

        suggestions
    }
}

/// Greedy 20% trims over discretionary categories, largest median first.
///
/// Protected categories are skipped outright. The walk stops once the
/// accumulated impact covers the gap; full closure is not guaranteed.
fn variable_trims(
    config: &AnalysisConfig,
    goal: &ResolvedGoal,
    history: &BTreeMap<String, Vec<f64>>,
    gap: f64,
) -> Vec<Suggestion> {
    let mut ranked: Vec<(&str, f64, usize)> = history
        .iter()
        .filter(|(category, _)| config.is_discretionary(category))
        .map(|(category, spends)| (category.as_str(), median(spends), spends.len()))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let protected: HashSet<&str> = goal
        .protected_categories
        .iter()
        .map(|c| c.trim())
        .collect();

    let mut suggestions = Vec::new();
    let mut remaining = gap;
    for (category, median_spend, month_count) in ranked {
        if remaining <= 0.0 {
            break;
        }
        if protected.contains(category) {
            continue;
        }
        let impact = round_cents(median_spend * config.trim_fraction);
        let (title, action) = match vocab_for(category) {
            Some((title, tip)) => (title.to_string(), format!("{tip} to free up about ${impact:.2}/month")),
            None => (
                format!("Trim {category} by ~20%"),
                format!("Cap this category and aim for about ${impact:.2}/month less"),
            ),
        };
        suggestions.push(Suggestion {
            title,
            action,
            rationale: format!("Based on your last {month_count} months median in {category}"),
            lever_type: LeverType::VariableTrim,
            impact_per_month: impact,
            new_months_to_deadline: None,
            new_required_monthly: None,
        });
        remaining -= impact;
    }
    suggestions
}

/// One cleanup suggestion when the Subscriptions category has history,
/// emitted regardless of how much of the gap the trims already covered.
fn subscription_cleanup(
    config: &AnalysisConfig,
    history: &BTreeMap<String, Vec<f64>>,
) -> Option<Suggestion> {
    let spends = history.get("Subscriptions")?;
    let median_spend = median(spends);
    let impact = round_cents(
        (median_spend * config.subscription_cut)
            .max(config.subscription_floor)
            .min(config.subscription_cap),
    );
    Some(Suggestion {
        title: "Cancel or pause unused subscriptions".to_string(),
        action: format!(
            "Review recurring charges and drop the ones you have not used lately, about ${impact:.2}/month"
        ),
        rationale: "Recurring Subscriptions spend detected in your baseline months".to_string(),
        lever_type: LeverType::SubscriptionCleanup,
        impact_per_month: impact,
        new_months_to_deadline: None,
        new_required_monthly: None,
    })
}

/// The timeline lever changes the deadline, not monthly cash flow, so its
/// impact is zero and the new numbers ride along as metadata.
fn timeline_lever(goal: &ResolvedGoal) -> Suggestion {
    let new_months = goal.months_to_deadline + 1;
    let new_required =
        round_cents((goal.target_amount - goal.current_savings) / new_months as f64);
    Suggestion {
        title: "Move deadline by +1 month".to_string(),
        action: "Consider extending timeline for lower monthly requirement".to_string(),
        rationale: "Spreads remaining amount over more months".to_string(),
        lever_type: LeverType::Timeline,
        impact_per_month: 0.0,
        new_months_to_deadline: Some(new_months),
        new_required_monthly: Some(new_required),
    }
}

fn income_lever(config: &AnalysisConfig) -> Suggestion {
    Suggestion {
        title: format!(
            "Add one extra shift / freelance (+${:.0})",
            config.income_boost
        ),
        action: "If feasible, add a small monthly income boost".to_string(),
        rationale: "Only if income seems flexible".to_string(),
        lever_type: LeverType::Income,
        impact_per_month: config.income_boost,
        new_months_to_deadline: None,
        new_required_monthly: None,
    }
}
