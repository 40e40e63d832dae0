//! Capacity forecasting and goal classification
//!
//! The entry point for a full analysis: resolve the goal (structured fields
//! or free text), aggregate the baseline months, estimate capacity
//! percentiles, classify the goal, and generate suggestions for any gap.

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::aggregate::{baseline_aggregates, category_history, monthly_capacity};
use crate::augment::SuggestionAugmentor;
use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::goal_text::GoalTextParser;
use crate::models::{
    ForecastResult, GoalRequest, GoalStatus, MonthKey, ResolvedGoal, Transaction,
};
use crate::stats::{percentile, round_cents};
use crate::suggest::SuggestionEngine;

/// Mutually exclusive status from the capacity percentiles: the median
/// covers the requirement, only the optimistic tail does, or neither.
fn classify(p50: f64, p90: f64, required_monthly: f64) -> GoalStatus {
    if p50 >= required_monthly {
        GoalStatus::OnTrack
    } else if p90 >= required_monthly {
        GoalStatus::Borderline
    } else {
        GoalStatus::OffTrack
    }
}

/// Stateless analysis engine. Each call is an independent computation; the
/// only I/O is the augmentation call buried behind the suggestion engine.
pub struct ForecastEngine {
    config: AnalysisConfig,
    parser: GoalTextParser,
    suggestions: SuggestionEngine,
}

impl ForecastEngine {
    pub fn new(augmentor: Box<dyn SuggestionAugmentor>) -> Self {
        Self::with_config(AnalysisConfig::default(), augmentor)
    }

    pub fn with_config(config: AnalysisConfig, augmentor: Box<dyn SuggestionAugmentor>) -> Self {
        Self {
            config,
            parser: GoalTextParser::new(),
            suggestions: SuggestionEngine::new(augmentor),
        }
    }

    /// Analyze against the local calendar date.
    pub async fn analyze(
        &self,
        transactions: &[Transaction],
        goal: &GoalRequest,
    ) -> Result<ForecastResult> {
        self.analyze_at(transactions, goal, Local::now().date_naive())
            .await
    }

    /// Analyze with an explicit "today" for goal text resolution.
    pub async fn analyze_at(
        &self,
        transactions: &[Transaction],
        goal: &GoalRequest,
        today: NaiveDate,
    ) -> Result<ForecastResult> {
        let resolved = self.resolve_goal(goal, today)?;

        let aggregates = baseline_aggregates(transactions, &self.config);
        let capacity = monthly_capacity(&aggregates);
        let p10 = percentile(&capacity, 10.0);
        let p50 = percentile(&capacity, 50.0);
        let p90 = percentile(&capacity, 90.0);

        let months = resolved.months_to_deadline as f64;
        let required_monthly =
            round_cents((resolved.target_amount - resolved.current_savings) / months);
        let projected_monthly = round_cents((p50.max(0.0) - resolved.buffer).max(0.0));
        let status = classify(p50, p90, required_monthly);
        let forecasted_balance =
            round_cents(projected_monthly * months + resolved.current_savings);
        let gap = (required_monthly - projected_monthly).max(0.0);

        debug!(
            baseline_months = aggregates.len(),
            status = status.as_str(),
            required = required_monthly,
            projected = projected_monthly,
            gap,
            "Forecast computed"
        );

        let suggestions = if gap > 0.0 {
            let history = category_history(&aggregates);
            let baseline_months: Vec<MonthKey> =
                aggregates.iter().map(|a| a.month).collect();
            self.suggestions
                .generate(
                    &self.config,
                    &resolved,
                    &history,
                    &baseline_months,
                    p50,
                    gap,
                )
                .await
        } else {
            Vec::new()
        };

        Ok(ForecastResult {
            status,
            on_track: status == GoalStatus::OnTrack,
            required_monthly,
            parsed_target_amount: resolved.from_text.then_some(resolved.target_amount),
            parsed_months_to_deadline: resolved.from_text.then_some(resolved.months_to_deadline),
            p10: round_cents(p10),
            p50: round_cents(p50),
            p90: round_cents(p90),
            projected_monthly_to_goal: projected_monthly,
            forecasted_balance_at_deadline_p50: forecasted_balance,
            monthly_gap: round_cents(gap),
            suggestions,
        })
    }

    /// Resolve structured fields, falling back to goal text. Failure to
    /// resolve is a hard error, never a default.
    pub fn resolve_goal(&self, goal: &GoalRequest, today: NaiveDate) -> Result<ResolvedGoal> {
        let current_savings = goal.current_savings.unwrap_or(0.0);
        let buffer = goal.buffer.unwrap_or(0.0);
        if current_savings < 0.0 || buffer < 0.0 {
            return Err(Error::GoalResolution(
                "currentSavings and buffer must be non-negative".to_string(),
            ));
        }
        let protected_categories = goal.protected_categories.clone().unwrap_or_default();

        if let (Some(target), Some(months)) = (goal.target_amount, goal.months_to_deadline) {
            if target >= 1.0 && months >= 1 {
                return Ok(ResolvedGoal {
                    target_amount: target,
                    months_to_deadline: months,
                    current_savings,
                    buffer,
                    protected_categories,
                    from_text: false,
                });
            }
        }

        if let Some(text) = goal.goal_text.as_deref() {
            if let Some(parsed) = self.parser.parse_at(text, today) {
                if parsed.target_amount >= 1.0 {
                    return Ok(ResolvedGoal {
                        target_amount: parsed.target_amount,
                        months_to_deadline: parsed.months_to_deadline,
                        current_savings,
                        buffer,
                        protected_categories,
                        from_text: true,
                    });
                }
            }
            return Err(Error::GoalResolution(format!(
                "could not extract a target amount and future deadline from goal text {text:?}"
            )));
        }

        Err(Error::GoalResolution(
            "goal requires targetAmount >= 1 and monthsToDeadline >= 1, or parseable goal text"
                .to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment::{MockAugmentor, NoopAugmentor};
    use crate::models::{LeverType, Suggestion};

    fn engine() -> ForecastEngine {
        ForecastEngine::new(Box::new(NoopAugmentor))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 15).unwrap()
    }

    fn structured_goal(target: f64, months: u32) -> GoalRequest {
        GoalRequest {
            target_amount: Some(target),
            months_to_deadline: Some(months),
            ..Default::default()
        }
    }

    /// Three baseline months with capacities 800 / 1000 / 1200.
    fn sample_transactions() -> Vec<Transaction> {
        let mut txns = Vec::new();
        for (month, income, dining) in [(1, 3000.0, 700.0), (2, 3000.0, 500.0), (3, 3000.0, 300.0)]
        {
            txns.push(tx(2026, month, 1, income, ""));
            txns.push(tx(2026, month, 2, -1500.0, "Rent"));
            txns.push(tx(2026, month, 10, -dining, "Dining"));
        }
        txns
    }

    fn tx(year: i32, month: u32, day: u32, amount: f64, category: &str) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            amount,
            merchant: "TEST".to_string(),
            category: category.to_string(),
            account: "checking".to_string(),
        }
    }

    #[test]
    fn test_classification_is_total_and_exclusive() {
        assert_eq!(classify(1000.0, 1200.0, 1000.0), GoalStatus::OnTrack);
        assert_eq!(classify(900.0, 1200.0, 1000.0), GoalStatus::Borderline);
        assert_eq!(classify(400.0, 600.0, 1000.0), GoalStatus::OffTrack);
    }

    #[tokio::test]
    async fn test_on_track_when_median_covers_requirement() {
        // Capacities [800, 1000, 1200], required 1000: p50 = 1000 >= 1000
        let result = engine()
            .analyze_at(&sample_transactions(), &structured_goal(3000.0, 3), today())
            .await
            .unwrap();
        assert_eq!(result.status, GoalStatus::OnTrack);
        assert!(result.on_track);
        assert_eq!(result.required_monthly, 1000.0);
        assert_eq!(result.p50, 1000.0);
        assert_eq!(result.monthly_gap, 0.0);
        assert!(result.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_off_track_when_p90_falls_short() {
        // Shift incomes down so capacities are [200, 400, 600]
        let mut txns = sample_transactions();
        for tx in &mut txns {
            if tx.amount > 0.0 {
                tx.amount = 2400.0;
            }
        }
        let result = engine()
            .analyze_at(&txns, &structured_goal(3000.0, 3), today())
            .await
            .unwrap();
        assert_eq!(result.status, GoalStatus::OffTrack);
        assert!(!result.on_track);
        // p90 = 560 < 1000
        assert!(result.p90 < result.required_monthly);
        assert!(result.monthly_gap > 0.0);
        assert!(!result.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_borderline_between_median_and_p90() {
        // Capacities [800, 1000, 1200], required 1100: p50 < 1100 <= p90
        let result = engine()
            .analyze_at(&sample_transactions(), &structured_goal(3300.0, 3), today())
            .await
            .unwrap();
        assert_eq!(result.status, GoalStatus::Borderline);
    }

    #[tokio::test]
    async fn test_percentiles_are_monotonic() {
        let result = engine()
            .analyze_at(&sample_transactions(), &structured_goal(3000.0, 3), today())
            .await
            .unwrap();
        assert!(result.p10 <= result.p50 && result.p50 <= result.p90);
    }

    #[tokio::test]
    async fn test_buffer_reduces_projection_and_floors_at_zero() {
        let mut goal = structured_goal(3000.0, 3);
        goal.buffer = Some(200.0);
        let result = engine()
            .analyze_at(&sample_transactions(), &goal, today())
            .await
            .unwrap();
        // p50 1000 - buffer 200
        assert_eq!(result.projected_monthly_to_goal, 800.0);

        goal.buffer = Some(5000.0);
        let result = engine()
            .analyze_at(&sample_transactions(), &goal, today())
            .await
            .unwrap();
        assert_eq!(result.projected_monthly_to_goal, 0.0);
    }

    #[tokio::test]
    async fn test_current_savings_reduce_requirement_and_seed_balance() {
        let mut goal = structured_goal(3000.0, 3);
        goal.current_savings = Some(600.0);
        let result = engine()
            .analyze_at(&sample_transactions(), &goal, today())
            .await
            .unwrap();
        assert_eq!(result.required_monthly, 800.0);
        // projected 1000 * 3 months + savings 600
        assert_eq!(result.forecasted_balance_at_deadline_p50, 3600.0);
    }

    #[tokio::test]
    async fn test_empty_history_is_valid_with_zero_capacity() {
        let result = engine()
            .analyze_at(&[], &structured_goal(1200.0, 6), today())
            .await
            .unwrap();
        assert_eq!(result.p10, 0.0);
        assert_eq!(result.p50, 0.0);
        assert_eq!(result.p90, 0.0);
        assert_eq!(result.status, GoalStatus::OffTrack);
        assert_eq!(result.monthly_gap, result.required_monthly);
    }

    #[tokio::test]
    async fn test_goal_text_fallback_populates_parsed_echo() {
        let goal = GoalRequest {
            goal_text: Some("Save $2.5k in 6 months".to_string()),
            ..Default::default()
        };
        let result = engine()
            .analyze_at(&sample_transactions(), &goal, today())
            .await
            .unwrap();
        assert_eq!(result.parsed_target_amount, Some(2500.0));
        assert_eq!(result.parsed_months_to_deadline, Some(6));
    }

    #[tokio::test]
    async fn test_unresolvable_goal_is_a_hard_error() {
        let empty = GoalRequest::default();
        assert!(matches!(
            engine().analyze_at(&[], &empty, today()).await,
            Err(Error::GoalResolution(_))
        ));

        let vague = GoalRequest {
            goal_text: Some("save some money soon".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            engine().analyze_at(&[], &vague, today()).await,
            Err(Error::GoalResolution(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_structured_goal_without_text_rejected() {
        let goal = structured_goal(0.5, 0);
        assert!(matches!(
            engine().analyze_at(&[], &goal, today()).await,
            Err(Error::GoalResolution(_))
        ));
    }

    #[tokio::test]
    async fn test_negative_savings_rejected() {
        let mut goal = structured_goal(1000.0, 5);
        goal.current_savings = Some(-1.0);
        assert!(matches!(
            engine().analyze_at(&[], &goal, today()).await,
            Err(Error::GoalResolution(_))
        ));
    }

    #[tokio::test]
    async fn test_augmentation_results_appended_after_built_in_levers() {
        let extra = Suggestion {
            title: "Meal-prep Sundays".to_string(),
            action: "Prep lunches for the week in one session".to_string(),
            rationale: "Estimate based on recent Dining spend".to_string(),
            lever_type: LeverType::VariableTrim,
            impact_per_month: 40.0,
            new_months_to_deadline: None,
            new_required_monthly: None,
        };
        let engine = ForecastEngine::new(Box::new(MockAugmentor::returning(vec![extra])));
        let result = engine
            .analyze_at(&sample_transactions(), &structured_goal(9000.0, 3), today())
            .await
            .unwrap();
        let last = result.suggestions.last().unwrap();
        assert_eq!(last.title, "Meal-prep Sundays");
        // Built-in income lever sits just before the augmented tail
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.lever_type == LeverType::Income));
    }

    #[tokio::test]
    async fn test_augmentation_failure_never_fails_analysis() {
        let engine = ForecastEngine::new(Box::new(MockAugmentor::failing()));
        let result = engine
            .analyze_at(&sample_transactions(), &structured_goal(9000.0, 3), today())
            .await
            .unwrap();
        // Built-in levers still present
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.lever_type == LeverType::Timeline));
    }
}
