//! Core data model for forecast analysis
//!
//! Wire field names are camelCase (the shape the web client consumes);
//! enum values are snake_case strings.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single account transaction. Positive amounts are inflows, negative
/// amounts are outflows. Immutable once parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: f64,
    pub merchant: String,
    pub category: String,
    pub account: String,
}

/// A calendar month (year + month, day discarded). Orders chronologically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Goal payload supplied by the caller.
///
/// Either the structured fields or `goal_text` must resolve to a usable
/// target; resolution failure is a hard error, never a silent default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoalRequest {
    pub target_amount: Option<f64>,
    pub months_to_deadline: Option<u32>,
    pub current_savings: Option<f64>,
    pub buffer: Option<f64>,
    pub protected_categories: Option<Vec<String>>,
    pub goal_text: Option<String>,
}

/// A goal after resolution: always carries a usable target and month count.
#[derive(Debug, Clone)]
pub struct ResolvedGoal {
    pub target_amount: f64,
    pub months_to_deadline: u32,
    pub current_savings: f64,
    pub buffer: f64,
    pub protected_categories: Vec<String>,
    /// True when the target came from free text rather than structured fields
    pub from_text: bool,
}

/// Whether the goal is achievable on current capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Median capacity covers the required monthly contribution
    OnTrack,
    /// Only the optimistic (p90) capacity covers it
    Borderline,
    /// Even p90 capacity falls short
    OffTrack,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::OnTrack => "on_track",
            GoalStatus::Borderline => "borderline",
            GoalStatus::OffTrack => "off_track",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_track" => Ok(GoalStatus::OnTrack),
            "borderline" => Ok(GoalStatus::Borderline),
            "off_track" => Ok(GoalStatus::OffTrack),
            _ => Err(format!("Unknown goal status: {}", s)),
        }
    }
}

/// The kind of behavior change a suggestion proposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeverType {
    /// Reduce spend in a discretionary category
    VariableTrim,
    /// Cancel or pause recurring subscriptions
    SubscriptionCleanup,
    /// Add a small monthly income boost
    Income,
    /// Extend the deadline instead of changing cash flow
    Timeline,
}

impl LeverType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeverType::VariableTrim => "variable_trim",
            LeverType::SubscriptionCleanup => "subscription_cleanup",
            LeverType::Income => "income",
            LeverType::Timeline => "timeline",
        }
    }
}

impl fmt::Display for LeverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LeverType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "variable_trim" => Ok(LeverType::VariableTrim),
            "subscription_cleanup" => Ok(LeverType::SubscriptionCleanup),
            "income" => Ok(LeverType::Income),
            "timeline" => Ok(LeverType::Timeline),
            _ => Err(format!("Unknown lever type: {}", s)),
        }
    }
}

/// An actionable behavior-change suggestion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub title: String,
    pub action: String,
    pub rationale: String,
    pub lever_type: LeverType,
    /// Estimated monthly impact in currency units, never negative
    #[serde(default)]
    pub impact_per_month: f64,
    /// Set by the timeline lever only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_months_to_deadline: Option<u32>,
    /// Set by the timeline lever only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_required_monthly: Option<f64>,
}

/// One calendar month of aggregated cash flow (derived, never persisted)
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyAggregate {
    pub month: MonthKey,
    /// Sum of positive amounts
    pub income: f64,
    /// Sum of outflows whose category is in the fixed set
    pub fixed_expense: f64,
    /// Sum of every other outflow
    pub variable_expense: f64,
    /// All outflows grouped by normalized category
    pub category_spend: BTreeMap<String, f64>,
}

/// The full analysis outcome, computed fresh per request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub status: GoalStatus,
    pub on_track: bool,
    pub required_monthly: f64,
    /// Echo of the target extracted from free text, when that path was taken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_target_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_months_to_deadline: Option<u32>,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
    /// Monthly amount realistically available for the goal (after buffer)
    pub projected_monthly_to_goal: f64,
    pub forecasted_balance_at_deadline_p50: f64,
    /// `max(0, required - projected)`; drives the suggestion engine
    pub monthly_gap: f64,
    pub suggestions: Vec<Suggestion>,
}
