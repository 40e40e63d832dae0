//! Heuristic parser for plain-English savings goals
//!
//! Handles phrasings like:
//! - "Save $5,000 by 2026-06-15"
//! - "Put aside 3k in 6 months"
//! - "$1200 for a trip within 180 days"
//! - "$2.5k by December 2026"
//!
//! Extraction runs an ordered list of independent matchers, first match
//! wins. Absolute deadlines take priority over relative ("in N months")
//! phrasings.

use chrono::{Datelike, Local, Months, NaiveDate};
use regex::Regex;

use crate::stats::round_cents;

/// Outcome of a successful goal text parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedGoal {
    pub target_amount: f64,
    pub months_to_deadline: u32,
    pub deadline: NaiveDate,
}

/// A single amount-extraction strategy.
trait AmountPattern: Send + Sync {
    fn extract(&self, text: &str) -> Option<f64>;
}

/// A single absolute-deadline strategy, resolved against `today`.
trait DeadlinePattern: Send + Sync {
    fn extract(&self, text: &str, today: NaiveDate) -> Option<NaiveDate>;
}

const MONTH_NAMES: &str =
    "january|february|march|april|may|june|july|august|september|october|november|december";

fn month_number(name: &str) -> Option<u32> {
    let idx = MONTH_NAMES
        .split('|')
        .position(|m| m.eq_ignore_ascii_case(name))?;
    Some(idx as u32 + 1)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// `$1,234.56` style amounts.
///
/// The comma-grouped alternative is tried first so "$5,000" reads as 5000,
/// and a trailing digit or magnitude-suffix guard keeps "$300" from being
/// carved out of "$3000" and leaves "$2.5k" to the suffix matcher.
struct DollarAmount {
    re: Regex,
}

impl DollarAmount {
    fn new() -> Self {
        Self {
            re: Regex::new(
                r"\$\s*((?:[0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)(?:\.[0-9]{1,2})?)([0-9kKmMbB])?",
            )
            .expect("valid regex"),
        }
    }
}

impl AmountPattern for DollarAmount {
    fn extract(&self, text: &str) -> Option<f64> {
        for caps in self.re.captures_iter(text) {
            if caps.get(2).is_some() {
                continue;
            }
            return caps[1].replace(',', "").parse().ok();
        }
        None
    }
}

/// Bare number followed by a currency word: "1200 dollars", "50 bucks".
struct WordAmount {
    re: Regex,
}

impl WordAmount {
    fn new() -> Self {
        Self {
            re: Regex::new(r"(?i)([0-9]+(?:\.[0-9]{1,2})?)\s*(?:usd|dollars|bucks)")
                .expect("valid regex"),
        }
    }
}

impl AmountPattern for WordAmount {
    fn extract(&self, text: &str) -> Option<f64> {
        let caps = self.re.captures(text)?;
        caps[1].parse().ok()
    }
}

/// Number with a magnitude suffix: "3k", "2.5K", "1m".
struct SuffixAmount {
    re: Regex,
}

impl SuffixAmount {
    fn new() -> Self {
        Self {
            re: Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*([kmbKMB])").expect("valid regex"),
        }
    }
}

impl AmountPattern for SuffixAmount {
    fn extract(&self, text: &str) -> Option<f64> {
        let caps = self.re.captures(text)?;
        let base: f64 = caps[1].parse().ok()?;
        let multiplier = match caps[2].to_ascii_lowercase().as_str() {
            "k" => 1_000.0,
            "m" => 1_000_000.0,
            "b" => 1_000_000_000.0,
            _ => return None,
        };
        Some(base * multiplier)
    }
}

/// "by 2026-06-15"
struct IsoDate {
    re: Regex,
}

impl IsoDate {
    fn new() -> Self {
        Self {
            re: Regex::new(r"(?i)by\s+([0-9]{4}-[0-9]{2}-[0-9]{2})").expect("valid regex"),
        }
    }
}

impl DeadlinePattern for IsoDate {
    fn extract(&self, text: &str, _today: NaiveDate) -> Option<NaiveDate> {
        let caps = self.re.captures(text)?;
        NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()
    }
}

/// "by 12/31/2026" or "by 12/31/26"; format chosen by token length.
struct SlashDate {
    re: Regex,
}

impl SlashDate {
    fn new() -> Self {
        Self {
            re: Regex::new(r"(?i)by\s+([0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4})").expect("valid regex"),
        }
    }
}

impl DeadlinePattern for SlashDate {
    fn extract(&self, text: &str, _today: NaiveDate) -> Option<NaiveDate> {
        let caps = self.re.captures(text)?;
        let raw = &caps[1];
        let format = if raw.len() == 10 { "%m/%d/%Y" } else { "%m/%d/%y" };
        NaiveDate::parse_from_str(raw, format).ok()
    }
}

/// "by March 2026", "by March 5 2026", "by March 5, 2026", "by March".
///
/// Missing year defaults to the current year, missing day to the last day
/// of the month. The word boundary after the day group keeps a 4-digit year
/// from being misread as a day.
struct NamedMonth {
    re: Regex,
}

impl NamedMonth {
    fn new() -> Self {
        Self {
            re: Regex::new(&format!(
                r"(?i)by\s+({MONTH_NAMES})\s*(?:([0-9]{{1,2}})\b)?\s*,?\s*([0-9]{{4}})?"
            ))
            .expect("valid regex"),
        }
    }
}

impl DeadlinePattern for NamedMonth {
    fn extract(&self, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        let caps = self.re.captures(text)?;
        let month = month_number(&caps[1])?;
        let year = caps
            .get(3)
            .map(|y| y.as_str().parse().ok())
            .unwrap_or(Some(today.year()))?;
        match caps.get(2) {
            Some(day) => NaiveDate::from_ymd_opt(year, month, day.as_str().parse().ok()?),
            None => last_day_of_month(year, month),
        }
    }
}

/// "by end of March [2026]" - always the last day of the month.
struct EndOfMonth {
    re: Regex,
}

impl EndOfMonth {
    fn new() -> Self {
        Self {
            re: Regex::new(&format!(
                r"(?i)by\s+end\s+of\s+({MONTH_NAMES})\s*([0-9]{{4}})?"
            ))
            .expect("valid regex"),
        }
    }
}

impl DeadlinePattern for EndOfMonth {
    fn extract(&self, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        let caps = self.re.captures(text)?;
        let month = month_number(&caps[1])?;
        let year = caps
            .get(2)
            .map(|y| y.as_str().parse().ok())
            .unwrap_or(Some(today.year()))?;
        last_day_of_month(year, month)
    }
}

/// "by next March" - rolls to next year when the month has already started.
struct NextMonth {
    re: Regex,
}

impl NextMonth {
    fn new() -> Self {
        Self {
            re: Regex::new(&format!(r"(?i)by\s+next\s+({MONTH_NAMES})")).expect("valid regex"),
        }
    }
}

impl DeadlinePattern for NextMonth {
    fn extract(&self, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        let caps = self.re.captures(text)?;
        let month = month_number(&caps[1])?;
        let mut year = today.year();
        if month <= today.month() {
            year += 1;
        }
        last_day_of_month(year, month)
    }
}

/// "in 6 months", "within 180 days", "in 2 years" - relative deadlines,
/// normalized to whole months.
struct RelativeDeadline {
    re: Regex,
}

impl RelativeDeadline {
    fn new() -> Self {
        Self {
            re: Regex::new(r"(?i)(?:in|within)\s+([0-9]{1,4})\s*(day|days|month|months|year|years)")
                .expect("valid regex"),
        }
    }

    fn extract_months(&self, text: &str) -> Option<u32> {
        let caps = self.re.captures(text)?;
        let n: u32 = caps[1].parse().ok()?;
        let unit = caps[2].to_ascii_lowercase();
        if unit.starts_with("day") {
            // 30-day months, rounded up
            Some(((n as f64 / 30.0).ceil() as u32).max(1))
        } else if unit.starts_with("month") {
            Some(n.max(1))
        } else {
            Some((n * 12).max(1))
        }
    }
}

/// Whole-month count from `today` to an absolute deadline.
///
/// A deadline not strictly after today yields 0 (rejected by the caller).
/// Otherwise the month delta rounds up when the deadline's day-of-month has
/// reached today's, with a floor of one month.
fn months_until(today: NaiveDate, deadline: NaiveDate) -> u32 {
    if deadline <= today {
        return 0;
    }
    let mut months = (deadline.year() - today.year()) * 12
        + (deadline.month() as i32 - today.month() as i32);
    if deadline.day() >= today.day() {
        months += 1;
    }
    months.max(1) as u32
}

/// Heuristic goal text parser.
///
/// Construction compiles every pattern once; `parse` is cheap after that.
pub struct GoalTextParser {
    amounts: Vec<Box<dyn AmountPattern>>,
    deadlines: Vec<Box<dyn DeadlinePattern>>,
    relative: RelativeDeadline,
}

impl Default for GoalTextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl GoalTextParser {
    pub fn new() -> Self {
        Self {
            amounts: vec![
                Box::new(DollarAmount::new()),
                Box::new(WordAmount::new()),
                Box::new(SuffixAmount::new()),
            ],
            deadlines: vec![
                Box::new(IsoDate::new()),
                Box::new(SlashDate::new()),
                Box::new(NamedMonth::new()),
                Box::new(EndOfMonth::new()),
                Box::new(NextMonth::new()),
            ],
            relative: RelativeDeadline::new(),
        }
    }

    /// Parse against the local calendar date.
    pub fn parse(&self, text: &str) -> Option<ParsedGoal> {
        self.parse_at(text, Local::now().date_naive())
    }

    /// Parse with an explicit "today". Deterministic; what tests use.
    pub fn parse_at(&self, text: &str, today: NaiveDate) -> Option<ParsedGoal> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let amount = self.amounts.iter().find_map(|p| p.extract(text))?;
        if amount <= 0.0 {
            return None;
        }

        let (deadline, months) = match self.deadlines.iter().find_map(|p| p.extract(text, today)) {
            Some(date) => (date, months_until(today, date)),
            None => {
                let months = self.relative.extract_months(text)?;
                let advanced = today.checked_add_months(Months::new(months))?;
                let date = last_day_of_month(advanced.year(), advanced.month())?;
                (date, months)
            }
        };
        if months == 0 {
            return None;
        }

        Some(ParsedGoal {
            target_amount: round_cents(amount),
            months_to_deadline: months,
            deadline,
        })
    }
}
