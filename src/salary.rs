use serde::Serialize;
use std::fmt;

use crate::models::{RecommendationResult, ScoredPosting};

/// A result split by the user's expected salary. Both halves keep result order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SalaryPartition<'a> {
    pub shown: Vec<ScoredPosting<'a>>,
    pub hidden: Vec<ScoredPosting<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum SalaryOutcome {
    NoMatches,
    NoneWithinSalary,
    Partial { shown: usize, total: usize },
    AllWithinSalary { total: usize },
}

impl fmt::Display for SalaryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SalaryOutcome::NoMatches => write!(f, "No job matches your criteria."),
            SalaryOutcome::NoneWithinSalary => {
                write!(f, "No job has a minimum salary within your expected salary.")
            }
            SalaryOutcome::Partial { shown, total } => write!(
                f,
                "Only {} of {} jobs have a salary within your expectation.",
                shown, total
            ),
            SalaryOutcome::AllWithinSalary { total } => {
                write!(f, "All {} jobs meet your salary expectation.", total)
            }
        }
    }
}

impl<'a> SalaryPartition<'a> {
    pub fn total(&self) -> usize {
        self.shown.len() + self.hidden.len()
    }

    pub fn outcome(&self) -> SalaryOutcome {
        let total = self.total();
        if total == 0 {
            SalaryOutcome::NoMatches
        } else if self.shown.is_empty() {
            SalaryOutcome::NoneWithinSalary
        } else if self.shown.len() < total {
            SalaryOutcome::Partial {
                shown: self.shown.len(),
                total,
            }
        } else {
            SalaryOutcome::AllWithinSalary { total }
        }
    }
}

/// Postings whose minimum salary is at most `expected` are shown; postings
/// with no minimum salary are shown as well.
pub fn partition_by_salary<'a>(result: &RecommendationResult<'a>, expected: f64) -> SalaryPartition<'a> {
    let (shown, hidden): (Vec<_>, Vec<_>) = result
        .iter()
        .cloned()
        .partition(|entry| entry.posting.min_salary.is_none_or(|min| min <= expected));
    SalaryPartition { shown, hidden }
}
