//!
//! Plugin output formatting
//!
use std::fmt;

use crate::{
    error::InkError,
    model::Status,
    threshold::{Outcome, Verdict},
};

/// Single line of plugin output: `STATUS: summary|perfdata`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    status: Status,
    summary: String,
    perfdata: String,
}

impl Report {
    /// Build report from an evaluated verdict
    pub fn from_verdict(verdict: &Verdict) -> Report {
        let summary = verdict.outcomes.iter().map(summary_item).collect::<Vec<_>>().join(", ");

        let perfdata = verdict
            .outcomes
            .iter()
            .filter_map(perfdata_item)
            .collect::<Vec<_>>()
            .join(" ");

        Report {
            status: verdict.status,
            summary,
            perfdata,
        }
    }

    /// Build an UNKNOWN report from an error which prevented evaluation
    pub fn from_error(error: &InkError) -> Report {
        Report {
            status: Status::Unknown,
            summary: error.to_string(),
            perfdata: String::new(),
        }
    }

    /// Reported status
    pub fn status(&self) -> Status {
        self.status
    }
}

fn summary_item(outcome: &Outcome) -> String {
    let label = outcome.check.label.trim();
    match outcome.value {
        Some(value) if outcome.status == Status::Ok => format!("{label} {value}%"),
        Some(value) => format!("{label} {value}% ({})", outcome.status),
        None => format!("{label} not reported"),
    }
}

fn perfdata_item(outcome: &Outcome) -> Option<String> {
    let value = outcome.value?;
    // 'label'=value%;warn;crit;min;max, `@~:N` alerts at or below N
    Some(format!(
        "'{}'={}%;@~:{};@~:{};0;100",
        outcome.check.label.trim().replace('\'', "''"),
        value,
        outcome.check.warning,
        outcome.check.critical
    ))
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.status)?;
        if !self.summary.is_empty() {
            write!(f, ": {}", self.summary)?;
        }
        if !self.perfdata.is_empty() {
            write!(f, "|{}", self.perfdata)?;
        }
        Ok(())
    }
}
