//!
//! Fill level thresholds and worst-status evaluation
//!
use std::{collections::HashMap, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use log::{debug, warn};

use crate::{consumable::normalize_label, error::InkError, model::Status};

/// Warning and critical levels for one marker color.
///
/// Levels are "remaining" percentages, so lower values are worse.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FillLevelCheck {
    pub label: String,
    pub warning: i32,
    pub critical: i32,
}

impl FillLevelCheck {
    /// Create fill level check
    pub fn new<S: AsRef<str>>(label: S, warning: i32, critical: i32) -> FillLevelCheck {
        if warning < critical {
            warn!(
                "Warning level {} is below critical level {} for {}",
                warning,
                critical,
                label.as_ref()
            );
        }
        FillLevelCheck {
            label: label.as_ref().to_owned(),
            warning,
            critical,
        }
    }

    /// Split a flat argument list into `(label, warning, critical)` triples
    pub fn from_groups<S: AsRef<str>>(values: &[S]) -> Result<Vec<FillLevelCheck>, InkError> {
        if values.len() % 3 != 0 {
            return Err(InkError::InvalidCheck(format!(
                "expected color, warning and critical levels, got {} values",
                values.len()
            )));
        }

        values
            .chunks_exact(3)
            .map(|group| {
                let label = group[0].as_ref();
                let warning = parse_level(label, group[1].as_ref())?;
                let critical = parse_level(label, group[2].as_ref())?;
                Ok(FillLevelCheck::new(label, warning, critical))
            })
            .collect()
    }

    /// Status implied by `value`. The critical level is tested first.
    pub fn status_for(&self, value: i32) -> Status {
        if value <= self.critical {
            Status::Critical
        } else if value <= self.warning {
            Status::Warning
        } else {
            Status::Ok
        }
    }
}

fn parse_level(label: &str, value: &str) -> Result<i32, InkError> {
    value
        .trim()
        .parse()
        .map_err(|_| InkError::InvalidCheck(format!("level '{value}' for {label} is not an integer")))
}

impl fmt::Display for FillLevelCheck {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (warning {}, critical {})", self.label, self.warning, self.critical)
    }
}

/// Result of a single check
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub check: FillLevelCheck,
    /// Reported level, `None` if the device did not report this color
    pub value: Option<i32>,
    pub status: Status,
}

/// Reduced result of all checks
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Verdict {
    pub status: Status,
    /// Per-check outcomes in request order
    pub outcomes: Vec<Outcome>,
}

/// Evaluates a set of fill level checks against reported levels
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    checks: Vec<FillLevelCheck>,
}

impl Evaluator {
    /// Create evaluator
    pub fn new(checks: Vec<FillLevelCheck>) -> Evaluator {
        Evaluator { checks }
    }

    /// Configured checks
    pub fn checks(&self) -> &[FillLevelCheck] {
        &self.checks
    }

    /// Evaluate every check against `levels`, which must be keyed by normalized label.
    ///
    /// Labels missing from `levels` report `Unknown` and never mask an evaluated status.
    pub fn evaluate(&self, levels: &HashMap<String, i32>) -> Verdict {
        let mut verdict = Verdict::default();

        for check in &self.checks {
            let value = levels.get(&normalize_label(&check.label)).copied();
            let status = value.map_or(Status::Unknown, |v| check.status_for(v));
            debug!("Check {}: value {:?}, status {}", check, value, status);

            verdict.status = verdict.status.worst(status);
            verdict.outcomes.push(Outcome {
                check: check.clone(),
                value,
                status,
            });
        }
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(pairs: &[(&str, i32)]) -> HashMap<String, i32> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_status_for() {
        let check = FillLevelCheck::new("black", 20, 10);
        assert_eq!(check.status_for(50), Status::Ok);
        assert_eq!(check.status_for(21), Status::Ok);
        assert_eq!(check.status_for(20), Status::Warning);
        assert_eq!(check.status_for(11), Status::Warning);
        assert_eq!(check.status_for(10), Status::Critical);
        assert_eq!(check.status_for(0), Status::Critical);
    }

    #[test]
    fn test_inverted_levels_prefer_critical() {
        let check = FillLevelCheck::new("black", 10, 20);
        assert_eq!(check.status_for(15), Status::Critical);
        assert_eq!(check.status_for(21), Status::Ok);
    }

    #[test]
    fn test_from_groups() {
        let checks = FillLevelCheck::from_groups(&["black", "20", "10", "Cyan", " 30", "5 "]).unwrap();
        assert_eq!(
            checks,
            vec![FillLevelCheck::new("black", 20, 10), FillLevelCheck::new("Cyan", 30, 5)]
        );
    }

    #[test]
    fn test_from_groups_incomplete() {
        assert!(matches!(
            FillLevelCheck::from_groups(&["black", "20"]),
            Err(InkError::InvalidCheck(_))
        ));
    }

    #[test]
    fn test_from_groups_not_a_number() {
        assert!(matches!(
            FillLevelCheck::from_groups(&["black", "twenty", "10"]),
            Err(InkError::InvalidCheck(_))
        ));
    }

    #[test]
    fn test_worst_status_wins() {
        let evaluator = Evaluator::new(vec![
            FillLevelCheck::new("cyan", 20, 10),
            FillLevelCheck::new("black", 20, 10),
            FillLevelCheck::new("yellow", 20, 10),
        ]);

        let verdict = evaluator.evaluate(&levels(&[("cyan", 5), ("black", 15), ("yellow", 80)]));
        assert_eq!(verdict.status, Status::Critical);
        let statuses = verdict.outcomes.iter().map(|o| o.status).collect::<Vec<_>>();
        assert_eq!(statuses, vec![Status::Critical, Status::Warning, Status::Ok]);
    }

    #[test]
    fn test_warning_after_ok() {
        let evaluator = Evaluator::new(vec![
            FillLevelCheck::new("black", 20, 10),
            FillLevelCheck::new("cyan", 20, 10),
        ]);

        let verdict = evaluator.evaluate(&levels(&[("black", 90), ("cyan", 15)]));
        assert_eq!(verdict.status, Status::Warning);
    }

    #[test]
    fn test_label_lookup_is_case_insensitive() {
        let evaluator = Evaluator::new(vec![FillLevelCheck::new(" BLACK ", 20, 10)]);

        let verdict = evaluator.evaluate(&levels(&[("black", 90)]));
        assert_eq!(verdict.status, Status::Ok);
        assert_eq!(verdict.outcomes[0].value, Some(90));
    }

    #[test]
    fn test_missing_label_does_not_mask() {
        let evaluator = Evaluator::new(vec![
            FillLevelCheck::new("photo", 20, 10),
            FillLevelCheck::new("black", 20, 10),
        ]);

        let verdict = evaluator.evaluate(&levels(&[("black", 90)]));
        assert_eq!(verdict.status, Status::Ok);
        assert_eq!(verdict.outcomes[0].status, Status::Unknown);
        assert_eq!(verdict.outcomes[0].value, None);
    }

    #[test]
    fn test_nothing_matched_is_unknown() {
        let evaluator = Evaluator::new(vec![FillLevelCheck::new("photo", 20, 10)]);
        assert_eq!(evaluator.evaluate(&levels(&[("black", 90)])).status, Status::Unknown);

        let evaluator = Evaluator::new(Vec::new());
        let verdict = evaluator.evaluate(&levels(&[("black", 90)]));
        assert_eq!(verdict.status, Status::Unknown);
        assert!(verdict.outcomes.is_empty());
    }
}
