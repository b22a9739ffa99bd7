//!
//! Base check definitions
//!
use std::{fmt, process, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use enum_primitive_derive::Primitive;

/// Check status as understood by Nagios-compatible monitoring.
///
/// The discriminant is the process exit code.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Primitive, Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Status {
    Ok = 0,
    Warning = 1,
    Critical = 2,
    #[default]
    Unknown = 3,
}

impl Status {
    /// Exit code reported to the monitoring framework
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Rank used when several statuses are reduced to one.
    ///
    /// `Unknown` ranks lowest: it stands for "nothing evaluated yet" and is replaced by any real result.
    pub fn priority(self) -> u8 {
        match self {
            Status::Unknown => 0,
            Status::Ok => 1,
            Status::Warning => 2,
            Status::Critical => 3,
        }
    }

    /// Return the status with the higher priority
    pub fn worst(self, other: Status) -> Status {
        if other.priority() > self.priority() {
            other
        } else {
            self
        }
    }

    /// Terminate the process with this status as the exit code
    pub fn exit(self) -> ! {
        process::exit(self.code())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// Error returned when a string is not a status name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unexpected status: {0}")]
pub struct ParseStatusError(String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ok" => Ok(Status::Ok),
            "warn" | "warning" => Ok(Status::Warning),
            "crit" | "critical" => Ok(Status::Critical),
            "unknown" => Ok(Status::Unknown),
            _ => Err(ParseStatusError(s.to_owned())),
        }
    }
}
