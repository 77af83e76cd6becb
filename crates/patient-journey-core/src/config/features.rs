//! Feature extraction policies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do when a journey would end before it starts.
///
/// Only reachable with [`JourneyEndPolicy::LatestStop`], when every parseable
/// `STOP` predates the earliest parseable `START`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeSpanPolicy {
    /// Exclude the patient and report the record as malformed.
    #[default]
    Reject,
    /// Keep the patient with a zero-length journey.
    Clamp,
}

/// How the journey end is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyEndPolicy {
    /// Latest parseable `STOP`, or the journey start when none parses.
    #[default]
    LatestStop,
    /// Latest of every parseable `START` and `STOP`.
    LatestEvent,
}

/// Feature extraction configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub negative_span: NegativeSpanPolicy,
    pub journey_end: JourneyEndPolicy,
}

impl FromStr for NegativeSpanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "clamp" => Ok(Self::Clamp),
            other => Err(format!("unknown negative span policy '{}'", other)),
        }
    }
}

impl FromStr for JourneyEndPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "latest_stop" => Ok(Self::LatestStop),
            "latest_event" => Ok(Self::LatestEvent),
            other => Err(format!("unknown journey end policy '{}'", other)),
        }
    }
}

impl fmt::Display for NegativeSpanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reject => "reject",
            Self::Clamp => "clamp",
        })
    }
}

impl fmt::Display for JourneyEndPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LatestStop => "latest_stop",
            Self::LatestEvent => "latest_event",
        })
    }
}
