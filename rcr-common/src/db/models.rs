//! Entity models for the Rod Catch Returns schema

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Submission lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Incomplete,
    Submitted,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Incomplete => "INCOMPLETE",
            SubmissionStatus::Submitted => "SUBMITTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INCOMPLETE" => Some(SubmissionStatus::Incomplete),
            "SUBMITTED" => Some(SubmissionStatus::Submitted),
            _ => None,
        }
    }
}

/// How a submission reached the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionSource {
    Web,
    Paper,
}

impl SubmissionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionSource::Web => "WEB",
            SubmissionSource::Paper => "PAPER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "WEB" => Some(SubmissionSource::Web),
            "PAPER" => Some(SubmissionSource::Paper),
            _ => None,
        }
    }
}

/// Which unit the angler reported a catch mass in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MassType {
    Metric,
    Imperial,
}

impl MassType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MassType::Metric => "METRIC",
            MassType::Imperial => "IMPERIAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "METRIC" => Some(MassType::Metric),
            "IMPERIAL" => Some(MassType::Imperial),
            _ => None,
        }
    }
}

/// An angler's annual catch return for one season
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub contact_id: String,
    pub season: i64,
    pub status: SubmissionStatus,
    pub source: SubmissionSource,
    pub reporting_exclude: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Days fished on one river within a submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub river_id: Uuid,
    pub days_fished_with_mandatory_release: i64,
    pub days_fished_other: i64,
}

/// An individually recorded catch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catch {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub date_caught: NaiveDate,
    pub species_id: Uuid,
    pub method_id: Uuid,
    pub mass_type: MassType,
    pub mass_kg: f64,
    pub mass_oz: f64,
    pub released: bool,
    pub only_month_recorded: bool,
    pub no_date_recorded: bool,
    pub reporting_exclude: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Monthly counts of small sea trout, by method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmallCatch {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub month: u32,
    pub fly_count: i64,
    pub spinner_count: i64,
    pub bait_count: i64,
    pub unknown_count: i64,
    pub released: i64,
    pub reporting_exclude: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SmallCatch {
    /// Total fish counted across all methods
    pub fn total_count(&self) -> i64 {
        self.fly_count + self.spinner_count + self.bait_count + self.unknown_count
    }
}

/// A fishable river (reference data)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct River {
    pub id: Uuid,
    pub name: String,
    pub internal: bool,
}

/// A catchable species (reference data)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    pub id: Uuid,
    pub name: String,
    /// Assumed mass of one small catch, used by reporting
    pub small_catch_mass_kg: f64,
}

/// A fishing method (reference data)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    pub id: Uuid,
    pub name: String,
    pub internal: bool,
}

/// A monitoring gate for grilse probability data (reference data)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrilseWeightGate {
    pub id: i64,
    pub name: String,
}

/// One stored weight-by-month grilse probability value
///
/// `probability` is kept as the uploaded text token so reporting can
/// reproduce it without any reformatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrilseProbability {
    pub id: Uuid,
    pub season: i64,
    pub gate_id: i64,
    pub month: u32,
    pub mass_lbs: i64,
    pub probability: String,
    pub version: DateTime<Utc>,
}
