use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A pupil record as stored in the `students` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    #[serde(rename = "lastName")]
    pub last_name: String,
}

/// A trimester. Exactly one period is active at a time; the active period
/// drives game difficulty for sessions created without an explicit period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRecord {
    #[serde(rename = "_id")]
    pub id: i32,
    pub active: bool,
}

pub const PERIOD_COUNT: i32 = 3;
