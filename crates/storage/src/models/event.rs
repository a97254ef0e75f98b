use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Kind of timed activity within a race weekend.
///
/// Unknown upstream values are kept verbatim in `Other` so a re-sync never
/// loses information.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionType {
    FirstPractice,
    SecondPractice,
    ThirdPractice,
    Qualifying,
    SprintQualifying,
    SprintRace,
    MainRace,
    Other(String),
}

impl SessionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::FirstPractice => "FirstPractice",
            Self::SecondPractice => "SecondPractice",
            Self::ThirdPractice => "ThirdPractice",
            Self::Qualifying => "Qualifying",
            Self::SprintQualifying => "SprintQualifying",
            Self::SprintRace => "SprintRace",
            Self::MainRace => "MainRace",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for SessionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "FirstPractice" => Self::FirstPractice,
            "SecondPractice" => Self::SecondPractice,
            "ThirdPractice" => Self::ThirdPractice,
            "Qualifying" => Self::Qualifying,
            "SprintQualifying" | "SprintShootOut" => Self::SprintQualifying,
            "SprintRace" => Self::SprintRace,
            "MainRace" => Self::MainRace,
            // Some seasons report e.g. "FirstPracticeSession"
            other if other.contains("FirstPractice") => Self::FirstPractice,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for SessionType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<SessionType> for String {
    fn from(value: SessionType) -> Self {
        match value {
            SessionType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    #[serde(rename = "type")]
    #[schema(value_type = String)]
    pub session_type: SessionType,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// One race weekend as stored in the calendar.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub event_id: String,
    pub season_year: i32,
    pub name: String,
    pub sprint_flag: bool,
    /// First-practice start; predictions lock here.
    pub weekend_start: DateTime<Utc>,
    /// Main-race end, or main-race start plus three hours when no end is reported.
    pub weekend_end: DateTime<Utc>,
    #[sqlx(json)]
    pub sessions: Vec<Session>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// `"{event_id}-{season_year}"`, used in log lines and marker keys.
    pub fn key(&self) -> String {
        format!("{}-{}", self.event_id, self.season_year)
    }
}

/// Calendar entry derived from the upstream schedule, ready to be upserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSchedule {
    pub event_id: String,
    pub season_year: i32,
    pub name: String,
    pub sprint_flag: bool,
    pub weekend_start: DateTime<Utc>,
    pub weekend_end: DateTime<Utc>,
    pub sessions: Vec<Session>,
}
