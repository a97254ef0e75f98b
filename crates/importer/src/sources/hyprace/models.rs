use serde::{Deserialize, Serialize};

use crate::traits::{ResultEntry, ScheduleEntry, SessionDescriptor, UpstreamEvent};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GrandPrix {
    pub id: String,
    pub name: String,
    pub status: Option<String>,
    #[serde(default)]
    pub schedule: Vec<ScheduledSession>,
    pub season: Option<SeasonRef>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SeasonRef {
    pub id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSession {
    #[serde(rename = "type")]
    pub session_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionItem {
    pub id: String,
    #[serde(rename = "type")]
    pub session_type: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Body of `/v2/drivers/{id}`. Depending on the API version the driver comes
/// back as the first page item, under `driver`, or as the object itself.
#[derive(Debug, Deserialize, Clone)]
pub struct DriverLookup {
    #[serde(default)]
    items: Vec<Driver>,
    driver: Option<Driver>,
    #[serde(flatten)]
    inline: Driver,
}

impl DriverLookup {
    pub fn into_driver(self) -> Driver {
        self.items
            .into_iter()
            .next()
            .or(self.driver)
            .unwrap_or(self.inline)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RaceResults {
    #[serde(default)]
    pub participations: Vec<Participation>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    pub driver_id: Option<String>,
    pub driver: Option<Driver>,
    pub result: Option<RaceResult>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    pub finished_position: Option<u32>,
    pub grid: Option<u32>,
    pub result_status: Option<ResultStatus>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResultStatus {
    pub status: Option<String>,
    pub position_status: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct QualifyingResults {
    #[serde(default)]
    pub results: Vec<QualifyingEntry>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QualifyingEntry {
    pub driver_id: Option<String>,
    pub driver: Option<Driver>,
    pub position: Option<u32>,
}

impl From<GrandPrix> for UpstreamEvent {
    fn from(gp: GrandPrix) -> Self {
        Self {
            id: gp.id,
            name: gp.name,
            status: gp.status,
            schedule: gp
                .schedule
                .into_iter()
                .map(|s| ScheduleEntry {
                    session_type: s.session_type,
                    start_date: s.start_date,
                    end_date: s.end_date,
                })
                .collect(),
        }
    }
}

impl From<SessionItem> for SessionDescriptor {
    fn from(item: SessionItem) -> Self {
        Self {
            id: item.id,
            session_type: item.session_type,
        }
    }
}

impl From<Participation> for ResultEntry {
    fn from(p: Participation) -> Self {
        Self {
            driver_id: p.driver_id,
            family_name: p.driver.and_then(|d| d.last_name),
            position: None,
            // A zero position is how the provider reports "not classified"
            finished_position: p
                .result
                .and_then(|r| r.finished_position)
                .filter(|pos| *pos > 0),
        }
    }
}

impl From<QualifyingEntry> for ResultEntry {
    fn from(q: QualifyingEntry) -> Self {
        Self {
            driver_id: q.driver_id,
            family_name: q.driver.and_then(|d| d.last_name),
            position: q.position.filter(|pos| *pos > 0),
            finished_position: None,
        }
    }
}
