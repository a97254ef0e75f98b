use crate::Result;

/// Which upstream listing a session lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionListing {
    Races,
    Qualifying,
}

impl SessionListing {
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Races => "races",
            Self::Qualifying => "qualifying",
        }
    }
}

/// One entry of the upstream season schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub session_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// A race weekend as listed by the provider, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEvent {
    pub id: String,
    pub name: String,
    pub status: Option<String>,
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDescriptor {
    pub id: String,
    pub session_type: String,
}

/// One classified participant of a session. Qualifying-type sessions carry
/// `position`, race-type sessions carry `finished_position`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultEntry {
    pub driver_id: Option<String>,
    pub family_name: Option<String>,
    pub position: Option<u32>,
    pub finished_position: Option<u32>,
}

/// Read-only access to the upstream calendar and results.
#[async_trait::async_trait]
pub trait RaceDataProvider: Send + Sync {
    async fn season_events(&self, season_year: i32) -> Result<Vec<UpstreamEvent>>;

    async fn event_sessions(
        &self,
        event_id: &str,
        listing: SessionListing,
    ) -> Result<Vec<SessionDescriptor>>;

    async fn session_results(
        &self,
        event_id: &str,
        listing: SessionListing,
        session_id: &str,
    ) -> Result<Vec<ResultEntry>>;

    /// Family name of a driver, for result entries that only carry an id.
    /// `None` when the provider knows the driver but reports no name.
    async fn driver_family_name(&self, driver_id: &str) -> Result<Option<String>>;

    fn name(&self) -> &'static str;
}
