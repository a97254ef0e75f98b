use importer::CalendarSync;
use scoring::ScoringScheduler;
use storage::dto::{
    event::CalendarSyncResponse,
    scoring::{ManualScoreRequest, ManualScoreResponse},
};

use crate::error::ApiResult;

/// Run calendar sync for one season on demand
pub async fn sync_calendar(
    calendar: &CalendarSync,
    season_year: i32,
) -> ApiResult<CalendarSyncResponse> {
    let report = calendar.sync(season_year).await?;

    Ok(CalendarSyncResponse {
        season_year,
        synced: report.synced,
        skipped: report.skipped,
    })
}

/// Score one event now, regardless of the buffer window or earlier runs
pub async fn score_event(
    scheduler: &ScoringScheduler,
    request: &ManualScoreRequest,
) -> ApiResult<ManualScoreResponse> {
    let manual = scheduler
        .manual_score(&request.event_id, request.season_year)
        .await?;

    Ok(ManualScoreResponse {
        event_name: manual.event_name,
        actual: manual.outcome.actual,
        predictions_scored: manual.outcome.predictions_scored,
    })
}
