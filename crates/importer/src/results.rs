use std::collections::HashMap;
use std::sync::Arc;

use storage::models::{ActualResults, CompetitorId, PickCategory};
use tracing::{debug, info, warn};

use crate::error::{ImporterError, Result};
use crate::traits::{RaceDataProvider, ResultEntry, SessionDescriptor, SessionListing};

/// Field a session is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingField {
    Position,
    FinishedPosition,
}

impl RankingField {
    fn rank_of(&self, entry: &ResultEntry) -> u32 {
        let rank = match self {
            Self::Position => entry.position,
            Self::FinishedPosition => entry.finished_position,
        };
        rank.unwrap_or(u32::MAX)
    }
}

/// Where the official result of one pick category comes from.
#[derive(Debug, Clone, Copy)]
pub struct ScoredSession {
    pub category: PickCategory,
    pub listing: SessionListing,
    pub session_types: &'static [&'static str],
    pub ranking: RankingField,
}

pub const SCORED_SESSIONS: [ScoredSession; 4] = [
    ScoredSession {
        category: PickCategory::Qualifying,
        listing: SessionListing::Qualifying,
        session_types: &["Qualifying", "Standard"],
        ranking: RankingField::Position,
    },
    ScoredSession {
        category: PickCategory::SprintQualifying,
        listing: SessionListing::Qualifying,
        session_types: &["SprintQualifying", "SprintShootOut", "Sprint"],
        ranking: RankingField::Position,
    },
    ScoredSession {
        category: PickCategory::SprintRace,
        listing: SessionListing::Races,
        session_types: &["SprintRace"],
        ranking: RankingField::FinishedPosition,
    },
    ScoredSession {
        category: PickCategory::Race,
        listing: SessionListing::Races,
        session_types: &["MainRace"],
        ranking: RankingField::FinishedPosition,
    },
];

/// Turns raw upstream session results into the official top-3 per category.
pub struct ResultNormalizer {
    provider: Arc<dyn RaceDataProvider>,
}

impl ResultNormalizer {
    pub fn new(provider: Arc<dyn RaceDataProvider>) -> Self {
        Self { provider }
    }

    /// Fails with `ResultsUnavailable` when the provider lists no sessions at
    /// all for the event. A single missing session only leaves its category empty.
    pub async fn normalize(&self, event_id: &str) -> Result<ActualResults> {
        let (races, qualifying) = tokio::try_join!(
            self.provider.event_sessions(event_id, SessionListing::Races),
            self.provider
                .event_sessions(event_id, SessionListing::Qualifying),
        )?;

        if races.is_empty() && qualifying.is_empty() {
            return Err(ImporterError::ResultsUnavailable(event_id.to_string()));
        }

        let mut actual = ActualResults::default();
        let mut names = DriverNames::default();
        for scored in &SCORED_SESSIONS {
            let listed = match scored.listing {
                SessionListing::Races => &races,
                SessionListing::Qualifying => &qualifying,
            };

            let Some(session) = find_session(listed, scored.session_types) else {
                debug!(
                    "No {} session listed for event {}",
                    scored.category.as_str(),
                    event_id
                );
                continue;
            };

            let entries = self
                .provider
                .session_results(event_id, scored.listing, &session.id)
                .await?;
            let mut podium = podium(entries, scored.ranking);
            for entry in &mut podium {
                self.resolve_family_name(entry, &mut names).await?;
            }
            actual.set(scored.category, podium.iter().map(competitor_of).collect());
        }

        info!("Normalized results for event {}: {:?}", event_id, actual);
        Ok(actual)
    }

    /// Fills in the family name of an entry that only carries a driver id.
    async fn resolve_family_name(
        &self,
        entry: &mut ResultEntry,
        names: &mut DriverNames,
    ) -> Result<()> {
        if entry.family_name.is_some() {
            return Ok(());
        }
        let Some(driver_id) = entry.driver_id.as_deref() else {
            return Ok(());
        };

        if let Some(known) = names.get(driver_id) {
            entry.family_name = known.clone();
            return Ok(());
        }

        let family_name = self.provider.driver_family_name(driver_id).await?;
        if family_name.is_none() {
            warn!("No family name reported for driver {}", driver_id);
        }
        names.insert(driver_id.to_string(), family_name.clone());
        entry.family_name = family_name;
        Ok(())
    }
}

/// Driver id to family name, scoped to one `normalize` call.
type DriverNames = HashMap<String, Option<String>>;

fn find_session<'a>(
    sessions: &'a [SessionDescriptor],
    session_types: &[&str],
) -> Option<&'a SessionDescriptor> {
    session_types
        .iter()
        .find_map(|wanted| sessions.iter().find(|s| s.session_type == *wanted))
}

/// Stable sort by rank, unranked entries last, first three kept.
fn podium(mut entries: Vec<ResultEntry>, ranking: RankingField) -> Vec<ResultEntry> {
    entries.sort_by_key(|entry| ranking.rank_of(entry));
    entries.truncate(3);
    entries
}

/// First three entries by rank mapped to competitor identifiers.
pub fn top_three(entries: Vec<ResultEntry>, ranking: RankingField) -> Vec<String> {
    podium(entries, ranking).iter().map(competitor_of).collect()
}

/// An entry without a family name keeps its slot as an empty string so later
/// slots stay aligned.
fn competitor_of(entry: &ResultEntry) -> String {
    entry
        .family_name
        .as_deref()
        .and_then(CompetitorId::from_family_name)
        .map(CompetitorId::into_inner)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedProvider, driver_id_entry, qualifying_entry, race_entry};

    #[test]
    fn test_top_three_sorts_and_puts_unranked_last() {
        let entries = vec![
            race_entry("Hamilton", None),
            race_entry("Leclerc", Some(3)),
            race_entry("Verstappen", Some(1)),
            race_entry("Sainz", Some(4)),
            race_entry("Norris", Some(2)),
        ];

        assert_eq!(
            top_three(entries, RankingField::FinishedPosition),
            vec!["verstappen", "norris", "leclerc"]
        );
    }

    #[test]
    fn test_top_three_with_fewer_than_three_classified() {
        let entries = vec![race_entry("Alonso", None), race_entry("Stroll", Some(1))];
        assert_eq!(
            top_three(entries, RankingField::FinishedPosition),
            vec!["stroll", "alonso"]
        );
    }

    #[test]
    fn test_unnamed_entry_keeps_an_empty_slot() {
        let entry = ResultEntry {
            driver_id: Some("d-4f1a".to_string()),
            family_name: None,
            position: Some(1),
            finished_position: None,
        };
        assert_eq!(competitor_of(&entry), "");
    }

    #[tokio::test]
    async fn test_driver_ids_resolve_to_family_names() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.add_driver("d-4f1a", "Norris");
        provider.add_driver("d-81c2", "Piastri");
        provider.add_driver("d-1b9e", "Leclerc");

        let races = SessionListing::Races;
        let quali = SessionListing::Qualifying;
        provider.add_session(
            "gp-1",
            races,
            "r-main",
            "MainRace",
            vec![
                driver_id_entry("d-1b9e", Some(3), races),
                driver_id_entry("d-4f1a", Some(1), races),
                driver_id_entry("d-81c2", Some(2), races),
                driver_id_entry("d-0000", Some(4), races),
            ],
        );
        provider.add_session(
            "gp-1",
            quali,
            "q-main",
            "Qualifying",
            vec![
                driver_id_entry("d-81c2", Some(1), quali),
                driver_id_entry("d-1b9e", Some(2), quali),
                qualifying_entry("Norris", Some(3)),
            ],
        );

        let normalizer = ResultNormalizer::new(provider.clone());
        let actual = normalizer.normalize("gp-1").await.unwrap();

        assert_eq!(actual.race, vec!["norris", "piastri", "leclerc"]);
        assert_eq!(actual.qualifying, vec!["piastri", "leclerc", "norris"]);
        // Each id is looked up once per call; off-podium entries are never looked up
        assert_eq!(provider.driver_lookups(), 3);

        normalizer.normalize("gp-1").await.unwrap();
        assert_eq!(provider.driver_lookups(), 6);
    }

    #[tokio::test]
    async fn test_unknown_driver_id_leaves_slot_empty() {
        let provider = Arc::new(ScriptedProvider::new());
        let races = SessionListing::Races;
        provider.add_session(
            "gp-1",
            races,
            "r-main",
            "MainRace",
            vec![
                race_entry("Verstappen", Some(1)),
                driver_id_entry("d-ffff", Some(2), races),
                race_entry("Russell", Some(3)),
            ],
        );

        let actual = ResultNormalizer::new(provider)
            .normalize("gp-1")
            .await
            .unwrap();
        assert_eq!(actual.race, vec!["verstappen", "", "russell"]);
    }

    #[tokio::test]
    async fn test_normalize_sprint_weekend() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.add_session(
            "gp-1",
            SessionListing::Qualifying,
            "q-main",
            "Standard",
            vec![
                qualifying_entry("Norris", Some(2)),
                qualifying_entry("Piastri", Some(1)),
                qualifying_entry("Pérez", Some(3)),
            ],
        );
        provider.add_session(
            "gp-1",
            SessionListing::Qualifying,
            "q-sprint",
            "SprintShootOut",
            vec![qualifying_entry("Russell", Some(1))],
        );
        provider.add_session(
            "gp-1",
            SessionListing::Races,
            "r-main",
            "MainRace",
            vec![
                race_entry("Leclerc", Some(1)),
                race_entry("Hamilton", Some(2)),
                race_entry("Sainz", Some(3)),
            ],
        );

        let normalizer = ResultNormalizer::new(provider);
        let actual = normalizer.normalize("gp-1").await.unwrap();

        assert_eq!(actual.qualifying, vec!["piastri", "norris", "perez"]);
        assert_eq!(actual.sprint_qualifying, vec!["russell"]);
        assert!(actual.sprint_race.is_empty());
        assert_eq!(actual.race, vec!["leclerc", "hamilton", "sainz"]);
    }

    #[tokio::test]
    async fn test_no_sessions_is_results_unavailable() {
        let provider = Arc::new(ScriptedProvider::new());
        let normalizer = ResultNormalizer::new(provider);

        let result = normalizer.normalize("gp-future").await;
        assert!(matches!(result, Err(ImporterError::ResultsUnavailable(id)) if id == "gp-future"));
    }
}
