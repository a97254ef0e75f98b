use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// The four session categories a user can pick a podium for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PickCategory {
    Qualifying,
    SprintQualifying,
    SprintRace,
    Race,
}

impl PickCategory {
    pub const ALL: [PickCategory; 4] = [
        Self::Qualifying,
        Self::SprintQualifying,
        Self::SprintRace,
        Self::Race,
    ];

    pub fn is_sprint(&self) -> bool {
        matches!(self, Self::SprintQualifying | Self::SprintRace)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qualifying => "qualifying",
            Self::SprintQualifying => "sprint_qualifying",
            Self::SprintRace => "sprint_race",
            Self::Race => "race",
        }
    }
}

/// Ordered top-3 picks per category. Missing categories deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Picks {
    pub qualifying: Vec<String>,
    pub sprint_qualifying: Vec<String>,
    pub sprint_race: Vec<String>,
    pub race: Vec<String>,
}

impl Picks {
    pub fn get(&self, category: PickCategory) -> &[String] {
        match category {
            PickCategory::Qualifying => &self.qualifying,
            PickCategory::SprintQualifying => &self.sprint_qualifying,
            PickCategory::SprintRace => &self.sprint_race,
            PickCategory::Race => &self.race,
        }
    }

    pub fn set(&mut self, category: PickCategory, picks: Vec<String>) {
        match category {
            PickCategory::Qualifying => self.qualifying = picks,
            PickCategory::SprintQualifying => self.sprint_qualifying = picks,
            PickCategory::SprintRace => self.sprint_race = picks,
            PickCategory::Race => self.race = picks,
        }
    }
}

/// Points awarded to one prediction. Written only by the scoring engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Score {
    pub qualifying: i32,
    pub sprint_qualifying: i32,
    pub sprint_race: i32,
    pub race: i32,
    pub total: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Prediction {
    pub prediction_id: Uuid,
    pub user_id: Uuid,
    pub event_id: String,
    pub season_year: i32,
    #[sqlx(json)]
    pub picks: Picks,
    /// Snapshot of the event's weekend start at creation time. Never re-derived.
    pub locked_at: DateTime<Utc>,
    #[sqlx(json)]
    pub score: Score,
    pub scored_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_missing_categories_default_to_empty() {
        let picks: Picks = serde_json::from_str(r#"{"race": ["norris"]}"#).unwrap();
        assert_eq!(picks.race, vec!["norris".to_string()]);
        assert!(picks.qualifying.is_empty());
        assert!(picks.sprint_race.is_empty());
    }

    #[test]
    fn test_empty_score_object_is_all_zero() {
        let score: Score = serde_json::from_str("{}").unwrap();
        assert_eq!(score, Score::default());
    }

    #[test]
    fn test_sprint_categories() {
        let sprint: Vec<_> = PickCategory::ALL
            .iter()
            .filter(|c| c.is_sprint())
            .collect();
        assert_eq!(
            sprint,
            vec![&PickCategory::SprintQualifying, &PickCategory::SprintRace]
        );
    }
}
