use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{CompetitorId, PickCategory, Picks, Prediction};

pub const MAX_PICKS_PER_CATEGORY: usize = 3;
pub const MAX_COMPETITOR_ID_LEN: usize = 64;

/// Partial picks payload. Only the categories present are written; the rest
/// of a stored prediction is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PicksUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifying: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_qualifying: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_race: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<Vec<String>>,
}

impl PicksUpdate {
    pub fn get(&self, category: PickCategory) -> Option<&Vec<String>> {
        match category {
            PickCategory::Qualifying => self.qualifying.as_ref(),
            PickCategory::SprintQualifying => self.sprint_qualifying.as_ref(),
            PickCategory::SprintRace => self.sprint_race.as_ref(),
            PickCategory::Race => self.race.as_ref(),
        }
    }

    fn slot(&mut self, category: PickCategory) -> &mut Option<Vec<String>> {
        match category {
            PickCategory::Qualifying => &mut self.qualifying,
            PickCategory::SprintQualifying => &mut self.sprint_qualifying,
            PickCategory::SprintRace => &mut self.sprint_race,
            PickCategory::Race => &mut self.race,
        }
    }

    pub fn is_empty(&self) -> bool {
        PickCategory::ALL.iter().all(|c| self.get(*c).is_none())
    }

    /// Canonicalizes every supplied category: identifiers are normalized the
    /// same way upstream results are, blanks are dropped, duplicates removed
    /// keeping the first occurrence, and each list is capped at three.
    pub fn sanitized(&self) -> Result<Self, String> {
        if self.is_empty() {
            return Err("at least one pick category is required".to_string());
        }

        let mut clean = Self::default();
        for category in PickCategory::ALL {
            let Some(raw) = self.get(category) else {
                continue;
            };

            let mut seen = HashSet::new();
            let mut list = Vec::with_capacity(MAX_PICKS_PER_CATEGORY);
            for entry in raw {
                let entry = entry.trim();
                if entry.chars().count() > MAX_COMPETITOR_ID_LEN {
                    return Err(format!(
                        "{}: competitor identifier exceeds {} characters",
                        category.as_str(),
                        MAX_COMPETITOR_ID_LEN
                    ));
                }
                let Some(id) = CompetitorId::from_family_name(entry) else {
                    continue;
                };
                if seen.insert(id.clone()) {
                    list.push(id.into_inner());
                }
                if list.len() == MAX_PICKS_PER_CATEGORY {
                    break;
                }
            }
            *clean.slot(category) = Some(list);
        }

        Ok(clean)
    }

    /// Field-level merge onto stored picks.
    pub fn apply_to(&self, picks: &mut Picks) {
        for category in PickCategory::ALL {
            if let Some(list) = self.get(category) {
                picks.set(category, list.clone());
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct SubmitPicksRequest {
    #[validate(length(min = 1, max = 64))]
    pub event_id: String,
    #[validate(range(min = 1950, max = 2100))]
    pub season_year: i32,
    #[serde(default)]
    pub picks: PicksUpdate,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SeasonQuery {
    pub season_year: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PredictionResponse {
    pub prediction: Option<Prediction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sanitize_trims_dedups_and_caps() {
        let update = PicksUpdate {
            race: Some(strings(&[" Norris", "norris", "", "Piastri", "Leclerc", "Russell"])),
            ..Default::default()
        };

        let clean = update.sanitized().unwrap();
        assert_eq!(clean.race, Some(strings(&["norris", "piastri", "leclerc"])));
        assert_eq!(clean.qualifying, None);
    }

    #[test]
    fn test_sanitize_keeps_explicitly_empty_category() {
        let update = PicksUpdate {
            sprint_race: Some(vec![]),
            ..Default::default()
        };

        let clean = update.sanitized().unwrap();
        assert_eq!(clean.sprint_race, Some(vec![]));
    }

    #[test]
    fn test_sanitize_rejects_empty_payload() {
        assert!(PicksUpdate::default().sanitized().is_err());
    }

    #[test]
    fn test_sanitize_rejects_oversized_identifier() {
        let update = PicksUpdate {
            qualifying: Some(vec!["x".repeat(MAX_COMPETITOR_ID_LEN + 1)]),
            ..Default::default()
        };
        assert!(update.sanitized().is_err());
    }

    #[test]
    fn test_apply_merges_only_supplied_categories() {
        let mut picks = Picks {
            qualifying: strings(&["verstappen"]),
            race: strings(&["norris"]),
            ..Default::default()
        };
        let update = PicksUpdate {
            race: Some(strings(&["leclerc", "hamilton"])),
            ..Default::default()
        };

        update.apply_to(&mut picks);
        assert_eq!(picks.qualifying, strings(&["verstappen"]));
        assert_eq!(picks.race, strings(&["leclerc", "hamilton"]));
    }

    #[test]
    fn test_serialized_update_omits_absent_categories() {
        let update = PicksUpdate {
            race: Some(strings(&["norris"])),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "race": ["norris"] }));
    }
}
