use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::prediction::PickCategory;

/// Official top-3 per scored category for one event.
///
/// A category whose session was not found upstream stays empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ActualResults {
    pub qualifying: Vec<String>,
    pub sprint_qualifying: Vec<String>,
    pub sprint_race: Vec<String>,
    pub race: Vec<String>,
}

impl ActualResults {
    pub fn get(&self, category: PickCategory) -> &[String] {
        match category {
            PickCategory::Qualifying => &self.qualifying,
            PickCategory::SprintQualifying => &self.sprint_qualifying,
            PickCategory::SprintRace => &self.sprint_race,
            PickCategory::Race => &self.race,
        }
    }

    pub fn set(&mut self, category: PickCategory, top3: Vec<String>) {
        match category {
            PickCategory::Qualifying => self.qualifying = top3,
            PickCategory::SprintQualifying => self.sprint_qualifying = top3,
            PickCategory::SprintRace => self.sprint_race = top3,
            PickCategory::Race => self.race = top3,
        }
    }
}
