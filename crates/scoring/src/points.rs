//! Point table and per-prediction scoring rules.

use storage::models::{ActualResults, PickCategory, Picks, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointValues {
    /// Competitor in the predicted slot.
    pub exact: i32,
    /// Competitor on the podium, different slot.
    pub partial: i32,
}

pub const QUALIFYING_POINTS: PointValues = PointValues {
    exact: 5,
    partial: 2,
};

pub const RACE_POINTS: PointValues = PointValues {
    exact: 8,
    partial: 3,
};

pub fn points_for(category: PickCategory) -> PointValues {
    match category {
        PickCategory::Qualifying | PickCategory::SprintQualifying => QUALIFYING_POINTS,
        PickCategory::SprintRace | PickCategory::Race => RACE_POINTS,
    }
}

/// Slot-by-slot comparison of a predicted podium against the actual one.
/// Empty or missing predicted slots score nothing.
pub fn score_top3(predicted: &[String], actual: &[String], points: PointValues) -> i32 {
    let mut total = 0;
    for slot in 0..3 {
        let Some(pick) = predicted.get(slot).filter(|p| !p.is_empty()) else {
            continue;
        };

        if actual.get(slot) == Some(pick) {
            total += points.exact;
        } else if actual.contains(pick) {
            total += points.partial;
        }
    }
    total
}

/// Full score of one prediction. Sprint categories score zero on a
/// non-sprint weekend whatever was stored.
pub fn score_prediction(picks: &Picks, actual: &ActualResults, sprint_flag: bool) -> Score {
    let category_score = |category: PickCategory| {
        if category.is_sprint() && !sprint_flag {
            return 0;
        }
        score_top3(picks.get(category), actual.get(category), points_for(category))
    };

    let qualifying = category_score(PickCategory::Qualifying);
    let sprint_qualifying = category_score(PickCategory::SprintQualifying);
    let sprint_race = category_score(PickCategory::SprintRace);
    let race = category_score(PickCategory::Race);

    Score {
        qualifying,
        sprint_qualifying,
        sprint_race,
        race,
        total: qualifying + sprint_qualifying + sprint_race + race,
    }
}
