use sqlx::PgPool;

use crate::dto::leaderboard::LeaderboardEntry;
use crate::error::Result;

pub struct LeaderboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeaderboardRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Season standings: score totals summed per user, highest first.
    pub async fn season(&self, season_year: i32) -> Result<Vec<LeaderboardEntry>> {
        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT
                p.user_id,
                COALESCE(u.username, 'Unknown') AS username,
                COALESCE(SUM((p.score->>'total')::bigint), 0)::bigint AS total
            FROM predictions p
            LEFT JOIN users u ON u.user_id = p.user_id
            WHERE p.season_year = $1
            GROUP BY p.user_id, u.username
            ORDER BY total DESC, username ASC, p.user_id ASC
            "#,
        )
        .bind(season_year)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// Standings of one event, one row per prediction.
    pub async fn event(&self, event_id: &str, season_year: i32) -> Result<Vec<LeaderboardEntry>> {
        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT
                p.user_id,
                COALESCE(u.username, 'Unknown') AS username,
                COALESCE((p.score->>'total')::bigint, 0) AS total
            FROM predictions p
            LEFT JOIN users u ON u.user_id = p.user_id
            WHERE p.event_id = $1 AND p.season_year = $2
            ORDER BY total DESC, username ASC, p.user_id ASC
            "#,
        )
        .bind(event_id)
        .bind(season_year)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    use crate::dto::prediction::PicksUpdate;
    use crate::models::{EventSchedule, Score};
    use crate::repository::{
        event::EventRepository, prediction::PredictionRepository, user::UserRepository,
    };

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_season_totals_are_summed_per_user(pool: PgPool) {
        let start = Utc.with_ymd_and_hms(2025, 5, 2, 12, 0, 0).unwrap();
        let events = EventRepository::new(&pool);
        for (offset, event_id) in ["gp-1", "gp-2"].iter().enumerate() {
            let weekend_start = start + Duration::weeks(offset as i64);
            events
                .upsert(&EventSchedule {
                    event_id: event_id.to_string(),
                    season_year: 2025,
                    name: format!("{} Grand Prix", event_id),
                    sprint_flag: false,
                    weekend_start,
                    weekend_end: weekend_start + Duration::days(2),
                    sessions: vec![],
                })
                .await
                .unwrap();
        }

        let users = UserRepository::new(&pool);
        let alice = users.find_or_create("alice").await.unwrap();
        let bob = users.find_or_create("bob").await.unwrap();

        let predictions = PredictionRepository::new(&pool);
        let picks = PicksUpdate {
            race: Some(vec!["norris".to_string()]),
            ..Default::default()
        };
        let before = start - Duration::days(1);
        let scores = [(&alice, "gp-1", 8), (&alice, "gp-2", 3), (&bob, "gp-1", 13)];
        for (user, event_id, total) in scores {
            let prediction = predictions
                .upsert_picks(user.user_id, event_id, 2025, &picks, before)
                .await
                .unwrap()
                .unwrap();
            let score = Score {
                race: total,
                total,
                ..Default::default()
            };
            predictions
                .save_score(prediction.prediction_id, &score)
                .await
                .unwrap();
        }

        let repo = LeaderboardRepository::new(&pool);
        let season = repo.season(2025).await.unwrap();
        let rows: Vec<_> = season.iter().map(|e| (e.username.as_str(), e.total)).collect();
        assert_eq!(rows, vec![("bob", 13), ("alice", 11)]);

        let event = repo.event("gp-2", 2025).await.unwrap();
        assert_eq!(event.len(), 1);
        assert_eq!(event[0].user_id, alice.user_id);
        assert_eq!(event[0].total, 3);
    }
}
