use std::time::Duration;

use moka::future::Cache;

const MAX_TRACKED_EVENTS: u64 = 1_000;

/// Process-local record of events already scored, keyed by event and season.
///
/// Entries expire after the configured TTL; a restart forgets everything.
/// Both cases only cause a redundant, idempotent rescore.
#[derive(Clone)]
pub struct ScoredEvents {
    cache: Cache<(String, i32), ()>,
}

impl ScoredEvents {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(MAX_TRACKED_EVENTS)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn contains(&self, event_id: &str, season_year: i32) -> bool {
        self.cache
            .contains_key(&(event_id.to_string(), season_year))
    }

    pub async fn mark(&self, event_id: &str, season_year: i32) {
        self.cache
            .insert((event_id.to_string(), season_year), ())
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_marks_are_per_season() {
        let marker = ScoredEvents::new(Duration::from_secs(60));
        marker.mark("bahrain", 2025).await;

        assert!(marker.contains("bahrain", 2025));
        assert!(!marker.contains("bahrain", 2026));
        assert!(!marker.contains("jeddah", 2025));
    }

    #[tokio::test]
    async fn test_marks_expire() {
        let marker = ScoredEvents::new(Duration::from_millis(50));
        marker.mark("bahrain", 2025).await;
        assert!(marker.contains("bahrain", 2025));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!marker.contains("bahrain", 2025));
    }
}
