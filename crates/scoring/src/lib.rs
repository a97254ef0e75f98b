pub mod engine;
pub mod error;
pub mod marker;
pub mod points;
pub mod predictions;
pub mod scheduler;

pub use engine::{ScoringEngine, ScoringOutcome};
pub use error::{Result, ScoringError};
pub use marker::ScoredEvents;
pub use predictions::{PredictionService, can_accept};
pub use scheduler::{
    ManualScoreOutcome, SchedulerConfig, ScoringScheduler, ScoringWindow, TickReport,
    scoring_window,
};
