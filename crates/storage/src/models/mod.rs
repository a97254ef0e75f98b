mod competitor;
mod event;
mod prediction;
mod results;
mod user;

pub use competitor::CompetitorId;
pub use event::{Event, EventSchedule, Session, SessionType};
pub use prediction::{PickCategory, Picks, Prediction, Score};
pub use results::ActualResults;
pub use user::User;
