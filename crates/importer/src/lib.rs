pub mod calendar;
pub mod error;
pub mod results;
pub mod sources;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use calendar::{CalendarSync, SyncReport};
pub use error::{ImporterError, Result};
pub use results::ResultNormalizer;
pub use sources::hyprace::{HypraceClient, HypraceConfig, RetryPolicy};
pub use traits::{RaceDataProvider, ResultEntry, SessionDescriptor, SessionListing, UpstreamEvent};
