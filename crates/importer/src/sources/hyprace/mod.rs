mod client;
mod models;

pub use client::{DEFAULT_BASE_URL, HypraceClient, HypraceConfig, RetryPolicy};
pub use models::*;
