pub mod client;
pub mod error;
pub mod indexnow;
pub mod supersede;

pub use client::{ApiClient, ForwardedResponse, SITEMAP_USER_AGENT};
pub use error::ClientError;
pub use indexnow::{key_location, submit_to_indexnow, IndexNowOutcome};
pub use supersede::LatestRequest;
