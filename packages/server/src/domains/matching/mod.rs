//! Matching domain - candidate discovery and the match request lifecycle
//!
//! Architecture:
//!   GraphQL edges → candidates / lifecycle → kernel traits (ServerDeps)
//!
//! Nothing here touches SQL directly; storage is reached only through
//! `ServerDeps`, so the same code runs against Postgres and in-memory fakes.

pub mod candidates;
pub mod data;
pub mod edges;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod models;

// Re-export commonly used types
pub use candidates::find_candidates;
pub use error::{ErrorKind, MatchingError};
pub use filter::{CandidateFilter, DEFAULT_MAX_DISTANCE_KM};
pub use lifecycle::{
    cancel, get_current_matches, get_match_by_id, get_received_requests, get_sent_requests,
    respond, send_match_request,
};
pub use models::{CandidateSummary, Match, MatchStatus, MatchSummary};
