pub mod match_record;
pub mod summary;

pub use match_record::{Match, MatchListing, MatchStatus};
pub use summary::{CandidateSummary, MatchSummary};
