//! Typed ids for every persisted entity.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User entities.
pub struct User;

/// Marker type for Sport directory entries.
pub struct Sport;

/// Marker type for Location directory entries.
pub struct Location;

/// Marker type for Match records.
pub struct Match;

/// Marker type for Conversation threads opened for accepted matches.
pub struct Conversation;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type UserId = Id<User>;

pub type SportId = Id<Sport>;

pub type LocationId = Id<Location>;

pub type MatchId = Id<Match>;

pub type ConversationId = Id<Conversation>;
