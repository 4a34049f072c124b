// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Matching rules live in domains::matching and only talk to storage through
// these seams, so they run unchanged against Postgres or in-memory fakes.
//
// Naming convention: Base* for trait names (e.g., BaseDirectory)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::common::{ConversationId, MatchId, SportId, UserId};
use crate::domains::directory::models::{
    CandidateRecord, Location, Profile, Sport, User, UserSport,
};
use crate::domains::matching::models::{Match, MatchListing, MatchStatus};

// =============================================================================
// Directory (Users, profiles, sports, locations - read only)
// =============================================================================

#[async_trait]
pub trait BaseDirectory: Send + Sync {
    async fn find_user(&self, id: UserId) -> Result<Option<User>>;

    async fn find_users(&self, ids: &[UserId]) -> Result<Vec<User>>;

    async fn find_profile(&self, user_id: UserId) -> Result<Option<Profile>>;

    /// Declared sports of a user, oldest declaration first
    async fn user_sports(&self, user_id: UserId) -> Result<Vec<UserSport>>;

    async fn find_sport(&self, id: SportId) -> Result<Option<Sport>>;

    async fn list_sports(&self) -> Result<Vec<Sport>>;

    async fn list_locations(&self) -> Result<Vec<Location>>;

    /// Declared sports of *other active* users restricted to `sport_ids`,
    /// in declaration order.
    async fn candidate_records(
        &self,
        exclude_user: UserId,
        sport_ids: &[SportId],
    ) -> Result<Vec<CandidateRecord>>;
}

// =============================================================================
// Match Repository
// =============================================================================

#[async_trait]
pub trait BaseMatchRepository: Send + Sync {
    async fn find_by_id(&self, id: MatchId) -> Result<Option<Match>>;

    /// Live match for the unordered pair and sport
    async fn find_live_between(
        &self,
        a: UserId,
        b: UserId,
        sport_id: Option<SportId>,
    ) -> Result<Option<Match>>;

    /// Atomically insert unless a live match exists for the unordered pair
    /// and sport. `None` means the insert lost to an existing relationship.
    async fn insert_if_no_live(&self, record: &Match) -> Result<Option<Match>>;

    /// Status transition that only applies while the row is still `expected`
    async fn compare_and_set_status(
        &self,
        id: MatchId,
        expected: MatchStatus,
        next: MatchStatus,
        responded_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Match>>;

    /// Accepted back to Pending with `responded_at` cleared; `None` unless
    /// the row was still Accepted
    async fn reopen_pending(&self, id: MatchId) -> Result<Option<Match>>;

    /// Users sharing any live match with `user_id`, either direction, any sport
    async fn live_counterparts(&self, user_id: UserId) -> Result<Vec<UserId>>;

    /// Newest first
    async fn list(&self, listing: MatchListing, user_id: UserId) -> Result<Vec<Match>>;
}

// =============================================================================
// Conversation Bridge
// =============================================================================

#[async_trait]
pub trait BaseConversationBridge: Send + Sync {
    /// Get or create the conversation for an accepted match
    async fn ensure_conversation(&self, accepted: &Match) -> Result<ConversationId>;
}
