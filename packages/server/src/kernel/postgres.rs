// Postgres implementations of the kernel traits
//
// Thin adapters over the model methods; all SQL lives with the models.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::PgPool;

use super::{BaseConversationBridge, BaseDirectory, BaseMatchRepository};
use crate::common::{ConversationId, MatchId, SportId, UserId};
use crate::domains::conversations::Conversation;
use crate::domains::directory::models::{
    CandidateRecord, Location, Profile, Sport, User, UserSport,
};
use crate::domains::matching::models::{Match, MatchListing, MatchStatus};

/// Schema migrations embedded at build time
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseDirectory for PgDirectory {
    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        User::find_by_id(id, &self.pool).await
    }

    async fn find_users(&self, ids: &[UserId]) -> Result<Vec<User>> {
        User::find_by_ids(ids, &self.pool).await
    }

    async fn find_profile(&self, user_id: UserId) -> Result<Option<Profile>> {
        Profile::find_by_user(user_id, &self.pool).await
    }

    async fn user_sports(&self, user_id: UserId) -> Result<Vec<UserSport>> {
        UserSport::find_for_user(user_id, &self.pool).await
    }

    async fn find_sport(&self, id: SportId) -> Result<Option<Sport>> {
        Sport::find_by_id(id, &self.pool).await
    }

    async fn list_sports(&self) -> Result<Vec<Sport>> {
        Sport::find_all(&self.pool).await
    }

    async fn list_locations(&self) -> Result<Vec<Location>> {
        Location::find_all(&self.pool).await
    }

    async fn candidate_records(
        &self,
        exclude_user: UserId,
        sport_ids: &[SportId],
    ) -> Result<Vec<CandidateRecord>> {
        UserSport::find_candidates(exclude_user, sport_ids, &self.pool).await
    }
}

pub struct PgMatchRepository {
    pool: PgPool,
}

impl PgMatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseMatchRepository for PgMatchRepository {
    async fn find_by_id(&self, id: MatchId) -> Result<Option<Match>> {
        Match::find_by_id(id, &self.pool).await
    }

    async fn find_live_between(
        &self,
        a: UserId,
        b: UserId,
        sport_id: Option<SportId>,
    ) -> Result<Option<Match>> {
        Match::find_live_between(a, b, sport_id, &self.pool).await
    }

    async fn insert_if_no_live(&self, record: &Match) -> Result<Option<Match>> {
        record.insert(&self.pool).await
    }

    async fn compare_and_set_status(
        &self,
        id: MatchId,
        expected: MatchStatus,
        next: MatchStatus,
        responded_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Match>> {
        Match::compare_and_set_status(id, expected, next, responded_at, &self.pool).await
    }

    async fn reopen_pending(&self, id: MatchId) -> Result<Option<Match>> {
        Match::reopen_pending(id, &self.pool).await
    }

    async fn live_counterparts(&self, user_id: UserId) -> Result<Vec<UserId>> {
        Match::find_live_counterparts(user_id, &self.pool).await
    }

    async fn list(&self, listing: MatchListing, user_id: UserId) -> Result<Vec<Match>> {
        Match::find_listing(listing, user_id, &self.pool).await
    }
}

pub struct PgConversationBridge {
    pool: PgPool,
}

impl PgConversationBridge {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseConversationBridge for PgConversationBridge {
    async fn ensure_conversation(&self, accepted: &Match) -> Result<ConversationId> {
        let conversation = Conversation::get_or_create_for_match(accepted.id, &self.pool).await?;
        Ok(conversation.id)
    }
}
