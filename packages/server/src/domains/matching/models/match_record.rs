use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{MatchId, SportId, UserId};

/// Lifecycle status of a match
///
/// ```text
/// Pending ──accept──▶ Accepted ──cancel──▶ Canceled
///    │
///    ├──reject──▶ Rejected
///    └──cancel (requester)──▶ Canceled
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, juniper::GraphQLEnum,
)]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Rejected,
    Canceled,
}

impl MatchStatus {
    /// Live statuses block a new request for the same pair and sport.
    /// Only a rejection frees the slot.
    pub fn is_live(self) -> bool {
        !matches!(self, MatchStatus::Rejected)
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Pending => write!(f, "pending"),
            MatchStatus::Accepted => write!(f, "accepted"),
            MatchStatus::Rejected => write!(f, "rejected"),
            MatchStatus::Canceled => write!(f, "canceled"),
        }
    }
}

impl std::str::FromStr for MatchStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(MatchStatus::Pending),
            "accepted" => Ok(MatchStatus::Accepted),
            "rejected" => Ok(MatchStatus::Rejected),
            "canceled" => Ok(MatchStatus::Canceled),
            _ => Err(anyhow::anyhow!("Invalid match status: {}", s)),
        }
    }
}

/// A match request between two users for a sport
///
/// Rows are never deleted. The audit trail is the sequence of status
/// transitions, and `requester_id`/`recipient_id` never swap.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub requester_id: UserId,
    pub recipient_id: UserId,
    pub sport_id: Option<SportId>,
    pub status: MatchStatus,
    pub requested_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Which slice of a user's matches to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchListing {
    /// Accepted, either side
    Current,
    /// Pending, user is requester
    Sent,
    /// Pending, user is recipient
    Received,
}

impl Match {
    pub fn pending(requester_id: UserId, recipient_id: UserId, sport_id: Option<SportId>) -> Self {
        Self {
            id: MatchId::new(),
            requester_id,
            recipient_id,
            sport_id,
            status: MatchStatus::Pending,
            requested_at: Utc::now(),
            responded_at: None,
        }
    }

    pub fn involves(&self, user_id: UserId) -> bool {
        self.requester_id == user_id || self.recipient_id == user_id
    }

    /// The other party, if `user_id` is one of the two
    pub fn counterpart_of(&self, user_id: UserId) -> Option<UserId> {
        if self.requester_id == user_id {
            Some(self.recipient_id)
        } else if self.recipient_id == user_id {
            Some(self.requester_id)
        } else {
            None
        }
    }

    /// Same unordered pair and same sport
    pub fn same_relationship(&self, a: UserId, b: UserId, sport_id: Option<SportId>) -> bool {
        let same_pair = (self.requester_id == a && self.recipient_id == b)
            || (self.requester_id == b && self.recipient_id == a);
        same_pair && self.sport_id == sport_id
    }

    pub fn belongs_to(&self, listing: MatchListing, user_id: UserId) -> bool {
        match listing {
            MatchListing::Current => self.status == MatchStatus::Accepted && self.involves(user_id),
            MatchListing::Sent => self.status == MatchStatus::Pending && self.requester_id == user_id,
            MatchListing::Received => {
                self.status == MatchStatus::Pending && self.recipient_id == user_id
            }
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    pub async fn find_by_id(id: MatchId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM matches WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Live match for the unordered pair and sport, if any
    pub async fn find_live_between(
        a: UserId,
        b: UserId,
        sport_id: Option<SportId>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM matches
             WHERE ((requester_id = $1 AND recipient_id = $2)
                 OR (requester_id = $2 AND recipient_id = $1))
               AND sport_id IS NOT DISTINCT FROM $3
               AND status <> 'rejected'
             ORDER BY requested_at DESC
             LIMIT 1",
        )
        .bind(a)
        .bind(b)
        .bind(sport_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert a new pending match
    ///
    /// Returns `None` when the `matches_one_live_per_pair` index rejects the
    /// row, i.e. a live relationship already exists (possibly created by a
    /// concurrent request from the other side).
    pub async fn insert(&self, pool: &PgPool) -> Result<Option<Self>> {
        let result = sqlx::query_as::<_, Self>(
            "INSERT INTO matches (
                id, requester_id, recipient_id, sport_id, status, requested_at, responded_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(self.id)
        .bind(self.requester_id)
        .bind(self.recipient_id)
        .bind(self.sport_id)
        .bind(self.status)
        .bind(self.requested_at)
        .bind(self.responded_at)
        .fetch_one(pool)
        .await;

        match result {
            Ok(inserted) => Ok(Some(inserted)),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Move from `expected` to `next` only if the row is still in `expected`
    ///
    /// `responded_at` is left untouched when `None`. Returns `None` when the
    /// row was already moved by someone else.
    pub async fn compare_and_set_status(
        id: MatchId,
        expected: MatchStatus,
        next: MatchStatus,
        responded_at: Option<DateTime<Utc>>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE matches
             SET status = $3,
                 responded_at = COALESCE($4, responded_at)
             WHERE id = $1 AND status = $2
             RETURNING *",
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .bind(responded_at)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn reopen_pending(id: MatchId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE matches
             SET status = 'pending',
                 responded_at = NULL
             WHERE id = $1 AND status = 'accepted'
             RETURNING *",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Users with any live match with `user_id`, in either direction, any sport
    pub async fn find_live_counterparts(user_id: UserId, pool: &PgPool) -> Result<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT DISTINCT CASE WHEN requester_id = $1 THEN recipient_id ELSE requester_id END
             FROM matches
             WHERE (requester_id = $1 OR recipient_id = $1)
               AND status <> 'rejected'",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_listing(
        listing: MatchListing,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let sql = match listing {
            MatchListing::Current => {
                "SELECT * FROM matches
                 WHERE status = 'accepted' AND (requester_id = $1 OR recipient_id = $1)
                 ORDER BY requested_at DESC"
            }
            MatchListing::Sent => {
                "SELECT * FROM matches
                 WHERE status = 'pending' AND requester_id = $1
                 ORDER BY requested_at DESC"
            }
            MatchListing::Received => {
                "SELECT * FROM matches
                 WHERE status = 'pending' AND recipient_id = $1
                 ORDER BY requested_at DESC"
            }
        };

        sqlx::query_as::<_, Self>(sql)
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}
