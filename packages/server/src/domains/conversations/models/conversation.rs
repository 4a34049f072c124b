use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ConversationId, MatchId};

/// Messaging thread opened when a match is accepted
///
/// Message storage lives elsewhere; this row only ties a thread to its match.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: ConversationId,
    pub match_id: MatchId,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub async fn find_by_match(match_id: MatchId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM conversations WHERE match_id = $1")
            .bind(match_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Get the conversation for a match, creating it on first call
    ///
    /// Safe to call repeatedly and concurrently: `match_id` is unique, so a
    /// racing insert becomes a no-op and both callers read the same row.
    pub async fn get_or_create_for_match(match_id: MatchId, pool: &PgPool) -> Result<Self> {
        sqlx::query(
            "INSERT INTO conversations (id, match_id, created_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (match_id) DO NOTHING",
        )
        .bind(ConversationId::new())
        .bind(match_id)
        .execute(pool)
        .await?;

        sqlx::query_as::<_, Self>("SELECT * FROM conversations WHERE match_id = $1")
            .bind(match_id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }
}
