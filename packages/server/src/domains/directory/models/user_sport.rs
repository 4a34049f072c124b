use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{GeoPoint, SportId, UserId};

/// Self-declared skill level for a sport
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, juniper::GraphQLEnum,
)]
#[sqlx(type_name = "skill_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkillLevel::Beginner => write!(f, "beginner"),
            SkillLevel::Intermediate => write!(f, "intermediate"),
            SkillLevel::Advanced => write!(f, "advanced"),
            SkillLevel::Expert => write!(f, "expert"),
        }
    }
}

impl std::str::FromStr for SkillLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            "expert" => Ok(SkillLevel::Expert),
            _ => Err(anyhow::anyhow!("Invalid skill level: {}", s)),
        }
    }
}

/// A sport a user has declared, joined with the sport's name
///
/// At most one row exists per (user, sport).
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct UserSport {
    pub user_id: UserId,
    pub sport_id: SportId,
    pub sport_name: String,
    pub skill_level: SkillLevel,
    pub years_experience: Option<i32>,
    pub notes: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// One candidate row: another user's declared sport plus the profile fields
/// discovery needs. A user with several qualifying sports yields several rows.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub user_id: UserId,
    pub display_name: String,
    pub verified: bool,
    pub sport_id: SportId,
    pub sport_name: String,
    pub skill_level: SkillLevel,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub preferred_days: Option<Vec<String>>,
    pub preferred_times: Option<Vec<String>>,
}

impl CandidateRecord {
    pub fn point(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.longitude, self.latitude)
    }
}

impl UserSport {
    pub async fn find_for_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT us.user_id, us.sport_id, s.name AS sport_name, us.skill_level,
                    us.years_experience, us.notes, us.is_public, us.created_at
             FROM user_sports us
             JOIN sports s ON s.id = us.sport_id
             WHERE us.user_id = $1
             ORDER BY us.created_at, us.sport_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Declared sports of other active users, restricted to `sport_ids`
    ///
    /// Ordered by declaration time so the first row per user is stable.
    /// Profiles are LEFT JOINed: a user without one still qualifies, with
    /// unknown location and no day/time preferences.
    pub async fn find_candidates(
        exclude_user: UserId,
        sport_ids: &[SportId],
        pool: &PgPool,
    ) -> Result<Vec<CandidateRecord>> {
        sqlx::query_as::<_, CandidateRecord>(
            "SELECT u.id AS user_id, u.display_name, u.verified,
                    us.sport_id, s.name AS sport_name, us.skill_level,
                    p.latitude, p.longitude, p.preferred_days, p.preferred_times
             FROM user_sports us
             JOIN users u ON u.id = us.user_id
             JOIN sports s ON s.id = us.sport_id
             LEFT JOIN profiles p ON p.user_id = us.user_id
             WHERE u.active = true
               AND us.user_id <> $1
               AND us.sport_id = ANY($2)
             ORDER BY us.created_at, us.user_id, us.sport_id",
        )
        .bind(exclude_user)
        .bind(sport_ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn insert(&self, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_sports (
                user_id, sport_id, skill_level, years_experience, notes, is_public, created_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(self.user_id)
        .bind(self.sport_id)
        .bind(self.skill_level)
        .bind(self.years_experience)
        .bind(&self.notes)
        .bind(self.is_public)
        .bind(self.created_at)
        .execute(pool)
        .await?;

        Ok(())
    }
}
