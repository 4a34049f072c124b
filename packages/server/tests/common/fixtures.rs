//! Test fixtures for creating test data in Postgres.
//!
//! These fixtures use the model methods directly.

use anyhow::Result;
use buddy_core::common::{GeoPoint, SportId, UserId};
use buddy_core::domains::directory::models::{Profile, SkillLevel, Sport, User, UserSport};
use chrono::Utc;
use sqlx::PgPool;

/// Active, unverified user with a blank profile
pub async fn create_user(pool: &PgPool, display_name: &str) -> Result<UserId> {
    let user = User {
        id: UserId::new(),
        display_name: display_name.to_string(),
        verified: false,
        active: true,
        created_at: Utc::now(),
    }
    .insert(pool)
    .await?;

    Profile::blank(user.id).upsert(pool).await?;

    Ok(user.id)
}

/// Sport names are unique, so a random suffix keeps shared-database tests apart
pub async fn create_sport(pool: &PgPool, name: &str) -> Result<SportId> {
    let sport = Sport {
        id: SportId::new(),
        name: format!("{} {}", name, SportId::new()),
    }
    .insert(pool)
    .await?;

    Ok(sport.id)
}

pub async fn declare_sport(
    pool: &PgPool,
    user_id: UserId,
    sport_id: SportId,
    skill_level: SkillLevel,
) -> Result<()> {
    UserSport {
        user_id,
        sport_id,
        sport_name: String::new(),
        skill_level,
        years_experience: None,
        notes: None,
        is_public: true,
        created_at: Utc::now(),
    }
    .insert(pool)
    .await
}

pub async fn set_location(pool: &PgPool, user_id: UserId, point: GeoPoint) -> Result<()> {
    let mut profile = Profile::find_by_user(user_id, pool)
        .await?
        .unwrap_or_else(|| Profile::blank(user_id));
    profile.latitude = Some(point.latitude);
    profile.longitude = Some(point.longitude);
    profile.upsert(pool).await?;
    Ok(())
}
