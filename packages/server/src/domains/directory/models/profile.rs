use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{GeoPoint, UserId};

/// Matching preferences, one-to-one with a user
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,

    // Preferred meeting point
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_distance_km: Option<f64>,

    // e.g. "Monday", "Morning"
    pub preferred_days: Vec<String>,
    pub preferred_times: Vec<String>,

    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Empty profile for a freshly registered user
    pub fn blank(user_id: UserId) -> Self {
        Self {
            user_id,
            latitude: None,
            longitude: None,
            max_distance_km: None,
            preferred_days: Vec::new(),
            preferred_times: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn point(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.longitude, self.latitude)
    }

    pub async fn find_by_user(user_id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn upsert(&self, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO profiles (
                user_id, latitude, longitude, max_distance_km,
                preferred_days, preferred_times, updated_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, NOW())
             ON CONFLICT (user_id) DO UPDATE SET
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                max_distance_km = EXCLUDED.max_distance_km,
                preferred_days = EXCLUDED.preferred_days,
                preferred_times = EXCLUDED.preferred_times,
                updated_at = NOW()
             RETURNING *",
        )
        .bind(self.user_id)
        .bind(self.latitude)
        .bind(self.longitude)
        .bind(self.max_distance_km)
        .bind(&self.preferred_days)
        .bind(&self.preferred_times)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
