use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::SportId;

/// Sport catalog entry (read-only from the matching engine)
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Sport {
    pub id: SportId,
    pub name: String,
}

impl Sport {
    pub async fn find_by_id(id: SportId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT id, name FROM sports WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT id, name FROM sports ORDER BY name")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn insert(&self, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO sports (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(self.id)
        .bind(&self.name)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
