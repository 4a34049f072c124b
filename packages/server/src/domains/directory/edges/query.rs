use juniper::{FieldError, FieldResult};
use tracing::error;

use crate::domains::directory::data::{LocationData, SportData};
use crate::server::graphql::context::GraphQLContext;

pub async fn sports(ctx: &GraphQLContext) -> FieldResult<Vec<SportData>> {
    let sports = ctx.deps.directory.list_sports().await.map_err(|e| {
        error!("Failed to list sports: {}", e);
        FieldError::new("Failed to list sports", juniper::Value::null())
    })?;

    Ok(sports.into_iter().map(SportData::from).collect())
}

pub async fn locations(ctx: &GraphQLContext) -> FieldResult<Vec<LocationData>> {
    let locations = ctx.deps.directory.list_locations().await.map_err(|e| {
        error!("Failed to list locations: {}", e);
        FieldError::new("Failed to list locations", juniper::Value::null())
    })?;

    Ok(locations.into_iter().map(LocationData::from).collect())
}
