use juniper::FieldResult;
use tracing::info;

use crate::domains::matching::data::{parse_id, MatchData};
use crate::domains::matching::{lifecycle, MatchingError};
use crate::server::graphql::context::GraphQLContext;

pub async fn send_match_request(
    recipient_id: String,
    sport_id: String,
    ctx: &GraphQLContext,
) -> FieldResult<MatchData> {
    let user_id = ctx.require_user()?;
    info!(user_id = %user_id, "send_match_request mutation called");

    let recipient_id = parse_id(&recipient_id, "recipientId").map_err(MatchingError::into_field_error)?;
    let sport_id = parse_id(&sport_id, "sportId").map_err(MatchingError::into_field_error)?;

    let created = lifecycle::send_match_request(user_id, recipient_id, sport_id, &ctx.deps)
        .await
        .map_err(MatchingError::into_field_error)?;

    Ok(MatchData::from(created))
}

pub async fn respond_to_match(
    match_id: String,
    accept: bool,
    ctx: &GraphQLContext,
) -> FieldResult<MatchData> {
    let user_id = ctx.require_user()?;
    let match_id = parse_id(&match_id, "matchId").map_err(MatchingError::into_field_error)?;

    let updated = lifecycle::respond(user_id, match_id, accept, &ctx.deps)
        .await
        .map_err(MatchingError::into_field_error)?;

    Ok(MatchData::from(updated))
}

pub async fn cancel_match(match_id: String, ctx: &GraphQLContext) -> FieldResult<bool> {
    let user_id = ctx.require_user()?;
    let match_id = parse_id(&match_id, "matchId").map_err(MatchingError::into_field_error)?;

    lifecycle::cancel(user_id, match_id, &ctx.deps)
        .await
        .map_err(MatchingError::into_field_error)?;

    Ok(true)
}
