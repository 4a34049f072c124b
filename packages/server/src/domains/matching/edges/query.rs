use juniper::FieldResult;
use tracing::info;

use crate::domains::matching::data::{parse_id, CandidateData, CandidateFilterInput, MatchData};
use crate::domains::matching::{find_candidates, lifecycle, MatchingError};
use crate::server::graphql::context::GraphQLContext;

/// Candidates for the signed-in user, closest first
pub async fn candidates(
    filter: Option<CandidateFilterInput>,
    ctx: &GraphQLContext,
) -> FieldResult<Vec<CandidateData>> {
    let user_id = ctx.require_user()?;
    info!(user_id = %user_id, "candidates query called");

    let filter = filter
        .unwrap_or_default()
        .into_filter(ctx.default_search_radius_km)
        .map_err(MatchingError::into_field_error)?;

    let found = find_candidates(user_id, &filter, &ctx.deps)
        .await
        .map_err(MatchingError::into_field_error)?;

    Ok(found.into_iter().map(CandidateData::from).collect())
}

/// A single match, visible only to its two parties
pub async fn get_match(id: String, ctx: &GraphQLContext) -> FieldResult<MatchData> {
    let user_id = ctx.require_user()?;
    let match_id = parse_id(&id, "id").map_err(MatchingError::into_field_error)?;

    let summary = lifecycle::get_match_by_id(match_id, &ctx.deps)
        .await
        .map_err(MatchingError::into_field_error)?;

    if summary.requester_id != user_id && summary.recipient_id != user_id {
        return Err(
            MatchingError::Forbidden("not a party to this match".to_string()).into_field_error(),
        );
    }

    Ok(MatchData::from(summary))
}

pub async fn current_matches(ctx: &GraphQLContext) -> FieldResult<Vec<MatchData>> {
    let user_id = ctx.require_user()?;
    let matches = lifecycle::get_current_matches(user_id, &ctx.deps)
        .await
        .map_err(MatchingError::into_field_error)?;
    Ok(matches.into_iter().map(MatchData::from).collect())
}

pub async fn sent_requests(ctx: &GraphQLContext) -> FieldResult<Vec<MatchData>> {
    let user_id = ctx.require_user()?;
    let matches = lifecycle::get_sent_requests(user_id, &ctx.deps)
        .await
        .map_err(MatchingError::into_field_error)?;
    Ok(matches.into_iter().map(MatchData::from).collect())
}

pub async fn received_requests(ctx: &GraphQLContext) -> FieldResult<Vec<MatchData>> {
    let user_id = ctx.require_user()?;
    let matches = lifecycle::get_received_requests(user_id, &ctx.deps)
        .await
        .map_err(MatchingError::into_field_error)?;
    Ok(matches.into_iter().map(MatchData::from).collect())
}
