//! GraphQL schema definition.

use super::context::GraphQLContext;
use juniper::{EmptySubscription, FieldResult, RootNode};

use crate::domains::directory::data::{LocationData, SportData};
use crate::domains::directory::edges::query as directory_queries;
use crate::domains::matching::data::{CandidateData, CandidateFilterInput, MatchData};
use crate::domains::matching::edges::{mutation as matching_mutations, query as matching_queries};

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    // =========================================================================
    // Matching
    // =========================================================================

    /// Compatible workout partners for the signed-in user, closest first
    async fn candidates(
        ctx: &GraphQLContext,
        filter: Option<CandidateFilterInput>,
    ) -> FieldResult<Vec<CandidateData>> {
        matching_queries::candidates(filter, ctx).await
    }

    /// A single match the signed-in user is a party to
    #[graphql(name = "match")]
    async fn match_by_id(ctx: &GraphQLContext, id: String) -> FieldResult<MatchData> {
        matching_queries::get_match(id, ctx).await
    }

    /// Accepted matches, newest first
    async fn current_matches(ctx: &GraphQLContext) -> FieldResult<Vec<MatchData>> {
        matching_queries::current_matches(ctx).await
    }

    /// Pending requests the signed-in user sent
    async fn sent_requests(ctx: &GraphQLContext) -> FieldResult<Vec<MatchData>> {
        matching_queries::sent_requests(ctx).await
    }

    /// Pending requests awaiting the signed-in user's answer
    async fn received_requests(ctx: &GraphQLContext) -> FieldResult<Vec<MatchData>> {
        matching_queries::received_requests(ctx).await
    }

    // =========================================================================
    // Directory
    // =========================================================================

    async fn sports(ctx: &GraphQLContext) -> FieldResult<Vec<SportData>> {
        directory_queries::sports(ctx).await
    }

    async fn locations(ctx: &GraphQLContext) -> FieldResult<Vec<LocationData>> {
        directory_queries::locations(ctx).await
    }
}

pub struct Mutation;

#[juniper::graphql_object(context = GraphQLContext)]
impl Mutation {
    /// Ask another user to work out together in a shared sport
    async fn send_match_request(
        ctx: &GraphQLContext,
        recipient_id: String,
        sport_id: String,
    ) -> FieldResult<MatchData> {
        matching_mutations::send_match_request(recipient_id, sport_id, ctx).await
    }

    /// Accept or reject a pending request addressed to the signed-in user
    async fn respond_to_match(
        ctx: &GraphQLContext,
        match_id: String,
        accept: bool,
    ) -> FieldResult<MatchData> {
        matching_mutations::respond_to_match(match_id, accept, ctx).await
    }

    /// Withdraw a pending request (requester) or end an accepted match (either party)
    async fn cancel_match(ctx: &GraphQLContext, match_id: String) -> FieldResult<bool> {
        matching_mutations::cancel_match(match_id, ctx).await
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
