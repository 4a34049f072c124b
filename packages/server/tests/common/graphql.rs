//! GraphQL client for integration testing.
//!
//! Executes GraphQL queries directly against the schema without HTTP overhead.

use buddy_core::common::UserId;
use buddy_core::kernel::ServerDeps;
use buddy_core::server::graphql::{create_schema, GraphQLContext, Schema};
use buddy_core::server::middleware::AuthUser;
use juniper::Variables;
use serde_json::Value;
use std::sync::Arc;

const TEST_SEARCH_RADIUS_KM: f64 = 50.0;

/// GraphQL client for executing queries and mutations in tests.
pub struct GraphQLClient {
    schema: Schema,
    context: GraphQLContext,
}

/// One GraphQL error with its `extensions.code`, when present
#[derive(Debug, Clone)]
pub struct GraphQLError {
    pub message: String,
    pub code: Option<String>,
}

/// Result of a GraphQL execution.
#[derive(Debug)]
pub struct GraphQLResult {
    pub data: Option<Value>,
    pub errors: Vec<GraphQLError>,
}

impl GraphQLResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Unwraps the data, panicking if there were errors.
    pub fn unwrap(self) -> Value {
        if !self.errors.is_empty() {
            panic!("GraphQL errors: {:?}", self.errors);
        }
        self.data.expect("No data returned")
    }

    /// Code of the first error, if any
    pub fn error_code(&self) -> Option<&str> {
        self.errors.first().and_then(|e| e.code.as_deref())
    }

    /// Gets a value at the given dotted JSON path.
    pub fn get(&self, path: &str) -> Value {
        let data = self.data.as_ref().expect("No data returned");
        let mut current = data;
        for key in path.split('.') {
            current = &current[key];
        }
        current.clone()
    }
}

impl GraphQLClient {
    /// Client with no signed-in user
    pub fn anonymous(deps: ServerDeps) -> Self {
        Self::with_context(GraphQLContext::new(
            Arc::new(deps),
            None,
            TEST_SEARCH_RADIUS_KM,
        ))
    }

    /// Client acting as `user_id`
    pub fn with_user(deps: ServerDeps, user_id: UserId) -> Self {
        let auth_user = AuthUser { user_id };
        Self::with_context(GraphQLContext::new(
            Arc::new(deps),
            Some(auth_user),
            TEST_SEARCH_RADIUS_KM,
        ))
    }

    pub fn with_context(context: GraphQLContext) -> Self {
        Self {
            schema: create_schema(),
            context,
        }
    }

    pub async fn execute(&self, query: &str) -> GraphQLResult {
        self.execute_with_vars(query, Variables::new()).await
    }

    pub async fn execute_with_vars(&self, query: &str, variables: Variables) -> GraphQLResult {
        let (result, errors) =
            juniper::execute(query, None, &self.schema, &variables, &self.context)
                .await
                .expect("GraphQL execution failed");

        let data = Some(serde_json::to_value(&result).expect("Failed to serialize GraphQL result"));

        let errors = errors
            .iter()
            .map(|e| GraphQLError {
                message: e.error().message().to_string(),
                code: e
                    .error()
                    .extensions()
                    .as_object_value()
                    .and_then(|ext| ext.get_field_value("code"))
                    .and_then(|code| code.as_string_value())
                    .map(String::from),
            })
            .collect();

        GraphQLResult { data, errors }
    }

    /// Execute a query and expect success, returning the data.
    pub async fn query(&self, query: &str) -> Value {
        self.execute(query).await.unwrap()
    }

    pub async fn query_with_vars(&self, query: &str, variables: Variables) -> Value {
        self.execute_with_vars(query, variables).await.unwrap()
    }
}
