// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql::{ObjectType, Schema, SubscriptionType, Variables};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::context::{GraphQLOperation, RequestContext};
use crate::error::GraphQLError;
use crate::result::ExecutionResult;

#[derive(Debug, Error)]
pub enum ExecutionError {
    /// A resolver raised a [GraphQLError].
    #[error(transparent)]
    Domain(#[from] GraphQLError),

    /// Any other execution error (parse, validation, or an untyped resolver error).
    #[error("{0}")]
    Engine(String),
}

/// An executable schema: runs one GraphQL operation to completion.
#[async_trait]
pub trait GraphQLExecutor: Send + Sync {
    async fn execute(
        &self,
        operation: &GraphQLOperation,
        context: &RequestContext,
    ) -> Result<ExecutionResult, ExecutionError>;
}

/// Request headers are available to resolvers as `ctx.data::<common::http::Headers>()`.
#[async_trait]
impl<Query, Mutation, Subscription> GraphQLExecutor for Schema<Query, Mutation, Subscription>
where
    Query: ObjectType + 'static,
    Mutation: ObjectType + 'static,
    Subscription: SubscriptionType + 'static,
{
    async fn execute(
        &self,
        operation: &GraphQLOperation,
        context: &RequestContext,
    ) -> Result<ExecutionResult, ExecutionError> {
        let variables = operation
            .variables
            .clone()
            .map(Value::Object)
            .unwrap_or(Value::Null);

        let mut request = async_graphql::Request::new(operation.query.clone())
            .variables(Variables::from_json(variables))
            .data(context.headers().clone());

        if let Some(operation_name) = &operation.operation_name {
            request = request.operation_name(operation_name.clone());
        }

        let response = Schema::execute(self, request).await;

        from_engine_response(response)
    }
}

fn from_engine_response(
    response: async_graphql::Response,
) -> Result<ExecutionResult, ExecutionError> {
    // Any error fails the whole request. A typed one carries its own status, and wins over
    // untyped ones even when it isn't first.
    if let Some(error) = response
        .errors
        .iter()
        .find_map(|error| error.source::<GraphQLError>())
    {
        tracing::warn!("Resolver raised {} error: {}", error.code(), error.message());
        return Err(ExecutionError::Domain(error.clone()));
    }

    if let Some(error) = response.errors.first() {
        tracing::debug!(
            "Execution failed with {} error(s), first: {}",
            response.errors.len(),
            error.message
        );
        return Err(ExecutionError::Engine(error.message.clone()));
    }

    let engine_error = |e: serde_json::Error| ExecutionError::Engine(e.to_string());

    let data = match response.data {
        async_graphql::Value::Null => None,
        data => Some(data.into_json().map_err(engine_error)?),
    };

    let mut result = ExecutionResult {
        data,
        ..Default::default()
    };

    if !response.extensions.is_empty() {
        result.other.insert(
            "extensions".to_string(),
            serde_json::to_value(&response.extensions).map_err(engine_error)?,
        );
    }

    Ok(result)
}
