// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use common::http::{Headers, RequestPayload, ResponseBody, ResponsePayload};
use common::router::Router;
use http::StatusCode;
use tracing::instrument;

use crate::classifier::{RequestRoute, classify};
use crate::context::{GraphQLOperation, RequestContext};
use crate::error::{HandlerError, RequestError};
use crate::graphiql::graphiql_response;
use crate::options::HandlerOptions;
use crate::result::ExecutionResult;

macro_rules! error_msg {
    ($msg:literal) => {
        concat!("{\"errors\": [{\"message\":\"", $msg, "\"}]}").as_bytes()
    };
}

/// Serves GraphQL (and, optionally, graphiql) for the paths it is mounted on.
///
/// Always answers: every request it sees gets exactly one response, either the graphiql page,
/// an execution result, or an error envelope.
pub struct GraphQLHandler {
    options: HandlerOptions,
}

impl GraphQLHandler {
    pub fn new(options: HandlerOptions) -> Self {
        Self { options }
    }

    pub async fn handle(&self, request: &mut (dyn RequestPayload + Send)) -> ResponsePayload {
        let context = RequestContext::from_request(request);

        match classify(&context, &self.options) {
            RequestRoute::Graphiql { endpoint } => {
                tracing::debug!("Serving graphiql for endpoint '{}'", endpoint);
                graphiql_response(&endpoint)
            }
            RequestRoute::Execute(operation) => match self.resolve(&context, operation).await {
                Ok((headers, result)) => json_response(StatusCode::OK, headers, &result),
                Err(e) => self.error_response(e),
            },
            RequestRoute::MissingQuery => self.error_response(RequestError::MissingQuery.into()),
            RequestRoute::Invalid(e) => self.error_response(e.into()),
        }
    }

    /// Execute, then apply the request's transform hook, then the handler's response hook.
    #[instrument(name = "GraphQLHandler::resolve", skip_all)]
    async fn resolve(
        &self,
        context: &RequestContext,
        operation: &GraphQLOperation,
    ) -> Result<(Headers, ExecutionResult), HandlerError> {
        let mut result = if operation.is_empty_selection() {
            ExecutionResult::default()
        } else {
            tracing::debug!(
                "Executing operation {}",
                operation.operation_name.as_deref().unwrap_or("<anonymous>")
            );
            self.options.schema().execute(operation, context).await?
        };

        if let Some(transform) = context.transform() {
            transform.apply(&mut result)?;
        }

        let mut headers = Headers::new();

        if let Some(on_response) = self.options.on_response() {
            if let Some(replacement) = on_response.apply(context, &mut headers, &mut result)? {
                result = replacement;
            }
        }

        Ok((headers, result))
    }

    fn error_response(&self, error: HandlerError) -> ResponsePayload {
        match &error {
            HandlerError::Request(e) => tracing::debug!("Rejected request: {}", e),
            HandlerError::Domain(e) => tracing::warn!("Request failed with {}: {}", e.code(), e),
            // already logged where the hook ran
            HandlerError::Hook { .. } => {}
            HandlerError::Unknown(e) => tracing::error!("Error while resolving request: {}", e),
        }

        json_response(
            error.status_code(),
            Headers::new(),
            &error.to_execution_result(self.options.production()),
        )
    }
}

#[async_trait]
impl Router for GraphQLHandler {
    #[instrument(
        name = "GraphQLHandler::route",
        skip(self, request)
    )]
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload> {
        Some(self.handle(request).await)
    }
}

fn json_response(
    status_code: StatusCode,
    extra_headers: Headers,
    result: &ExecutionResult,
) -> ResponsePayload {
    let mut headers = Headers::from_vec(vec![(
        http::header::CONTENT_TYPE.to_string(),
        "application/json".to_string(),
    )]);
    for (key, value) in extra_headers {
        headers.insert(key, value);
    }

    match serde_json::to_vec(result) {
        Ok(body) => ResponsePayload {
            body: ResponseBody::Bytes(body),
            headers,
            status_code,
        },
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            ResponsePayload {
                body: ResponseBody::Bytes(error_msg!("Internal Server Error").to_vec()),
                headers,
                status_code: StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }
}
