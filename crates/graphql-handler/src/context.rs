// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use common::http::{Headers, RequestPayload};
use serde_json::{Map, Value};

use crate::accept::AcceptedTypes;
use crate::error::RequestError;
use crate::hooks::TransformHook;

/// A GraphQL operation extracted from a request body (or, lacking one, the URL query).
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQLOperation {
    pub query: String,
    pub variables: Option<Map<String, Value>>,
    pub operation_name: Option<String>,
}

impl GraphQLOperation {
    /// Extract an operation from a `{ query, variables, operationName }` payload.
    ///
    /// Returns `Ok(None)` when the payload carries no query (null payload, absent, null or blank
    /// `query`).
    pub fn from_json(payload: Value) -> Result<Option<Self>, RequestError> {
        let mut payload = match payload {
            Value::Null => return Ok(None),
            Value::Object(payload) => payload,
            _ => {
                return Err(RequestError::InvalidBody(
                    "expected a JSON object".to_string(),
                ));
            }
        };

        let query = match payload.remove("query") {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(query)) if query.trim().is_empty() => return Ok(None),
            Some(Value::String(query)) => query,
            Some(_) => {
                return Err(RequestError::InvalidBody(
                    "'query' must be a string".to_string(),
                ));
            }
        };

        let variables = match payload.remove("variables") {
            None | Some(Value::Null) => None,
            Some(Value::Object(variables)) => Some(variables),
            // Variables in a URL query arrive JSON-encoded
            Some(Value::String(encoded)) => {
                match serde_json::from_str(&encoded)
                    .map_err(|e| RequestError::InvalidVariables(e.to_string()))?
                {
                    Value::Null => None,
                    Value::Object(variables) => Some(variables),
                    _ => {
                        return Err(RequestError::InvalidBody(
                            "'variables' must be an object".to_string(),
                        ));
                    }
                }
            }
            Some(_) => {
                return Err(RequestError::InvalidBody(
                    "'variables' must be an object".to_string(),
                ));
            }
        };

        let operation_name = match payload.remove("operationName") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name),
            Some(_) => {
                return Err(RequestError::InvalidBody(
                    "'operationName' must be a string".to_string(),
                ));
            }
        };

        Ok(Some(Self {
            query,
            variables,
            operation_name,
        }))
    }

    /// Whether the query is an operation with an empty selection set (`{}`, `query{}`,
    /// `query Name {}`), which succeeds with an empty result without reaching the engine.
    pub fn is_empty_selection(&self) -> bool {
        let compact: String = self
            .query
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let Some(head) = compact.strip_suffix("{}") else {
            return false;
        };

        match head.strip_prefix("query") {
            Some(name) => name.chars().all(|c| c.is_alphanumeric() || c == '_'),
            None => head.is_empty(),
        }
    }
}

/// Everything the handler needs to know about one request, derived once when it arrives.
///
/// A body that fails to decode is kept as an error rather than failing the derivation, so that
/// requests which never look at the body (such as graphiql page loads) are unaffected.
#[derive(Debug)]
pub struct RequestContext {
    method: http::Method,
    headers: Headers,
    accepted: AcceptedTypes,
    path: String,
    body: Result<Option<GraphQLOperation>, RequestError>,
    transform: Option<TransformHook>,
}

impl RequestContext {
    pub fn from_request(request: &mut (dyn RequestPayload + Send)) -> Self {
        let body = match request.take_body() {
            // Fall back to the URL query (for example, `GET /graphql?query={...}`)
            Ok(Value::Null) => GraphQLOperation::from_json(request.get_head().get_query()),
            Ok(body) => GraphQLOperation::from_json(body),
            Err(e) => Err(RequestError::InvalidBody(e.to_string())),
        };

        let transform = request.take_extensions().remove::<TransformHook>();

        let head = request.get_head();
        let headers = head.get_all_headers();
        let accepted = AcceptedTypes::parse(head.get_header(http::header::ACCEPT.as_str()).as_deref());

        Self {
            method: head.get_method(),
            headers,
            accepted,
            path: head.get_path(),
            body,
            transform,
        }
    }

    pub fn method(&self) -> &http::Method {
        &self.method
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn accepted(&self) -> &AcceptedTypes {
        &self.accepted
    }

    /// Accepted content types, most preferred first.
    pub fn accepted_content_types(&self) -> Vec<&str> {
        self.accepted.content_types().collect()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The operation to execute, if the body decoded and carries a query.
    pub fn body(&self) -> Option<&GraphQLOperation> {
        self.operation().ok().flatten()
    }

    pub(crate) fn operation(&self) -> Result<Option<&GraphQLOperation>, &RequestError> {
        self.body.as_ref().map(Option::as_ref)
    }

    pub fn transform(&self) -> Option<&TransformHook> {
        self.transform.as_ref()
    }
}
