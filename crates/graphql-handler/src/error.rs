// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt;

use http::StatusCode;
use thiserror::Error;

use crate::executor::ExecutionError;
use crate::result::{ErrorEntry, ExecutionResult};

pub(crate) const REDACTED_MESSAGE: &str = "Internal Server Error";

/// An error raised by resolver code to control the HTTP status of the response.
///
/// Return it from a resolver (it converts into `async_graphql::Error`) and the handler will
/// respond with `code` and a single error entry carrying `message`. Marking it hidden replaces
/// the message with a generic one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GraphQLError {
    code: StatusCode,
    message: String,
    hide: bool,
}

impl GraphQLError {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hide: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_hidden(&self) -> bool {
        self.hide
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Missing query")]
    MissingQuery,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Invalid variables: {0}")]
    InvalidVariables(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookLocation {
    Transform,
    OnResponse,
}

impl fmt::Display for HookLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookLocation::Transform => write!(f, "Function 'request.graphql.transform'"),
            HookLocation::OnResponse => write!(f, "Function 'optionsData.onResponse'"),
        }
    }
}

/// Every way handling a GraphQL request can fail.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Domain(#[from] GraphQLError),

    #[error("{message}")]
    Hook {
        location: HookLocation,
        message: String,
    },

    #[error("{0}")]
    Unknown(String),
}

impl From<ExecutionError> for HandlerError {
    fn from(error: ExecutionError) -> Self {
        match error {
            ExecutionError::Domain(error) => HandlerError::Domain(error),
            ExecutionError::Engine(message) => HandlerError::Unknown(message),
        }
    }
}

impl HandlerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::Request(_) => StatusCode::BAD_REQUEST,
            HandlerError::Domain(error) => error.code(),
            HandlerError::Hook { .. } | HandlerError::Unknown(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn location(&self) -> Option<HookLocation> {
        match self {
            HandlerError::Hook { location, .. } => Some(*location),
            _ => None,
        }
    }

    // Request errors describe the client's own input, so they are never redacted
    fn redacted(&self, production: bool) -> bool {
        match self {
            HandlerError::Request(_) => false,
            HandlerError::Domain(error) => production || error.is_hidden(),
            HandlerError::Hook { .. } | HandlerError::Unknown(_) => production,
        }
    }

    /// The `{"errors": [...]}` envelope reported to the client for this error.
    pub fn to_execution_result(&self, production: bool) -> ExecutionResult {
        let message = if self.redacted(production) {
            REDACTED_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        ExecutionResult::from_error(ErrorEntry {
            message,
            location: self.location().map(|location| location.to_string()),
            other: Default::default(),
        })
    }
}
