// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Adapts HTTP requests to GraphQL execution without depending on any specific web framework.
//!
//! A [GraphQLHandler] inspects each request and either serves the graphiql page (for browser
//! navigations to the graphiql path), executes the attached GraphQL operation against the
//! configured schema, or reports a GraphQL-shaped error. Responses pass through an optional
//! per-request [TransformHook] and an optional handler-level [OnResponseHook] before being
//! written, and every failure is normalized into an `{"errors": [...]}` envelope with an HTTP
//! status code.

mod accept;
mod classifier;
mod context;
mod error;
mod executor;
mod graphiql;
mod handler;
mod hooks;
mod options;
mod result;

pub use accept::AcceptedTypes;
pub use context::{GraphQLOperation, RequestContext};
pub use error::{GraphQLError, HandlerError, HookLocation, RequestError};
pub use executor::{ExecutionError, GraphQLExecutor};
pub use handler::GraphQLHandler;
pub use hooks::{OnResponseHook, TransformHook};
pub use options::HandlerOptions;
pub use result::{ErrorEntry, ExecutionResult};
