// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use common::http::Headers;

use crate::context::RequestContext;
use crate::error::{HandlerError, HookLocation};
use crate::result::ExecutionResult;

type TransformFn = dyn Fn(&mut ExecutionResult) -> anyhow::Result<()> + Send + Sync;
type OnResponseFn = dyn Fn(&RequestContext, &mut Headers, &mut ExecutionResult) -> anyhow::Result<Option<ExecutionResult>>
    + Send
    + Sync;

/// A per-request hook that may mutate the execution result before it is serialized.
///
/// Upstream middleware attaches it to a request by inserting it into the request's extensions.
#[derive(Clone)]
pub struct TransformHook(Arc<TransformFn>);

impl TransformHook {
    pub fn new(
        transform: impl Fn(&mut ExecutionResult) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(transform))
    }

    pub(crate) fn apply(&self, result: &mut ExecutionResult) -> Result<(), HandlerError> {
        guarded(HookLocation::Transform, || (self.0)(result))
    }
}

impl fmt::Debug for TransformHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TransformHook")
    }
}

/// A handler-level hook that runs last, with access to the request and the response headers.
///
/// Returning `Some(result)` replaces the result that will be serialized.
#[derive(Clone)]
pub struct OnResponseHook(Arc<OnResponseFn>);

impl OnResponseHook {
    pub fn new(
        on_response: impl Fn(
            &RequestContext,
            &mut Headers,
            &mut ExecutionResult,
        ) -> anyhow::Result<Option<ExecutionResult>>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self(Arc::new(on_response))
    }

    pub(crate) fn apply(
        &self,
        context: &RequestContext,
        headers: &mut Headers,
        result: &mut ExecutionResult,
    ) -> Result<Option<ExecutionResult>, HandlerError> {
        guarded(HookLocation::OnResponse, || (self.0)(context, headers, result))
    }
}

impl fmt::Debug for OnResponseHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OnResponseHook")
    }
}

/// Run user code, turning both returned errors and panics into a hook failure at `location`.
fn guarded<T>(
    location: HookLocation,
    hook: impl FnOnce() -> anyhow::Result<T>,
) -> Result<T, HandlerError> {
    let message = match catch_unwind(AssertUnwindSafe(hook)) {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(error)) => format!("{error:#}"),
        Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
    };

    tracing::error!("{} failed: {}", location, message);

    Err(HandlerError::Hook { location, message })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
