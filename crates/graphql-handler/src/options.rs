// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use adapter_env::{EnvError, Environment};
use common::env_const::{DEFAULT_GRAPHIQL_PATH, get_graphiql_http_path, graphiql_enabled, is_production};
use common::http::Headers;

use crate::context::RequestContext;
use crate::executor::GraphQLExecutor;
use crate::hooks::OnResponseHook;
use crate::result::ExecutionResult;

/// Handler-level configuration, fixed when the handler is created.
#[derive(Clone)]
pub struct HandlerOptions {
    schema: Arc<dyn GraphQLExecutor>,
    graphiql: bool,
    endpoint_url: String,
    on_response: Option<OnResponseHook>,
    production: bool,
}

impl HandlerOptions {
    /// Options with graphiql disabled, the default `/graphiql` endpoint URL, no response hook, and
    /// error messages visible to clients.
    pub fn new(schema: impl GraphQLExecutor + 'static) -> Self {
        Self {
            schema: Arc::new(schema),
            graphiql: false,
            endpoint_url: DEFAULT_GRAPHIQL_PATH.to_string(),
            on_response: None,
            production: false,
        }
    }

    /// Options derived from the deployment mode, graphiql flag, and graphiql path in `env`.
    pub fn from_env(
        schema: impl GraphQLExecutor + 'static,
        env: &dyn Environment,
    ) -> Result<Self, EnvError> {
        Ok(Self::new(schema)
            .with_graphiql(graphiql_enabled(env)?)
            .with_endpoint_url(&get_graphiql_http_path(env))
            .with_production(is_production(env)))
    }

    pub fn with_graphiql(mut self, graphiql: bool) -> Self {
        self.graphiql = graphiql;
        self
    }

    /// The path suffix (relative to the GraphQL endpoint) at which graphiql is served.
    pub fn with_endpoint_url(mut self, endpoint_url: &str) -> Self {
        let trimmed = endpoint_url.trim().trim_matches('/');
        self.endpoint_url = if trimmed.is_empty() {
            DEFAULT_GRAPHIQL_PATH.to_string()
        } else {
            format!("/{trimmed}")
        };
        self
    }

    pub fn with_on_response(
        mut self,
        on_response: impl Fn(
            &RequestContext,
            &mut Headers,
            &mut ExecutionResult,
        ) -> anyhow::Result<Option<ExecutionResult>>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.on_response = Some(OnResponseHook::new(on_response));
        self
    }

    /// In production, error messages other than request errors are replaced with a generic one.
    pub fn with_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    pub fn schema(&self) -> &dyn GraphQLExecutor {
        self.schema.as_ref()
    }

    pub fn graphiql(&self) -> bool {
        self.graphiql
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub fn on_response(&self) -> Option<&OnResponseHook> {
        self.on_response.as_ref()
    }

    pub fn production(&self) -> bool {
        self.production
    }
}

#[cfg(test)]
mod tests {
    use adapter_env::MapEnvironment;
    use common::env_const::{GQL_DEPLOYMENT_MODE, GQL_GRAPHIQL, GQL_GRAPHIQL_PATH};

    use super::*;
    use crate::executor::tests::UnreachableExecutor;

    #[test]
    fn defaults() {
        let options = HandlerOptions::new(UnreachableExecutor);

        assert!(!options.graphiql());
        assert_eq!(options.endpoint_url(), "/graphiql");
        assert!(options.on_response().is_none());
        assert!(!options.production());
    }

    #[test]
    fn endpoint_url_is_normalized() {
        let options = HandlerOptions::new(UnreachableExecutor);

        assert_eq!(options.clone().with_endpoint_url("explore").endpoint_url(), "/explore");
        assert_eq!(options.clone().with_endpoint_url("/explore/").endpoint_url(), "/explore");
        assert_eq!(options.with_endpoint_url("/").endpoint_url(), "/graphiql");
    }

    #[test]
    fn from_env() {
        let env = MapEnvironment::from([
            (GQL_DEPLOYMENT_MODE, "dev"),
            (GQL_GRAPHIQL_PATH, "/explore"),
        ]);
        let options = HandlerOptions::from_env(UnreachableExecutor, &env).unwrap();

        assert!(options.graphiql());
        assert_eq!(options.endpoint_url(), "/explore");
        assert!(!options.production());

        let env = MapEnvironment::new();
        let options = HandlerOptions::from_env(UnreachableExecutor, &env).unwrap();

        assert!(!options.graphiql());
        assert!(options.production());

        let env = MapEnvironment::from([(GQL_GRAPHIQL, "sometimes")]);
        assert!(HandlerOptions::from_env(UnreachableExecutor, &env).is_err());
    }
}
