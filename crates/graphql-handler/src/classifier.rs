// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::context::{GraphQLOperation, RequestContext};
use crate::error::RequestError;
use crate::options::HandlerOptions;

#[derive(Debug, PartialEq)]
pub(crate) enum RequestRoute<'a> {
    /// Serve the graphiql page, pointed at `endpoint`.
    Graphiql { endpoint: String },
    Execute(&'a GraphQLOperation),
    MissingQuery,
    /// The body (or URL query) could not be decoded into an operation.
    Invalid(RequestError),
}

pub(crate) fn classify<'a>(context: &'a RequestContext, options: &HandlerOptions) -> RequestRoute<'a> {
    let browser_navigation =
        *context.method() == http::Method::GET && context.accepted().prefers_html();

    if options.graphiql() && browser_navigation {
        if let Some(endpoint) = graphiql_endpoint(context.path(), options.endpoint_url()) {
            return RequestRoute::Graphiql { endpoint };
        }
    }

    match context.operation() {
        Ok(Some(operation)) => RequestRoute::Execute(operation),
        Ok(None) => RequestRoute::MissingQuery,
        Err(e) => RequestRoute::Invalid(e.clone()),
    }
}

/// If `path` is a graphiql path (ends with `endpoint_url`), the GraphQL endpoint it belongs to.
fn graphiql_endpoint(path: &str, endpoint_url: &str) -> Option<String> {
    let path = path.trim_end_matches('/');

    let endpoint = path.strip_suffix(endpoint_url)?.trim_end_matches('/');

    Some(if endpoint.starts_with('/') {
        endpoint.to_string()
    } else {
        format!("/{endpoint}")
    })
}

#[cfg(test)]
mod tests {
    use common::test_support::TestRequestPayload;
    use http::Method;
    use serde_json::json;

    use super::*;
    use crate::executor::tests::UnreachableExecutor;

    const BROWSER_ACCEPT: &str =
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";

    fn options(graphiql: bool) -> HandlerOptions {
        HandlerOptions::new(UnreachableExecutor).with_graphiql(graphiql)
    }

    fn context(request: TestRequestPayload) -> RequestContext {
        let mut request = request;
        RequestContext::from_request(&mut request)
    }

    #[test]
    fn graphiql_endpoints() {
        assert_eq!(
            graphiql_endpoint("/users/brendan/graphiql", "/graphiql"),
            Some("/users/brendan".to_string())
        );
        assert_eq!(
            graphiql_endpoint("users/graphiql/", "/graphiql"),
            Some("/users".to_string())
        );
        assert_eq!(
            graphiql_endpoint("/graphiql", "/graphiql"),
            Some("/".to_string())
        );
        assert_eq!(graphiql_endpoint("/users/mygraphiql", "/graphiql"), None);
        assert_eq!(graphiql_endpoint("/users", "/graphiql"), None);
    }

    #[test]
    fn browser_navigation_to_graphiql_path_serves_ui() {
        let context = context(
            TestRequestPayload::new(Method::GET, "/users/brendan/graphiql")
                .with_header("accept", BROWSER_ACCEPT),
        );

        assert_eq!(
            classify(&context, &options(true)),
            RequestRoute::Graphiql {
                endpoint: "/users/brendan".to_string()
            }
        );
    }

    #[test]
    fn graphiql_requires_flag_get_html_and_path() {
        let query = json!({"query": "{ products { name } }"});

        let requests = [
            // disabled
            (
                false,
                TestRequestPayload::new(Method::GET, "/users/graphiql")
                    .with_header("accept", BROWSER_ACCEPT),
            ),
            // not a GET
            (
                true,
                TestRequestPayload::new(Method::POST, "/users/graphiql")
                    .with_header("accept", BROWSER_ACCEPT),
            ),
            // prefers JSON
            (
                true,
                TestRequestPayload::new(Method::GET, "/users/graphiql")
                    .with_header("accept", "application/json"),
            ),
            // not the graphiql path
            (
                true,
                TestRequestPayload::new(Method::GET, "/users")
                    .with_header("accept", BROWSER_ACCEPT),
            ),
        ];

        for (graphiql, request) in requests {
            let context = context(request.with_body(query.clone()));

            assert!(matches!(
                classify(&context, &options(graphiql)),
                RequestRoute::Execute(operation) if operation.query == "{ products { name } }"
            ));
        }
    }

    #[test]
    fn no_query_is_missing_query() {
        let context = context(
            TestRequestPayload::new(Method::GET, "/users").with_header("accept", BROWSER_ACCEPT),
        );

        assert_eq!(classify(&context, &options(true)), RequestRoute::MissingQuery);
    }

    #[test]
    fn graphiql_ignores_an_undecodable_query() {
        let browser = context(
            TestRequestPayload::new(Method::GET, "/users/graphiql")
                .with_header("accept", BROWSER_ACCEPT)
                .with_query(json!({"query": "{ products { name } }", "variables": "{oops"})),
        );

        assert_eq!(
            classify(&browser, &options(true)),
            RequestRoute::Graphiql {
                endpoint: "/users".to_string()
            }
        );

        let api = context(
            TestRequestPayload::new(Method::GET, "/users/graphiql")
                .with_header("accept", "application/json")
                .with_query(json!({"query": "{ products { name } }", "variables": "{oops"})),
        );

        assert!(matches!(
            classify(&api, &options(true)),
            RequestRoute::Invalid(RequestError::InvalidVariables(_))
        ));
    }

    #[test]
    fn custom_endpoint_url() {
        let options = options(true).with_endpoint_url("explore/");
        let context = context(
            TestRequestPayload::new(Method::GET, "/api/explore").with_header("accept", "text/html"),
        );

        assert_eq!(
            classify(&context, &options),
            RequestRoute::Graphiql {
                endpoint: "/api".to_string()
            }
        );
    }
}
