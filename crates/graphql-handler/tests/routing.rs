// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use common::router::PathRouter;
use common::test_support::TestRequestPayload;
use http::{Method, StatusCode};
use serde_json::json;

mod catalog;

use crate::catalog::{BROWSER_ACCEPT, handler, json_body, send, text_body};

fn router(patterns: &[&str]) -> PathRouter {
    let handler = handler(|options| options.with_graphiql(true).with_endpoint_url("/graphiql"));

    PathRouter::new().mount(patterns, Arc::new(handler))
}

#[tokio::test]
async fn unmatched_path_is_not_found() {
    let router = router(&["/users/:graphiqlpath"]);

    let mut request = TestRequestPayload::new(Method::GET, "/")
        .with_header("origin", "http://localhost:8080")
        .with_header("referer", "http://localhost:8080");

    let response = send(&router, &mut request).await;

    assert_eq!(response.status_code, StatusCode::NOT_FOUND);
    assert_eq!(text_body(&response), "Endpoint '/' for method GET not found.");
}

#[tokio::test]
async fn matched_path_serves_queries() {
    let router = router(&["/users", "/users/graphiql"]);

    let mut request = TestRequestPayload::new(Method::GET, "users/graphiql")
        .with_header("accept", "application/json")
        .with_body(json!({"query": "query { products(id: 1) { name } }", "variables": null}));

    let response = send(&router, &mut request).await;

    assert_eq!(response.status_code, StatusCode::OK);
    assert_eq!(
        json_body(&response)["data"]["products"][0]["name"],
        json!("Product A")
    );
}

#[tokio::test]
async fn serves_graphiql_under_parameterized_paths() {
    let router = router(&["/users/:username", "/users/:username/graphiql"]);

    for (path, endpoint) in [
        ("/users/brendan/graphiql", "/users/brendan"),
        ("/users/graphiql", "/users"),
    ] {
        let mut request =
            TestRequestPayload::new(Method::GET, path).with_header("accept", BROWSER_ACCEPT);

        let response = send(&router, &mut request).await;

        assert_eq!(response.status_code, StatusCode::OK, "{path}");
        assert_eq!(
            response.headers.get("content-type").as_deref(),
            Some("text/html; charset=utf-8")
        );
        assert!(text_body(&response).contains(endpoint), "{path}");
    }
}

#[tokio::test]
async fn graphiql_on_unmounted_path_is_not_found() {
    let router = router(&["/", "/graphiql"]);

    let mut request = TestRequestPayload::new(Method::GET, "users/graphiql")
        .with_header("accept", BROWSER_ACCEPT)
        .with_body(json!({"query": "query { products(id: 1) { name } }", "variables": null}));

    let response = send(&router, &mut request).await;

    assert_eq!(response.status_code, StatusCode::NOT_FOUND);
    assert_eq!(
        text_body(&response),
        "Endpoint 'users/graphiql' for method GET not found."
    );
}
