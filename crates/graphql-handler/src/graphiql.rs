// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql::http::GraphiQLSource;
use common::http::{Headers, ResponseBody, ResponsePayload};
use http::StatusCode;

/// The graphiql page, sending its queries to `endpoint`.
pub(crate) fn graphiql_response(endpoint: &str) -> ResponsePayload {
    let page = GraphiQLSource::build()
        .endpoint(endpoint)
        .title("GraphiQL")
        .finish();

    // we shouldn't cache the page, as the endpoint is substituted in per request
    let headers = Headers::from_vec(vec![
        (
            http::header::CONTENT_TYPE.to_string(),
            "text/html; charset=utf-8".to_string(),
        ),
        (
            http::header::CACHE_CONTROL.to_string(),
            "no-cache".to_string(),
        ),
    ]);

    ResponsePayload {
        body: ResponseBody::Text(page),
        headers,
        status_code: StatusCode::OK,
    }
}
