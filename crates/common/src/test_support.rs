// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde_json::Value;

use crate::http::{BodyError, Headers, RequestHead, RequestPayload};

/// An in-memory request for exercising routers without an HTTP server.
pub struct TestRequestPayload {
    method: http::Method,
    path: String,
    headers: Headers,
    query: Value,
    body: Result<Value, BodyError>,
    extensions: http::Extensions,
}

impl TestRequestPayload {
    pub fn new(method: http::Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: Headers::new(),
            query: Value::Null,
            body: Ok(Value::Null),
            extensions: http::Extensions::new(),
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Ok(body);
        self
    }

    /// A body as sent over the wire, decoded the way a server binding would.
    pub fn with_raw_body(mut self, body: &str) -> Self {
        self.body = serde_json::from_str(body).map_err(BodyError::from);
        self
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = query;
        self
    }

    pub fn with_extension<T: Clone + Send + Sync + 'static>(mut self, extension: T) -> Self {
        self.extensions.insert(extension);
        self
    }
}

impl RequestPayload for TestRequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync) {
        self
    }

    fn take_body(&mut self) -> Result<Value, BodyError> {
        std::mem::replace(&mut self.body, Ok(Value::Null))
    }

    fn take_extensions(&mut self) -> http::Extensions {
        std::mem::take(&mut self.extensions)
    }
}

impl RequestHead for TestRequestPayload {
    fn get_headers(&self, key: &str) -> Vec<String> {
        match self.headers.get(key) {
            Some(value) => vec![value],
            None => vec![],
        }
    }

    fn get_all_headers(&self) -> Headers {
        self.headers.clone()
    }

    fn get_path(&self) -> String {
        self.path.clone()
    }

    fn get_query(&self) -> Value {
        self.query.clone()
    }

    fn get_method(&self) -> http::Method {
        self.method.clone()
    }
}
