// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#![allow(dead_code)]

use async_graphql::{EmptyMutation, EmptySubscription, ID, Object, Schema, SimpleObject};
use common::http::{ResponsePayload, RequestPayload};
use common::router::Router;
use graphql_handler::{GraphQLError, GraphQLHandler, HandlerOptions};
use http::StatusCode;
use serde_json::Value;

pub const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";

#[derive(SimpleObject, Clone)]
pub struct Product {
    pub id: ID,
    pub name: String,
    pub short_description: String,
}

pub struct Query {
    hide_errors: bool,
}

#[Object]
impl Query {
    async fn products(&self, id: Option<i32>) -> async_graphql::Result<Vec<Product>> {
        let products = catalog();

        match id {
            None => Ok(products),
            Some(id) => {
                let matching: Vec<_> = products
                    .into_iter()
                    .filter(|product| product.id.as_str() == id.to_string())
                    .collect();

                if matching.is_empty() {
                    let error = GraphQLError::new(
                        StatusCode::NOT_FOUND,
                        format!("Product with id {id} does not exist."),
                    );
                    let error = if self.hide_errors {
                        error.hidden()
                    } else {
                        error
                    };
                    Err(error.into())
                } else {
                    Ok(matching)
                }
            }
        }
    }

    /// Fails the way a backing store would, without a typed error.
    async fn inventory(&self) -> async_graphql::Result<i32> {
        Err("connection refused to inventory db at 10.0.0.5:5432".into())
    }
}

fn catalog() -> Vec<Product> {
    vec![
        Product {
            id: ID::from("1"),
            name: "Product A".to_string(),
            short_description: "The first product".to_string(),
        },
        Product {
            id: ID::from("2"),
            name: "Product B".to_string(),
            short_description: "The second product".to_string(),
        },
    ]
}

pub type CatalogSchema = Schema<Query, EmptyMutation, EmptySubscription>;

pub fn schema(hide_errors: bool) -> CatalogSchema {
    Schema::new(Query { hide_errors }, EmptyMutation, EmptySubscription)
}

pub fn handler(options: impl FnOnce(HandlerOptions) -> HandlerOptions) -> GraphQLHandler {
    GraphQLHandler::new(options(HandlerOptions::new(schema(false))))
}

pub async fn send(router: &dyn Router, request: &mut (dyn RequestPayload + Send)) -> ResponsePayload {
    router.route(request).await.unwrap()
}

pub fn json_body(response: &ResponsePayload) -> Value {
    serde_json::from_slice(response.body.as_bytes()).unwrap()
}

pub fn text_body(response: &ResponsePayload) -> String {
    String::from_utf8(response.body.as_bytes().to_vec()).unwrap()
}
