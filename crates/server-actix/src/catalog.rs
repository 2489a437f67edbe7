// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A small product catalog, served by the binary as a demonstration.

use async_graphql::{EmptyMutation, EmptySubscription, ID, Object, Schema, SimpleObject};
use graphql_handler::GraphQLError;
use http::StatusCode;

#[derive(SimpleObject, Clone)]
struct Product {
    id: ID,
    name: String,
    short_description: Option<String>,
}

pub struct Query {
    products: Vec<Product>,
}

#[Object]
impl Query {
    /// All products, or the one with the given `id`.
    async fn products(&self, id: Option<i32>) -> async_graphql::Result<Vec<Product>> {
        let Some(id) = id else {
            return Ok(self.products.clone());
        };

        let id = ID::from(id.to_string());
        let matching: Vec<_> = self
            .products
            .iter()
            .filter(|product| product.id == id)
            .cloned()
            .collect();

        if matching.is_empty() {
            Err(GraphQLError::new(
                StatusCode::NOT_FOUND,
                format!("Product with id {} does not exist.", id.as_str()),
            )
            .into())
        } else {
            Ok(matching)
        }
    }
}

pub fn schema() -> Schema<Query, EmptyMutation, EmptySubscription> {
    let products = vec![
        Product {
            id: ID::from("1"),
            name: "Product A".to_string(),
            short_description: Some("First product.".to_string()),
        },
        Product {
            id: ID::from("2"),
            name: "Product B".to_string(),
            short_description: Some("Second product.".to_string()),
        },
    ];

    Schema::new(Query { products }, EmptyMutation, EmptySubscription)
}
