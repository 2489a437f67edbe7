// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod request;

use actix_web::{
    HttpMessage, HttpRequest, HttpResponse,
    web::{self, ServiceConfig},
};
use http::StatusCode;
use serde_json::Value;

use common::{
    http::{BodyError, RequestHead, RequestPayload, ResponseBody, ResponsePayload},
    router::{PathRouter, Router},
};
use graphql_handler::TransformHook;
use request::ActixRequestHead;

macro_rules! error_msg {
    ($msg:literal) => {
        concat!("{\"errors\": [{\"message\":\"", $msg, "\"}]}").as_bytes()
    };
}

/// Route every request through `router`.
///
/// A [TransformHook] placed in the request's extensions by an upstream middleware is handed to
/// the GraphQL handler for that request.
pub fn configure_router(router: web::Data<PathRouter>) -> impl FnOnce(&mut ServiceConfig) {
    move |app| {
        app.app_data(router).default_service(web::to(resolve));
    }
}

struct ActixRequestPayload {
    head: ActixRequestHead,
    body: Result<Value, BodyError>,
    extensions: http::Extensions,
}

impl RequestPayload for ActixRequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync) {
        &self.head
    }

    fn take_body(&mut self) -> Result<Value, BodyError> {
        std::mem::replace(&mut self.body, Ok(Value::Null))
    }

    fn take_extensions(&mut self) -> http::Extensions {
        std::mem::take(&mut self.extensions)
    }
}

async fn resolve(
    http_request: HttpRequest,
    body: web::Bytes,
    query: web::Query<Value>,
    router: web::Data<PathRouter>,
) -> HttpResponse {
    let mut extensions = http::Extensions::new();
    if let Some(transform) = http_request.extensions().get::<TransformHook>() {
        extensions.insert(transform.clone());
    }

    let mut request = ActixRequestPayload {
        head: ActixRequestHead::from_request(&http_request, query.into_inner()),
        body: decode_body(&body),
        extensions,
    };

    match router.route(&mut request).await {
        Some(ResponsePayload {
            body,
            headers,
            status_code,
        }) => {
            let actix_status_code = match to_actix_status_code(status_code) {
                Ok(status_code) => status_code,
                Err(err) => {
                    tracing::error!("Invalid status code: {}", err);
                    return HttpResponse::build(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
                        .body(error_msg!("Invalid status code"));
                }
            };

            let mut builder = HttpResponse::build(actix_status_code);

            for header in headers.into_iter() {
                builder.append_header(header);
            }

            match body {
                ResponseBody::Bytes(bytes) => builder.body(bytes),
                ResponseBody::Text(text) => builder.body(text),
            }
        }
        None => HttpResponse::build(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
            .body(error_msg!("Error resolving request")),
    }
}

// Decoding is left to the handler, so a malformed body is reported rather than
// treated as absent.
fn decode_body(body: &[u8]) -> Result<Value, BodyError> {
    if body.is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_slice(body).map_err(BodyError::from)
    }
}

// Actix uses http-0.2. However, the rest of the system uses
// http-1.x, so we need to convert between the two.
fn to_actix_status_code(status_code: StatusCode) -> Result<actix_web::http::StatusCode, String> {
    actix_web::http::StatusCode::from_u16(status_code.as_u16())
        .map_err(|_| "Invalid status code".to_string())
}
