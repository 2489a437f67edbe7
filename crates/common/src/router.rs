// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use crate::http::{Headers, RequestPayload, ResponseBody, ResponsePayload};
use async_trait::async_trait;
use http::StatusCode;

#[async_trait]
pub trait Router: Sync {
    /// Produce a response for the request, or `None` if this router doesn't handle it.
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload>;
}

/// A path pattern such as `/users/:username/graphiql`.
///
/// Matching is segment by segment: a literal segment must match exactly and a `:name` segment
/// matches any single non-empty segment. Leading and trailing slashes are ignored on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

impl RoutePattern {
    pub fn new(pattern: &str) -> Self {
        let segments = path_segments(pattern)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(segment.to_string()),
            })
            .collect();

        Self {
            source: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        let mut path_segments = path_segments(path);

        for segment in &self.segments {
            match (segment, path_segments.next()) {
                (Segment::Literal(expected), Some(actual)) if expected == actual => {}
                (Segment::Param(_), Some(_)) => {}
                _ => return false,
            }
        }

        path_segments.next().is_none()
    }
}

fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

struct Mount {
    patterns: Vec<RoutePattern>,
    router: Arc<dyn Router + Send + Sync>,
}

/// Routes requests to the first mounted router whose patterns match the request path.
///
/// This router owns "not found": when no mount answers, it responds with a 404 and a plain
/// text message naming the path and method.
#[derive(Default)]
pub struct PathRouter {
    mounts: Vec<Mount>,
}

impl PathRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `router` on every pattern in `patterns` (for any method).
    pub fn mount<P: AsRef<str>>(
        mut self,
        patterns: &[P],
        router: Arc<dyn Router + Send + Sync>,
    ) -> Self {
        self.mounts.push(Mount {
            patterns: patterns
                .iter()
                .map(|pattern| RoutePattern::new(pattern.as_ref()))
                .collect(),
            router,
        });
        self
    }

    pub fn not_found(path: &str, method: &http::Method) -> ResponsePayload {
        ResponsePayload {
            body: ResponseBody::Text(format!("Endpoint '{path}' for method {method} not found.")),
            headers: Headers::from_vec(vec![(
                http::header::CONTENT_TYPE.to_string(),
                "text/plain; charset=utf-8".to_string(),
            )]),
            status_code: StatusCode::NOT_FOUND,
        }
    }
}

#[async_trait]
impl Router for PathRouter {
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload> {
        let path = request.get_head().get_path();

        for mount in self.mounts.iter() {
            if let Some(pattern) = mount.patterns.iter().find(|p| p.matches(&path)) {
                tracing::debug!("Path '{}' matched route '{}'", path, pattern.as_str());

                if let Some(response) = mount.router.route(request).await {
                    return Some(response);
                }
            }
        }

        let method = request.get_head().get_method();
        tracing::debug!("No route for {} '{}'", method, path);

        Some(Self::not_found(&path, &method))
    }
}

#[cfg(test)]
mod tests {
    use http::Method;

    use super::*;
    use crate::test_support::TestRequestPayload;

    #[test]
    fn pattern_matching() {
        let pattern = RoutePattern::new("/users/:username/graphiql");

        assert!(pattern.matches("/users/brendan/graphiql"));
        assert!(pattern.matches("users/brendan/graphiql/"));
        assert!(!pattern.matches("/users/graphiql"));
        assert!(!pattern.matches("/users/brendan/graphiql/extra"));
        assert!(!pattern.matches("/accounts/brendan/graphiql"));

        let root = RoutePattern::new("/");
        assert!(root.matches("/"));
        assert!(root.matches(""));
        assert!(!root.matches("/users"));
    }

    struct FixedRouter {
        body: &'static str,
        answer: bool,
    }

    #[async_trait]
    impl Router for FixedRouter {
        async fn route(
            &self,
            _request: &mut (dyn RequestPayload + Send),
        ) -> Option<ResponsePayload> {
            self.answer.then(|| ResponsePayload {
                body: ResponseBody::Text(self.body.to_string()),
                headers: Headers::new(),
                status_code: StatusCode::OK,
            })
        }
    }

    fn fixed(body: &'static str, answer: bool) -> Arc<dyn Router + Send + Sync> {
        Arc::new(FixedRouter { body, answer })
    }

    #[tokio::test]
    async fn routes_to_first_matching_mount() {
        let router = PathRouter::new()
            .mount(&["/users", "/users/graphiql"], fixed("users", true))
            .mount(&["/users/:id"], fixed("user", true));

        let mut request = TestRequestPayload::new(Method::GET, "/users/graphiql");
        let response = router.route(&mut request).await.unwrap();
        assert_eq!(response.status_code, StatusCode::OK);
        assert_eq!(response.body.as_bytes(), b"users");

        let mut request = TestRequestPayload::new(Method::POST, "/users/42");
        let response = router.route(&mut request).await.unwrap();
        assert_eq!(response.body.as_bytes(), b"user");
    }

    #[tokio::test]
    async fn falls_through_declining_routers() {
        let router = PathRouter::new()
            .mount(&["/users/:id"], fixed("declined", false))
            .mount(&["/users/:id"], fixed("accepted", true));

        let mut request = TestRequestPayload::new(Method::GET, "/users/42");
        let response = router.route(&mut request).await.unwrap();
        assert_eq!(response.body.as_bytes(), b"accepted");
    }

    #[tokio::test]
    async fn unmatched_path_is_not_found() {
        let router = PathRouter::new().mount(&["/users/:graphiqlpath"], fixed("users", true));

        let mut request = TestRequestPayload::new(Method::GET, "/");
        let response = router.route(&mut request).await.unwrap();
        assert_eq!(response.status_code, StatusCode::NOT_FOUND);
        assert_eq!(
            response.body.as_bytes(),
            b"Endpoint '/' for method GET not found."
        );

        let router = PathRouter::new().mount(&["/", "/graphiql"], fixed("root", true));
        let mut request = TestRequestPayload::new(Method::GET, "users/graphiql");
        let response = router.route(&mut request).await.unwrap();
        assert_eq!(response.status_code, StatusCode::NOT_FOUND);
        assert_eq!(
            response.body.as_bytes(),
            b"Endpoint 'users/graphiql' for method GET not found."
        );
    }
}
