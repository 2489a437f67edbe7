// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod catalog;

use actix_web::{App, HttpServer, middleware, web};

use server_actix::configure_router;
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time;

use adapter_env::{EnvError, Environment, SystemEnvironment};
use common::{
    env_const::{
        DeploymentMode, GQL_SERVER_HOST, GQL_SERVER_PORT, get_deployment_mode,
        get_graphql_http_path,
    },
    logging_tracing::{self, LoggingError},
    router::PathRouter,
};
use graphql_handler::{GraphQLHandler, HandlerOptions};

const DEFAULT_SERVER_PORT: u16 = 9876;

#[derive(Error)]
enum ServerError {
    #[error("Port {0} is already in use. Check if there is another process running at that port.")]
    PortInUse(u16),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    EnvError(#[from] EnvError),
    #[error("{0}")]
    Logging(#[from] LoggingError),
}

// A custom `Debug` implementation for `ServerError` (that delegate to the `Display` impl), so that
// we don't print the default `Debug` implementation's message when the server exits.
impl std::fmt::Debug for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// Serve the demo catalog schema over HTTP
#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    let start_time = time::SystemTime::now();

    logging_tracing::init()?;

    let env = SystemEnvironment;

    let options = HandlerOptions::from_env(catalog::schema(), &env)?;
    let graphiql_enabled = options.graphiql();
    let graphiql_path = options.endpoint_url().to_string();

    let graphql_path = get_graphql_http_path(&env);
    let router = web::Data::new(PathRouter::new().mount(
        &[graphql_path.clone(), format!("{graphql_path}{graphiql_path}")],
        Arc::new(GraphQLHandler::new(options)),
    ));

    let server_port = server_port(&env)?;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::new(
                middleware::TrailingSlash::Trim,
            ))
            .configure(configure_router(router.clone()))
    });

    let server = match env.get(GQL_SERVER_HOST) {
        Some(host) => server.bind((host, server_port)),
        None => match get_deployment_mode(&env)? {
            // Binding to "localhost" covers both the IPv4 and IPv6 loopback addresses
            DeploymentMode::Dev => server.bind(("localhost", server_port)),
            // All interfaces, so that the server is reachable from outside a container
            DeploymentMode::Prod => server.bind(("0.0.0.0", server_port)),
        },
    };

    match server {
        Ok(server) => {
            let pretty_addr = pretty_addr(&server.addrs());

            println!(
                "Started server on {} in {:.2} ms",
                pretty_addr,
                start_time
                    .elapsed()
                    .map(|elapsed| elapsed.as_micros() as f64 / 1000.0)
                    .unwrap_or_default()
            );
            println!("- GraphQL endpoint hosted at:");
            println!("\thttp://{pretty_addr}{graphql_path}");
            if graphiql_enabled {
                println!("- GraphiQL hosted at:");
                println!("\thttp://{pretty_addr}{graphql_path}{graphiql_path}");
            }

            Ok(server.run().await?)
        }
        Err(e) => Err(if e.kind() == ErrorKind::AddrInUse {
            ServerError::PortInUse(server_port)
        } else {
            ServerError::Io(e)
        }),
    }
}

fn server_port(env: &dyn Environment) -> Result<u16, EnvError> {
    match env.get(GQL_SERVER_PORT) {
        Some(port_str) => port_str
            .parse::<u16>()
            .map_err(|e| EnvError::InvalidNumber {
                env_key: GQL_SERVER_PORT,
                env_value: port_str.clone(),
                message: e.to_string(),
            }),
        None => Ok(DEFAULT_SERVER_PORT),
    }
}

fn pretty_addr(addrs: &[SocketAddr]) -> String {
    let loopback_addr = addrs.iter().find(|addr| addr.ip().is_loopback());

    match loopback_addr {
        Some(addr) => format!("localhost:{}", addr.port()),
        None => match addrs {
            // Print single address without square brackets
            [addr] => format!("{addr}"),
            _ => {
                format!("{addrs:?}")
            }
        },
    }
}
