// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use adapter_env::{EnvError, Environment};

pub const GQL_DEPLOYMENT_MODE: &str = "GQL_DEPLOYMENT_MODE"; // "dev" or "prod" (default)

pub const GQL_GRAPHIQL: &str = "GQL_GRAPHIQL";
pub const GQL_GRAPHIQL_PATH: &str = "GQL_GRAPHIQL_PATH";
pub const GQL_HTTP_PATH: &str = "GQL_HTTP_PATH";

pub const GQL_SERVER_PORT: &str = "GQL_SERVER_PORT";
pub const GQL_SERVER_HOST: &str = "GQL_SERVER_HOST";

pub const DEFAULT_GRAPHIQL_PATH: &str = "/graphiql";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    Dev,
    Prod,
}

pub fn get_deployment_mode(env: &dyn Environment) -> Result<DeploymentMode, EnvError> {
    match env.get(GQL_DEPLOYMENT_MODE).as_deref() {
        Some("dev") => Ok(DeploymentMode::Dev),
        Some("prod") | None => Ok(DeploymentMode::Prod),
        Some(other) => Err(EnvError::InvalidEnum {
            env_key: GQL_DEPLOYMENT_MODE,
            env_value: other.to_string(),
            message: "Must be one of 'dev' or 'prod'".to_string(),
        }),
    }
}

/// An unparsable deployment mode counts as production, so that error messages stay redacted.
pub fn is_production(env: &dyn Environment) -> bool {
    matches!(get_deployment_mode(env), Ok(DeploymentMode::Prod) | Err(_))
}

/// Whether the graphiql page should be served. Defaults to on in dev mode and off in production.
pub fn graphiql_enabled(env: &dyn Environment) -> Result<bool, EnvError> {
    env.enabled(GQL_GRAPHIQL, !is_production(env))
}

pub fn get_graphiql_http_path(env: &dyn Environment) -> String {
    env.get_or_else(GQL_GRAPHIQL_PATH, DEFAULT_GRAPHIQL_PATH)
}

pub fn get_graphql_http_path(env: &dyn Environment) -> String {
    env.get_or_else(GQL_HTTP_PATH, "/graphql")
}

#[cfg(test)]
mod tests {
    use adapter_env::MapEnvironment;

    use super::*;

    #[test]
    fn defaults_to_production() {
        let env = MapEnvironment::new();

        assert_eq!(get_deployment_mode(&env).unwrap(), DeploymentMode::Prod);
        assert!(is_production(&env));
        assert!(!graphiql_enabled(&env).unwrap());
        assert_eq!(get_graphiql_http_path(&env), "/graphiql");
        assert_eq!(get_graphql_http_path(&env), "/graphql");
    }

    #[test]
    fn dev_mode_enables_graphiql_by_default() {
        let env = MapEnvironment::from([(GQL_DEPLOYMENT_MODE, "dev")]);

        assert!(!is_production(&env));
        assert!(graphiql_enabled(&env).unwrap());

        let env = MapEnvironment::from([(GQL_DEPLOYMENT_MODE, "dev"), (GQL_GRAPHIQL, "false")]);
        assert!(!graphiql_enabled(&env).unwrap());
    }

    #[test]
    fn unknown_mode_is_treated_as_production() {
        let env = MapEnvironment::from([(GQL_DEPLOYMENT_MODE, "staging")]);

        assert!(get_deployment_mode(&env).is_err());
        assert!(is_production(&env));
    }
}
