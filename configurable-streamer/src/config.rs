/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use topic_pattern::{compile, PatternError};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub(crate) streamer: StreamerConfig,
    #[serde(default)]
    pub(crate) location: LocationConfig,
    pub(crate) transport: TransportConfig,
    pub(crate) endpoints: BTreeMap<String, String>,
    #[serde(default)]
    pub(crate) routes: Vec<RouteConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct StreamerConfig {
    pub(crate) name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct LocationConfig {
    #[serde(default)]
    pub(crate) initial: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct TransportConfig {
    pub(crate) root: PathBuf,
}

/// Route chain: close, then stream, then fetch, each by endpoint name.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    pub(crate) when: String,
    #[serde(default)]
    pub(crate) close: Vec<String>,
    #[serde(default)]
    pub(crate) stream: Vec<String>,
    #[serde(default)]
    pub(crate) fetch: Vec<String>,
}

/// Semantic problems found after the file parsed.
#[derive(Debug)]
pub enum ConfigError {
    UnknownEndpoint { route: String, endpoint: String },
    InvalidTemplate(PatternError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::UnknownEndpoint { route, endpoint } => {
                write!(f, "route '{route}' references unknown endpoint '{endpoint}'")
            }
            ConfigError::InvalidTemplate(err) => write!(f, "invalid template: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::InvalidTemplate(err) => Some(err),
            ConfigError::UnknownEndpoint { .. } => None,
        }
    }
}

impl From<PatternError> for ConfigError {
    fn from(err: PatternError) -> Self {
        ConfigError::InvalidTemplate(err)
    }
}

impl RouteConfig {
    fn endpoint_names(&self) -> impl Iterator<Item = &String> {
        self.close.iter().chain(&self.stream).chain(&self.fetch)
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let config: Config = json5::from_str(contents).context("unable to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Every route template and endpoint template must compile, and every
    /// endpoint a route names must exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for template in self.endpoints.values() {
            compile(template)?;
        }

        for route in &self.routes {
            compile(&route.when)?;
            if let Some(missing) = route
                .endpoint_names()
                .find(|name| !self.endpoints.contains_key(*name))
            {
                return Err(ConfigError::UnknownEndpoint {
                    route: route.when.clone(),
                    endpoint: missing.clone(),
                });
            }
        }
        Ok(())
    }

    /// Template of a named endpoint.
    pub fn endpoint(&self, name: &str) -> Option<&str> {
        self.endpoints.get(name).map(String::as_str)
    }

    /// Endpoint templates that deliver messages, each listed once in the
    /// order the routes first name them. Dispatch is first-match, so this
    /// order decides which group wins.
    pub fn topic_templates(&self) -> Vec<&str> {
        let mut templates: Vec<&str> = Vec::new();
        let names = self
            .routes
            .iter()
            .flat_map(|route| route.stream.iter().chain(&route.fetch));
        for template in names.filter_map(|name| self.endpoint(name)) {
            if !templates.contains(&template) {
                templates.push(template);
            }
        }
        templates
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError};

    const DASHBOARD: &str = r#"{
        streamer: { name: "dashboard" },
        location: { initial: "dashboard/past/42" },
        transport: { root: "./fixtures" },
        endpoints: {
            listen: "/dashboard/:project/listen",
            last: "/dashboard/:project/last",
        },
        routes: [
            { when: "dashboard/past/:project", close: ["listen"], stream: ["listen"], fetch: ["last"] },
        ],
    }"#;

    #[test]
    fn dashboard_config_parses() {
        let config = Config::parse(DASHBOARD).expect("config should load");

        assert_eq!(config.streamer.name, "dashboard");
        assert_eq!(config.location.initial, "dashboard/past/42");
        assert_eq!(config.routes[0].close, vec!["listen"]);
        assert_eq!(
            config.topic_templates(),
            vec!["/dashboard/:project/listen", "/dashboard/:project/last"]
        );
    }

    #[test]
    fn topic_templates_keep_config_order() {
        let config = Config::parse(
            r#"{
                streamer: { name: "feeds" },
                transport: { root: "./fixtures" },
                endpoints: { byid: "feeds/:id", any: "feeds/*" },
                routes: [
                    { when: "feeds/:id", stream: ["byid", "any"], fetch: ["byid"] },
                    { when: "all", stream: ["any"] },
                ],
            }"#,
        )
        .expect("config should load");

        assert_eq!(config.topic_templates(), vec!["feeds/:id", "feeds/*"]);
    }

    #[test]
    fn shipped_default_config_is_valid() {
        let config = Config::parse(include_str!("../DEFAULT_CONFIG.json5"))
            .expect("default config should load");

        assert_eq!(config.endpoint("last"), Some("/dashboard/:project/last"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let contents = DASHBOARD.replace("streamer: {", "streamer: { queue: 4,");

        assert!(Config::parse(&contents).is_err());
    }

    #[test]
    fn routes_must_reference_known_endpoints() {
        let contents = DASHBOARD.replace(r#"fetch: ["last"]"#, r#"fetch: ["history"]"#);

        let err = Config::parse(&contents).expect_err("config should be rejected");
        let config_err = err
            .downcast_ref::<ConfigError>()
            .expect("validation error expected");
        assert!(matches!(
            config_err,
            ConfigError::UnknownEndpoint { endpoint, .. } if endpoint == "history"
        ));
    }

    #[test]
    fn malformed_templates_are_rejected() {
        let contents = DASHBOARD.replace("dashboard/past/:project", "dashboard/past/:");

        let err = Config::parse(&contents).expect_err("config should be rejected");
        assert!(err.to_string().starts_with("invalid template"));
    }
}
