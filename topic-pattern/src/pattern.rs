/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
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

//! Compiled template matcher.

use regex::Regex;

use crate::error::PatternError;
use crate::params::RouteParams;
use crate::template::{ResolvedTarget, Template, Token};

const NAMED_CAPTURE: &str = "([^/?]+)";
const TRAILING_WILDCARD_CAPTURE: &str = "(.*)";
const INNER_WILDCARD_CAPTURE: &str = "(.*?)";

/// An immutable, anchored matcher compiled from a template.
#[derive(Clone, Debug)]
pub struct RoutePattern {
    template: Template,
    matcher: Regex,
}

fn matcher_source(template: &Template) -> String {
    let tokens = template.tokens();
    let mut source = String::with_capacity(template.raw().len() * 2 + 2);
    source.push('^');
    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::Literal(text) => source.push_str(&regex::escape(text)),
            Token::Named(_) => source.push_str(NAMED_CAPTURE),
            Token::Wildcard(_) if index + 1 == tokens.len() => {
                source.push_str(TRAILING_WILDCARD_CAPTURE)
            }
            Token::Wildcard(_) => source.push_str(INNER_WILDCARD_CAPTURE),
        }
    }
    source.push('$');
    source
}

impl RoutePattern {
    /// Compiles `template` into a reusable matcher.
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        let template = Template::parse(template)?;
        let matcher =
            Regex::new(&matcher_source(&template)).map_err(|err| PatternError::InvalidRegex {
                template: template.raw().to_string(),
                reason: err.to_string(),
            })?;

        Ok(Self { template, matcher })
    }

    pub fn raw(&self) -> &str {
        self.template.raw()
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn param_names(&self) -> &[String] {
        self.template.param_names()
    }

    /// Returns `true` when the whole of `topic` matches.
    pub fn test(&self, topic: &str) -> bool {
        self.matcher.is_match(topic)
    }

    /// Captured values in declaration order, or `None` when `topic` does not match.
    pub fn extract(&self, topic: &str) -> Option<Vec<String>> {
        let captures = self.matcher.captures(topic)?;
        Some(
            captures
                .iter()
                .skip(1)
                .map(|capture| {
                    capture
                        .map(|value| value.as_str().to_string())
                        .unwrap_or_default()
                })
                .collect(),
        )
    }

    /// Same as [`extract`](Self::extract) but keeps the parameter names.
    pub fn captures(&self, topic: &str) -> Option<RouteParams> {
        self.extract(topic)
            .map(|values| RouteParams::new(self.template.shared_names(), values))
    }

    /// Substitutes `args` into this pattern's markers.
    pub fn resolve<S: AsRef<str>>(&self, args: &[S]) -> ResolvedTarget {
        self.template.resolve(args)
    }
}

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
    }
}

impl Eq for RoutePattern {}

/// Compiles `template` into a [`RoutePattern`].
pub fn compile(template: &str) -> Result<RoutePattern, PatternError> {
    RoutePattern::compile(template)
}
