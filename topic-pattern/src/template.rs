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

//! Template tokenizer and argument resolution.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::PatternError;

pub(crate) const ANONYMOUS_WILDCARD: &str = "*";

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Token {
    Literal(String),
    Named(String),
    Wildcard(Option<String>),
}

impl Token {
    fn write_marker(&self, out: &mut String) {
        match self {
            Token::Literal(text) => out.push_str(text),
            Token::Named(name) => {
                out.push(':');
                out.push_str(name);
            }
            Token::Wildcard(name) => {
                out.push('*');
                if let Some(name) = name {
                    out.push_str(name);
                }
            }
        }
    }

    fn param_name(&self) -> Option<&str> {
        match self {
            Token::Literal(_) => None,
            Token::Named(name) => Some(name),
            Token::Wildcard(name) => Some(name.as_deref().unwrap_or(ANONYMOUS_WILDCARD)),
        }
    }
}

/// A concrete target produced by substituting arguments into a template.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedTarget {
    /// The substituted string. Markers without an argument are kept verbatim.
    pub uri: String,
    /// `false` when at least one marker was left unresolved.
    pub complete: bool,
}

/// A tokenized template without a compiled matcher.
///
/// Cheaper than [`RoutePattern`](crate::RoutePattern) when only target
/// resolution is needed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Template {
    raw: String,
    tokens: Vec<Token>,
    names: Arc<[String]>,
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_segment_separator(ch: char) -> bool {
    ch == '/' || ch == '?'
}

impl Template {
    /// Splits `template` into literal, named and wildcard tokens.
    ///
    /// Markers are only recognised at a segment start: the beginning of the
    /// template or right after `/` or `?`.
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut at_segment_start = true;
        let mut chars = template.char_indices().peekable();

        while let Some((position, ch)) = chars.next() {
            if at_segment_start && (ch == ':' || ch == '*') {
                let mut name = String::new();
                while let Some(&(_, next)) = chars.peek() {
                    if !is_name_char(next) {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }

                let token = match (ch, name.is_empty()) {
                    (':', true) => {
                        return Err(PatternError::EmptyParameterName {
                            template: template.to_string(),
                            position,
                        })
                    }
                    (':', false) => Token::Named(name),
                    (_, true) => Token::Wildcard(None),
                    (_, false) => Token::Wildcard(Some(name)),
                };

                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(token);
                at_segment_start = false;
                continue;
            }

            literal.push(ch);
            at_segment_start = is_segment_separator(ch);
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for name in tokens.iter().filter_map(Token::param_name) {
            if name != ANONYMOUS_WILDCARD && !seen.insert(name) {
                return Err(PatternError::DuplicateParameter {
                    template: template.to_string(),
                    name: name.to_string(),
                });
            }
            names.push(name.to_string());
        }

        Ok(Self {
            raw: template.to_string(),
            tokens,
            names: names.into(),
        })
    }

    /// The template exactly as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parameter names in declaration order. Anonymous wildcards are named `*`.
    pub fn param_names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn shared_names(&self) -> Arc<[String]> {
        self.names.clone()
    }

    pub(crate) fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Substitutes `args` into the markers in declaration order.
    ///
    /// Surplus arguments are ignored; markers without an argument stay in the
    /// output and mark the target as incomplete.
    pub fn resolve<S: AsRef<str>>(&self, args: &[S]) -> ResolvedTarget {
        let mut uri = String::with_capacity(self.raw.len());
        let mut remaining = args.iter();
        let mut complete = true;

        for token in &self.tokens {
            if let Token::Literal(text) = token {
                uri.push_str(text);
                continue;
            }
            match remaining.next() {
                Some(arg) => uri.push_str(arg.as_ref()),
                None => {
                    complete = false;
                    token.write_marker(&mut uri);
                }
            }
        }

        ResolvedTarget { uri, complete }
    }
}

/// Parses `template` and substitutes `args` into it.
pub fn resolve<S: AsRef<str>>(template: &str, args: &[S]) -> Result<ResolvedTarget, PatternError> {
    Ok(Template::parse(template)?.resolve(args))
}

#[cfg(test)]
mod tests {
    use super::{resolve, Template, Token};
    use crate::PatternError;

    #[test]
    fn markers_only_start_segments() {
        let template = Template::parse("http://host/a:b/:id").expect("template should parse");

        assert_eq!(
            template.tokens(),
            &[
                Token::Literal("http://host/a:b/".to_string()),
                Token::Named("id".to_string()),
            ]
        );
    }

    #[test]
    fn query_marker_starts_a_segment() {
        let template =
            Template::parse("/dashboard/:project/search?*keywords").expect("template should parse");

        assert_eq!(template.param_names(), &["project", "keywords"]);
        assert_eq!(
            template.tokens().last(),
            Some(&Token::Wildcard(Some("keywords".to_string())))
        );
    }

    #[test]
    fn anonymous_wildcards_are_allowed_and_repeatable() {
        let template = Template::parse("*/feeds/*").expect("template should parse");

        assert_eq!(template.param_names(), &["*", "*"]);
    }

    #[test]
    fn colon_without_name_is_rejected() {
        let error = Template::parse("feeds/:/latest").expect_err("empty name should fail");

        assert_eq!(
            error,
            PatternError::EmptyParameterName {
                template: "feeds/:/latest".to_string(),
                position: 6,
            }
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let error = Template::parse("a/:id/b/*id").expect_err("duplicate should fail");

        assert!(matches!(
            error,
            PatternError::DuplicateParameter { ref name, .. } if name == "id"
        ));
    }

    #[test]
    fn resolve_substitutes_in_declaration_order() {
        let target = resolve("/dashboard/:project/level/:level", &["42", "ERROR"])
            .expect("template should parse");

        assert_eq!(target.uri, "/dashboard/42/level/ERROR");
        assert!(target.complete);
    }

    #[test]
    fn resolve_keeps_missing_markers_and_ignores_surplus() {
        let partial: [&str; 0] = [];
        let missing = resolve("stream/:p/*rest", &partial).expect("template should parse");
        assert_eq!(missing.uri, "stream/:p/*rest");
        assert!(!missing.complete);

        let surplus = resolve("stream/:p", &["A", "B"]).expect("template should parse");
        assert_eq!(surplus.uri, "stream/A");
        assert!(surplus.complete);
    }
}
