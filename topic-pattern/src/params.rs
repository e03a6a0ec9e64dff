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

use std::ops::Index;
use std::sync::Arc;

/// Values captured by a [`RoutePattern`](crate::RoutePattern), in declaration order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteParams {
    names: Arc<[String]>,
    values: Vec<String>,
}

impl RouteParams {
    pub fn new(names: Arc<[String]>, values: Vec<String>) -> Self {
        Self { names, values }
    }

    /// Looks a value up by parameter name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .and_then(|index| self.values.get(index))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn into_values(self) -> Vec<String> {
        self.values
    }
}

impl Index<usize> for RouteParams {
    type Output = String;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

impl From<Vec<String>> for RouteParams {
    /// Positional values without names, e.g. hand-built arguments.
    fn from(values: Vec<String>) -> Self {
        let names: Vec<String> = (0..values.len()).map(|index| index.to_string()).collect();
        Self {
            names: names.into(),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RouteParams;

    #[test]
    fn named_and_positional_access_agree() {
        let params = RouteParams::new(
            vec!["project".to_string(), "level".to_string()].into(),
            vec!["42".to_string(), "ERROR".to_string()],
        );

        assert_eq!(params.get("project"), Some("42"));
        assert_eq!(params.get("level"), Some(params[1].as_str()));
        assert_eq!(params.get("missing"), None);
        assert_eq!(
            params.iter().collect::<Vec<_>>(),
            vec![("project", "42"), ("level", "ERROR")]
        );
    }

    #[test]
    fn positional_params_are_named_by_index() {
        let params = RouteParams::from(vec!["a".to_string(), "b".to_string()]);

        assert_eq!(params.get("1"), Some("b"));
        assert_eq!(params.len(), 2);
    }
}
