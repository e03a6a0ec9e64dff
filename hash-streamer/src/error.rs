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

use std::error::Error;
use std::fmt::{Display, Formatter};
use topic_pattern::PatternError;

/// A request or connection failure reported by a [`StreamTransport`](crate::StreamTransport).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransportFailure {
    pub uri: String,
    pub reason: String,
}

impl TransportFailure {
    pub fn new(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            reason: reason.into(),
        }
    }
}

impl Display for TransportFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "transport failure for '{}': {}", self.uri, self.reason)
    }
}

impl Error for TransportFailure {}

/// Failures of stream bus operations.
#[derive(Debug)]
pub enum StreamError {
    Pattern(PatternError),
    Transport(TransportFailure),
    Decode {
        uri: String,
        source: serde_json::Error,
    },
}

impl Display for StreamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamError::Pattern(err) => write!(f, "invalid stream template: {err}"),
            StreamError::Transport(err) => write!(f, "{err}"),
            StreamError::Decode { uri, source } => {
                write!(f, "unable to decode chunks from '{uri}': {source}")
            }
        }
    }
}

impl Error for StreamError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StreamError::Pattern(err) => Some(err),
            StreamError::Transport(err) => Some(err),
            StreamError::Decode { source, .. } => Some(source),
        }
    }
}

impl From<PatternError> for StreamError {
    fn from(err: PatternError) -> Self {
        StreamError::Pattern(err)
    }
}

impl From<TransportFailure> for StreamError {
    fn from(err: TransportFailure) -> Self {
        StreamError::Transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::{StreamError, TransportFailure};
    use std::error::Error;

    #[test]
    fn transport_error_display_is_stable() {
        let error = StreamError::from(TransportFailure::new("/dashboard/1/last", "status 500"));

        assert_eq!(
            error.to_string(),
            "transport failure for '/dashboard/1/last': status 500"
        );
        assert!(error.source().is_some());
    }

    #[test]
    fn decode_error_exposes_serde_source() {
        let source = serde_json::from_str::<serde_json::Value>("[").expect_err("should fail");
        let error = StreamError::Decode {
            uri: "/dashboard/1/last".to_string(),
            source,
        };

        assert!(error
            .to_string()
            .starts_with("unable to decode chunks from '/dashboard/1/last'"));
        assert!(error.source().is_some());
    }
}
