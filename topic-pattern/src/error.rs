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

/// Template compilation failures. Raised by [`compile`](crate::compile) only, never while matching.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PatternError {
    /// A `:` marker at a segment start is not followed by a parameter name.
    EmptyParameterName { template: String, position: usize },
    /// Two markers in the same template share one name.
    DuplicateParameter { template: String, name: String },
    /// The generated matcher was rejected by the regex engine.
    InvalidRegex { template: String, reason: String },
}

impl PatternError {
    /// The template that failed to compile.
    pub fn template(&self) -> &str {
        match self {
            PatternError::EmptyParameterName { template, .. }
            | PatternError::DuplicateParameter { template, .. }
            | PatternError::InvalidRegex { template, .. } => template,
        }
    }
}

impl Display for PatternError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternError::EmptyParameterName { template, position } => {
                write!(
                    f,
                    "parameter marker without a name at position {position} in template '{template}'"
                )
            }
            PatternError::DuplicateParameter { template, name } => {
                write!(f, "parameter '{name}' declared twice in template '{template}'")
            }
            PatternError::InvalidRegex { template, reason } => {
                write!(f, "unable to build matcher for template '{template}': {reason}")
            }
        }
    }
}

impl Error for PatternError {}
