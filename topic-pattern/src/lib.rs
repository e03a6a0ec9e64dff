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

//! # topic-pattern
//!
//! Compiles path-like templates (`segment/:param/*wildcard`) into anchored
//! matchers shared by the navigation router and the stream bus of
//! `hash-streamer`.
//!
//! - `:name` captures one segment (no `/` and no `?`).
//! - `*name` (or a bare `*`) captures the remainder, separators included.
//! - `?` starts a query segment, so `search?*keywords` captures the query string.
//!
//! ```
//! use topic_pattern::compile;
//!
//! let pattern = compile("dashboard/past/:project/level/:level").unwrap();
//!
//! assert!(pattern.test("dashboard/past/42/level/ERROR"));
//! assert_eq!(
//!     pattern.extract("dashboard/past/42/level/ERROR"),
//!     Some(vec!["42".to_string(), "ERROR".to_string()])
//! );
//! assert!(!pattern.test("dashboard/past/42"));
//!
//! let target = pattern.resolve(&["7", "WARN"]);
//! assert_eq!(target.uri, "dashboard/past/7/level/WARN");
//! ```
//!
//! Malformed templates fail when compiled, never when matched:
//!
//! ```
//! assert!(topic_pattern::compile("feeds/:/latest").is_err());
//! ```

mod error;
pub use error::PatternError;

mod params;
pub use params::RouteParams;

mod pattern;
pub use pattern::{compile, RoutePattern};

mod template;
pub use template::{resolve, ResolvedTarget, Template};
