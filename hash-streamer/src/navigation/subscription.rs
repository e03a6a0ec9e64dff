//! A registered route: compiled pattern plus its handler chain.

use crate::chain::{Action, BoxAction};
use std::sync::Arc;
use topic_pattern::{RouteParams, RoutePattern};

/// Handler chain step run with the params extracted from the location.
pub type RouteStep = BoxAction<RouteParams, RouteParams>;

pub(crate) struct RouteSubscription {
    pattern: Arc<RoutePattern>,
    steps: Vec<RouteStep>,
}

impl RouteSubscription {
    pub(crate) fn new(pattern: Arc<RoutePattern>, steps: Vec<RouteStep>) -> Self {
        Self { pattern, steps }
    }

    pub(crate) fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Runs the chain when `location` matches and returns the extracted params.
    pub(crate) async fn fire(&self, location: &str) -> Option<RouteParams> {
        let extracted = self.pattern.captures(location)?;

        let mut params = extracted.clone();
        for step in &self.steps {
            params = step.run(params).await;
        }
        Some(extracted)
    }
}
