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

//! Ordered topic-template registry and first-match fan-out dispatch.

use crate::listener::TopicListener;
use crate::message::Message;
use crate::observability::{events, fields};
use std::sync::Arc;
use tokio::sync::Mutex;
use topic_pattern::{PatternError, RoutePattern};
use tracing::{debug, warn};

const COMPONENT: &str = "topic_registry";

/// What happened to a dispatched message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DispatchOutcome {
    /// Delivered to every listener of the first matching group.
    Delivered { topic: String, listeners: usize },
    /// The message carried no source tag.
    MissingSource,
    /// No registered template matched the source tag.
    NoMatch { source: String },
    /// The first matching group had no live listeners left.
    EmptyGroup { topic: String },
}

struct TopicGroup {
    pattern: Arc<RoutePattern>,
    listeners: Vec<Arc<dyn TopicListener>>,
}

/// Topic groups in insertion order, keyed by raw template.
pub(crate) struct TopicRegistry {
    groups: Mutex<Vec<TopicGroup>>,
}

impl TopicRegistry {
    pub(crate) fn new() -> Self {
        Self {
            groups: Mutex::new(Vec::new()),
        }
    }

    /// Adds `listener` to the group for `template`, creating the group at the end if needed.
    pub(crate) async fn subscribe(
        &self,
        template: &str,
        listener: Arc<dyn TopicListener>,
    ) -> Result<(), PatternError> {
        let mut groups = self.groups.lock().await;

        if let Some(group) = groups
            .iter_mut()
            .find(|group| group.pattern.raw() == template)
        {
            group.listeners.push(listener);
            debug!(
                event = events::TOPIC_GROUP_JOIN,
                component = COMPONENT,
                topic = template,
                listeners = group.listeners.len(),
                "listener joined topic group"
            );
            return Ok(());
        }

        let pattern = Arc::new(RoutePattern::compile(template)?);
        groups.push(TopicGroup {
            pattern,
            listeners: vec![listener],
        });
        debug!(
            event = events::TOPIC_GROUP_CREATE,
            component = COMPONENT,
            topic = template,
            groups = groups.len(),
            "topic group created"
        );
        Ok(())
    }

    /// Delivers `message` to the first group whose template matches its source.
    ///
    /// Listeners run in registration order, outside the registry lock.
    pub(crate) async fn dispatch(&self, message: Message) -> DispatchOutcome {
        let Some(source) = message.source().map(str::to_string) else {
            warn!(
                event = events::DISPATCH_MISSING_SOURCE,
                component = COMPONENT,
                "dropping message without source tag"
            );
            return DispatchOutcome::MissingSource;
        };

        let (topic, listeners) = {
            let mut groups = self.groups.lock().await;
            let Some(group) = groups
                .iter_mut()
                .find(|group| group.pattern.test(&source))
            else {
                debug!(
                    event = events::DISPATCH_NO_MATCH,
                    component = COMPONENT,
                    src = source.as_str(),
                    "no topic group matched"
                );
                return DispatchOutcome::NoMatch { source };
            };

            let before = group.listeners.len();
            group.listeners.retain(|listener| !listener.is_closed());
            let pruned = before - group.listeners.len();
            if pruned > 0 {
                debug!(
                    event = events::DISPATCH_LISTENERS_PRUNED,
                    component = COMPONENT,
                    topic = group.pattern.raw(),
                    pruned,
                    reason = fields::REASON_LISTENER_CLOSED,
                    "pruned closed listeners"
                );
            }

            (group.pattern.raw().to_string(), group.listeners.clone())
        };

        if listeners.is_empty() {
            warn!(
                event = events::DISPATCH_EMPTY_GROUP,
                component = COMPONENT,
                topic = topic.as_str(),
                src = source.as_str(),
                "matching topic group has no listeners"
            );
            return DispatchOutcome::EmptyGroup { topic };
        }

        debug!(
            event = events::DISPATCH_DELIVER,
            component = COMPONENT,
            topic = topic.as_str(),
            src = source.as_str(),
            listeners = listeners.len(),
            "delivering message"
        );

        let message = Arc::new(message);
        for listener in &listeners {
            listener.on_receive(message.clone()).await;
        }

        DispatchOutcome::Delivered {
            topic,
            listeners: listeners.len(),
        }
    }

    /// Raw templates of every group, in dispatch order.
    pub(crate) async fn topics(&self) -> Vec<String> {
        self.groups
            .lock()
            .await
            .iter()
            .map(|group| group.pattern.raw().to_string())
            .collect()
    }
}
