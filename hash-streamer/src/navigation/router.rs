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

use crate::chain::Action;
use crate::navigation::location::{LocationSurface, NavigationEvent};
use crate::navigation::subscription::{RouteStep, RouteSubscription};
use crate::observability::{events, fields};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::Mutex;
use topic_pattern::{PatternError, RouteParams, RoutePattern};
use tracing::{debug, info};

const COMPONENT: &str = "router";

struct RouterInner {
    name: String,
    location: Arc<dyn LocationSurface>,
    subscriptions: Mutex<Vec<Arc<RouteSubscription>>>,
}

///
/// [`Router`] fires handler chains whenever the live location token matches a
/// registered template.
///
/// Chains registered with [`Router::when`] are replayed immediately when the
/// current location already matches. Navigation through [`Router::go`] only
/// updates the [`LocationSurface`]; handlers run when the resulting
/// [`NavigationEvent`] reaches [`Router::on_navigation`], usually through
/// [`Router::listen`].
///
/// # Examples
///
/// ```
/// use hash_streamer::{sync_action_fn, ActionExt, MemoryLocation, Router};
/// use std::sync::{Arc, Mutex};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let (location, _events) = MemoryLocation::new("dashboard/past/42");
/// let router = Router::new("dashboard", location);
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = seen.clone();
/// router
///     .when("dashboard/past/:project")
///     .chain(vec![sync_action_fn(move |params: hash_streamer::RouteParams| {
///         sink.lock().unwrap().push(params[0].clone());
///         params
///     })
///     .boxed()])
///     .await
///     .unwrap();
///
/// assert_eq!(*seen.lock().unwrap(), vec!["42".to_string()]);
/// # });
/// ```
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

impl Router {
    pub fn new(name: impl Into<String>, location: Arc<dyn LocationSurface>) -> Self {
        let name = name.into();
        info!(
            event = events::ROUTER_INIT,
            component = COMPONENT,
            router = name.as_str(),
            "router created"
        );
        Self {
            inner: Arc::new(RouterInner {
                name,
                location,
                subscriptions: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Starts a registration for `template`. Nothing is registered until a chain is bound.
    pub fn when(&self, template: impl Into<String>) -> RouteBinder<'_> {
        RouteBinder {
            router: self,
            template: template.into(),
        }
    }

    pub async fn current_location(&self) -> String {
        self.inner.location.current().await
    }

    /// Params of the current location under `template`, if it matches.
    pub async fn current_params(
        &self,
        template: &str,
    ) -> Result<Option<RouteParams>, PatternError> {
        let pattern = RoutePattern::compile(template)?;
        let location = self.current_location().await;
        Ok(pattern.captures(&location))
    }

    pub async fn is_current(&self, template: &str) -> Result<bool, PatternError> {
        let pattern = RoutePattern::compile(template)?;
        let location = self.current_location().await;
        Ok(pattern.test(&location))
    }

    /// Resolves `template` with `args` and pushes the result as the new location.
    ///
    /// Handlers are not invoked here; they run once the surface reports the change.
    pub async fn go<S: AsRef<str>>(
        &self,
        template: &str,
        args: &[S],
    ) -> Result<String, PatternError> {
        let target = topic_pattern::resolve(template, args)?;
        self.inner.location.push(target.uri.clone()).await;
        Ok(target.uri)
    }

    /// Continuation step that navigates with arguments built from its input.
    pub fn go_action<F>(&self, template: &str, build: F) -> Result<GoAction<F>, PatternError> {
        Ok(GoAction {
            router: self.clone(),
            pattern: Arc::new(RoutePattern::compile(template)?),
            build,
        })
    }

    /// Runs every subscription matching the current location, in registration order.
    ///
    /// Returns the number of chains that ran.
    pub async fn on_navigation(&self, event: NavigationEvent) -> usize {
        let location = self.current_location().await;
        debug!(
            event = events::NAVIGATION_RECEIVE,
            component = COMPONENT,
            router = self.inner.name.as_str(),
            previous = event.previous.as_str(),
            location = location.as_str(),
            "navigation received"
        );

        let subscriptions = self.inner.subscriptions.lock().await.clone();
        let mut fired = 0;
        for subscription in subscriptions {
            if let Some(params) = subscription.fire(&location).await {
                fired += 1;
                debug!(
                    event = events::NAVIGATION_MATCH,
                    component = COMPONENT,
                    router = self.inner.name.as_str(),
                    template = subscription.pattern().raw(),
                    params = %fields::format_params(&params),
                    "route chain ran"
                );
            }
        }

        if fired == 0 {
            debug!(
                event = events::NAVIGATION_NO_MATCH,
                component = COMPONENT,
                router = self.inner.name.as_str(),
                location = location.as_str(),
                "no route matched"
            );
        }
        fired
    }

    /// Consumes navigation events until the stream ends.
    pub async fn listen<S>(&self, mut events: S)
    where
        S: Stream<Item = NavigationEvent> + Unpin,
    {
        while let Some(event) = events.next().await {
            self.on_navigation(event).await;
        }
        debug!(
            event = events::NAVIGATION_LISTEN_CLOSED,
            component = COMPONENT,
            router = self.inner.name.as_str(),
            "navigation stream ended"
        );
    }

    pub async fn subscription_count(&self) -> usize {
        self.inner.subscriptions.lock().await.len()
    }

    async fn register(&self, template: &str, steps: Vec<RouteStep>) -> Result<(), PatternError> {
        let pattern = Arc::new(RoutePattern::compile(template)?);
        let subscription = Arc::new(RouteSubscription::new(pattern, steps));
        self.inner
            .subscriptions
            .lock()
            .await
            .push(subscription.clone());

        debug!(
            event = events::ROUTE_SUBSCRIBE,
            component = COMPONENT,
            router = self.inner.name.as_str(),
            template,
            "route registered"
        );

        let location = self.current_location().await;
        if let Some(params) = subscription.fire(&location).await {
            debug!(
                event = events::ROUTE_REPLAY,
                component = COMPONENT,
                router = self.inner.name.as_str(),
                template,
                location = location.as_str(),
                params = %fields::format_params(&params),
                "replayed current location"
            );
        }
        Ok(())
    }
}

/// Pending registration returned by [`Router::when`].
pub struct RouteBinder<'a> {
    router: &'a Router,
    template: String,
}

impl RouteBinder<'_> {
    /// Registers `steps` under the template and replays the current location.
    pub async fn chain(self, steps: Vec<RouteStep>) -> Result<ChainHandle, PatternError> {
        self.router.register(&self.template, steps).await?;
        Ok(ChainHandle {
            router: self.router.clone(),
            template: self.template,
        })
    }
}

/// A registered chain. [`ChainHandle::and`] adds siblings on the same template.
pub struct ChainHandle {
    router: Router,
    template: String,
}

impl ChainHandle {
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Registers an independent chain for the same template, with its own replay.
    pub async fn and(self, steps: Vec<RouteStep>) -> Result<ChainHandle, PatternError> {
        self.router.register(&self.template, steps).await?;
        Ok(self)
    }
}

/// Navigation step built by [`Router::go_action`]. Passes its input through.
pub struct GoAction<F> {
    router: Router,
    pattern: Arc<RoutePattern>,
    build: F,
}

#[async_trait]
impl<I, F> Action<I> for GoAction<F>
where
    I: Send + 'static,
    F: Fn(&I) -> Vec<String> + Send + Sync,
{
    type Output = I;

    async fn run(&self, input: I) -> I {
        let args = (self.build)(&input);
        let target = self.pattern.resolve(&args);
        if !target.complete {
            debug!(
                event = events::NAVIGATION_PUSH,
                component = COMPONENT,
                router = self.router.name(),
                template = self.pattern.raw(),
                params = %fields::format_keys(&args),
                "navigating to a partially resolved location"
            );
        }
        self.router.inner.location.push(target.uri).await;
        input
    }
}
