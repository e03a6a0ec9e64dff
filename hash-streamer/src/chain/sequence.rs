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

use futures::future;
use futures::stream::{BoxStream, Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

use super::action::Action;

/// Push sequence of values with chainable transformation steps.
///
/// Items are delivered in arrival order; `await_action` suspends the
/// sequence until the action resumes it with a value.
pub struct Sequence<T> {
    inner: BoxStream<'static, T>,
}

impl<T> Sequence<T>
where
    T: Send + 'static,
{
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = T> + Send + 'static,
    {
        Self {
            inner: stream.boxed(),
        }
    }

    pub fn map<U, F>(self, transform: F) -> Sequence<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        Sequence::new(self.inner.map(transform))
    }

    pub fn filter<F>(self, mut predicate: F) -> Sequence<T>
    where
        F: FnMut(&T) -> bool + Send + 'static,
    {
        Sequence::new(
            self.inner
                .filter(move |item| future::ready(predicate(item))),
        )
    }

    pub fn await_action<A>(self, action: A) -> Sequence<A::Output>
    where
        A: Action<T> + 'static,
    {
        let action = Arc::new(action);
        Sequence::new(self.inner.then(move |item| {
            let action = action.clone();
            async move { action.run(item).await }
        }))
    }

    /// Drives the sequence on the runtime, handing every item to `sink`.
    pub fn subscribe<F>(self, mut sink: F) -> JoinHandle<()>
    where
        F: FnMut(T) + Send + 'static,
    {
        tokio::spawn(self.inner.for_each(move |item| {
            sink(item);
            future::ready(())
        }))
    }

    pub fn into_stream(self) -> BoxStream<'static, T> {
        self.inner
    }
}

impl<T> Stream for Sequence<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.inner.poll_next_unpin(cx)
    }
}
