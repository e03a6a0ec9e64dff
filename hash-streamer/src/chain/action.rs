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

//! Continuation units and their sequential / fan-out combinators.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// One unit of work in a continuation chain.
///
/// Runs synchronously unless the implementation awaits something; the chain
/// resumes with the returned output.
#[async_trait]
pub trait Action<I>: Send + Sync
where
    I: Send + 'static,
{
    type Output: Send + 'static;

    async fn run(&self, input: I) -> Self::Output;
}

pub type BoxAction<I, O> = Arc<dyn Action<I, Output = O>>;

#[async_trait]
impl<I, A> Action<I> for Arc<A>
where
    I: Send + 'static,
    A: Action<I> + ?Sized,
{
    type Output = A::Output;

    async fn run(&self, input: I) -> Self::Output {
        (**self).run(input).await
    }
}

/// [`Action`] over an async closure. Built with [`action_fn`].
pub struct FnAction<F> {
    callback: F,
}

#[async_trait]
impl<I, O, F, Fut> Action<I> for FnAction<F>
where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = O> + Send + 'static,
{
    type Output = O;

    async fn run(&self, input: I) -> O {
        (self.callback)(input).await
    }
}

pub fn action_fn<F>(callback: F) -> FnAction<F> {
    FnAction { callback }
}

/// [`Action`] over a plain closure that never suspends. Built with [`sync_action_fn`].
pub struct SyncFnAction<F> {
    callback: F,
}

#[async_trait]
impl<I, O, F> Action<I> for SyncFnAction<F>
where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(I) -> O + Send + Sync,
{
    type Output = O;

    async fn run(&self, input: I) -> O {
        (self.callback)(input)
    }
}

pub fn sync_action_fn<F>(callback: F) -> SyncFnAction<F> {
    SyncFnAction { callback }
}

/// Runs `first`, then feeds its output to `second`.
pub struct Then<A, B> {
    first: A,
    second: B,
}

#[async_trait]
impl<I, A, B> Action<I> for Then<A, B>
where
    I: Send + 'static,
    A: Action<I>,
    B: Action<A::Output>,
{
    type Output = B::Output;

    async fn run(&self, input: I) -> Self::Output {
        let intermediate = self.first.run(input).await;
        self.second.run(intermediate).await
    }
}

/// Runs both actions on the same input as one group, then passes the input on.
pub struct And<A, B> {
    left: A,
    right: B,
}

#[async_trait]
impl<I, A, B> Action<I> for And<A, B>
where
    I: Clone + Send + 'static,
    A: Action<I>,
    B: Action<I>,
{
    type Output = I;

    async fn run(&self, input: I) -> I {
        futures::join!(
            self.left.run(input.clone()),
            self.right.run(input.clone())
        );
        input
    }
}

pub trait ActionExt<I>: Action<I> + Sized
where
    I: Send + 'static,
{
    fn then<B>(self, next: B) -> Then<Self, B>
    where
        B: Action<Self::Output>,
    {
        Then {
            first: self,
            second: next,
        }
    }

    fn and<B>(self, other: B) -> And<Self, B>
    where
        I: Clone,
        B: Action<I>,
    {
        And {
            left: self,
            right: other,
        }
    }

    fn boxed(self) -> BoxAction<I, Self::Output>
    where
        Self: 'static,
    {
        Arc::new(self)
    }
}

impl<I, A> ActionExt<I> for A
where
    I: Send + 'static,
    A: Action<I>,
{
}
