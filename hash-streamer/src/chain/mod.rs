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

//! Continuation chain: composable [`Action`]s and the [`Sequence`] push stream.

pub(crate) mod action;
pub(crate) mod sequence;

pub use action::{
    action_fn, sync_action_fn, Action, ActionExt, And, BoxAction, FnAction, SyncFnAction, Then,
};
pub use sequence::Sequence;
