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

//! Canonical structured field values and value-format helpers.

use topic_pattern::RouteParams;

use crate::message::Message;

pub const NONE: &str = "none";
pub const REASON_ALREADY_CONNECTED: &str = "already_connected";
pub const REASON_TARGET_STILL_WANTED: &str = "target_still_wanted";
pub const REASON_LISTENER_CLOSED: &str = "listener_closed";
pub const REASON_RECEIVER_DROPPED: &str = "receiver_dropped";

pub fn format_source(message: &Message) -> String {
    message.source().unwrap_or(NONE).to_string()
}

pub fn format_params(params: &RouteParams) -> String {
    if params.is_empty() {
        return NONE.to_string();
    }
    params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn format_keys(keys: &[String]) -> String {
    if keys.is_empty() {
        NONE.to_string()
    } else {
        keys.join(",")
    }
}
