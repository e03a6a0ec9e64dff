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

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON field carrying the topic tag of an inbound chunk.
pub const SOURCE_FIELD: &str = "src";

///
/// [`Message`] is one decoded chunk delivered by a stream connection or a
/// one-shot request.
///
/// The `source` topic tag is read from the `src` field of the JSON object; the
/// whole object is kept as the payload.
///
/// # Examples
///
/// ```
/// use hash_streamer::Message;
///
/// let message = Message::from_json(r#"{"src": "/dashboard/42/listen", "id": 7}"#).unwrap();
///
/// assert_eq!(message.source(), Some("/dashboard/42/listen"));
/// assert_eq!(message.payload()["id"], 7);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(from = "Value", into = "Value")]
pub struct Message {
    source: Option<String>,
    payload: Value,
}

impl Message {
    pub fn new(source: impl Into<String>, payload: Value) -> Self {
        Self {
            source: Some(source.into()),
            payload,
        }
    }

    pub fn from_value(payload: Value) -> Self {
        let source = payload
            .get(SOURCE_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string);
        Self { source, payload }
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }
}

impl From<Value> for Message {
    fn from(payload: Value) -> Self {
        Self::from_value(payload)
    }
}

impl From<Message> for Value {
    fn from(message: Message) -> Self {
        let Message {
            source,
            mut payload,
        } = message;
        if let (Some(source), Some(object)) = (source, payload.as_object_mut()) {
            object
                .entry(SOURCE_FIELD)
                .or_insert_with(|| Value::String(source));
        }
        payload
    }
}
