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

mod support;

use hash_streamer::{DispatchOutcome, Message};
use integration_test_utils::RecordingListener;
use serde_json::json;
use std::sync::Arc;
use support::make_bus;

#[tokio::test]
async fn first_registered_matching_topic_wins() {
    integration_test_utils::init_logging();

    let (bus, _transport) = make_bus("first-match");
    let by_id = RecordingListener::new();
    let any = RecordingListener::new();
    bus.subscribe("feeds/:id", Arc::new(by_id.clone()))
        .await
        .expect("template should compile");
    bus.subscribe("feeds/*", Arc::new(any.clone()))
        .await
        .expect("template should compile");

    bus.dispatch(Message::new("feeds/42", json!({}))).await;
    bus.dispatch(Message::new("feeds/42/comments", json!({})))
        .await;

    assert_eq!(by_id.sources().await, vec!["feeds/42"]);
    assert_eq!(any.sources().await, vec!["feeds/42/comments"]);
}

#[tokio::test]
async fn one_group_fans_out_in_registration_order() {
    integration_test_utils::init_logging();

    let (bus, _transport) = make_bus("fanout");
    let first = RecordingListener::new();
    let second = RecordingListener::new();
    for listener in [&first, &second] {
        bus.subscribe("/dashboard/:project/listen", Arc::new(listener.clone()))
            .await
            .expect("template should compile");
    }

    let outcome = bus
        .dispatch(Message::new("/dashboard/42/listen", json!({ "line": 1 })))
        .await;

    assert_eq!(
        outcome,
        DispatchOutcome::Delivered {
            topic: "/dashboard/:project/listen".to_string(),
            listeners: 2
        }
    );
    assert_eq!(first.messages().await.len(), 1);
    assert_eq!(second.messages().await[0].payload()["line"], 1);
    assert_eq!(bus.topics().await, vec!["/dashboard/:project/listen"]);
}

#[tokio::test]
async fn misses_are_dropped_without_error() {
    integration_test_utils::init_logging();

    let (bus, _transport) = make_bus("misses");
    let listener = RecordingListener::new();
    bus.subscribe("feeds/:id", Arc::new(listener.clone()))
        .await
        .expect("template should compile");

    assert_eq!(
        bus.dispatch(Message::from_value(json!({ "id": 1 }))).await,
        DispatchOutcome::MissingSource
    );
    assert_eq!(
        bus.dispatch(Message::new("inbox/1", json!({}))).await,
        DispatchOutcome::NoMatch {
            source: "inbox/1".to_string()
        }
    );
    assert!(listener.messages().await.is_empty());
}

#[tokio::test]
async fn pushed_chunks_are_decoded_and_dispatched() {
    integration_test_utils::init_logging();

    let (bus, transport) = make_bus("ingress");
    let listener = RecordingListener::new();
    bus.subscribe("/dashboard/:project/listen", Arc::new(listener.clone()))
        .await
        .expect("template should compile");
    bus.open("/dashboard/:project/listen", &["42"])
        .await
        .expect("open should succeed");

    assert!(
        transport
            .push(
                "/dashboard/42/listen",
                r#"{"src":"/dashboard/42/listen","level":"INFO"}"#
            )
            .await
    );
    assert!(transport.push("/dashboard/42/listen", "garbage").await);

    let messages = listener.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].payload()["level"], "INFO");
}

#[tokio::test]
async fn dropped_sequences_leave_an_empty_group() {
    integration_test_utils::init_logging();

    let (bus, _transport) = make_bus("sequence");
    let sequence = bus
        .on_receive("/template")
        .await
        .expect("template should compile");
    drop(sequence);

    assert_eq!(
        bus.dispatch(Message::new("/template", json!({ "name": "feed" })))
            .await,
        DispatchOutcome::EmptyGroup {
            topic: "/template".to_string()
        }
    );
}
