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

use hash_streamer::{ActionExt, LocationSurface, RouteParams, RouteStep, Router, StreamBus};
use integration_test_utils::{RecordingListener, RecordingStep};
use std::sync::Arc;
use support::{make_bus, make_router};

const LISTEN: &str = "/dashboard/:project/listen";
const LAST: &str = "/dashboard/:project/last";

fn project(params: &RouteParams) -> Vec<String> {
    vec![params[0].clone()]
}

async fn bind_dashboard(router: &Router, bus: &StreamBus, after: &RecordingStep) {
    let steps: Vec<RouteStep> = vec![
        bus.close_action(LISTEN, project)
            .expect("template should compile")
            .boxed(),
        bus.stream_action(LISTEN, project)
            .expect("template should compile")
            .boxed(),
        bus.fetch_action(LAST, project)
            .expect("template should compile")
            .boxed(),
        after.step(),
    ];
    router
        .when("dashboard/past/:project")
        .chain(steps)
        .await
        .expect("registration should succeed");
}

#[tokio::test]
async fn failing_fetch_still_continues_the_chain() {
    integration_test_utils::init_logging();

    let (router, _location, _events) = make_router("dashboard", "dashboard/past/42");
    let (bus, transport) = make_bus("dashboard");
    transport
        .fail_request("/dashboard/42/last", "status 500")
        .await;
    let after = RecordingStep::new();

    bind_dashboard(&router, &bus, &after).await;

    assert_eq!(transport.requests().await, vec!["/dashboard/42/last"]);
    assert_eq!(after.calls().await, vec![vec!["42".to_string()]]);
    assert_eq!(bus.open_connections().await, vec!["/dashboard/42/listen"]);
}

#[tokio::test]
async fn switching_project_replaces_the_stream_and_fetches_history() {
    integration_test_utils::init_logging();

    let (router, location, mut events) = make_router("dashboard", "dashboard/past/1");
    let (bus, transport) = make_bus("dashboard");
    transport
        .respond_with(
            "/dashboard/2/last",
            r#"[{"src":"/dashboard/2/listen","line":"a"},{"src":"/dashboard/2/listen","line":"b"}]"#,
        )
        .await;
    let lines = RecordingListener::new();
    bus.subscribe(LISTEN, Arc::new(lines.clone()))
        .await
        .expect("template should compile");
    let after = RecordingStep::new();

    bind_dashboard(&router, &bus, &after).await;
    assert_eq!(bus.open_connections().await, vec!["/dashboard/1/listen"]);

    router
        .go("dashboard/past/:project", &["2"])
        .await
        .expect("template should resolve");
    let event = futures::StreamExt::next(&mut events)
        .await
        .expect("navigation should be reported");
    assert_eq!(event.current, location.current().await);
    router.on_navigation(event).await;

    assert_eq!(transport.closes().await, vec!["/dashboard/1/listen"]);
    assert_eq!(bus.open_connections().await, vec!["/dashboard/2/listen"]);
    assert_eq!(
        lines.sources().await,
        vec!["/dashboard/2/listen", "/dashboard/2/listen"]
    );
    assert_eq!(
        after.calls().await,
        vec![vec!["1".to_string()], vec!["2".to_string()]]
    );

    transport
        .push(
            "/dashboard/2/listen",
            r#"{"src":"/dashboard/2/listen","line":"c"}"#,
        )
        .await;
    assert_eq!(lines.messages().await[2].payload()["line"], "c");
}
