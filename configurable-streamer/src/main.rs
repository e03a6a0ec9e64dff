/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
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

mod config;
mod file_transport;

use crate::config::{Config, RouteConfig};
use crate::file_transport::FileTransport;
use anyhow::Context;
use clap::Parser;
use hash_streamer::{
    listener_fn, sync_action_fn, ActionExt, LocationSurface, MemoryLocation, RouteParams,
    RouteStep, Router, StreamBus,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command()]
struct StreamerArgs {
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,
}

fn route_args(params: &RouteParams) -> Vec<String> {
    params.values().to_vec()
}

fn build_steps(
    config: &Config,
    bus: &StreamBus,
    route: &RouteConfig,
) -> anyhow::Result<Vec<RouteStep>> {
    let template_of = |name: &String| {
        config
            .endpoint(name)
            .with_context(|| format!("unknown endpoint '{name}'"))
    };

    let mut steps = Vec::new();
    for name in &route.close {
        steps.push(bus.close_action(template_of(name)?, route_args)?.boxed());
    }
    for name in &route.stream {
        steps.push(bus.stream_action(template_of(name)?, route_args)?.boxed());
    }
    for name in &route.fetch {
        steps.push(bus.fetch_action(template_of(name)?, route_args)?.boxed());
    }

    let when = route.when.clone();
    steps.push(
        sync_action_fn(move |params: RouteParams| {
            info!(route = when.as_str(), params = ?params.values(), "route chain finished");
            params
        })
        .boxed(),
    );
    Ok(steps)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    info!("Started configurable-streamer");

    let args = StreamerArgs::parse();
    let config = Config::load(&args.config)?;

    let transport = Arc::new(FileTransport::new(config.transport.root.clone()));
    let bus = StreamBus::new(config.streamer.name.as_str(), transport);
    let (location, events) = MemoryLocation::new(config.location.initial.as_str());
    let router = Router::new(config.streamer.name.as_str(), location.clone());

    for template in config.topic_templates() {
        let topic = template.to_string();
        bus.subscribe(
            template,
            listener_fn(move |message| {
                info!(topic = topic.as_str(), payload = %message.payload(), "message received");
            }),
        )
        .await
        .with_context(|| format!("unable to subscribe to '{template}'"))?;
    }

    for route in &config.routes {
        let steps = build_steps(&config, &bus, route)?;
        router
            .when(route.when.as_str())
            .chain(steps)
            .await
            .with_context(|| format!("unable to register route '{}'", route.when))?;
    }

    let reader_location = location.clone();
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let token = line.trim();
                    if !token.is_empty() {
                        reader_location.push(token.to_string()).await;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(err = %err, "unable to read navigation token");
                    break;
                }
            }
        }
        reader_location.close();
    });

    router.listen(events).await;
    reader.await.context("navigation reader failed")?;

    info!(
        location = router.current_location().await.as_str(),
        open = ?bus.open_connections().await,
        "configurable-streamer stopped"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::build_steps;
    use crate::config::Config;
    use hash_streamer::{LocationSurface, MemoryLocation, Router, StreamBus};
    use integration_test_utils::{MemoryTransport, RecordingListener};
    use std::sync::Arc;

    const DASHBOARD: &str = r#"{
        streamer: { name: "dashboard" },
        location: { initial: "dashboard/past/42" },
        transport: { root: "./fixtures" },
        endpoints: {
            listen: "/dashboard/:project/listen",
            last: "/dashboard/:project/last",
        },
        routes: [
            { when: "dashboard/past/:project", close: ["listen"], stream: ["listen"], fetch: ["last"] },
        ],
    }"#;

    #[tokio::test]
    async fn configured_route_switches_stream_and_fetches_history() {
        integration_test_utils::init_logging();

        let config = Config::parse(DASHBOARD).expect("config should load");
        let transport = MemoryTransport::new();
        transport
            .respond_with("/dashboard/42/last", r#"[{"src":"/dashboard/42/last"}]"#)
            .await;
        transport
            .respond_with("/dashboard/7/last", r#"[{"src":"/dashboard/7/last"}]"#)
            .await;
        let bus = StreamBus::new("dashboard", Arc::new(transport.clone()));
        let history = RecordingListener::new();
        bus.subscribe("/dashboard/:project/last", Arc::new(history.clone()))
            .await
            .expect("template should compile");

        let (location, events) = MemoryLocation::new(config.location.initial.as_str());
        let router = Router::new("dashboard", location.clone());
        for route in &config.routes {
            let steps = build_steps(&config, &bus, route).expect("steps should build");
            router
                .when(route.when.as_str())
                .chain(steps)
                .await
                .expect("route should register");
        }

        assert_eq!(bus.open_connections().await, vec!["/dashboard/42/listen"]);

        location.push("dashboard/past/7".to_string()).await;
        location.close();
        router.listen(events).await;

        assert_eq!(
            transport.connects().await,
            vec!["/dashboard/42/listen", "/dashboard/7/listen"]
        );
        assert_eq!(transport.closes().await, vec!["/dashboard/42/listen"]);
        assert_eq!(
            transport.requests().await,
            vec!["/dashboard/42/last", "/dashboard/7/last"]
        );
        assert_eq!(
            history.sources().await,
            vec!["/dashboard/42/last", "/dashboard/7/last"]
        );
    }
}
