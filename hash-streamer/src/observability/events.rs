//! Canonical structured event names used across `hash-streamer`.

// Lifecycle events.
pub const ROUTER_INIT: &str = "router_init";
pub const STREAM_BUS_INIT: &str = "stream_bus_init";

// Topic registry and dispatch events.
pub const TOPIC_GROUP_CREATE: &str = "topic_group_create";
pub const TOPIC_GROUP_JOIN: &str = "topic_group_join";
pub const DISPATCH_DELIVER: &str = "dispatch_deliver";
pub const DISPATCH_MISSING_SOURCE: &str = "dispatch_missing_source";
pub const DISPATCH_NO_MATCH: &str = "dispatch_no_match";
pub const DISPATCH_EMPTY_GROUP: &str = "dispatch_empty_group";
pub const DISPATCH_LISTENERS_PRUNED: &str = "dispatch_listeners_pruned";

// Ingress events.
pub const INGRESS_RECEIVE: &str = "ingress_receive";
pub const INGRESS_DECODE_FAILED: &str = "ingress_decode_failed";

// Connection lifecycle events.
pub const CONNECTION_OPEN_START: &str = "connection_open_start";
pub const CONNECTION_OPEN_OK: &str = "connection_open_ok";
pub const CONNECTION_OPEN_SKIPPED: &str = "connection_open_skipped";
pub const CONNECTION_OPEN_FAILED: &str = "connection_open_failed";
pub const CONNECTION_CLOSE_SKIPPED: &str = "connection_close_skipped";
pub const CONNECTION_CLOSE_OK: &str = "connection_close_ok";

// One-shot request events.
pub const FETCH_START: &str = "fetch_start";
pub const FETCH_OK: &str = "fetch_ok";
pub const FETCH_FAILED: &str = "fetch_failed";
pub const FETCH_DECODE_FAILED: &str = "fetch_decode_failed";

// Continuation adapter events.
pub const ACTION_FAILURE_SWALLOWED: &str = "action_failure_swallowed";

// Navigation events.
pub const ROUTE_SUBSCRIBE: &str = "route_subscribe";
pub const ROUTE_REPLAY: &str = "route_replay";
pub const NAVIGATION_RECEIVE: &str = "navigation_receive";
pub const NAVIGATION_MATCH: &str = "navigation_match";
pub const NAVIGATION_NO_MATCH: &str = "navigation_no_match";
pub const NAVIGATION_PUSH: &str = "navigation_push";
pub const NAVIGATION_NOTIFY_DROPPED: &str = "navigation_notify_dropped";
pub const NAVIGATION_LISTEN_CLOSED: &str = "navigation_listen_closed";
