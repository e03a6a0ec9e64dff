use hash_streamer::{MemoryLocation, NavigationEvents, Router, StreamBus};
use integration_test_utils::MemoryTransport;
use std::sync::Arc;

#[allow(dead_code)]
pub(crate) fn make_bus(name: &str) -> (StreamBus, MemoryTransport) {
    let transport = MemoryTransport::new();
    let bus = StreamBus::new(name, Arc::new(transport.clone()));
    (bus, transport)
}

#[allow(dead_code)]
pub(crate) fn make_router(
    name: &str,
    initial: &str,
) -> (Router, Arc<MemoryLocation>, NavigationEvents) {
    let (location, events) = MemoryLocation::new(initial);
    let router = Router::new(name, location.clone());
    (router, location, events)
}
