//! Data-plane layer.

pub(crate) mod channel_listener;
pub(crate) mod ingress_listener;
pub(crate) mod topic_registry;
