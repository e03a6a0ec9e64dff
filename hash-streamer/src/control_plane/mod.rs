//! Control-plane layer.

pub(crate) mod connection_lifecycle;
pub(crate) mod connection_table;
