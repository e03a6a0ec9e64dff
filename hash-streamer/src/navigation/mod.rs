//! Navigation layer: location surface, route subscriptions and the router.

pub(crate) mod location;
pub(crate) mod router;
pub(crate) mod subscription;

pub use location::{LocationSurface, MemoryLocation, NavigationEvent, NavigationEvents};
pub use router::{ChainHandle, GoAction, RouteBinder, Router};
pub use subscription::RouteStep;
