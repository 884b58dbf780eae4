//! A round-based (RAPTOR) earliest-arrival journey planner core.
//!
//! Given an origin stop, one or more destinations, and a departure time,
//! [`raptor::route`] answers "at what time can one arrive" and "by what
//! sequence of vehicle rides and transfers" under a bounded number of
//! vehicle changes, scanning a pre-built, read-only [`timetable::Timetable`].
//!
//! Feed ingestion, timetable (de)serialization, a stops index with
//! name/geometry lookups, and a CLI/plotter are external collaborators; this
//! crate only consumes the interfaces they expose.

pub mod ids;
pub mod itinerary;
pub mod query;
pub mod raptor;
pub mod result;
pub mod route;
pub mod shared;
pub mod timetable;

/// Re-exports of the types most callers need.
pub mod prelude {
    pub use crate::ids::{
        RouteId, ServiceRouteId, StopId, StopRouteIndex, TripRouteIndex, TripStopId,
    };
    pub use crate::itinerary::{Journey, Leg, LegKind};
    pub use crate::query::{IdentityStopsIndex, Query, QueryOptions, SourceStopId, StopsIndex};
    pub use crate::raptor::route;
    pub use crate::result::{ArrivalInfo, RoutingEdge, RoutingResult};
    pub use crate::route::{PickupDropOffType, Route, RouteBuilder, TripData};
    pub use crate::shared::{Duration, Time};
    pub use crate::timetable::{
        RouteType, ServiceRouteInfo, Timetable, TimetableBuilder, Transfer, TransferType,
        TripBoarding,
    };
}
