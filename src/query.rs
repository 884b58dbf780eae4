//! Input parameters to a routing query, and the external stops-index
//! collaborator that expands a source id into its equivalent stops.

use std::collections::HashSet;

use crate::ids::StopId;
use crate::shared::{Duration, Time};
use crate::timetable::RouteType;

/// A caller-supplied stop reference (a station, a platform, or a sibling
/// group) that the external [`StopsIndex`] expands into concrete stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceStopId(pub u32);

/// Expands a [`SourceStopId`] into the set of stops it is equivalent to (a
/// station and its platforms, or siblings). Out of scope for this crate,
/// which only consumes the interface.
pub trait StopsIndex {
    fn equivalent_stops(&self, source: SourceStopId) -> HashSet<StopId>;
}

/// Trivial identity index: every `SourceStopId` names exactly one `StopId`,
/// itself. Useful for tests and callers without a real stops index.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityStopsIndex;

impl StopsIndex for IdentityStopsIndex {
    fn equivalent_stops(&self, source: SourceStopId) -> HashSet<StopId> {
        HashSet::from([StopId(source.0)])
    }
}

/// Tuning knobs for a [`Query`].
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub max_transfers: usize,
    pub min_transfer_time: Duration,
    pub transport_modes: HashSet<RouteType>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            max_transfers: 4,
            min_transfer_time: Duration::from_minutes(2),
            transport_modes: HashSet::new(),
        }
    }
}

/// One routing request: an origin, one or more destinations, a departure
/// time, and tuning options.
#[derive(Debug, Clone)]
pub struct Query {
    pub from: SourceStopId,
    pub to: Vec<SourceStopId>,
    pub departure_time: Time,
    pub options: QueryOptions,
}

impl Query {
    pub fn new(from: SourceStopId, to: Vec<SourceStopId>, departure_time: Time) -> Self {
        Self {
            from,
            to,
            departure_time,
            options: QueryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }
}
