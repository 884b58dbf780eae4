//! The reconstructible output of a routing query: the best arrival at every
//! reached stop, and the round-indexed predecessor graph that produced it.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::ids::{RouteId, StopId, StopRouteIndex, TripRouteIndex};
use crate::itinerary::Journey;
use crate::shared::{Duration, Time};
use crate::timetable::TransferType;

/// Best-known arrival at a stop, and the round it was reached in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArrivalInfo {
    pub arrival: Time,
    pub leg_number: usize,
}

/// One edge of the predecessor graph, tagged by how the stop was reached.
///
/// `continuation_of` is a handle to a prior `Vehicle` edge in the SAME
/// round's graph entry, chaining same-vehicle continuations into one
/// rider-visible leg on reconstruction. It is represented as the `StopId`
/// that edge is stored under: a round's graph map already assigns exactly
/// one slot per stop, so the map itself doubles as the arena.
#[derive(Debug, Clone, Copy, Serialize)]
pub enum RoutingEdge {
    Origin {
        arrival: Time,
    },
    Vehicle {
        arrival: Time,
        from_index: StopRouteIndex,
        to_index: StopRouteIndex,
        route_id: RouteId,
        trip_index: TripRouteIndex,
        continuation_of: Option<StopId>,
    },
    Transfer {
        arrival: Time,
        from: StopId,
        to: StopId,
        transfer_type: TransferType,
        min_transfer_time: Option<Duration>,
    },
}

impl RoutingEdge {
    pub fn arrival(&self) -> Time {
        match *self {
            Self::Origin { arrival } => arrival,
            Self::Vehicle { arrival, .. } => arrival,
            Self::Transfer { arrival, .. } => arrival,
        }
    }

    pub fn is_vehicle(&self) -> bool {
        matches!(self, Self::Vehicle { .. })
    }
}

/// The output of a routing query: the best reach at every stop across all
/// rounds, the round-indexed predecessor graph, and the expanded destination
/// set.
#[derive(Debug)]
pub struct RoutingResult {
    pub(crate) earliest_arrivals: HashMap<StopId, ArrivalInfo>,
    pub(crate) graph: Vec<HashMap<StopId, RoutingEdge>>,
    pub(crate) destinations: HashSet<StopId>,
}

impl RoutingResult {
    pub fn earliest_arrivals(&self) -> &HashMap<StopId, ArrivalInfo> {
        &self.earliest_arrivals
    }

    pub fn graph(&self) -> &[HashMap<StopId, RoutingEdge>] {
        &self.graph
    }

    pub fn destinations(&self) -> &HashSet<StopId> {
        &self.destinations
    }

    /// The best-known arrival at `stop`. With `max_transfers` given, restricts
    /// the search to rounds `0..=max_transfers + 1`, returning the first
    /// improving arrival scanning from the highest round down.
    pub fn arrival_at(&self, stop: StopId, max_transfers: Option<usize>) -> Option<Time> {
        match max_transfers {
            None => self.earliest_arrivals.get(&stop).map(|info| info.arrival),
            Some(bound) => {
                let highest_round = (bound + 1).min(self.graph.len().saturating_sub(1));
                (0..=highest_round)
                    .rev()
                    .find_map(|round| self.graph[round].get(&stop))
                    .map(RoutingEdge::arrival)
            }
        }
    }

    /// The single best journey to any of `to`'s equivalent stops, or the
    /// best journey to any expanded destination if `to` is `None`. Ties on
    /// arrival time break toward the smaller `StopId`.
    pub fn best_route(
        &self,
        timetable: &crate::timetable::Timetable,
        to: Option<&HashSet<StopId>>,
    ) -> Option<Journey> {
        let candidates: Box<dyn Iterator<Item = &StopId>> = match to {
            Some(stops) => Box::new(stops.iter()),
            None => Box::new(self.destinations.iter()),
        };

        let (best_stop, leg_number) = candidates
            .filter_map(|&stop| self.earliest_arrivals.get(&stop).map(|info| (stop, info)))
            .min_by_key(|(stop, info)| (info.arrival, *stop))
            .map(|(stop, info)| (stop, info.leg_number))?;

        Journey::reconstruct(self, timetable, best_stop, leg_number)
    }
}
