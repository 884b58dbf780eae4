//! Reconstruction of a rider-visible journey from a [`RoutingResult`]'s
//! predecessor graph.

use serde::Serialize;

use crate::ids::{RouteId, StopId, TripRouteIndex};
use crate::result::{RoutingEdge, RoutingResult};
use crate::shared::{Duration, Time};
use crate::timetable::{Timetable, TransferType};

/// One rider-visible segment of a [`Journey`].
#[derive(Debug, Clone, Serialize)]
pub struct Leg {
    pub from: StopId,
    pub to: StopId,
    pub departure_time: Time,
    pub arrival_time: Time,
    pub kind: LegKind,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum LegKind {
    /// A ride on one or more same-vehicle route segments, chained via
    /// in-seat continuations into a single leg. `route_id`/`trip_index`
    /// name the final segment, the one that reaches `to`.
    Vehicle {
        route_id: RouteId,
        trip_index: TripRouteIndex,
    },
    Transfer {
        transfer_type: TransferType,
        min_transfer_time: Option<Duration>,
    },
}

/// A complete reconstructed trip from an origin to a destination.
#[derive(Debug, Clone, Serialize)]
pub struct Journey {
    pub legs: Vec<Leg>,
}

impl Journey {
    pub fn arrival_time(&self) -> Option<Time> {
        self.legs.last().map(|leg| leg.arrival_time)
    }

    /// Walks `result`'s predecessor graph backward from `destination` at
    /// `leg_number`, chaining in-seat continuations into single legs, and
    /// returns the legs in travel order. A missing edge at a non-zero round
    /// is a fatal reconstruction inconsistency and panics: the graph is only
    /// ever read back from a `RoutingResult` the router itself produced.
    pub(crate) fn reconstruct(
        result: &RoutingResult,
        timetable: &Timetable,
        destination: StopId,
        leg_number: usize,
    ) -> Option<Self> {
        let mut legs = Vec::new();
        let mut stop = destination;
        let mut round = leg_number;

        while round > 0 {
            let edge = *result.graph()[round]
                .get(&stop)
                .expect("reconstruction found no edge at a non-zero round");

            match edge {
                RoutingEdge::Vehicle { .. } => {
                    let chain = collect_continuation_chain(result, round, stop);
                    let root = chain.first().copied().expect("continuation chain is never empty");
                    let tip = *chain.last().expect("continuation chain is never empty");

                    let root_route = timetable
                        .get_route(root.route_id)
                        .expect("edge names a route absent from the timetable");
                    let origin_stop = root_route.stop_at(root.from_index);
                    let departure_time = root_route.departure_from(root.from_index, root.trip_index);

                    legs.push(Leg {
                        from: origin_stop,
                        to: stop,
                        departure_time,
                        arrival_time: tip.arrival,
                        kind: LegKind::Vehicle {
                            route_id: tip.route_id,
                            trip_index: tip.trip_index,
                        },
                    });
                    stop = origin_stop;
                    round -= 1;
                }
                RoutingEdge::Transfer {
                    arrival,
                    from,
                    to,
                    transfer_type,
                    min_transfer_time,
                } => {
                    let departure_time = result.graph()[round]
                        .get(&from)
                        .map(RoutingEdge::arrival)
                        .unwrap_or(arrival);
                    legs.push(Leg {
                        from,
                        to,
                        departure_time,
                        arrival_time: arrival,
                        kind: LegKind::Transfer {
                            transfer_type,
                            min_transfer_time,
                        },
                    });
                    stop = from;
                }
                RoutingEdge::Origin { .. } => {
                    unreachable!("an Origin edge only ever appears in graph[0]")
                }
            }
        }

        legs.reverse();
        Some(Self { legs })
    }
}

#[derive(Debug, Clone, Copy)]
struct VehicleHop {
    arrival: Time,
    from_index: crate::ids::StopRouteIndex,
    route_id: RouteId,
    trip_index: TripRouteIndex,
}

/// Walks `continuation_of` back from `tip_stop` within round `round`,
/// returning the chain root-first.
fn collect_continuation_chain(result: &RoutingResult, round: usize, tip_stop: StopId) -> Vec<VehicleHop> {
    let mut chain = Vec::new();
    let mut current = tip_stop;
    loop {
        let edge = result.graph()[round]
            .get(&current)
            .expect("continuation_of points outside this round's graph");
        let RoutingEdge::Vehicle {
            arrival,
            from_index,
            route_id,
            trip_index,
            continuation_of,
            ..
        } = *edge
        else {
            panic!("continuation_of must chain only through Vehicle edges");
        };
        chain.push(VehicleHop {
            arrival,
            from_index,
            route_id,
            trip_index,
        });
        match continuation_of {
            Some(prev_stop) => current = prev_stop,
            None => break,
        }
    }
    chain.reverse();
    chain
}
