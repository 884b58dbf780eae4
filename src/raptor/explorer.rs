//! Single-route scanning and transfer relaxation: the two primitives the
//! round loop composes into route scans, in-seat continuation scans, and
//! transfer relaxation.

use std::collections::HashMap;

use crate::ids::{RouteId, StopId, StopRouteIndex, TripRouteIndex};
use crate::query::QueryOptions;
use crate::raptor::allocator::Allocator;
use crate::result::{ArrivalInfo, RoutingEdge};
use crate::route::{PickupDropOffType, Route};
use crate::shared::time;
use crate::timetable::TransferType;

/// The vehicle a scan is currently riding: which trip, boarded at which
/// stop index.
#[derive(Debug, Clone, Copy)]
pub(super) struct ActiveTrip {
    pub(super) trip_index: TripRouteIndex,
    pub(super) hop_on_index: StopRouteIndex,
}

/// A `Vehicle` edge newly written this round, carried forward so the round
/// loop can look it up for in-seat continuations.
#[derive(Debug, Clone, Copy)]
pub(super) struct NewVehicleEdge {
    pub(super) stop: StopId,
    pub(super) route_id: RouteId,
    pub(super) trip_index: TripRouteIndex,
    pub(super) to_index: StopRouteIndex,
}

/// Walks `route` forward from `start_index`, riding `active_trip` (if any)
/// and, when `catch_earlier_trip` is set, trying to board an earlier trip at
/// every stop along the way. Used both for the base route scan (catching
/// enabled, no preset trip) and for in-seat continuation scans (catching
/// disabled, trip preset to the continuation's boarding).
///
/// A stop's arrival is compared against `graph[round - 1]` before any new
/// trip is caught at that stop, so a route never self-transfers onto a trip
/// it could already ride.
#[allow(clippy::too_many_arguments)]
pub(super) fn scan_route(
    route: &Route,
    route_id: RouteId,
    start_index: StopRouteIndex,
    round: usize,
    graph_round: &mut HashMap<StopId, RoutingEdge>,
    prev_round: Option<&HashMap<StopId, RoutingEdge>>,
    earliest_arrivals: &mut HashMap<StopId, ArrivalInfo>,
    allocator: &mut Allocator,
    best_target_arrival: crate::shared::Time,
    mut active_trip: Option<ActiveTrip>,
    catch_earlier_trip: bool,
    continuation_of: Option<StopId>,
) -> Vec<NewVehicleEdge> {
    let mut produced = Vec::new();

    for j in start_index.0..route.stop_count() as u32 {
        let stop_index = StopRouteIndex(j);
        let stop = route.stop_at(stop_index);

        if let Some(active) = active_trip {
            let arrival = route.arrival_at(stop_index, active.trip_index);
            let drop_off = route.drop_off_type_at(stop_index, active.trip_index);
            let current_best = earliest_arrivals
                .get(&stop)
                .map(|info| info.arrival)
                .unwrap_or(time::UNREACHED);

            if !matches!(drop_off, PickupDropOffType::NotAvailable)
                && arrival.is_before(&current_best)
                && arrival.is_before(&best_target_arrival)
            {
                graph_round.insert(
                    stop,
                    RoutingEdge::Vehicle {
                        arrival,
                        from_index: active.hop_on_index,
                        to_index: stop_index,
                        route_id,
                        trip_index: active.trip_index,
                        continuation_of,
                    },
                );
                earliest_arrivals.insert(stop, ArrivalInfo { arrival, leg_number: round });
                allocator.mark(stop);
                produced.push(NewVehicleEdge {
                    stop,
                    route_id,
                    trip_index: active.trip_index,
                    to_index: stop_index,
                });
            }
        }

        if catch_earlier_trip {
            if let Some(prev_arrival) = prev_round.and_then(|g| g.get(&stop)).map(RoutingEdge::arrival) {
                let may_catch = match active_trip {
                    None => true,
                    Some(active) => !prev_arrival.is_after(&route.departure_from(stop_index, active.trip_index)),
                };
                if may_catch {
                    let before_trip = active_trip.map(|a| a.trip_index);
                    if let Some(trip_index) = route.find_earliest_trip(stop_index, prev_arrival, before_trip) {
                        active_trip = Some(ActiveTrip { trip_index, hop_on_index: stop_index });
                    }
                }
            }
        }
    }

    produced
}

/// Relaxes transfers out of every stop in `sources`, writing improvements
/// into `graph_round`. Only non-transfer arrivals are valid sources: a
/// transfer never chains into another transfer in the same round.
pub(super) fn relax_transfers(
    sources: &[StopId],
    round: usize,
    graph_round: &mut HashMap<StopId, RoutingEdge>,
    timetable: &crate::timetable::Timetable,
    options: &QueryOptions,
    earliest_arrivals: &mut HashMap<StopId, ArrivalInfo>,
    allocator: &mut Allocator,
) {
    for &source in sources {
        let Some(source_arrival) = graph_round.get(&source).map(RoutingEdge::arrival) else {
            continue;
        };

        for transfer in timetable.get_transfers(source) {
            let dwell = transfer.min_transfer_time.unwrap_or(match transfer.transfer_type {
                TransferType::InSeat => crate::shared::Duration::from_minutes(0),
                _ => options.min_transfer_time,
            });
            let candidate_arrival = source_arrival.plus(dwell);
            let current_best = earliest_arrivals
                .get(&transfer.destination)
                .map(|info| info.arrival)
                .unwrap_or(time::UNREACHED);

            if candidate_arrival.is_before(&current_best) {
                graph_round.insert(
                    transfer.destination,
                    RoutingEdge::Transfer {
                        arrival: candidate_arrival,
                        from: source,
                        to: transfer.destination,
                        transfer_type: transfer.transfer_type,
                        min_transfer_time: transfer.min_transfer_time,
                    },
                );
                earliest_arrivals.insert(transfer.destination, ArrivalInfo { arrival: candidate_arrival, leg_number: round });
                allocator.mark(transfer.destination);
            }
        }
    }
}
