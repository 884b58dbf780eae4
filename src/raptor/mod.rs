//! The round-based (RAPTOR) route scan: the orchestration that ties
//! [`allocator`]'s marked-stops bookkeeping and [`explorer`]'s route/transfer
//! scanning primitives into the full earliest-arrival search.

mod allocator;
mod explorer;

use std::collections::{HashMap, HashSet, VecDeque};

use allocator::Allocator;
use explorer::{ActiveTrip, NewVehicleEdge, relax_transfers, scan_route};

use crate::ids::StopId;
use crate::query::{Query, StopsIndex};
use crate::result::{ArrivalInfo, RoutingEdge, RoutingResult};
use crate::shared::time;
use crate::timetable::Timetable;

/// Runs the round-based earliest-arrival search for `query` over `timetable`,
/// expanding origin and destination stop ids through `stops_index`.
///
/// Single-threaded and fully synchronous: no I/O, no suspension points.
/// `timetable` is read-only shared state and may be queried concurrently by
/// other calls to `route`; all mutable state here is owned exclusively by
/// this call.
pub fn route(query: &Query, timetable: &Timetable, stops_index: &dyn StopsIndex) -> RoutingResult {
    let origins: HashSet<StopId> = stops_index.equivalent_stops(query.from);
    let destinations: HashSet<StopId> = query
        .to
        .iter()
        .flat_map(|&source| stops_index.equivalent_stops(source))
        .collect();

    let mut earliest_arrivals: HashMap<StopId, ArrivalInfo> = HashMap::new();
    let mut graph: Vec<HashMap<StopId, RoutingEdge>> = vec![HashMap::new()];
    let mut allocator = Allocator::new(timetable.stop_count());

    for &origin in &origins {
        earliest_arrivals.insert(origin, ArrivalInfo { arrival: query.departure_time, leg_number: 0 });
        graph[0].insert(origin, RoutingEdge::Origin { arrival: query.departure_time });
        allocator.mark(origin);
    }

    // Transfers from the origins themselves count as reached "without any
    // leg", so a route beginning at a walkable alternative of the origin is
    // still discoverable in round 1.
    let origin_list: Vec<StopId> = origins.iter().copied().collect();
    relax_transfers(
        &origin_list,
        0,
        &mut graph[0],
        timetable,
        &query.options,
        &mut earliest_arrivals,
        &mut allocator,
    );

    let max_round = query.options.max_transfers + 1;

    for round in 1..=max_round {
        let marked = allocator.take_marked();
        if marked.is_empty() {
            tracing::debug!(round, "no stops marked, stopping early");
            break;
        }

        let marked_set: HashSet<StopId> = marked.into_iter().collect();
        let reachable_routes = timetable.find_reachable_routes(&marked_set, &query.options.transport_modes);
        tracing::debug!(round, routes = reachable_routes.len(), "scanning round");

        graph.push(HashMap::new());

        let best_target_arrival = destinations
            .iter()
            .filter_map(|stop| earliest_arrivals.get(stop))
            .map(|info| info.arrival)
            .min()
            .unwrap_or(time::UNREACHED);

        let mut continuation_queue: VecDeque<NewVehicleEdge> = VecDeque::new();

        for (&route_id, &hop_on) in &reachable_routes {
            let Some(route_data) = timetable.get_route(route_id) else {
                continue;
            };
            let (before, after) = graph.split_at_mut(round);
            let prev_round = &before[round - 1];
            let graph_round = &mut after[0];

            let produced = scan_route(
                route_data,
                route_id,
                hop_on,
                round,
                graph_round,
                Some(prev_round),
                &mut earliest_arrivals,
                &mut allocator,
                best_target_arrival,
                None,
                true,
                None,
            );
            continuation_queue.extend(produced);
        }

        run_continuations_to_fixpoint(
            &mut continuation_queue,
            round,
            &mut graph,
            timetable,
            &mut earliest_arrivals,
            &mut allocator,
            best_target_arrival,
        );

        let vehicle_stops: Vec<StopId> = graph[round]
            .iter()
            .filter(|(_, edge)| edge.is_vehicle())
            .map(|(&stop, _)| stop)
            .collect();
        let graph_round = &mut graph[round];
        relax_transfers(
            &vehicle_stops,
            round,
            graph_round,
            timetable,
            &query.options,
            &mut earliest_arrivals,
            &mut allocator,
        );

        if round == max_round {
            tracing::warn!("hit round limit before marked stops were exhausted");
        }
    }

    RoutingResult {
        earliest_arrivals,
        graph,
        destinations,
    }
}

/// Drains `queue`, consulting in-seat continuations for every newly marked
/// vehicle edge and re-running a reduced scan of the continuing route; newly
/// produced edges feed back into the queue until no further continuation
/// applies.
///
/// A queued trigger is only consulted if it is still the edge actually
/// stored at its stop in `graph[round]`: a later route scan (or a later
/// continuation) may have since overwritten that stop with a better arrival,
/// and chaining off a stale trigger would attach `continuation_of` to an
/// edge that no longer exists there.
#[allow(clippy::too_many_arguments)]
fn run_continuations_to_fixpoint(
    queue: &mut VecDeque<NewVehicleEdge>,
    round: usize,
    graph: &mut [HashMap<StopId, RoutingEdge>],
    timetable: &Timetable,
    earliest_arrivals: &mut HashMap<StopId, ArrivalInfo>,
    allocator: &mut Allocator,
    best_target_arrival: crate::shared::Time,
) {
    while let Some(trigger) = queue.pop_front() {
        if !is_current_vehicle_edge(&graph[round], &trigger) {
            continue;
        }

        let boardings = timetable
            .get_continuous_trips(trigger.to_index, trigger.route_id, trigger.trip_index)
            .to_vec();

        for boarding in boardings {
            let Some(route_data) = timetable.get_route(boarding.route_id) else {
                continue;
            };
            let preset = ActiveTrip {
                trip_index: boarding.trip_index,
                hop_on_index: boarding.hop_on_stop_index,
            };
            let graph_round = &mut graph[round];

            let produced = scan_route(
                route_data,
                boarding.route_id,
                boarding.hop_on_stop_index,
                round,
                graph_round,
                None,
                earliest_arrivals,
                allocator,
                best_target_arrival,
                Some(preset),
                false,
                Some(trigger.stop),
            );
            queue.extend(produced);
        }
    }
}

/// Whether `trigger` still names the `Vehicle` edge currently stored at its
/// stop in `graph_round`, rather than one a later scan has since overwritten.
fn is_current_vehicle_edge(graph_round: &HashMap<StopId, RoutingEdge>, trigger: &NewVehicleEdge) -> bool {
    matches!(
        graph_round.get(&trigger.stop),
        Some(RoutingEdge::Vehicle { route_id, trip_index, to_index, .. })
            if *route_id == trigger.route_id && *trip_index == trigger.trip_index && *to_index == trigger.to_index
    )
}
