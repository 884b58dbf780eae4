//! The collection of [`Route`]s plus per-stop adjacency (routes through a
//! stop, transfers, in-seat continuations) and route-set reachability
//! queries.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::ids::{RouteId, ServiceRouteId, StopId, StopRouteIndex, TripRouteIndex, TripStopId};
use crate::route::Route;
use crate::shared::Duration;

/// GTFS-style vehicle mode of a service route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RouteType {
    Tram,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableTram,
    AerialLift,
    Funicular,
    Trolleybus,
    Monorail,
}

/// Line metadata for a [`ServiceRouteId`].
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRouteInfo {
    pub route_type: RouteType,
    pub name: String,
}

/// The kind of connection a [`Transfer`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferType {
    Recommended,
    Guaranteed,
    RequiresMinimalTime,
    InSeat,
}

/// A walk (or in-seat hand-off) from one stop to another.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Transfer {
    pub destination: StopId,
    pub transfer_type: TransferType,
    pub min_transfer_time: Option<Duration>,
}

/// "Board trip `trip_index` of `route_id` at that route's `hop_on_stop_index`",
/// reachable without a transfer from the alighting stop of a prior trip.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TripBoarding {
    pub route_id: RouteId,
    pub hop_on_stop_index: StopRouteIndex,
    pub trip_index: TripRouteIndex,
}

#[derive(Debug, Clone, Default)]
struct StopAdjacency {
    routes: Vec<RouteId>,
    transfers: Vec<Transfer>,
}

/// A read-only, memory-efficient transit network: routes, per-stop
/// adjacency, and in-seat continuations. Built once by [`TimetableBuilder`]
/// and consumed read-only by the router.
#[derive(Debug)]
pub struct Timetable {
    stop_adjacency: Box<[StopAdjacency]>,
    routes: Box<[Route]>,
    service_routes: Box<[ServiceRouteInfo]>,
    continuations: HashMap<TripStopId, Vec<TripBoarding>>,
}

impl Timetable {
    pub fn stop_count(&self) -> usize {
        self.stop_adjacency.len()
    }

    pub fn get_route(&self, route_id: RouteId) -> Option<&Route> {
        self.routes.get(route_id.0 as usize)
    }

    pub fn get_transfers(&self, stop_id: StopId) -> &[Transfer] {
        self.stop_adjacency
            .get(stop_id.0 as usize)
            .map(|adjacency| adjacency.transfers.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_continuous_trips(
        &self,
        stop_index: StopRouteIndex,
        route_id: RouteId,
        trip_index: TripRouteIndex,
    ) -> &[TripBoarding] {
        let Ok(key) = TripStopId::encode(stop_index, route_id, trip_index) else {
            return &[];
        };
        self.continuations.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_service_route_info(&self, route: &Route) -> &ServiceRouteInfo {
        &self.service_routes[route.service_route().0 as usize]
    }

    pub fn routes_passing_through(&self, stop_id: StopId) -> Vec<&Route> {
        self.stop_adjacency
            .get(stop_id.0 as usize)
            .map(|adjacency| {
                adjacency
                    .routes
                    .iter()
                    .filter_map(|&route_id| self.get_route(route_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// For each route passing through any stop in `from_stops` whose service
    /// route is in `modes`, the smallest [`StopRouteIndex`] among occurrences
    /// of stops in `from_stops`, the earliest point scanning may board from.
    /// An empty `modes` is interpreted as "all modes".
    pub fn find_reachable_routes(
        &self,
        from_stops: &HashSet<StopId>,
        modes: &HashSet<RouteType>,
    ) -> HashMap<RouteId, StopRouteIndex> {
        let mut reachable: HashMap<RouteId, StopRouteIndex> = HashMap::new();
        for &stop_id in from_stops {
            let Some(adjacency) = self.stop_adjacency.get(stop_id.0 as usize) else {
                continue;
            };
            for &route_id in &adjacency.routes {
                let Some(route) = self.get_route(route_id) else {
                    continue;
                };
                if !modes.is_empty() {
                    let info = self.get_service_route_info(route);
                    if !modes.contains(&info.route_type) {
                        continue;
                    }
                }
                for &hop_on in route.stop_route_indices(stop_id) {
                    reachable
                        .entry(route_id)
                        .and_modify(|best| *best = (*best).min(hop_on))
                        .or_insert(hop_on);
                }
            }
        }
        reachable
    }

    /// A stop with an in-seat continuation always has a route passing
    /// through it too (the continuation key names a stop index on that
    /// route), so `routes`/`transfers` adjacency alone determines activity.
    pub fn is_active(&self, stop_id: StopId) -> bool {
        self.stop_adjacency
            .get(stop_id.0 as usize)
            .is_some_and(|adjacency| !adjacency.routes.is_empty() || !adjacency.transfers.is_empty())
    }
}

/// Incrementally assembles a [`Timetable`] from routes, service-route
/// metadata, transfers, and in-seat continuations.
pub struct TimetableBuilder {
    stop_adjacency: Vec<StopAdjacency>,
    routes: Vec<Route>,
    service_routes: Vec<ServiceRouteInfo>,
    continuations: HashMap<TripStopId, Vec<TripBoarding>>,
}

impl TimetableBuilder {
    pub fn new(stop_count: usize) -> Self {
        Self {
            stop_adjacency: (0..stop_count).map(|_| StopAdjacency::default()).collect(),
            routes: Vec::new(),
            service_routes: Vec::new(),
            continuations: HashMap::new(),
        }
    }

    pub fn add_service_route(&mut self, info: ServiceRouteInfo) -> ServiceRouteId {
        let id = ServiceRouteId(self.service_routes.len() as u32);
        self.service_routes.push(info);
        id
    }

    pub fn add_route(&mut self, route: Route) -> RouteId {
        let id = RouteId(self.routes.len() as u32);
        for stop_index in 0..route.stop_count() {
            let stop_id = route.stop_at(StopRouteIndex(stop_index as u32));
            let adjacency = &mut self.stop_adjacency[stop_id.0 as usize];
            if !adjacency.routes.contains(&id) {
                adjacency.routes.push(id);
            }
        }
        self.routes.push(route);
        id
    }

    pub fn add_transfer(&mut self, from: StopId, transfer: Transfer) -> &mut Self {
        self.stop_adjacency[from.0 as usize].transfers.push(transfer);
        self
    }

    pub fn add_continuation(&mut self, key: TripStopId, boarding: TripBoarding) -> &mut Self {
        self.continuations.entry(key).or_default().push(boarding);
        self
    }

    pub fn build(self) -> Timetable {
        Timetable {
            stop_adjacency: self.stop_adjacency.into_boxed_slice(),
            routes: self.routes.into_boxed_slice(),
            service_routes: self.service_routes.into_boxed_slice(),
            continuations: self.continuations,
        }
    }
}
