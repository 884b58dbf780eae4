//! Columnar storage for a single route: stop order, packed stop-times, and
//! packed pickup/drop-off attributes, plus binary search for the earliest
//! boardable trip.

use std::collections::HashMap;

use serde::Serialize;

use crate::ids::{ServiceRouteId, StopId, StopRouteIndex, TripRouteIndex};
use crate::shared::Time;

/// Whether passengers may board or alight at a given (trip, stop).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PickupDropOffType {
    Regular,
    NotAvailable,
    MustPhoneAgency,
    MustCoordinateWithDriver,
}

impl PickupDropOffType {
    const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Regular,
            1 => Self::NotAvailable,
            2 => Self::MustPhoneAgency,
            _ => Self::MustCoordinateWithDriver,
        }
    }

    const fn to_bits(self) -> u8 {
        match self {
            Self::Regular => 0,
            Self::NotAvailable => 1,
            Self::MustPhoneAgency => 2,
            Self::MustCoordinateWithDriver => 3,
        }
    }
}

/// One route's stops, trips, and per-(trip, stop) attributes.
///
/// Immutable after construction. Stop-times are a flat `[arrival, departure]`
/// array indexed by `(trip * stop_count + stop) * 2`; pickup/drop-off types
/// are packed two-bits-per-value, two (pickup, drop-off) pairs per byte.
#[derive(Debug)]
pub struct Route {
    service_route_id: ServiceRouteId,
    stops: Box<[StopId]>,
    stop_times: Box<[u16]>,
    pickup_drop_off: Box<[u8]>,
    trip_count: usize,
    occurrences: HashMap<StopId, Vec<StopRouteIndex>>,
}

impl Route {
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn trip_count(&self) -> usize {
        self.trip_count
    }

    pub fn service_route(&self) -> ServiceRouteId {
        self.service_route_id
    }

    pub fn stop_at(&self, stop_index: StopRouteIndex) -> StopId {
        self.stops[stop_index.0 as usize]
    }

    fn stop_time_offset(&self, stop_index: StopRouteIndex, trip_index: TripRouteIndex) -> usize {
        let s = stop_index.0 as usize;
        let t = trip_index.0 as usize;
        assert!(s < self.stop_count(), "stop index out of range");
        assert!(t < self.trip_count, "trip index out of range");
        (t * self.stop_count() + s) * 2
    }

    pub fn arrival_at(&self, stop_index: StopRouteIndex, trip_index: TripRouteIndex) -> Time {
        let offset = self.stop_time_offset(stop_index, trip_index);
        Time::from(self.stop_times[offset] as u32)
    }

    pub fn departure_from(&self, stop_index: StopRouteIndex, trip_index: TripRouteIndex) -> Time {
        let offset = self.stop_time_offset(stop_index, trip_index);
        Time::from(self.stop_times[offset + 1] as u32)
    }

    fn pickup_drop_off_bits(&self, stop_index: StopRouteIndex, trip_index: TripRouteIndex) -> (u8, u8) {
        let s = stop_index.0 as usize;
        let t = trip_index.0 as usize;
        assert!(s < self.stop_count(), "stop index out of range");
        assert!(t < self.trip_count, "trip index out of range");
        let g = t * self.stop_count() + s;
        let byte = self.pickup_drop_off[g / 2];
        if g % 2 == 0 {
            ((byte >> 2) & 0b11, byte & 0b11)
        } else {
            ((byte >> 6) & 0b11, (byte >> 4) & 0b11)
        }
    }

    pub fn pickup_type_from(&self, stop_index: StopRouteIndex, trip_index: TripRouteIndex) -> PickupDropOffType {
        let (pickup, _) = self.pickup_drop_off_bits(stop_index, trip_index);
        PickupDropOffType::from_bits(pickup)
    }

    pub fn drop_off_type_at(&self, stop_index: StopRouteIndex, trip_index: TripRouteIndex) -> PickupDropOffType {
        let (_, drop_off) = self.pickup_drop_off_bits(stop_index, trip_index);
        PickupDropOffType::from_bits(drop_off)
    }

    pub fn stop_route_indices(&self, stop_id: StopId) -> &[StopRouteIndex] {
        self.occurrences
            .get(&stop_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Earliest trip `t` departing `stop_index` no earlier than `after`,
    /// strictly before `before_trip` if given, and boardable there. Trips
    /// are sorted by first departure and per-stop departures preserve that
    /// order, so the lower bound of `after` is found by binary search and
    /// then scanned forward skipping `NOT_AVAILABLE` pickups.
    pub fn find_earliest_trip(
        &self,
        stop_index: StopRouteIndex,
        after: Time,
        before_trip: Option<TripRouteIndex>,
    ) -> Option<TripRouteIndex> {
        let upper = before_trip.map(|t| t.0 as usize).unwrap_or(self.trip_count);
        if upper == 0 || self.trip_count == 0 {
            return None;
        }

        let mut lo = 0usize;
        let mut hi = upper;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let departure = self.departure_from(stop_index, TripRouteIndex(mid as u32));
            if departure.is_before(&after) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        (lo..upper)
            .map(|t| TripRouteIndex(t as u32))
            .find(|&t| !matches!(self.pickup_type_from(stop_index, t), PickupDropOffType::NotAvailable))
    }
}

/// One trip's per-stop arrival/departure times and pickup/drop-off types,
/// in stop order.
pub struct TripData {
    pub stop_times: Vec<(Time, Time)>,
    pub pickup_drop_off: Vec<(PickupDropOffType, PickupDropOffType)>,
}

/// Incrementally assembles a [`Route`] from its stop order and trips.
pub struct RouteBuilder {
    service_route_id: ServiceRouteId,
    stops: Vec<StopId>,
    trips: Vec<TripData>,
}

impl RouteBuilder {
    pub fn new(service_route_id: ServiceRouteId, stops: Vec<StopId>) -> Self {
        Self {
            service_route_id,
            stops,
            trips: Vec::new(),
        }
    }

    pub fn add_trip(mut self, trip: TripData) -> Self {
        assert_eq!(
            trip.stop_times.len(),
            self.stops.len(),
            "trip stop-time count must match route stop count"
        );
        assert_eq!(
            trip.pickup_drop_off.len(),
            self.stops.len(),
            "trip pickup/drop-off count must match route stop count"
        );
        self.trips.push(trip);
        self
    }

    pub fn build(self) -> Route {
        let stop_count = self.stops.len();
        let trip_count = self.trips.len();

        let mut stop_times = vec![0u16; 2 * stop_count * trip_count];
        let mut pickup_drop_off = vec![0u8; (stop_count * trip_count).div_ceil(2)];

        for (t, trip) in self.trips.iter().enumerate() {
            for s in 0..stop_count {
                let (arrival, departure) = trip.stop_times[s];
                let offset = (t * stop_count + s) * 2;
                stop_times[offset] = arrival.as_minutes() as u16;
                stop_times[offset + 1] = departure.as_minutes() as u16;

                let (pickup, drop_off) = trip.pickup_drop_off[s];
                let g = t * stop_count + s;
                let byte = &mut pickup_drop_off[g / 2];
                if g % 2 == 0 {
                    *byte = (*byte & 0b1111_0000) | (pickup.to_bits() << 2) | drop_off.to_bits();
                } else {
                    *byte = (*byte & 0b0000_1111) | (pickup.to_bits() << 6) | (drop_off.to_bits() << 4);
                }
            }
        }

        let mut occurrences: HashMap<StopId, Vec<StopRouteIndex>> = HashMap::new();
        for (index, &stop_id) in self.stops.iter().enumerate() {
            occurrences
                .entry(stop_id)
                .or_default()
                .push(StopRouteIndex(index as u32));
        }

        Route {
            service_route_id: self.service_route_id,
            stops: self.stops.into_boxed_slice(),
            stop_times: stop_times.into_boxed_slice(),
            pickup_drop_off: pickup_drop_off.into_boxed_slice(),
            trip_count,
            occurrences,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(m: u32) -> Time {
        Time::from(m)
    }

    fn route_abc() -> Route {
        RouteBuilder::new(ServiceRouteId(0), vec![StopId(1), StopId(2), StopId(3)])
            .add_trip(TripData {
                stop_times: vec![
                    (minutes(480), minutes(480)),
                    (minutes(490), minutes(495)),
                    (minutes(515), minutes(515)),
                ],
                pickup_drop_off: vec![
                    (PickupDropOffType::Regular, PickupDropOffType::NotAvailable),
                    (PickupDropOffType::Regular, PickupDropOffType::Regular),
                    (PickupDropOffType::NotAvailable, PickupDropOffType::Regular),
                ],
            })
            .add_trip(TripData {
                stop_times: vec![
                    (minutes(540), minutes(540)),
                    (minutes(550), minutes(555)),
                    (minutes(575), minutes(575)),
                ],
                pickup_drop_off: vec![
                    (PickupDropOffType::Regular, PickupDropOffType::NotAvailable),
                    (PickupDropOffType::Regular, PickupDropOffType::Regular),
                    (PickupDropOffType::NotAvailable, PickupDropOffType::Regular),
                ],
            })
            .build()
    }

    #[test]
    fn stop_times_round_trip() {
        let route = route_abc();
        assert_eq!(route.departure_from(StopRouteIndex(0), TripRouteIndex(0)).as_minutes(), 480);
        assert_eq!(route.arrival_at(StopRouteIndex(2), TripRouteIndex(1)).as_minutes(), 575);
    }

    #[test]
    fn pickup_drop_off_bits_round_trip() {
        let route = route_abc();
        assert!(matches!(
            route.pickup_type_from(StopRouteIndex(0), TripRouteIndex(0)),
            PickupDropOffType::Regular
        ));
        assert!(matches!(
            route.drop_off_type_at(StopRouteIndex(0), TripRouteIndex(0)),
            PickupDropOffType::NotAvailable
        ));
        assert!(matches!(
            route.pickup_type_from(StopRouteIndex(2), TripRouteIndex(1)),
            PickupDropOffType::NotAvailable
        ));
        assert!(matches!(
            route.drop_off_type_at(StopRouteIndex(2), TripRouteIndex(1)),
            PickupDropOffType::Regular
        ));
    }

    #[test]
    fn find_earliest_trip_honours_after_and_before() {
        let route = route_abc();
        let found = route.find_earliest_trip(StopRouteIndex(0), minutes(500), None);
        assert_eq!(found, Some(TripRouteIndex(1)));

        let none = route.find_earliest_trip(StopRouteIndex(0), minutes(500), Some(TripRouteIndex(1)));
        assert_eq!(none, None);
    }

    #[test]
    fn find_earliest_trip_skips_not_available_pickup() {
        let route = route_abc();
        // stop index 2 never allows pickup (NOT_AVAILABLE on both trips).
        let found = route.find_earliest_trip(StopRouteIndex(2), minutes(0), None);
        assert_eq!(found, None);
    }

    #[test]
    fn empty_route_has_no_earliest_trip() {
        let route = RouteBuilder::new(ServiceRouteId(0), vec![StopId(1)]).build();
        assert_eq!(route.find_earliest_trip(StopRouteIndex(0), minutes(0), None), None);
    }

    #[test]
    fn stop_route_indices_handles_revisits() {
        let route = RouteBuilder::new(ServiceRouteId(0), vec![StopId(1), StopId(2), StopId(1)])
            .add_trip(TripData {
                stop_times: vec![
                    (minutes(0), minutes(0)),
                    (minutes(10), minutes(10)),
                    (minutes(20), minutes(20)),
                ],
                pickup_drop_off: vec![
                    (PickupDropOffType::Regular, PickupDropOffType::Regular),
                    (PickupDropOffType::Regular, PickupDropOffType::Regular),
                    (PickupDropOffType::Regular, PickupDropOffType::Regular),
                ],
            })
            .build();
        assert_eq!(
            route.stop_route_indices(StopId(1)),
            &[StopRouteIndex(0), StopRouteIndex(2)]
        );
    }
}
