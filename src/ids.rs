//! Dense integer identifiers and the bijective `TripStopId` packing used as
//! the lookup key for in-seat continuations.

use serde::Serialize;
use thiserror::Error;

/// Global stop identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct StopId(pub u32);

/// Internal route identifier: the set of trips sharing an identical ordered
/// stop list within a user-visible service route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct RouteId(pub u32);

/// User-visible line identifier; a service route contains one or more routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct ServiceRouteId(pub u32);

/// Position of a trip within its route (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct TripRouteIndex(pub u32);

/// Position of a stop within its route (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct StopRouteIndex(pub u32);

impl From<u32> for StopId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<u32> for RouteId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<u32> for ServiceRouteId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<u32> for TripRouteIndex {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<u32> for StopRouteIndex {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A component passed to [`TripStopId::encode`] did not fit in 20 bits.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("component {value} (field {field}) does not fit in 20 bits")]
pub struct ComponentOutOfRange {
    pub field: &'static str,
    pub value: u32,
}

const FIELD_BITS: u32 = 20;
const FIELD_MASK: u64 = (1 << FIELD_BITS) - 1;
const FIELD_MAX: u32 = 1 << FIELD_BITS;

/// A 60-bit bijective packing of `(StopRouteIndex, RouteId, TripRouteIndex)`
/// as three 20-bit fields, used as the lookup key for in-seat continuations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TripStopId(u64);

impl TripStopId {
    /// Packs the three components. Fails if any component does not fit in
    /// `[0, 2^20)`.
    pub fn encode(
        stop_index: StopRouteIndex,
        route: RouteId,
        trip_index: TripRouteIndex,
    ) -> Result<Self, ComponentOutOfRange> {
        let check = |field: &'static str, value: u32| {
            if value >= FIELD_MAX {
                Err(ComponentOutOfRange { field, value })
            } else {
                Ok(())
            }
        };
        check("stop_index", stop_index.0)?;
        check("route", route.0)?;
        check("trip_index", trip_index.0)?;

        let packed = (stop_index.0 as u64)
            | ((route.0 as u64) << FIELD_BITS)
            | ((trip_index.0 as u64) << (2 * FIELD_BITS));
        Ok(Self(packed))
    }

    pub const fn decode(self) -> (StopRouteIndex, RouteId, TripRouteIndex) {
        let stop_index = (self.0 & FIELD_MASK) as u32;
        let route = ((self.0 >> FIELD_BITS) & FIELD_MASK) as u32;
        let trip_index = ((self.0 >> (2 * FIELD_BITS)) & FIELD_MASK) as u32;
        (
            StopRouteIndex(stop_index),
            RouteId(route),
            TripRouteIndex(trip_index),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_exactly() {
        let cases = [
            (0u32, 0u32, 0u32),
            (1, 2, 3),
            (FIELD_MAX - 1, FIELD_MAX - 1, FIELD_MAX - 1),
            (12345, 0, 999),
        ];
        for (s, r, t) in cases {
            let packed = TripStopId::encode(
                StopRouteIndex(s),
                RouteId(r),
                TripRouteIndex(t),
            )
            .unwrap();
            assert_eq!(
                packed.decode(),
                (StopRouteIndex(s), RouteId(r), TripRouteIndex(t))
            );
        }
    }

    #[test]
    fn rejects_components_outside_20_bits() {
        assert!(TripStopId::encode(
            StopRouteIndex(FIELD_MAX),
            RouteId(0),
            TripRouteIndex(0)
        )
        .is_err());
        assert!(TripStopId::encode(
            StopRouteIndex(0),
            RouteId(FIELD_MAX),
            TripRouteIndex(0)
        )
        .is_err());
        assert!(TripStopId::encode(
            StopRouteIndex(0),
            RouteId(0),
            TripRouteIndex(FIELD_MAX)
        )
        .is_err());
    }
}
