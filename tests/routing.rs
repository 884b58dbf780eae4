use std::collections::HashSet;

use transit_raptor::prelude::*;

fn minutes(m: u32) -> Time {
    Time::from(m)
}

/// A small two-line network with a shared transfer stop, used across several
/// invariant checks below:
///
///   Line A: 0 -> 1 -> 2        departs 480, arrives 2 at 515
///   Line B: 3 -> 1 -> 4        departs 500, arrives 4 at 560, only boardable
///                              after transferring through stop 1
fn two_line_network() -> Timetable {
    let mut builder = TimetableBuilder::new(5);
    let service = builder.add_service_route(ServiceRouteInfo {
        route_type: RouteType::Bus,
        name: "A".into(),
    });

    builder.add_route(
        RouteBuilder::new(service, vec![StopId(0), StopId(1), StopId(2)])
            .add_trip(TripData {
                stop_times: vec![
                    (minutes(480), minutes(480)),
                    (minutes(495), minutes(500)),
                    (minutes(515), minutes(515)),
                ],
                pickup_drop_off: vec![
                    (PickupDropOffType::Regular, PickupDropOffType::NotAvailable),
                    (PickupDropOffType::Regular, PickupDropOffType::Regular),
                    (PickupDropOffType::NotAvailable, PickupDropOffType::Regular),
                ],
            })
            .build(),
    );

    builder.add_route(
        RouteBuilder::new(service, vec![StopId(3), StopId(1), StopId(4)])
            .add_trip(TripData {
                stop_times: vec![
                    (minutes(500), minutes(505)),
                    (minutes(540), minutes(555)),
                    (minutes(560), minutes(560)),
                ],
                pickup_drop_off: vec![
                    (PickupDropOffType::Regular, PickupDropOffType::NotAvailable),
                    (PickupDropOffType::Regular, PickupDropOffType::Regular),
                    (PickupDropOffType::NotAvailable, PickupDropOffType::Regular),
                ],
            })
            .build(),
    );

    builder.build()
}

#[test]
fn arrivals_are_monotone_across_rounds() {
    let timetable = two_line_network();
    let query = Query::new(SourceStopId(0), vec![SourceStopId(4)], minutes(480));
    let result = route(&query, &timetable, &IdentityStopsIndex);

    let mut last = Time::from(1_000_000);
    for round in 0..result.graph().len() {
        if let Some(edge) = result.graph()[round].get(&StopId(4)) {
            assert!(
                !edge.arrival().is_after(&last),
                "a stop's arrival can only improve (get earlier) as later rounds add edges"
            );
            last = edge.arrival();
        }
    }
}

#[test]
fn round_budget_is_respected() {
    let timetable = two_line_network();
    let mut options = QueryOptions::default();
    options.max_transfers = 0;
    let query = Query::new(SourceStopId(0), vec![SourceStopId(4)], minutes(480)).with_options(options);
    let result = route(&query, &timetable, &IdentityStopsIndex);

    // Reaching stop 4 needs a transfer through stop 1 (one vehicle change),
    // which is round 2, unreachable with a zero-transfer budget (round 1 only).
    assert_eq!(result.arrival_at(StopId(4), None), None);
}

#[test]
fn transfers_do_not_chain_into_further_transfers() {
    let mut builder = TimetableBuilder::new(4);
    let service = builder.add_service_route(ServiceRouteInfo {
        route_type: RouteType::Bus,
        name: "A".into(),
    });
    builder.add_route(
        RouteBuilder::new(service, vec![StopId(0), StopId(1)])
            .add_trip(TripData {
                stop_times: vec![(minutes(480), minutes(480)), (minutes(500), minutes(500))],
                pickup_drop_off: vec![
                    (PickupDropOffType::Regular, PickupDropOffType::NotAvailable),
                    (PickupDropOffType::NotAvailable, PickupDropOffType::Regular),
                ],
            })
            .build(),
    );
    builder.add_transfer(
        StopId(1),
        Transfer { destination: StopId(2), transfer_type: TransferType::Recommended, min_transfer_time: None },
    );
    // Stop 2 has no route passing through it, only another walking transfer
    // onward to stop 3. Relaxation only ever walks from a vehicle-reached
    // stop, so this second transfer leg is never taken within any round.
    builder.add_transfer(
        StopId(2),
        Transfer { destination: StopId(3), transfer_type: TransferType::Recommended, min_transfer_time: None },
    );
    let timetable = builder.build();

    let query = Query::new(SourceStopId(0), vec![SourceStopId(3)], minutes(480));
    let result = route(&query, &timetable, &IdentityStopsIndex);

    assert_eq!(result.arrival_at(StopId(2), None), Some(minutes(502)));
    assert_eq!(
        result.arrival_at(StopId(3), None),
        None,
        "a transfer-reached stop must not itself seed another transfer"
    );
}

#[test]
fn unreachable_stop_has_no_arrival_and_no_journey() {
    let timetable = two_line_network();
    let query = Query::new(SourceStopId(3), vec![SourceStopId(2)], minutes(480));
    let result = route(&query, &timetable, &IdentityStopsIndex);

    assert_eq!(result.arrival_at(StopId(2), None), None);
    assert!(result.best_route(&timetable, None).is_none());
}

#[test]
fn trip_stop_id_encoding_round_trips_and_rejects_overflow() {
    let key = TripStopId::encode(StopRouteIndex(7), RouteId(3), TripRouteIndex(2)).unwrap();
    assert_eq!(key.decode(), (StopRouteIndex(7), RouteId(3), TripRouteIndex(2)));

    assert!(TripStopId::encode(StopRouteIndex(1 << 20), RouteId(0), TripRouteIndex(0)).is_err());
}

#[test]
fn best_route_picks_the_restricted_destination_set() {
    let timetable = two_line_network();
    let query = Query::new(SourceStopId(0), vec![SourceStopId(2), SourceStopId(4)], minutes(480));
    let result = route(&query, &timetable, &IdentityStopsIndex);

    let only_two: HashSet<StopId> = HashSet::from([StopId(2)]);
    let journey = result.best_route(&timetable, Some(&only_two)).expect("journey to stop 2");
    assert_eq!(journey.arrival_time(), Some(minutes(515)));
}
