//! End-to-end engine tests on hand-built mini networks.
//!
//! Longitude spacing of 0.002 degrees near the equator is roughly 222 m,
//! so declared edge lengths of 1000 m always dominate the straight-line
//! lower bound used by the fastest-time heuristic.

use geo::Point;
use urbanroute::prelude::*;

fn node(id: u64, lon: f64, lat: f64) -> RawNode {
    RawNode { id, lat, lon }
}

struct EdgeSpec {
    from: u64,
    to: u64,
    length_m: f64,
    road_class: &'static str,
    speed_limit: Option<&'static str>,
    name: Option<&'static str>,
}

fn edge(spec: EdgeSpec) -> RawEdge {
    RawEdge {
        from: spec.from,
        to: spec.to,
        length_m: Some(spec.length_m),
        road_class: Some(TagValue::One(spec.road_class.to_string())),
        speed_limit: spec.speed_limit.map(|s| TagValue::One(s.to_string())),
        name: spec.name.map(|n| TagValue::One(n.to_string())),
        geometry: None,
    }
}

fn residential(from: u64, to: u64, length_m: f64, name: Option<&'static str>) -> RawEdge {
    edge(EdgeSpec {
        from,
        to,
        length_m,
        road_class: "residential",
        speed_limit: None,
        name,
    })
}

/// A --1000m--> B --1000m--> C, all residential, A->B named "Main Street".
fn chain_engine() -> RoutingEngine {
    let network = create_street_network(
        vec![
            node(1, 0.0, 0.0),
            node(2, 0.002, 0.0),
            node(3, 0.004, 0.0),
        ],
        vec![
            residential(1, 2, 1000.0, Some("Main Street")),
            residential(2, 3, 1000.0, None),
        ],
    )
    .unwrap();
    RoutingEngine::new(network, EngineConfig::default())
}

/// Two routes from A to D: via B (2 x 1000 m, B-leg named "Main Street")
/// and via C (2 x 2000 m).
fn diamond_engine() -> RoutingEngine {
    let network = create_street_network(
        vec![
            node(1, 0.0, 0.0),
            node(2, 0.002, 0.001),
            node(3, 0.002, -0.001),
            node(4, 0.004, 0.0),
        ],
        vec![
            residential(1, 2, 1000.0, Some("Main Street")),
            residential(2, 4, 1000.0, None),
            residential(1, 3, 2000.0, Some("Ring Road")),
            residential(3, 4, 2000.0, None),
        ],
    )
    .unwrap();
    RoutingEngine::new(network, EngineConfig::default())
}

fn a() -> Point<f64> {
    Point::new(0.0, 0.0)
}

fn c() -> Point<f64> {
    Point::new(0.004, 0.0)
}

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn car_fastest_on_residential_chain() {
    let engine = chain_engine();
    let route = engine
        .compute_route(a(), c(), VehicleMode::Car, Objective::Fastest)
        .unwrap();

    // 2000 m at the 25 km/h residential default = 288 s = 4.8 minutes
    assert_close(route.distance_km(), 2.0, 1e-9);
    assert_close(route.travel_time, 288.0, 1e-6);
    assert_close(route.travel_time_minutes(), 4.8, 1e-6);
    assert_eq!(route.mode, VehicleMode::Car);
    assert_eq!(route.objective, Objective::Fastest);

    // Polyline is anchored at the raw endpoints, not the snapped nodes.
    let first = route.geometry.0.first().unwrap();
    let last = route.geometry.0.last().unwrap();
    assert_eq!((first.x, first.y), (a().x(), a().y()));
    assert_eq!((last.x, last.y), (c().x(), c().y()));
}

#[test]
fn speed_tag_beats_class_default_for_car() {
    let network = create_street_network(
        vec![node(1, 0.0, 0.0), node(2, 0.002, 0.0)],
        vec![edge(EdgeSpec {
            from: 1,
            to: 2,
            length_m: 1000.0,
            road_class: "residential",
            speed_limit: Some("50 km/h"),
            name: None,
        })],
    )
    .unwrap();
    let engine = RoutingEngine::new(network, EngineConfig::default());
    let route = engine
        .compute_route(
            a(),
            Point::new(0.002, 0.0),
            VehicleMode::Car,
            Objective::Fastest,
        )
        .unwrap();
    assert_close(route.travel_time, 72.0, 1e-6);
}

#[test]
fn ban_forces_reroute_onto_the_slower_leg() {
    let engine = diamond_engine();
    let d = Point::new(0.004, 0.0);

    let before = engine
        .compute_route(a(), d, VehicleMode::Car, Objective::Fastest)
        .unwrap();
    assert_close(before.distance, 2000.0, 1e-9);

    let outcome = engine.ban_street("main street").unwrap();
    assert_eq!(outcome.matched, 1);
    assert_eq!(outcome.geometries.len(), 1);

    let after = engine
        .compute_route(a(), d, VehicleMode::Car, Objective::Fastest)
        .unwrap();
    assert_close(after.distance, 4000.0, 1e-9);
}

#[test]
fn ban_without_alternative_yields_no_path() {
    let engine = chain_engine();
    let outcome = engine.ban_street("Main Street").unwrap();
    assert_eq!(outcome.matched, 1);

    let result = engine.compute_route(a(), c(), VehicleMode::Car, Objective::Fastest);
    assert!(matches!(result, Err(Error::NoPathFound)));
}

#[test]
fn shortest_objective_ignores_bans() {
    // Preserved source behavior: distance queries bypass the cost model.
    let engine = chain_engine();
    engine.ban_street("Main Street").unwrap();

    let route = engine
        .compute_route(a(), c(), VehicleMode::Car, Objective::Shortest)
        .unwrap();
    assert_close(route.distance, 2000.0, 1e-9);
}

#[test]
fn congestion_triples_time_but_not_distance() {
    let engine = chain_engine();
    let baseline = engine
        .compute_route(a(), c(), VehicleMode::Car, Objective::Fastest)
        .unwrap();

    let outcome = engine.set_congestion("Main Street", 2).unwrap();
    assert_eq!(outcome.matched, 1);
    assert_close(outcome.factor, 3.0, 1e-9);

    let congested = engine
        .compute_route(a(), c(), VehicleMode::Car, Objective::Fastest)
        .unwrap();
    // Only the A->B leg is congested: 144 s becomes 432 s.
    assert_close(congested.travel_time, baseline.travel_time + 288.0, 1e-6);
    assert_close(congested.distance, baseline.distance, 1e-9);

    // Idempotent per level: reapplying never compounds.
    engine.set_congestion("Main Street", 2).unwrap();
    let reapplied = engine
        .compute_route(a(), c(), VehicleMode::Car, Objective::Fastest)
        .unwrap();
    assert_close(reapplied.travel_time, congested.travel_time, 1e-6);
}

#[test]
fn unknown_congestion_level_is_a_no_op() {
    let engine = chain_engine();
    let baseline = engine
        .compute_route(a(), c(), VehicleMode::Car, Objective::Fastest)
        .unwrap();

    let outcome = engine.set_congestion("Main Street", 9).unwrap();
    assert_close(outcome.factor, 1.0, 1e-9);

    let after = engine
        .compute_route(a(), c(), VehicleMode::Car, Objective::Fastest)
        .unwrap();
    assert_close(after.travel_time, baseline.travel_time, 1e-6);
}

#[test]
fn reset_restores_baseline_costs() {
    let engine = chain_engine();
    let baseline = engine
        .compute_route(a(), c(), VehicleMode::Car, Objective::Fastest)
        .unwrap();

    engine.ban_street("Main Street").unwrap();
    engine.set_congestion("Main Street", 3).unwrap();
    engine.reset_overlay();

    let restored = engine
        .compute_route(a(), c(), VehicleMode::Car, Objective::Fastest)
        .unwrap();
    assert_close(restored.travel_time, baseline.travel_time, 1e-6);
    assert_close(restored.distance, baseline.distance, 1e-9);
}

#[test]
fn zero_match_patterns_report_zero_not_error() {
    let engine = chain_engine();
    assert_eq!(engine.ban_street("no such street").unwrap().matched, 0);
    assert_eq!(engine.set_congestion("nowhere", 1).unwrap().matched, 0);
    assert!(matches!(
        engine.ban_street("   "),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn endpoints_snapping_to_one_node_are_rejected() {
    let engine = chain_engine();
    let result = engine.compute_route(
        Point::new(0.0001, 0.0),
        Point::new(0.0, 0.0001),
        VehicleMode::Car,
        Objective::Fastest,
    );
    assert!(matches!(result, Err(Error::PointsTooClose)));
}

#[test]
fn far_away_points_are_out_of_coverage() {
    let engine = chain_engine();
    let result = engine.compute_route(
        Point::new(1.0, 1.0),
        c(),
        VehicleMode::Car,
        Objective::Fastest,
    );
    assert!(matches!(result, Err(Error::OutOfCoverage(_))));
}

#[test]
fn access_rules_apply_per_mode() {
    let motorway_only = create_street_network(
        vec![node(1, 0.0, 0.0), node(2, 0.002, 0.0)],
        vec![edge(EdgeSpec {
            from: 1,
            to: 2,
            length_m: 1000.0,
            road_class: "motorway",
            speed_limit: None,
            name: None,
        })],
    )
    .unwrap();
    let engine = RoutingEngine::new(motorway_only, EngineConfig::default());
    let b = Point::new(0.002, 0.0);

    assert!(
        engine
            .compute_route(a(), b, VehicleMode::Car, Objective::Fastest)
            .is_ok()
    );
    assert!(matches!(
        engine.compute_route(a(), b, VehicleMode::Foot, Objective::Fastest),
        Err(Error::NoPathFound)
    ));

    let footway_only = create_street_network(
        vec![node(1, 0.0, 0.0), node(2, 0.002, 0.0)],
        vec![edge(EdgeSpec {
            from: 1,
            to: 2,
            length_m: 1000.0,
            road_class: "footway",
            speed_limit: None,
            name: None,
        })],
    )
    .unwrap();
    let engine = RoutingEngine::new(footway_only, EngineConfig::default());
    assert!(matches!(
        engine.compute_route(a(), b, VehicleMode::Car, Objective::Fastest),
        Err(Error::NoPathFound)
    ));
    let walked = engine
        .compute_route(a(), b, VehicleMode::Foot, Objective::Fastest)
        .unwrap();
    // 1000 m at the fixed 5 km/h walking speed
    assert_close(walked.travel_time, 720.0, 1e-6);
}

#[test]
fn parallel_edges_use_the_cheapest_carriageway() {
    let network = create_street_network(
        vec![node(1, 0.0, 0.0), node(2, 0.002, 0.0)],
        vec![
            residential(1, 2, 1000.0, Some("Slow Road")),
            edge(EdgeSpec {
                from: 1,
                to: 2,
                length_m: 1000.0,
                road_class: "residential",
                speed_limit: Some("50"),
                name: Some("Fast Road"),
            }),
        ],
    )
    .unwrap();
    let engine = RoutingEngine::new(network, EngineConfig::default());
    let b = Point::new(0.002, 0.0);

    let route = engine
        .compute_route(a(), b, VehicleMode::Car, Objective::Fastest)
        .unwrap();
    assert_close(route.travel_time, 72.0, 1e-6);
    assert_close(route.distance, 1000.0, 1e-9);

    engine.ban_street("Fast Road").unwrap();
    let rerouted = engine
        .compute_route(a(), b, VehicleMode::Car, Objective::Fastest)
        .unwrap();
    assert_close(rerouted.travel_time, 144.0, 1e-6);
}

#[test]
fn totals_match_the_selected_edges() {
    let engine = diamond_engine();
    let d = Point::new(0.004, 0.0);
    let route = engine
        .compute_route(a(), d, VehicleMode::Car, Objective::Fastest)
        .unwrap();

    // Re-derive the totals from the chosen legs: 1000 + 1000 m at 25 km/h.
    assert_close(route.distance, 2000.0, 1e-9);
    assert_close(route.travel_time, 2000.0 * 3.6 / 25.0, 1e-6);
}

#[test]
fn stored_geometry_is_oriented_and_raw_endpoints_kept() {
    let mut curved = residential(1, 2, 1000.0, None);
    // Recorded against the opposite direction on purpose.
    curved.geometry = Some(vec![[0.002, 0.0], [0.0015, 0.0005], [0.0, 0.0]]);
    let network = create_street_network(
        vec![node(1, 0.0, 0.0), node(2, 0.002, 0.0)],
        vec![curved],
    )
    .unwrap();
    let engine = RoutingEngine::new(network, EngineConfig::default());

    let origin = Point::new(0.0001, 0.0);
    let destination = Point::new(0.0019, 0.0);
    let route = engine
        .compute_route(origin, destination, VehicleMode::Car, Objective::Fastest)
        .unwrap();

    let coords = &route.geometry.0;
    assert_eq!((coords[0].x, coords[0].y), (origin.x(), origin.y()));
    let last = coords[coords.len() - 1];
    assert_eq!((last.x, last.y), (destination.x(), destination.y()));
    // The curve's middle vertex appears after the origin-side end, so the
    // stored line was reversed into travel direction.
    let mid_position = coords.iter().position(|c| c.y == 0.0005).unwrap();
    let start_position = coords.iter().position(|c| c.x == 0.0).unwrap();
    assert!(start_position < mid_position);
}

#[test]
fn boundary_covers_the_node_set() {
    use geo::{Contains, Point};

    let engine = diamond_engine();
    let boundary = engine.boundary();
    assert!(boundary.exterior().0.len() >= 4);
    assert!(boundary.contains(&Point::new(0.002, 0.0)));

    let feature = engine.boundary_geojson();
    assert!(feature.geometry.is_some());
}

#[test]
fn geocoded_routing_goes_through_the_collaborator_seam() {
    struct FixedGeocoder;

    impl Geocoder for FixedGeocoder {
        fn resolve(&self, query: &str) -> Result<Point<f64>, Error> {
            match query {
                "alpha" => Ok(Point::new(0.0, 0.0)),
                "gamma" => Ok(Point::new(0.004, 0.0)),
                other => Err(Error::UnresolvablePlace(other.to_string())),
            }
        }
    }

    let engine = chain_engine();
    let route = engine
        .route_between_places(
            &FixedGeocoder,
            "alpha",
            "gamma",
            VehicleMode::Car,
            Objective::Fastest,
        )
        .unwrap();
    assert_close(route.distance, 2000.0, 1e-9);

    let missing = engine.route_between_places(
        &FixedGeocoder,
        "alpha",
        "atlantis",
        VehicleMode::Car,
        Objective::Fastest,
    );
    assert!(matches!(missing, Err(Error::UnresolvablePlace(_))));
}

#[test]
fn route_geojson_carries_summary_properties() {
    let engine = chain_engine();
    let route = engine
        .compute_route(a(), c(), VehicleMode::Bicycle, Objective::Fastest)
        .unwrap();

    let collection = route.to_geojson();
    assert_eq!(collection.features.len(), 1);
    let properties = collection.features[0].properties.as_ref().unwrap();
    assert_eq!(properties["vehicle"], "bicycle");
    assert_eq!(properties["objective"], "fastest");
    assert_close(
        properties["distance_meters"].as_f64().unwrap(),
        route.distance,
        1e-9,
    );
}

#[test]
fn malformed_mode_and_objective_strings_are_invalid_input() {
    assert!(matches!(
        "hovercraft".parse::<VehicleMode>(),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        "scenic".parse::<Objective>(),
        Err(Error::InvalidInput(_))
    ));
    assert_eq!("FASTEST".parse::<Objective>().unwrap(), Objective::Fastest);
}
