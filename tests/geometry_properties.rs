//! Property tests for the geometry kernel

use proptest::prelude::*;
use relay_planner::core::types::{Coordinate, Polygon};
use relay_planner::spatial::geometry::lerp;
use relay_planner::spatial::{centroid, contains, distance};

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-89.0f64..89.0, -179.0f64..179.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng))
}

/// Longitude separation the short way round
fn lng_gap(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % 360.0;
    d.min(360.0 - d)
}

proptest! {
    #[test]
    fn distance_is_symmetric(a in coordinate(), b in coordinate()) {
        prop_assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn distance_to_self_is_zero(a in coordinate()) {
        prop_assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn distance_bounded_by_half_circumference(a in coordinate(), b in coordinate()) {
        let d = distance(a, b);
        prop_assert!(d >= 0.0);
        prop_assert!(d <= std::f64::consts::PI * 6371.0 + 1e-6);
    }

    #[test]
    fn short_rings_contain_nothing(
        ring in prop::collection::vec(coordinate(), 0..3),
        point in coordinate(),
    ) {
        let polygon = Polygon::new(ring);
        prop_assert!(!contains(&polygon, point));
        prop_assert!(centroid(&polygon).is_none());
    }

    #[test]
    fn rectangle_interior_contained(
        lat in -60.0f64..60.0,
        lng in -170.0f64..170.0,
        fx in 0.01f64..0.99,
        fy in 0.01f64..0.99,
    ) {
        let rect = Polygon::from(vec![
            (lat, lng),
            (lat, lng + 1.0),
            (lat + 1.0, lng + 1.0),
            (lat + 1.0, lng),
        ]);
        prop_assert!(contains(&rect, Coordinate::new(lat + fy, lng + fx)));
        prop_assert!(!contains(&rect, Coordinate::new(lat + 1.5, lng + fx)));
        prop_assert!(!contains(&rect, Coordinate::new(lat + fy, lng - 0.5)));
    }

    #[test]
    fn rectangle_south_edge_in_north_edge_out(
        lat in -60.0f64..60.0,
        lng in -170.0f64..170.0,
        fx in 0.01f64..0.99,
    ) {
        let rect = Polygon::from(vec![
            (lat, lng),
            (lat, lng + 1.0),
            (lat + 1.0, lng + 1.0),
            (lat + 1.0, lng),
        ]);
        prop_assert!(contains(&rect, Coordinate::new(lat, lng + fx)));
        prop_assert!(!contains(&rect, Coordinate::new(lat + 1.0, lng + fx)));
    }

    #[test]
    fn lerp_stays_on_the_globe_and_short(a in coordinate(), b in coordinate(), t in 0.0f64..1.0) {
        let p = lerp(a, b, t);
        prop_assert!(p.lng.abs() <= 180.0);
        prop_assert!(lng_gap(a.lng, p.lng) <= lng_gap(a.lng, b.lng) + 1e-9);
    }

    #[test]
    fn centroid_of_convex_ring_is_inside(
        lat in -60.0f64..60.0,
        lng in -170.0f64..170.0,
        size in 0.001f64..2.0,
    ) {
        let tri = Polygon::from(vec![(lat, lng), (lat, lng + size), (lat + size, lng)]);
        let c = centroid(&tri).unwrap();
        prop_assert!(contains(&tri, c));
    }
}
