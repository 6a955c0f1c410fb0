use shotchart::config::{COURT_X_MAX, COURT_X_MIN, CourtSpec};
use shotchart::court::{
    LineStyle, MarkingKind, Point, Shape, court_dimensions, court_geometry, three_point_geometry,
};

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

#[test]
fn three_point_arc_meets_corner_segments() {
    let three = three_point_geometry(&CourtSpec::NBA);
    assert_eq!(three.radius, 237.5);
    assert_eq!(three.corner_distance, 220.0);

    let expected_y = (237.5f64 * 237.5 - 220.0 * 220.0).sqrt();
    assert!(close(three.arc_start_y, expected_y, 1e-9));
    assert!(close(three.arc_start_y, 89.9, 0.5));

    let expected_sweep = (expected_y / 237.5).asin().to_degrees();
    assert!(close(three.sweep_deg, expected_sweep, 1e-9));
    assert!(close(three.sweep_deg, 22.46, 0.5));
}

#[test]
fn arc_endpoints_land_on_corner_tops() {
    let geometry = court_geometry(&CourtSpec::NBA, false);
    let arc = geometry
        .find(MarkingKind::ThreePointArc)
        .next()
        .expect("three-point arc");
    let points = arc.shape.points(1.0);
    let first = points[0];
    let last = points[points.len() - 1];
    let y = geometry.three_point.arc_start_y;
    assert!(close(first.x, 220.0, 1e-6) && close(first.y, y, 1e-6));
    assert!(close(last.x, -220.0, 1e-6) && close(last.y, y, 1e-6));

    let corners: Vec<_> = geometry.find(MarkingKind::ThreePointCorner).collect();
    assert_eq!(corners.len(), 2);
    for corner in corners {
        let Shape::Segment { from, to } = corner.shape else {
            panic!("corner should be a segment");
        };
        assert_eq!(from.y, -40.0);
        assert!(close(to.y, y, 1e-9));
        assert_eq!(from.x.abs(), 220.0);
    }
}

#[test]
fn fixed_markings_sit_at_court_positions() {
    let geometry = court_geometry(&CourtSpec::NBA, false);

    let basket = geometry.find(MarkingKind::Basket).next().unwrap();
    assert_eq!(
        basket.shape,
        Shape::Circle {
            center: Point::new(0.0, 0.0),
            radius: 7.5
        }
    );

    let board = geometry.find(MarkingKind::Backboard).next().unwrap();
    assert_eq!(
        board.shape,
        Shape::Segment {
            from: Point::new(-30.0, -32.5),
            to: Point::new(30.0, -32.5)
        }
    );

    let paint = geometry.find(MarkingKind::Paint).next().unwrap();
    assert_eq!(
        paint.shape,
        Shape::Rect {
            corner: Point::new(-80.0, -40.0),
            width: 160.0,
            height: 190.0
        }
    );

    let half = geometry.find(MarkingKind::HalfCourtLine).next().unwrap();
    let Shape::Segment { from, to } = half.shape else {
        panic!("half-court line should be a segment");
    };
    assert_eq!((from.x, to.x, from.y), (COURT_X_MIN, COURT_X_MAX, 430.0));
}

#[test]
fn free_throw_circle_is_split_solid_and_dashed() {
    let geometry = court_geometry(&CourtSpec::NBA, false);
    let near = geometry.find(MarkingKind::FreeThrowNear).next().unwrap();
    let far = geometry.find(MarkingKind::FreeThrowFar).next().unwrap();
    assert_eq!(near.style, LineStyle::Solid);
    assert_eq!(far.style, LineStyle::Dashed);
    let Shape::Arc { center, radius, .. } = far.shape else {
        panic!("free-throw half should be an arc");
    };
    assert_eq!(center, Point::new(0.0, 150.0));
    assert_eq!(radius, 60.0);
}

#[test]
fn outer_lines_are_optional() {
    let plain = court_geometry(&CourtSpec::NBA, false);
    assert_eq!(plain.find(MarkingKind::Baseline).count(), 0);
    assert_eq!(plain.find(MarkingKind::Sideline).count(), 0);

    let framed = court_geometry(&CourtSpec::NBA, true);
    assert_eq!(framed.find(MarkingKind::Baseline).count(), 1);
    assert_eq!(framed.find(MarkingKind::Sideline).count(), 2);
    assert_eq!(framed.markings.len(), plain.markings.len() + 3);
}

#[test]
fn default_view_covers_the_half_court() {
    let view = court_geometry(&CourtSpec::NBA, false).view;
    assert_eq!((view.x_min, view.x_max), (-260.0, 260.0));
    assert_eq!((view.y_min, view.y_max), (-50.0, 440.0));
    assert!(view.contains(Point::new(0.0, 0.0)));
    assert!(!view.contains(Point::new(0.0, 470.0)));
}

#[test]
fn dimensions_are_reported_in_feet() {
    let dims = court_dimensions(&CourtSpec::NBA);
    assert_eq!(dims["three_point_radius"], 23.75);
    assert_eq!(dims["court_width"], 50.0);
    assert_eq!(dims["paint_width"], 16.0);
}

#[test]
fn corner_wider_than_arc_is_clamped_to_the_radius() {
    let spec = CourtSpec {
        three_point_corner_distance: 30.0,
        ..CourtSpec::NBA
    };
    let three = three_point_geometry(&spec);
    assert_eq!(three.radius, 237.5);
    assert_eq!(three.corner_distance, 237.5);
    assert_eq!(three.arc_start_y, 0.0);
    assert_eq!(three.sweep_deg, 0.0);

    let geometry = court_geometry(&spec, true);
    for marking in &geometry.markings {
        let points = marking.shape.points(1.0);
        assert!(
            points.iter().all(|p| p.x.is_finite() && p.y.is_finite()),
            "{:?} has non-finite points",
            marking.kind
        );
    }
}
