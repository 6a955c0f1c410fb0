//! Half-court markings in record coordinates (tenths of a foot, basket at the
//! origin, y growing toward half court).

use std::collections::BTreeMap;

use crate::config::CourtSpec;

// Padding around the court lines in the default view.
const VIEW_PADDING: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Segment { from: Point, to: Point },
    /// Counter-clockwise from `start_deg` to `end_deg`, 0° along +x.
    Arc {
        center: Point,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
    },
    Circle { center: Point, radius: f64 },
    Rect { corner: Point, width: f64, height: f64 },
}

impl Shape {
    /// Polyline approximation, `step_deg` apart along curves.
    pub fn points(&self, step_deg: f64) -> Vec<Point> {
        match *self {
            Shape::Segment { from, to } => vec![from, to],
            Shape::Arc {
                center,
                radius,
                start_deg,
                end_deg,
            } => arc_points(center, radius, start_deg, end_deg, step_deg),
            Shape::Circle { center, radius } => arc_points(center, radius, 0.0, 360.0, step_deg),
            Shape::Rect {
                corner,
                width,
                height,
            } => vec![
                corner,
                Point::new(corner.x + width, corner.y),
                Point::new(corner.x + width, corner.y + height),
                Point::new(corner.x, corner.y + height),
                corner,
            ],
        }
    }
}

fn arc_points(
    center: Point,
    radius: f64,
    start_deg: f64,
    end_deg: f64,
    step_deg: f64,
) -> Vec<Point> {
    let sweep = end_deg - start_deg;
    let steps = (sweep.abs() / step_deg.max(0.1)).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|i| {
            let theta = (start_deg + sweep * i as f64 / steps as f64).to_radians();
            Point::new(
                center.x + radius * theta.cos(),
                center.y + radius * theta.sin(),
            )
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkingKind {
    Basket,
    Backboard,
    RestrictedArea,
    Paint,
    FreeThrowNear,
    FreeThrowFar,
    ThreePointCorner,
    ThreePointArc,
    HalfCourtLine,
    CenterCircle,
    Baseline,
    Sideline,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marking {
    pub kind: MarkingKind,
    pub shape: Shape,
    pub style: LineStyle,
    pub filled: bool,
}

impl Marking {
    fn solid(kind: MarkingKind, shape: Shape) -> Self {
        Self {
            kind,
            shape,
            style: LineStyle::Solid,
            filled: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ViewBounds {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    /// Grows each side that a point (plus `margin`) would cross.
    pub fn expanded_to_fit(&self, points: impl IntoIterator<Item = Point>, margin: f64) -> Self {
        let mut out = *self;
        for p in points {
            out.x_min = out.x_min.min(p.x - margin);
            out.x_max = out.x_max.max(p.x + margin);
            out.y_min = out.y_min.min(p.y - margin);
            out.y_max = out.y_max.max(p.y + margin);
        }
        out
    }
}

/// Derived three-point line measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreePointGeometry {
    pub radius: f64,
    pub corner_distance: f64,
    /// Height above the basket where the arc meets the corner segments.
    pub arc_start_y: f64,
    /// Angle between the +x axis and the arc end, in degrees.
    pub sweep_deg: f64,
}

/// A corner distance wider than the arc radius is clamped to the radius, so
/// the arc degenerates to a half circle starting on the baseline.
pub fn three_point_geometry(spec: &CourtSpec) -> ThreePointGeometry {
    let radius = spec.units(spec.three_point_radius).max(0.0);
    let corner_distance = spec
        .units(spec.three_point_corner_distance)
        .clamp(0.0, radius);
    let arc_start_y = (radius.powi(2) - corner_distance.powi(2)).max(0.0).sqrt();
    let sweep_deg = if radius > 0.0 {
        (arc_start_y / radius).clamp(-1.0, 1.0).asin().to_degrees()
    } else {
        0.0
    };
    ThreePointGeometry {
        radius,
        corner_distance,
        arc_start_y,
        sweep_deg,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourtGeometry {
    pub markings: Vec<Marking>,
    pub view: ViewBounds,
    pub three_point: ThreePointGeometry,
}

impl CourtGeometry {
    pub fn find(&self, kind: MarkingKind) -> impl Iterator<Item = &Marking> {
        self.markings.iter().filter(move |m| m.kind == kind)
    }
}

/// Builds every court marking from the dimensions in `spec`.
pub fn court_geometry(spec: &CourtSpec, outer_lines: bool) -> CourtGeometry {
    let origin = Point::new(0.0, 0.0);
    let baseline_y = -spec.units(spec.backboard_offset);
    let half_width = spec.units(spec.court_width / 2.0);
    let half_court_y = spec.units(spec.half_court_length - spec.backboard_offset);
    let mut markings = Vec::new();

    markings.push(Marking::solid(
        MarkingKind::Basket,
        Shape::Circle {
            center: origin,
            radius: spec.units(spec.basket_diameter / 2.0),
        },
    ));

    let board_y = -spec.units(spec.backboard_offset - spec.backboard_inset);
    let board_half = spec.units(spec.backboard_width / 2.0);
    markings.push(Marking {
        filled: true,
        ..Marking::solid(
            MarkingKind::Backboard,
            Shape::Segment {
                from: Point::new(-board_half, board_y),
                to: Point::new(board_half, board_y),
            },
        )
    });

    markings.push(Marking::solid(
        MarkingKind::RestrictedArea,
        Shape::Arc {
            center: origin,
            radius: spec.units(spec.restricted_area_radius),
            start_deg: 0.0,
            end_deg: 180.0,
        },
    ));

    let paint_width = spec.units(spec.paint_width);
    markings.push(Marking::solid(
        MarkingKind::Paint,
        Shape::Rect {
            corner: Point::new(-paint_width / 2.0, baseline_y),
            width: paint_width,
            height: spec.units(spec.paint_length),
        },
    ));

    let ft_center = Point::new(0.0, spec.units(spec.paint_length - spec.backboard_offset));
    let ft_radius = spec.units(spec.free_throw_circle_radius);
    markings.push(Marking::solid(
        MarkingKind::FreeThrowNear,
        Shape::Arc {
            center: ft_center,
            radius: ft_radius,
            start_deg: 180.0,
            end_deg: 360.0,
        },
    ));
    markings.push(Marking {
        style: LineStyle::Dashed,
        ..Marking::solid(
            MarkingKind::FreeThrowFar,
            Shape::Arc {
                center: ft_center,
                radius: ft_radius,
                start_deg: 0.0,
                end_deg: 180.0,
            },
        )
    });

    let three = three_point_geometry(spec);
    for x in [-three.corner_distance, three.corner_distance] {
        markings.push(Marking::solid(
            MarkingKind::ThreePointCorner,
            Shape::Segment {
                from: Point::new(x, baseline_y),
                to: Point::new(x, three.arc_start_y),
            },
        ));
    }
    markings.push(Marking::solid(
        MarkingKind::ThreePointArc,
        Shape::Arc {
            center: origin,
            radius: three.radius,
            start_deg: three.sweep_deg,
            end_deg: 180.0 - three.sweep_deg,
        },
    ));

    markings.push(Marking::solid(
        MarkingKind::HalfCourtLine,
        Shape::Segment {
            from: Point::new(-half_width, half_court_y),
            to: Point::new(half_width, half_court_y),
        },
    ));
    markings.push(Marking::solid(
        MarkingKind::CenterCircle,
        Shape::Arc {
            center: Point::new(0.0, half_court_y),
            radius: spec.units(spec.center_circle_radius),
            start_deg: 180.0,
            end_deg: 360.0,
        },
    ));

    if outer_lines {
        markings.push(Marking::solid(
            MarkingKind::Baseline,
            Shape::Segment {
                from: Point::new(-half_width, baseline_y),
                to: Point::new(half_width, baseline_y),
            },
        ));
        for x in [-half_width, half_width] {
            markings.push(Marking::solid(
                MarkingKind::Sideline,
                Shape::Segment {
                    from: Point::new(x, baseline_y),
                    to: Point::new(x, half_court_y),
                },
            ));
        }
    }

    CourtGeometry {
        markings,
        view: ViewBounds {
            x_min: -half_width - VIEW_PADDING,
            x_max: half_width + VIEW_PADDING,
            y_min: baseline_y - VIEW_PADDING,
            y_max: half_court_y + VIEW_PADDING,
        },
        three_point: three,
    }
}

/// Court measurements in feet, keyed by name.
pub fn court_dimensions(spec: &CourtSpec) -> BTreeMap<&'static str, f64> {
    BTreeMap::from([
        ("court_width", spec.court_width),
        ("half_court_length", spec.half_court_length),
        ("basket_diameter", spec.basket_diameter),
        ("backboard_offset", spec.backboard_offset),
        ("three_point_radius", spec.three_point_radius),
        ("three_point_corner", spec.three_point_corner_distance),
        ("paint_width", spec.paint_width),
        ("paint_length", spec.paint_length),
        ("free_throw_circle_radius", spec.free_throw_circle_radius),
        ("restricted_area_radius", spec.restricted_area_radius),
        ("center_circle_radius", spec.center_circle_radius),
    ])
}
