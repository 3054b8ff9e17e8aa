use crate::graphics::{Canvas, Cell};
use crate::math::Point2;
use crate::mechanism::SPRING_AMPLITUDE_CM;
use crate::state::Snapshot;
use crate::units::{ncm_from_kgfcm, pixels_from_cm, NEWTONS_PER_KGF};
use crossterm::style::Color;

// Model-space sizes in pixels, scaled by zoom when composed
const LINK_WIDTH: f64 = 5.0;
const GUIDE_WIDTH: f64 = 1.0;
const JOINT_RADIUS: f64 = 10.0;
const PIVOT_RADIUS: f64 = 6.0;
const BODY_HALF_WIDTH: f64 = 24.0;
const BODY_HALF_HEIGHT: f64 = 12.0;
const SPRING_COILS: usize = 8;
const SPRING_HALF_WIDTH: f64 = 10.0;
const GROUND_HALF_WIDTH: f64 = 36.0;

/// A shape in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Line {
        from: Point2,
        to: Point2,
        width: f64,
        cell: Cell,
    },
    Circle {
        center: Point2,
        radius: f64,
        cell: Cell,
    },
    Rect {
        min: Point2,
        max: Point2,
        cell: Cell,
    },
}

/// A labeled numeric value shown beside the mechanism
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    pub label: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

impl Readout {
    fn new(label: &'static str, value: f64, unit: &'static str) -> Self {
        Readout { label, value, unit }
    }

    pub fn text(&self) -> String {
        format!("{}: {:.2} {}", self.label, self.value, self.unit)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Back to front
    pub primitives: Vec<Primitive>,
    pub readouts: Vec<Readout>,
}

impl Scene {
    pub fn compose(snap: &Snapshot) -> Scene {
        let view = &snap.viewport;
        let g = &snap.geometry;
        let mut primitives = Vec::with_capacity(16 + SPRING_COILS * 2);

        // Frame: guide along the slider axis and the spring's ground anchor
        let anchor_depth = snap.params.slider_offset
            + snap.params.crank_radius
            + BODY_HALF_HEIGHT
            + pixels_from_cm(2.0 * SPRING_AMPLITUDE_CM);
        let anchor = view.screen_point(Point2::new(0.0, anchor_depth));
        primitives.push(Primitive::Line {
            from: g.pivot,
            to: anchor,
            width: GUIDE_WIDTH,
            cell: Cell::new(':', Color::DarkGrey),
        });
        primitives.push(Primitive::Line {
            from: view.screen_point(Point2::new(-GROUND_HALF_WIDTH, anchor_depth)),
            to: view.screen_point(Point2::new(GROUND_HALF_WIDTH, anchor_depth)),
            width: GUIDE_WIDTH,
            cell: Cell::new('^', Color::DarkGrey),
        });

        // Spring from the slider body down to the anchor
        let body_half = Point2::new(
            view.screen_length(BODY_HALF_WIDTH),
            view.screen_length(BODY_HALF_HEIGHT),
        );
        let body_bottom = Point2::new(g.slider_end.x, g.slider_end.y + body_half.y);
        push_spring(
            &mut primitives,
            body_bottom,
            anchor,
            view.screen_length(SPRING_HALF_WIDTH),
        );

        // Slider body
        primitives.push(Primitive::Rect {
            min: g.slider_end - body_half,
            max: g.slider_end + body_half,
            cell: Cell::new('=', Color::Green),
        });

        // Fixed rod constraining the rod end to the vertical axis
        primitives.push(Primitive::Line {
            from: g.pivot,
            to: g.fixed_rod_end,
            width: view.screen_length(LINK_WIDTH),
            cell: Cell::new('|', Color::Grey),
        });

        // Connecting rod
        primitives.push(Primitive::Line {
            from: g.crank_pin,
            to: g.fixed_rod_end,
            width: view.screen_length(LINK_WIDTH),
            cell: Cell::new('*', Color::Blue),
        });
        primitives.push(Primitive::Circle {
            center: g.fixed_rod_end,
            radius: view.screen_length(JOINT_RADIUS),
            cell: Cell::new('o', Color::White),
        });

        // Crank
        primitives.push(Primitive::Line {
            from: g.pivot,
            to: g.crank_pin,
            width: view.screen_length(LINK_WIDTH),
            cell: Cell::new('#', Color::White),
        });
        primitives.push(Primitive::Circle {
            center: g.crank_pin,
            radius: view.screen_length(JOINT_RADIUS),
            cell: Cell::new('O', Color::Red),
        });
        primitives.push(Primitive::Circle {
            center: g.pivot,
            radius: view.screen_length(PIVOT_RADIUS),
            cell: Cell::new('+', Color::Yellow),
        });

        let p = &snap.params;
        let readouts = vec![
            Readout::new("Force", snap.forces.instantaneous, "kgF"),
            Readout::new(
                "Force",
                snap.forces.instantaneous * NEWTONS_PER_KGF,
                "N",
            ),
            Readout::new("Max Force", snap.forces.maximum, "kgF"),
            Readout::new("Spring Displacement", snap.spring_displacement, "cm"),
            Readout::new("Spring Force", snap.spring_force, "kgF"),
            Readout::new("Torque", p.torque, "kgF*cm"),
            Readout::new("Torque", ncm_from_kgfcm(p.torque), "N*cm"),
            Readout::new("Crank Radius", p.crank_radius_cm(), "cm"),
            Readout::new("Connecting Rod Length", p.rod_length_cm(), "cm"),
            Readout::new("Angular Velocity", p.angular_velocity, "rad/s"),
            Readout::new("Pump Frequency", snap.pump_frequency, "strokes/min"),
            Readout::new("Time Scale", p.time_scale, "x"),
            Readout::new("Zoom", view.zoom(), "x"),
        ];

        Scene {
            primitives,
            readouts,
        }
    }

    /// Rasterizes the primitives in order
    pub fn draw(&self, canvas: &mut Canvas) {
        for primitive in &self.primitives {
            match *primitive {
                Primitive::Line {
                    from,
                    to,
                    width,
                    cell,
                } => canvas.draw_line(from, to, width, cell),
                Primitive::Circle {
                    center,
                    radius,
                    cell,
                } => canvas.fill_circle(center, radius, cell),
                Primitive::Rect { min, max, cell } => canvas.fill_rect(min, max, cell),
            }
        }
    }
}

/// Zig-zag between two points on the same vertical
fn push_spring(primitives: &mut Vec<Primitive>, top: Point2, bottom: Point2, half_width: f64) {
    let cell = Cell::new('~', Color::Magenta);
    let segments = SPRING_COILS * 2;
    let step = (bottom.y - top.y) / segments as f64;
    let mut previous = top;
    for i in 1..=segments {
        let x = if i == segments {
            top.x
        } else if i % 2 == 1 {
            top.x - half_width
        } else {
            top.x + half_width
        };
        let next = Point2::new(x, top.y + step * i as f64);
        primitives.push(Primitive::Line {
            from: previous,
            to: next,
            width: GUIDE_WIDTH,
            cell,
        });
        previous = next;
    }
}
