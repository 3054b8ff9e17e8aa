use crate::math::Point2;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;
/// Zoom change per wheel tick
pub const ZOOM_STEP: f64 = 0.1;

/// Pan drag state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Pointer position at the previous drag event
        last: Point2,
    },
}

/// Pan offset and uniform zoom of the model-to-screen transform.
///
/// `center` is the crank pivot in screen space, so a model point `p`
/// relative to the pivot lands at `center + p * zoom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    center: Point2,
    zoom: f64,
    drag: DragState,
}

impl Viewport {
    pub fn new(center: Point2, zoom: f64) -> Self {
        let mut viewport = Viewport {
            center,
            zoom: 1.0,
            drag: DragState::Idle,
        };
        viewport.set_zoom(zoom);
        viewport
    }

    pub fn center(&self) -> Point2 {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Scales a model-space length (line width, radius) to screen space
    pub fn screen_length(&self, length: f64) -> f64 {
        length * self.zoom
    }

    /// Maps a pivot-relative model point to screen space
    pub fn screen_point(&self, model: Point2) -> Point2 {
        self.center + model * self.zoom
    }

    pub fn begin_drag(&mut self, pointer: Point2) {
        if pointer.is_finite() {
            self.drag = DragState::Dragging { last: pointer };
        }
    }

    /// Translates the center by the pointer delta; no-op unless dragging
    pub fn continue_drag(&mut self, pointer: Point2) {
        if let DragState::Dragging { last } = self.drag {
            if !pointer.is_finite() {
                return;
            }
            self.center = self.center + (pointer - last);
            self.drag = DragState::Dragging { last: pointer };
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Adds `ticks * ZOOM_STEP` to the zoom, clamped to [MIN_ZOOM, MAX_ZOOM]
    pub fn apply_zoom_delta(&mut self, ticks: f64) {
        if ticks.is_finite() {
            self.set_zoom(self.zoom + ticks * ZOOM_STEP);
        }
    }

    fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            let clamped = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
            if clamped != zoom {
                tracing::debug!(requested = zoom, clamped, "zoom clamped");
            }
            self.zoom = clamped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn viewport() -> Viewport {
        Viewport::new(Point2::new(400.0, 300.0), 1.0)
    }

    #[test]
    fn three_ticks_out_from_unit_zoom() {
        let mut v = viewport();
        for _ in 0..3 {
            v.apply_zoom_delta(-1.0);
        }
        assert!((v.zoom() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn zoom_is_clamped_at_construction() {
        assert_eq!(Viewport::new(Point2::ZERO, 50.0).zoom(), MAX_ZOOM);
        assert_eq!(Viewport::new(Point2::ZERO, 0.0).zoom(), MIN_ZOOM);
        assert_eq!(Viewport::new(Point2::ZERO, f64::NAN).zoom(), 1.0);
    }

    #[test]
    fn drag_translates_center_by_pointer_delta() {
        let mut v = viewport();
        v.begin_drag(Point2::new(10.0, 10.0));
        assert!(v.is_dragging());
        v.continue_drag(Point2::new(15.0, 7.0));
        v.continue_drag(Point2::new(25.0, 17.0));
        assert_eq!(v.center(), Point2::new(415.0, 307.0));
        v.end_drag();
        assert_eq!(v.drag_state(), DragState::Idle);
    }

    #[test]
    fn continue_drag_without_begin_is_noop() {
        let mut v = viewport();
        v.continue_drag(Point2::new(100.0, 100.0));
        assert_eq!(v.center(), Point2::new(400.0, 300.0));
    }

    #[test]
    fn end_drag_then_continue_leaves_center() {
        let mut v = viewport();
        v.begin_drag(Point2::new(0.0, 0.0));
        v.continue_drag(Point2::new(5.0, 5.0));
        let before = v.center();
        v.end_drag();
        v.continue_drag(Point2::new(500.0, -500.0));
        assert_eq!(v.center(), before);
    }

    #[test]
    fn transform_scales_about_center() {
        let mut v = viewport();
        v.apply_zoom_delta(10.0);
        assert!((v.zoom() - 2.0).abs() < 1e-12);
        assert!((v.screen_length(5.0) - 10.0).abs() < 1e-12);
        let p = v.screen_point(Point2::new(10.0, -20.0));
        assert!((p.x - 420.0).abs() < 1e-9);
        assert!((p.y - 260.0).abs() < 1e-9);
    }

    #[test]
    fn pan_and_zoom_are_independent() {
        let mut v = viewport();
        v.begin_drag(Point2::ZERO);
        v.apply_zoom_delta(5.0);
        v.continue_drag(Point2::new(1.0, 2.0));
        assert_eq!(v.center(), Point2::new(401.0, 302.0));
        assert!((v.zoom() - 1.5).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn zoom_never_leaves_bounds(ticks in proptest::collection::vec(-1.0e6f64..1.0e6, 1..50)) {
            let mut v = viewport();
            for t in ticks {
                v.apply_zoom_delta(t);
                prop_assert!((MIN_ZOOM..=MAX_ZOOM).contains(&v.zoom()));
            }
        }
    }
}
