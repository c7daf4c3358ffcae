use crate::engine::{Point, Viewport};
use crate::scroll::{Property, Tweenable};

/// Camera offset relative to where the viewport was centered at construction
///
/// ┌──────────────── WorldCamera ────────────────┐
/// │  x() = viewport.center.x - init.x           │
/// │  y() = viewport.center.y - init.y           │
/// │  set_x(v) -> move_center(init.x + v,        │
/// │                          init.y + y())      │
/// └─────────────────────────────────────────────┘
/// Each setter reads the other axis first so only one axis ever moves.
#[derive(Debug, Clone)]
pub struct WorldCamera {
    viewport: Viewport,
    init: Point,
}

impl WorldCamera {
    pub fn new(viewport: Viewport) -> Self {
        let init = viewport.center();
        WorldCamera { viewport, init }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn x(&self) -> f64 {
        self.viewport.center().x - self.init.x
    }

    pub fn y(&self) -> f64 {
        self.viewport.center().y - self.init.y
    }

    pub fn set_x(&mut self, value: f64) {
        let y = self.y();
        self.viewport
            .move_center(value + self.init.x, y + self.init.y);
    }

    pub fn set_y(&mut self, value: f64) {
        let x = self.x();
        self.viewport
            .move_center(x + self.init.x, value + self.init.y);
    }

    pub fn position(&self) -> Point {
        Point {
            x: self.x(),
            y: self.y(),
        }
    }

    pub fn set_position(&mut self, point: Point) {
        self.viewport
            .move_center(point.x + self.init.x, point.y + self.init.y);
    }
}

impl Tweenable for WorldCamera {
    fn property(&self, property: Property) -> f64 {
        match property {
            Property::X => self.x(),
            Property::Y => self.y(),
        }
    }

    fn set_property(&mut self, property: Property, value: f64) {
        match property {
            Property::X => self.set_x(value),
            Property::Y => self.set_y(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Size;
    use approx::assert_relative_eq;

    fn camera() -> WorldCamera {
        WorldCamera::new(Viewport::new(
            Size {
                width: 800.0,
                height: 600.0,
            },
            Size {
                width: 2000.0,
                height: 2000.0,
            },
        ))
    }

    #[test]
    fn starts_at_zero_offset() {
        let camera = camera();
        assert_eq!(camera.position(), Point { x: 0.0, y: 0.0 });
    }

    #[test]
    fn set_x_moves_viewport_center() {
        let mut camera = camera();
        camera.set_x(1200.0);
        assert_relative_eq!(camera.x(), 1200.0);
        assert_relative_eq!(camera.viewport().center().x, 1600.0);
        assert_relative_eq!(camera.viewport().visible_bounds().right(), 2000.0);
    }

    #[test]
    fn axes_are_independent() {
        let mut camera = camera();
        camera.set_x(250.0);
        camera.set_y(-40.0);
        assert_relative_eq!(camera.x(), 250.0);
        assert_relative_eq!(camera.y(), -40.0);

        camera.set_x(-75.0);
        assert_relative_eq!(camera.y(), -40.0);
        camera.set_y(900.0);
        assert_relative_eq!(camera.x(), -75.0);
    }

    #[test]
    fn set_position_moves_both_axes() {
        let mut camera = camera();
        camera.set_position(Point { x: 10.0, y: 20.0 });
        assert_eq!(camera.position(), Point { x: 10.0, y: 20.0 });
    }

    #[test]
    fn offset_survives_zoom() {
        let mut camera = camera();
        camera.set_x(300.0);
        camera.viewport_mut().set_zoom(2.0);
        assert_relative_eq!(camera.x(), 300.0);
    }
}
