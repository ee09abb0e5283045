use image::{Rgba, RgbaImage};

use crate::ql::prelude::QlError;

/// TOP / LEFT corner is 0/0
pub const VIEWPORT_WIDTH: u32 = 800;
pub const VIEWPORT_HEIGHT: u32 = 600;

/// Pixels of exactly this color are walls; everything else is drivable road.
pub const WALL_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    Drivable,
    Wall,
    /// outside of the canvas - counts as wall
    OutOfBounds,
}

/// Static collision mask derived from the road texture.
#[derive(Clone, Debug)]
pub struct CollisionField {
    width: u32,
    height: u32,
    /// row-major; `true` = wall
    walls: Vec<bool>,
}

impl CollisionField {
    /// Builds the mask out of a viewport sized image
    pub fn from_image(image: &RgbaImage) -> Result<Self, QlError> {
        let actual = image.dimensions();
        if actual != (VIEWPORT_WIDTH, VIEWPORT_HEIGHT) {
            return Err(QlError::FieldDimensionMismatch {
                expected: (VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
                actual,
            });
        }
        let walls = image.pixels().map(|&p| p == WALL_COLOR).collect();
        Ok(Self {
            width: actual.0,
            height: actual.1,
            walls,
        })
    }

    pub fn width(&self) -> u32 { self.width }

    pub fn height(&self) -> u32 { self.height }

    /// Classifies the pixel at integer-truncated `(x, y)`
    pub fn probe(
        &self,
        x: f32,
        y: f32,
    ) -> Probe {
        if !(x >= 0.0 && y >= 0.0 && x < self.width as f32 && y < self.height as f32) {
            log::trace!("out of bounds query at ({:.1}, {:.1})", x, y);
            return Probe::OutOfBounds;
        }
        let (x, y) = (x as usize, y as usize);
        if self.walls[y * self.width as usize + x] {
            Probe::Wall
        } else {
            Probe::Drivable
        }
    }

    pub fn is_wall(
        &self,
        x: f32,
        y: f32,
    ) -> bool {
        self.probe(x, y) != Probe::Drivable
    }

    /// A ray never needs more unit steps than this to leave the canvas
    pub fn max_cast_steps(&self) -> usize {
        (self.width as f32).hypot(self.height as f32).ceil() as usize + 1
    }

    /// Walks unit steps from the origin into `angle_degrees` direction until a wall is hit
    /// and returns the distance travelled.
    ///
    /// Screen Y grows downwards, so a step is `(cos, -sin)`.
    /// Walks at most [Self::max_cast_steps] steps and returns the distance reached by then.
    pub fn cast_distance(
        &self,
        origin_x: f32,
        origin_y: f32,
        angle_degrees: f32,
    ) -> f32 {
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        let (mut x, mut y) = (origin_x, origin_y);
        for _ in 0..self.max_cast_steps() {
            if self.is_wall(x, y) {
                break;
            }
            x += cos;
            y -= sin;
        }
        (x - origin_x).hypot(y - origin_y)
    }
}
