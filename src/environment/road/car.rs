use std::fmt::{Display, Formatter};

use nalgebra::{Point2, Vector2};

use crate::environment::road::collision_field::CollisionField;

pub const START_POSITION: (f32, f32) = (350.0, 450.0);
pub const START_HEADING: f32 = 0.0;
/// units per tick
pub const SPEED: f32 = 3.0;
pub const STEERING_ANGLE: f32 = 5.0;
/// heading a right turn lands on when it would go below 0°
const RIGHT_TURN_WRAP_HEADING: f32 = 355.0;

/// Directions relative to the car's heading.
/// Only `Left` and `Right` steer; all of them can be sensed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Front,
    LeftFront,
    RightFront,
}

impl Direction {
    /// Order of the distance sensors in the car state
    pub const SENSORS: [Direction; 5] = [
        Direction::Left,
        Direction::Right,
        Direction::Front,
        Direction::LeftFront,
        Direction::RightFront,
    ];

    /// Position in [Self::SENSORS]
    pub fn sensor_index(&self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
            Direction::Front => 2,
            Direction::LeftFront => 3,
            Direction::RightFront => 4,
        }
    }

    /// Offset to the heading in degrees (counter-clockwise)
    pub fn angle_offset(&self) -> f32 {
        match self {
            Direction::Left => 90.0,
            Direction::Right => -90.0,
            Direction::Front => 0.0,
            Direction::LeftFront => 45.0,
            Direction::RightFront => -45.0,
        }
    }
}

impl Display for Direction {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        let symbol = match self {
            Direction::Left => "←",
            Direction::Right => "→",
            Direction::Front => "↑",
            Direction::LeftFront => "↖",
            Direction::RightFront => "↗",
        };
        write!(f, "{}", symbol)
    }
}

/// Sensor snapshot of the car: five wall distances (in [Direction::SENSORS] order)
/// plus the heading normalized to [0, 1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sensors {
    pub wall_distances: [f32; 5],
    pub heading_normalized: f32,
}

impl Sensors {
    pub fn distance(
        &self,
        direction: Direction,
    ) -> f32 {
        self.wall_distances[direction.sensor_index()]
    }

    pub fn to_array(&self) -> [f32; 6] {
        let d = self.wall_distances;
        [d[0], d[1], d[2], d[3], d[4], self.heading_normalized]
    }
}

pub fn start_position() -> Point2<f32> {
    Point2::new(START_POSITION.0, START_POSITION.1)
}

/// The simulated vehicle.
///
/// x = 0 = left side; y = 0 = top; heading 0° points east, 90° north.
#[derive(Clone, Debug, PartialEq)]
pub struct Car {
    position: Point2<f32>,
    /// degrees, [0, 360)
    heading: f32,
    speed: f32,
}

impl Default for Car {
    fn default() -> Self {
        Self::new(start_position(), START_HEADING)
    }
}

impl Car {
    pub fn new(
        position: Point2<f32>,
        heading: f32,
    ) -> Self {
        debug_assert!((0.0..360.0).contains(&heading));
        Self {
            position,
            heading,
            speed: SPEED,
        }
    }

    pub fn position(&self) -> Point2<f32> { self.position }

    pub fn heading(&self) -> f32 { self.heading }

    /// Steers by `steering_angle` degrees.
    ///
    /// Crossing the 0°/360° border does not wrap modulo 360: a left turn that would reach 360°
    /// lands on 0° and a right turn that would go below 0° lands on 355°.
    /// Directions other than `Left` and `Right` don't steer.
    pub fn rotate(
        &mut self,
        direction: Direction,
        steering_angle: f32,
    ) {
        match direction {
            Direction::Left => {
                self.heading = if self.heading + steering_angle >= 360.0 {
                    0.0
                } else {
                    self.heading + steering_angle
                }
            }
            Direction::Right => {
                self.heading = if self.heading - steering_angle < 0.0 {
                    RIGHT_TURN_WRAP_HEADING
                } else {
                    self.heading - steering_angle
                }
            }
            Direction::Front | Direction::LeftFront | Direction::RightFront => (),
        }
    }

    /// Advances one tick along the heading. Walls are not checked here.
    pub fn move_forward(&mut self) {
        let (sin, cos) = self.heading.to_radians().sin_cos();
        self.position += Vector2::new(cos, -sin) * self.speed;
    }

    pub fn wall_distance(
        &self,
        field: &CollisionField,
        direction: Direction,
    ) -> f32 {
        field.cast_distance(self.position.x, self.position.y, self.heading + direction.angle_offset())
    }

    /// Fresh sensor reading of the current pose
    pub fn sensors(
        &self,
        field: &CollisionField,
    ) -> Sensors {
        Sensors {
            wall_distances: Direction::SENSORS.map(|d| self.wall_distance(field, d)),
            heading_normalized: self.heading / 360.0,
        }
    }

    pub fn is_colliding(
        &self,
        field: &CollisionField,
    ) -> bool {
        field.is_wall(self.position.x.round(), self.position.y.round())
    }
}
