use std::fmt::{Display, Formatter};
use std::rc::Rc;

use anyhow::Result;
use console_engine::pixel;
use console_engine::screen::Screen;
use itertools::Itertools;

use crate::environment::road::car::{Car, Direction, Sensors, STEERING_ANGLE};
use crate::environment::road::collision_field::CollisionField;
use crate::ql::ml_model::model::ToFeatureVector;
use crate::ql::prelude::{Action, DebugVisualizer, Environment, ModelActionType, QlError};

pub const COLLISION_REWARD: f32 = -100.0;
/// constant per-step reward for staying on the road
pub const SURVIVAL_REWARD: f32 = 1.0;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum RoadAction {
    SteerLeft,
    SteerRight,
}

impl RoadAction {
    pub fn direction(&self) -> Direction {
        match self {
            RoadAction::SteerLeft => Direction::Left,
            RoadAction::SteerRight => Direction::Right,
        }
    }
}

impl Display for RoadAction {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.direction())
    }
}

impl Action for RoadAction {
    const ACTION_SPACE: ModelActionType = 2;

    fn numeric(&self) -> ModelActionType {
        match self {
            RoadAction::SteerLeft => 0,
            RoadAction::SteerRight => 1,
        }
    }

    fn try_from_numeric(value: ModelActionType) -> Result<Self> {
        match value {
            0 => Ok(RoadAction::SteerLeft),
            1 => Ok(RoadAction::SteerRight),
            _ => Err(QlError::InvalidAction(value).into()),
        }
    }
}

/// What the model gets to see of the car: its sensor reading
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadState {
    sensors: Sensors,
}

impl RoadState {
    pub fn observe(
        car: &Car,
        field: &CollisionField,
    ) -> Self {
        Self { sensors: car.sensors(field) }
    }

    pub fn sensors(&self) -> &Sensors { &self.sensors }
}

impl ToFeatureVector for RoadState {
    const FEATURE_LEN: usize = 6;

    fn to_feature_vector(&self) -> Vec<f32> { self.sensors.to_array().to_vec() }
}

const GAUGE_LEN: usize = 20;
/// distance shown as a full gauge
const GAUGE_FULL_DISTANCE: f32 = 200.0;

impl DebugVisualizer for RoadState {
    fn one_line_info(&self) -> String {
        let distances = Direction::SENSORS
            .iter()
            .map(|&d| format!("{} {:.1}", d, self.sensors.distance(d)))
            .join(", ");
        format!("RoadState [{}, heading {:.0}°]", distances, self.sensors.heading_normalized * 360.0)
    }

    /// one distance gauge per sensor
    fn render_to_console(&self) -> Screen {
        let mut screen = Screen::new_fill((GAUGE_LEN + 10) as u32, Direction::SENSORS.len() as u32, pixel::pxl(' '));
        for (row, &direction) in Direction::SENSORS.iter().enumerate() {
            let distance = self.sensors.distance(direction);
            let filled = ((distance / GAUGE_FULL_DISTANCE).min(1.0) * GAUGE_LEN as f32).round() as i32;
            screen.print(0, row as i32, &format!("{} ", direction));
            for x in 0..filled {
                screen.set_pxl(2 + x, row as i32, pixel::pxl('■'));
            }
            screen.print(GAUGE_LEN as i32 + 3, row as i32, &format!("{:.0}", distance));
        }
        screen
    }
}

/// A single car on a fixed road.
///
/// Per step the car steers (left or right), moves forward and gets
/// [COLLISION_REWARD] when it ended up on a wall pixel, [SURVIVAL_REWARD] otherwise.
pub struct RoadEnvironment {
    field: Rc<CollisionField>,
    car: Car,
    state: RoadState,
}

impl RoadEnvironment {
    pub fn new(field: Rc<CollisionField>) -> Self {
        let car = Car::default();
        let state = RoadState::observe(&car, &field);
        Self { field, car, state }
    }

    pub fn field(&self) -> &CollisionField { &self.field }

    pub fn car(&self) -> &Car { &self.car }

    /// Puts a brand-new car onto the start position
    pub fn reset_episode(&mut self) {
        self.car = Car::default();
        self.state = RoadState::observe(&self.car, &self.field);
    }

    pub fn reward(colliding: bool) -> f32 {
        if colliding {
            COLLISION_REWARD
        } else {
            SURVIVAL_REWARD
        }
    }
}

impl Environment for RoadEnvironment {
    type S = RoadState;
    type A = RoadAction;

    fn reset(&mut self) { self.reset_episode() }

    fn state(&self) -> &Self::S { &self.state }

    fn is_done(&self) -> bool { self.car.is_colliding(&self.field) }

    fn step(
        &mut self,
        action: Self::A,
    ) -> (&Self::S, f32, bool) {
        self.car.rotate(action.direction(), STEERING_ANGLE);
        self.car.move_forward();

        let colliding = self.car.is_colliding(&self.field);
        self.state = RoadState::observe(&self.car, &self.field);
        (&self.state, Self::reward(colliding), colliding)
    }
}
