use std::rc::Rc;

use image::{Rgba, RgbaImage};
use q_learning_racetrack::environment::road::car::START_POSITION;
use q_learning_racetrack::environment::road::collision_field::{CollisionField, VIEWPORT_HEIGHT, VIEWPORT_WIDTH, WALL_COLOR};
use q_learning_racetrack::environment::road_environment::RoadEnvironment;
use q_learning_racetrack::ql::learn::epsilon::EpsilonSchedule;
use q_learning_racetrack::ql::learn::self_driving_q_learner::Parameter;
use q_learning_racetrack::util::log;

pub const ROAD_COLOR: Rgba<u8> = Rgba([70, 70, 70, 255]);

#[ctor::ctor]
fn init() { log::init_test_logging() }

fn field_of(image: &RgbaImage) -> Rc<CollisionField> {
    Rc::new(CollisionField::from_image(image).expect("viewport sized image"))
}

/// Every pixel is a wall, except the car's start pixel
pub fn start_pixel_only_environment() -> RoadEnvironment {
    let mut image = RgbaImage::from_pixel(VIEWPORT_WIDTH, VIEWPORT_HEIGHT, WALL_COLOR);
    image.put_pixel(START_POSITION.0 as u32, START_POSITION.1 as u32, ROAD_COLOR);
    RoadEnvironment::new(field_of(&image))
}

/// Drivable square around the start position, reaching `margin` pixels into every direction
pub fn enclosed_box_environment(margin: u32) -> RoadEnvironment {
    let (cx, cy) = (START_POSITION.0 as u32, START_POSITION.1 as u32);
    let image = RgbaImage::from_fn(VIEWPORT_WIDTH, VIEWPORT_HEIGHT, |x, y| {
        if x + margin >= cx && x <= cx + margin && y + margin >= cy && y <= cy + margin {
            ROAD_COLOR
        } else {
            WALL_COLOR
        }
    });
    RoadEnvironment::new(field_of(&image))
}

pub fn seeded_param(seed: u64) -> Parameter {
    Parameter {
        rng_seed: Some(seed),
        ..Parameter::default()
    }
}

/// never explores
pub fn greedy_param(seed: u64) -> Parameter {
    Parameter {
        epsilon: EpsilonSchedule { start: 0.0, end: 0.0, decay: 200.0 },
        ..seeded_param(seed)
    }
}
