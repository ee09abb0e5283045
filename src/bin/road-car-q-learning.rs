use std::rc::Rc;

use anyhow::Result;
use q_learning_racetrack::environment::road::assets::{load_road_field, ROAD_IMAGE_PATH};
use q_learning_racetrack::environment::road::console_presenter::ConsolePresenter;
use q_learning_racetrack::environment::road_environment::RoadEnvironment;
use q_learning_racetrack::ql::learn::self_driving_q_learner::{Parameter, SelfDrivingQLearner, DEFAULT_NUM_EPISODES};
use q_learning_racetrack::ql::ml_model::backend::{default_device, TrainingBackend};
use q_learning_racetrack::ql::ml_model::q_network::{init_with_adam, QNetworkConfig};
use q_learning_racetrack::util::log::init_logging;

/// target simulation speed
const TICKS_PER_SECOND: u32 = 300;

fn main() -> Result<()> {
    init_logging();

    let field = Rc::new(load_road_field(&ROAD_IMAGE_PATH)?);
    let environment = RoadEnvironment::new(field);
    let model = init_with_adam::<RoadEnvironment, TrainingBackend>(&QNetworkConfig::new(6, 2), default_device())?;
    let presenter = ConsolePresenter::new(TICKS_PER_SECOND)?;

    let mut learner = SelfDrivingQLearner::new(environment, model, presenter, Parameter::default());
    let reports = learner.learn(DEFAULT_NUM_EPISODES)?;

    log::info!(
        "finished after {} episodes / {} steps; running reward: {:.1}, best episode: {:.1}",
        reports.len(),
        learner.step_count(),
        learner.running_reward().unwrap_or_default(),
        learner.best_episode_reward().unwrap_or_default()
    );
    Ok(())
}
