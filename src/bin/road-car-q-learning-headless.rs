use std::rc::Rc;

use anyhow::Result;
use clap::Parser;
use q_learning_racetrack::environment::road::assets::{load_road_field, ROAD_IMAGE_PATH};
use q_learning_racetrack::environment::road_environment::RoadEnvironment;
use q_learning_racetrack::ql::learn::pacing::HeadlessPresenter;
use q_learning_racetrack::ql::learn::self_driving_q_learner::{Parameter, SelfDrivingQLearner, DEFAULT_NUM_EPISODES};
use q_learning_racetrack::ql::ml_model::backend::{default_device, TrainingBackend};
use q_learning_racetrack::ql::ml_model::q_network::{init_with_adam, QNetworkConfig};
use q_learning_racetrack::util::log::init_logging;

/// Trains the car without any drawing and without pacing
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of episodes to run
    #[arg(default_value_t = DEFAULT_NUM_EPISODES)]
    episodes: usize,

    /// Seed for the exploration randomness
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let field = Rc::new(load_road_field(&ROAD_IMAGE_PATH)?);
    let environment = RoadEnvironment::new(field);
    let model = init_with_adam::<RoadEnvironment, TrainingBackend>(&QNetworkConfig::new(6, 2), default_device())?;

    let param = Parameter {
        rng_seed: args.seed,
        ..Parameter::default()
    };
    let mut learner = SelfDrivingQLearner::new(environment, model, HeadlessPresenter::unpaced(), param);
    let reports = learner.learn(args.episodes)?;

    log::info!(
        "finished after {} episodes / {} steps; running reward: {:.1}, best episode: {:.1}",
        reports.len(),
        learner.step_count(),
        learner.running_reward().unwrap_or_default(),
        learner.best_episode_reward().unwrap_or_default()
    );
    Ok(())
}
