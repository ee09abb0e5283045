use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use q_learning_racetrack::environment::road::assets::{load_road_field, ROAD_IMAGE_PATH};
use q_learning_racetrack::environment::road_environment::{RoadEnvironment, COLLISION_REWARD, SURVIVAL_REWARD};
use q_learning_racetrack::ql::learn::pacing::{HeadlessPresenter, StopSignal, TickPacer};
use q_learning_racetrack::ql::learn::self_driving_q_learner::{EpisodeReport, Parameter, SelfDrivingQLearner};
use q_learning_racetrack::ql::ml_model::backend::{default_device, TrainingBackend};
use q_learning_racetrack::ql::ml_model::q_network::{init_with_adam, QNetworkConfig};
use q_learning_racetrack::ql::prelude::Environment;

mod common;

fn learn(
    environment: RoadEnvironment,
    param: Parameter,
    episodes: usize,
) -> Result<Vec<EpisodeReport>> {
    let model = init_with_adam::<RoadEnvironment, TrainingBackend>(&QNetworkConfig::new(6, 2), default_device())?;
    let mut learner = SelfDrivingQLearner::new(environment, model, HeadlessPresenter::unpaced(), param);
    learner.learn(episodes)
}

/// The total reward of an episode follows from its length and the way it ended
fn assert_reward_consistent(report: &EpisodeReport) {
    let steps = report.steps as f32;
    let crashed = (steps - 1.0) * SURVIVAL_REWARD + COLLISION_REWARD;
    let survived = steps * SURVIVAL_REWARD;
    assert!(
        report.total_reward == crashed || report.total_reward == survived,
        "unexpected reward in {:?}",
        report
    );
}

#[test]
fn test_single_drivable_pixel_crashes_on_first_step() -> Result<()> {
    let reports = learn(common::start_pixel_only_environment(), common::seeded_param(1), 3)?;

    assert_eq!(reports.len(), 3);
    for (i, report) in reports.iter().enumerate() {
        assert_eq!(report.episode, i);
        assert_eq!(report.steps, 1);
        assert_eq!(report.total_reward, COLLISION_REWARD);
        assert!(report.mean_loss.is_finite());
        assert!(!report.stopped);
    }
    Ok(())
}

#[test]
fn test_enclosed_box_episodes_end_in_a_crash() -> Result<()> {
    // the 61px box is narrower than the turning circle (5° per 3px step, ~69px across),
    // so every episode has to end in the wall - no step cap needed
    let reports = learn(common::enclosed_box_environment(30), common::seeded_param(3), 20)?;

    assert_eq!(reports.len(), 20);
    for report in &reports {
        assert!(report.steps >= 1);
        assert_eq!(
            report.total_reward,
            (report.steps - 1) as f32 * SURVIVAL_REWARD + COLLISION_REWARD,
            "episode did not end in a crash: {:?}",
            report
        );
        assert!((0.05..=0.9).contains(&report.epsilon), "{:?}", report);
    }
    // 𝜀 decays across episode borders
    assert!(reports[19].epsilon < reports[0].epsilon);
    Ok(())
}

#[test]
fn test_truncated_episode_keeps_survival_rewards() -> Result<()> {
    let param = Parameter {
        max_steps_per_episode: 5,
        ..common::greedy_param(5)
    };
    let reports = learn(common::enclosed_box_environment(100), param, 2)?;
    for report in &reports {
        // 5 steps at speed 3 can't leave a box of 100px margin
        assert_eq!(report.steps, 5);
        assert_eq!(report.total_reward, 5.0 * SURVIVAL_REWARD);
    }
    Ok(())
}

#[test]
fn test_stop_signal_interrupts_learning() -> Result<()> {
    let signal = StopSignal::default();
    let presenter = HeadlessPresenter::new(TickPacer::new(200), signal.clone());
    let model = init_with_adam::<RoadEnvironment, TrainingBackend>(&QNetworkConfig::new(6, 2), default_device())?;
    let mut learner = SelfDrivingQLearner::new(common::enclosed_box_environment(60), model, presenter, common::seeded_param(11));

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        signal.request_stop();
    });
    let reports = learner.learn(10_000)?;
    stopper.join().expect("stopper thread");

    assert!(!reports.is_empty() && reports.len() < 10_000);
    assert!(learner.stopped());
    // only an episode running at the time of the stop is marked as interrupted
    assert!(reports.iter().rev().skip(1).all(|r| !r.stopped));
    assert!(reports.iter().all(|r| r.stopped || r.steps > 0));

    // no further steps once stopped
    let steps_before = learner.step_count();
    let report = learner.learn_episode()?;
    assert!(report.stopped);
    assert_eq!(report.steps, 0);
    assert_eq!(learner.step_count(), steps_before);
    Ok(())
}

#[test]
fn test_learn_on_bundled_road() -> Result<()> {
    let field = Rc::new(load_road_field(&ROAD_IMAGE_PATH)?);
    let environment = RoadEnvironment::new(field);
    assert!(!environment.is_done());

    let param = Parameter {
        max_steps_per_episode: 300,
        ..common::seeded_param(42)
    };
    let reports = learn(environment, param, 3)?;

    assert_eq!(reports.len(), 3);
    for report in &reports {
        assert_reward_consistent(report);
        assert!(report.mean_loss.is_finite());
    }
    Ok(())
}
