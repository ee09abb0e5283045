use std::collections::VecDeque;

use anyhow::Result;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;

use crate::ql::learn::epsilon::EpsilonSchedule;
use crate::ql::ml_model::model::DeepQLearningModel;
use crate::ql::prelude::{Action, DebugVisualizer, Environment, Presenter};
use crate::util::format;
use crate::util::immutable::Immutable;

pub const DEFAULT_NUM_EPISODES: usize = 1000;

pub struct Parameter {
    /// Discount rate; (0 <= 𝛾 <= 1) represents the value of future rewards. The bigger, the more farsighted the agent becomes
    pub gamma: f32,
    /// Exploration rate decay over all steps of the run
    pub epsilon: EpsilonSchedule,
    /// Truncates an episode after that many steps (not counted as a terminal step)
    pub max_steps_per_episode: usize,
    /// Number of recent episodes the running reward is averaged over
    pub episode_reward_history_len: usize,
    /// Log learning statistics every n episodes
    pub stats_after_episodes: usize,
    /// Seed for the exploration randomness; `None` = seeded from entropy
    pub rng_seed: Option<u64>,
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            gamma: 0.99,
            epsilon: EpsilonSchedule::default(),
            max_steps_per_episode: usize::MAX,
            episode_reward_history_len: 100,
            stats_after_episodes: 50,
            rng_seed: None,
        }
    }
}

/// Summary of a finished (or interrupted) episode
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeReport {
    pub episode: usize,
    pub total_reward: f32,
    pub steps: usize,
    /// 𝜀 used for the last step
    pub epsilon: f64,
    pub mean_loss: f32,
    /// interrupted by a stop request
    pub stopped: bool,
}

/// Online Q-learner which drives its environment step by step.
///
/// Per step:
///   - pick an action 𝜀-greedy (random with probability 𝜀, otherwise the model's best guess)
///   - apply it to the environment and collect the reward
///   - updated Q-value = reward + 𝛾 * max Q(next state) - predicted without gradient tracking
///   - one training step of the model towards the updated Q-value of the action taken
///
/// There is no replay buffer and no separate target model: every transition is learned once, right away.
pub struct SelfDrivingQLearner<E, M, P>
where
    E: Environment,
    M: DeepQLearningModel<E = E>,
    P: Presenter<E>,
{
    environment: E,
    model: M,
    presenter: P,
    param: Immutable<Parameter>,
    rng: StdRng,
    /// steps over all episodes; drives the 𝜀 decay
    step_count: usize,
    episode_count: usize,
    episode_rewards: VecDeque<f32>,
    best_episode_reward: Option<f32>,
    /// since the last stats log
    action_counts: FxHashMap<E::A, usize>,
    stopped: bool,
}

impl<E, M, P> SelfDrivingQLearner<E, M, P>
where
    E: Environment,
    M: DeepQLearningModel<E = E>,
    P: Presenter<E>,
{
    pub fn new(
        environment: E,
        model: M,
        presenter: P,
        param: Parameter,
    ) -> Self {
        let rng = match param.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            environment,
            model,
            presenter,
            episode_rewards: VecDeque::with_capacity(param.episode_reward_history_len),
            param: Immutable::new(param),
            rng,
            step_count: 0,
            episode_count: 0,
            best_episode_reward: None,
            action_counts: FxHashMap::default(),
            stopped: false,
        }
    }

    pub fn environment(&self) -> &E { &self.environment }

    pub fn model(&self) -> &M { &self.model }

    pub fn step_count(&self) -> usize { self.step_count }

    pub fn episode_count(&self) -> usize { self.episode_count }

    /// Once set, no further steps are taken
    pub fn stopped(&self) -> bool { self.stopped }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 { self.param.epsilon.epsilon(self.step_count) }

    /// Average reward of the recent episodes
    pub fn running_reward(&self) -> Option<f32> {
        if self.episode_rewards.is_empty() {
            None
        } else {
            Some(self.episode_rewards.iter().sum::<f32>() / self.episode_rewards.len() as f32)
        }
    }

    pub fn best_episode_reward(&self) -> Option<f32> { self.best_episode_reward }

    /// Runs `num_episodes` episodes - or less, if a stop is requested in between.
    pub fn learn(
        &mut self,
        num_episodes: usize,
    ) -> Result<Vec<EpisodeReport>> {
        let mut reports = Vec::new();
        for _ in 0..num_episodes {
            // a stop may also arrive while waiting for the final tick of the previous episode
            if self.stopped || self.presenter.stop_requested() {
                self.stopped = true;
                break;
            }
            let report = self.learn_episode()?;
            let stopped = report.stopped;
            reports.push(report);
            if stopped {
                break;
            }
        }
        if self.stopped {
            log::info!("stop requested - finishing after {} episodes", self.episode_count);
        }
        Ok(reports)
    }

    pub fn learn_episode(&mut self) -> Result<EpisodeReport> {
        self.environment.reset();
        let mut state = self.environment.state().clone();
        log::trace!("started learning episode {}", self.episode_count);

        let mut total_reward: f32 = 0.0;
        let mut loss_sum: f32 = 0.0;
        let mut steps: usize = 0;
        let mut epsilon = self.epsilon();
        let mut done = self.environment.is_done();

        while !done && steps < self.param.max_steps_per_episode {
            if self.stopped || self.presenter.stop_requested() {
                self.stopped = true;
                break;
            }

            epsilon = self.epsilon();
            let action = self.select_action(&state, epsilon)?;
            self.step_count += 1;
            steps += 1;
            *self.action_counts.entry(action).or_insert(0) += 1;

            log::trace!("{}", state.one_line_info());
            let (next_state, reward, step_done) = {
                let (s, r, d) = self.environment.step(action);
                (s.clone(), r, d)
            };
            log::trace!("step with action {} resulted in reward: {:.2}, done: {}", action, reward, step_done);
            total_reward += reward;

            // Q value = reward + discount factor * expected future reward
            let updated_q_value = reward + self.param.gamma * self.model.predict_max_future_reward(&next_state)?;
            loss_sum += self.model.train(&state, action, updated_q_value)?;

            state = next_state;
            done = step_done;

            self.presenter.present(&self.environment)?;
            self.presenter.wait_tick();
        }

        let report = EpisodeReport {
            episode: self.episode_count,
            total_reward,
            steps,
            epsilon,
            mean_loss: if steps > 0 { loss_sum / steps as f32 } else { 0.0 },
            stopped: self.stopped,
        };
        log::info!("Episode: {}, Total Reward: {}", report.episode, report.total_reward);

        if !self.stopped {
            self.record_episode_reward(total_reward);
        }
        self.episode_count += 1;

        if self.param.stats_after_episodes > 0 && self.episode_count % self.param.stats_after_episodes == 0 {
            self.learning_update_log(&report);
        }

        Ok(report)
    }

    /// 𝜀-greedy
    fn select_action(
        &mut self,
        state: &E::S,
        epsilon: f64,
    ) -> Result<E::A> {
        if self.rng.gen::<f64>() < epsilon {
            let a = self.rng.gen_range(0..<E::A as Action>::ACTION_SPACE);
            <E::A as Action>::try_from_numeric(a)
        } else {
            self.model.predict_action(state)
        }
    }

    fn record_episode_reward(
        &mut self,
        episode_reward: f32,
    ) {
        if self.episode_rewards.len() >= self.param.episode_reward_history_len {
            self.episode_rewards.pop_front();
        }
        self.episode_rewards.push_back(episode_reward);
        self.best_episode_reward = Some(match self.best_episode_reward {
            Some(best) => best.max(episode_reward),
            None => episode_reward,
        });
    }

    fn learning_update_log(
        &mut self,
        last: &EpisodeReport,
    ) {
        let total_actions: usize = self.action_counts.values().sum();
        let action_distribution_line = self
            .action_counts
            .iter()
            .sorted_by_key(|(action, _)| action.numeric())
            .map(|(action, &count)| format!("{} {}", action, format::percentage(count, total_actions)))
            .join(", ");

        log::info!(
            "\n\
    episode: {}, steps: {}, 𝛾={:.2}, 𝜀={:.3}, rewards: {{running: {:.1}, best: {:.1}}}, last episode loss: {:.3}\n\
    action_distribution (of last {}): {}",
            format::counter(self.episode_count),
            format::counter(self.step_count),
            self.param.gamma,
            self.epsilon(),
            self.running_reward().unwrap_or_default(),
            self.best_episode_reward.unwrap_or_default(),
            last.mean_loss,
            format::counter(total_actions),
            action_distribution_line
        );
        self.action_counts.clear();
    }
}
