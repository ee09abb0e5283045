use std::fmt::Display;
use std::hash::Hash;
use std::path::PathBuf;

use anyhow::Result;
use console_engine::screen::Screen;
use thiserror::Error;

/// Data type we use to encode an `Action` to feed the model.
pub type ModelActionType = u8;

pub trait Action: Display + Sized + Clone + Copy + Hash + PartialEq + Eq {
    /// Number of possible actions
    const ACTION_SPACE: ModelActionType;
    /// Identifying the Action as a unique value in range (0..Self::ACTION_SPACE)
    fn numeric(&self) -> ModelActionType;
    fn try_from_numeric(value: ModelActionType) -> Result<Self>;
}

/// Learning environment, modeling the world of a learning agent
pub trait Environment {
    /// State representation - covering all needs of the model
    type S: Clone + DebugVisualizer;
    type A: Action;

    /// Resets the environment to a defined starting point
    fn reset(&mut self);

    /// Current state
    fn state(&self) -> &Self::S;

    /// Whether the current situation already is a terminal one (e.g. game over)
    fn is_done(&self) -> bool;

    /// Performs one time/action-step.
    ///
    /// Applies the given `action` to the environment and returns:
    ///   - next state
    ///   - immediate reward earned during performing that step
    ///   - done flag (e.g. game ended)
    ///
    fn step(
        &mut self,
        action: Self::A,
    ) -> (&Self::S, f32, bool);
}

pub trait DebugVisualizer {
    fn one_line_info(&self) -> String;
    fn render_to_console(&self) -> Screen;
}

/// Outer surface of the learning loop: drawing, tick pacing and the stop signal.
///
/// Called synchronously once per step by the learner.
pub trait Presenter<E: Environment> {
    /// Draws the current situation of the environment and presents the frame
    fn present(
        &mut self,
        environment: &E,
    ) -> Result<()>;

    /// Blocks until the next step is due
    fn wait_tick(&mut self);

    /// Polled at least once per step. Once it returned `true`, learning stops.
    fn stop_requested(&mut self) -> bool;
}

#[derive(Debug, Error)]
pub enum QlError {
    #[error("failed to load asset '{}': {reason}", path.display())]
    AssetLoadFailure { path: PathBuf, reason: String },
    #[error("collision field needs dimensions {expected:?}, but the image has {actual:?}")]
    FieldDimensionMismatch { expected: (u32, u32), actual: (u32, u32) },
    #[error("model {what} has size {actual}, but the environment needs {expected}")]
    ModelShapeMismatch { what: &'static str, expected: usize, actual: usize },
    #[error("numeric instability during training: {what} = {value}")]
    NumericInstability { what: &'static str, value: f32 },
    #[error("action value {0} out of range")]
    InvalidAction(ModelActionType),
    #[error("tensor data not readable: {0}")]
    Tensor(String),
}
