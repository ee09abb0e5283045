use anyhow::Result;

use crate::ql::prelude::{Action, Environment, ModelActionType, QlError};

/// Produces the flat model input out of a state object.
pub trait ToFeatureVector {
    /// Number of features produced by [Self::to_feature_vector]
    const FEATURE_LEN: usize;

    fn to_feature_vector(&self) -> Vec<f32>;
}

/// 'Physical' AI model abstraction
pub trait DeepQLearningModel {
    type E: Environment;

    /// Q-values (estimated future reward) for each action, indexed by [Action::numeric].
    /// No gradients are tracked.
    fn predict_q_values(
        &self,
        state: &<Self::E as Environment>::S,
    ) -> Result<Vec<f32>>;

    /// Predicts the best action based on the current state (greedy)
    fn predict_action(
        &self,
        state: &<Self::E as Environment>::S,
    ) -> Result<<Self::E as Environment>::A> {
        let q_values = self.predict_q_values(state)?;
        let best = arg_max(&q_values).ok_or_else(|| QlError::Tensor("empty model output".to_string()))?;
        <<Self::E as Environment>::A as Action>::try_from_numeric(best as ModelActionType)
    }

    /// max(Q(state, ·)) - the bootstrapped future reward of a state.
    /// No gradients are tracked.
    fn predict_max_future_reward(
        &self,
        state: &<Self::E as Environment>::S,
    ) -> Result<f32> {
        let q_values = self.predict_q_values(state)?;
        q_values
            .into_iter()
            .reduce(f32::max)
            .ok_or_else(|| QlError::Tensor("empty model output".to_string()).into())
    }

    /// Performs a single training step on one transition.
    ///
    /// # Arguments
    /// * `state` the state the action was taken in
    /// * `action` the action taken
    /// * `updated_q_value` regression target for Q(state, action)
    ///
    /// # Returns
    ///   calculated loss
    fn train(
        &mut self,
        state: &<Self::E as Environment>::S,
        action: <Self::E as Environment>::A,
        updated_q_value: f32,
    ) -> Result<f32>;
}

/// Index of the first maximum
pub fn arg_max(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .reduce(|best, current| if current.1 > best.1 { current } else { best })
        .map(|(i, _)| i)
}
