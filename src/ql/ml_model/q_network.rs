//! Q-value network and its online trainer.
//!
//! ```text
//! Input: [1, 6]  (sensor distances + normalized heading)
//!   ↓ Linear(6 → 128) + ReLU
//!   ↓ Linear(128 → 128) + ReLU
//!   ↓ Linear(128 → 2)
//! Output: [1, 2]  Q-values for steer-left / steer-right
//! ```

use std::marker::PhantomData;

use anyhow::Result;
use burn::module::{AutodiffModule, Module};
use burn::nn::loss::{MseLoss, Reduction};
use burn::nn::{Linear, LinearConfig};
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::activation::relu;
use burn::tensor::backend::{AutodiffBackend, Backend};
use burn::tensor::{ElementConversion, Tensor, TensorData};

use crate::ql::ml_model::model::{DeepQLearningModel, ToFeatureVector};
use crate::ql::prelude::{Action, Environment, QlError};

#[derive(Debug, Clone)]
pub struct QNetworkConfig {
    /// Length of the state feature vector
    pub input_len: usize,
    pub hidden_len: usize,
    /// Number of actions = number of Q-values produced
    pub action_space: usize,
    pub learning_rate: f64,
}

impl QNetworkConfig {
    pub fn new(
        input_len: usize,
        action_space: usize,
    ) -> Self {
        Self {
            input_len,
            hidden_len: 128,
            action_space,
            learning_rate: 0.001,
        }
    }

    pub fn init<B: Backend>(
        &self,
        device: &B::Device,
    ) -> QNetwork<B> {
        QNetwork {
            input: LinearConfig::new(self.input_len, self.hidden_len).init(device),
            hidden: LinearConfig::new(self.hidden_len, self.hidden_len).init(device),
            output: LinearConfig::new(self.hidden_len, self.action_space).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    input: Linear<B>,
    hidden: Linear<B>,
    output: Linear<B>,
}

impl<B: Backend> QNetwork<B> {
    /// `state` [batch, input_len] → Q-values [batch, action_space]
    pub fn forward(
        &self,
        state: Tensor<B, 2>,
    ) -> Tensor<B, 2> {
        let x = relu(self.input.forward(state));
        let x = relu(self.hidden.forward(x));
        self.output.forward(x)
    }
}

/// Online Q-learning model: one gradient step per transition, batch size 1.
///
/// Predictions run on the inner (non-autodiff) module, so neither action selection
/// nor the bootstrapped target take part in the gradient graph of [Self::train].
pub struct BurnQLearningModel<E, B, O>
where
    B: AutodiffBackend,
{
    network: QNetwork<B>,
    optimizer: O,
    learning_rate: f64,
    device: B::Device,
    _phantom: PhantomData<E>,
}

/// Creates a freshly initialized model, trained by Adam
pub fn init_with_adam<E, B>(
    config: &QNetworkConfig,
    device: B::Device,
) -> Result<BurnQLearningModel<E, B, impl Optimizer<QNetwork<B>, B>>>
where
    E: Environment,
    E::S: ToFeatureVector,
    B: AutodiffBackend,
{
    let optimizer = AdamConfig::new().init::<B, QNetwork<B>>();
    BurnQLearningModel::new(config, optimizer, device)
}

impl<E, B, O> BurnQLearningModel<E, B, O>
where
    E: Environment,
    E::S: ToFeatureVector,
    B: AutodiffBackend,
    O: Optimizer<QNetwork<B>, B>,
{
    /// Fails with [QlError::ModelShapeMismatch] when the network dimensions don't fit the environment
    pub fn new(
        config: &QNetworkConfig,
        optimizer: O,
        device: B::Device,
    ) -> Result<Self> {
        let feature_len = <E::S as ToFeatureVector>::FEATURE_LEN;
        if config.input_len != feature_len {
            return Err(QlError::ModelShapeMismatch { what: "input", expected: feature_len, actual: config.input_len }.into());
        }
        let action_space = <E::A as Action>::ACTION_SPACE as usize;
        if config.action_space != action_space {
            return Err(QlError::ModelShapeMismatch { what: "output", expected: action_space, actual: config.action_space }.into());
        }
        Ok(Self {
            network: config.init(&device),
            optimizer,
            learning_rate: config.learning_rate,
            device,
            _phantom: PhantomData,
        })
    }

    fn state_data(state: &E::S) -> TensorData {
        TensorData::new(state.to_feature_vector(), [1, <E::S as ToFeatureVector>::FEATURE_LEN])
    }
}

impl<E, B, O> DeepQLearningModel for BurnQLearningModel<E, B, O>
where
    E: Environment,
    E::S: ToFeatureVector,
    B: AutodiffBackend,
    O: Optimizer<QNetwork<B>, B>,
{
    type E = E;

    fn predict_q_values(
        &self,
        state: &E::S,
    ) -> Result<Vec<f32>> {
        let input = Tensor::<B::InnerBackend, 2>::from_data(Self::state_data(state), &self.device);
        let q_values = self.network.valid().forward(input);
        q_values
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| QlError::Tensor(format!("{:?}", e)).into())
    }

    fn train(
        &mut self,
        state: &E::S,
        action: E::A,
        updated_q_value: f32,
    ) -> Result<f32> {
        if !updated_q_value.is_finite() {
            return Err(QlError::NumericInstability { what: "updated q-value", value: updated_q_value }.into());
        }

        let input = Tensor::<B, 2>::from_data(Self::state_data(state), &self.device);
        let a = action.numeric() as usize;
        let q_action = self.network.forward(input).slice([0..1, a..a + 1]);
        let target = Tensor::<B, 2>::from_data(TensorData::new(vec![updated_q_value], [1, 1]), &self.device);

        let loss = MseLoss::new().forward(q_action, target, Reduction::Mean);
        let loss_value = loss.clone().into_scalar().elem::<f32>();
        if !loss_value.is_finite() {
            return Err(QlError::NumericInstability { what: "loss", value: loss_value }.into());
        }

        // gradients are built from scratch for every step; nothing accumulates
        let grads = GradientsParams::from_grads(loss.backward(), &self.network);
        self.network = self.optimizer.step(self.learning_rate, self.network.clone(), grads);

        Ok(loss_value)
    }
}
