//! Burn backends used for online training.
//!
//! The network is tiny (6→128→128→2) and trained with batch size 1, so the CPU
//! backend is all we need.

use burn::backend::ndarray::{NdArray, NdArrayDevice};
use burn::backend::Autodiff;

/// Autodiff-enabled CPU backend; the model is trained on this one
pub type TrainingBackend = Autodiff<NdArray<f32>>;

pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}
