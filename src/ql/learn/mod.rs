pub mod epsilon;
pub mod pacing;
pub mod self_driving_q_learner;
