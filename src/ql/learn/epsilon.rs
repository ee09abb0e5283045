/// Exploration rate, decaying exponentially with the number of steps taken so far:
///
/// 𝜀(steps) = end + (start - end) * e^(-steps / decay)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpsilonSchedule {
    /// 𝜀 at step 0
    pub start: f64,
    /// lower bound 𝜀 approaches
    pub end: f64,
    /// number of steps after which (start - end) has shrunk by 1/e
    pub decay: f64,
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self {
            start: 0.9,
            end: 0.05,
            decay: 200.0,
        }
    }
}

impl EpsilonSchedule {
    pub fn epsilon(
        &self,
        steps_done: usize,
    ) -> f64 {
        self.end + (self.start - self.end) * (-(steps_done as f64) / self.decay).exp()
    }
}
