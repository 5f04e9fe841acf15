use serde::{Deserialize, Serialize};

use crate::error::FoldError;

/// The hyperparameters of a replica exchange run.
///
/// Temperatures are integer bounds; the run samples `replicas` distinct integer
/// temperatures from `[t_min, t_max]`, so the range must hold at least that many values.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SearchParams {
    /// Metropolis steps per replica per outer iteration (φ).
    pub phi: usize,
    /// Number of replicas (K).
    pub replicas: usize,
    /// Lower temperature bound, inclusive.
    pub t_min: u32,
    /// Upper temperature bound, inclusive.
    pub t_max: u32,
    /// Maximum number of outer iterations before the search gives up.
    pub max_iters: usize,
    /// Probability of proposing a pull move instead of a displacement move. Carried for
    /// the pull-move extension point; inert while no pull generator exists.
    pub rho: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            phi: 50,
            replicas: 5,
            t_min: 160,
            t_max: 220,
            max_iters: 100,
            rho: 0.0,
        }
    }
}

impl SearchParams {
    /// Check every bound before any work begins.
    ///
    /// # Errors
    /// [`FoldError::Hyperparameter`] naming the offending parameter.
    pub fn validate(&self) -> Result<(), FoldError> {
        if self.phi == 0 {
            return Err(FoldError::Hyperparameter(
                "phi must be at least 1".to_string(),
            ));
        }
        if self.replicas == 0 {
            return Err(FoldError::Hyperparameter(
                "at least one replica is needed".to_string(),
            ));
        }
        if self.t_min == 0 {
            return Err(FoldError::Hyperparameter(
                "temperatures must be positive".to_string(),
            ));
        }
        if self.t_min > self.t_max {
            return Err(FoldError::Hyperparameter(format!(
                "t_min ({}) must not exceed t_max ({})",
                self.t_min, self.t_max
            )));
        }
        let range = (self.t_max - self.t_min + 1) as usize;
        if self.replicas > range {
            return Err(FoldError::Hyperparameter(format!(
                "cannot sample {} distinct temperatures from [{}, {}]",
                self.replicas, self.t_min, self.t_max
            )));
        }
        if self.max_iters == 0 {
            return Err(FoldError::Hyperparameter(
                "max_iters must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.rho) {
            return Err(FoldError::Hyperparameter(format!(
                "rho ({}) must lie in [0, 1]",
                self.rho
            )));
        }
        Ok(())
    }
}
