use super::traits::ConfigSection;
use crate::error::SignalGpError;
use serde::{Deserialize, Serialize};

/// Constants of the three-tier fitness policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    /// Losing candidates score exactly `-failure_floor`
    pub failure_floor: f64,
    /// Total return a candidate must reach before drawdown-penalized scoring applies
    pub min_return: f64,
    pub drawdown_penalty: f64,
    /// Slope of the sub-threshold gradient
    pub sub_threshold_scale: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            failure_floor: 1e9,
            min_return: 0.30,
            drawdown_penalty: 0.3,
            sub_threshold_scale: 1.0,
        }
    }
}

impl FitnessConfig {
    /// Lowest score the sub-threshold tier can produce (at zero return)
    pub fn sub_threshold_minimum(&self) -> f64 {
        -self.sub_threshold_scale * self.min_return - self.drawdown_penalty
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), SignalGpError> {
        if !(self.failure_floor.is_finite() && self.failure_floor > 0.0) {
            return Err(SignalGpError::Configuration(
                "failure_floor must be a positive finite number".to_string(),
            ));
        }
        if !(self.min_return.is_finite() && self.min_return >= 0.0) {
            return Err(SignalGpError::Configuration(
                "min_return must be finite and non-negative".to_string(),
            ));
        }
        if !(self.drawdown_penalty.is_finite() && self.drawdown_penalty >= 0.0) {
            return Err(SignalGpError::Configuration(
                "drawdown_penalty must be finite and non-negative".to_string(),
            ));
        }
        if !(self.sub_threshold_scale.is_finite() && self.sub_threshold_scale > 0.0) {
            return Err(SignalGpError::Configuration(
                "sub_threshold_scale must be a positive finite number".to_string(),
            ));
        }
        if self.sub_threshold_minimum() <= -self.failure_floor {
            return Err(SignalGpError::Configuration(format!(
                "sub-threshold scores reach {} which is not above the failure floor -{}",
                self.sub_threshold_minimum(),
                self.failure_floor
            )));
        }
        Ok(())
    }
}

/// Mapping from raw tree output to a 0/1 position
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Go long when the squashed score is strictly above this value
    pub cutoff: f64,
    /// Raw scores are clipped to [-clip_bound, clip_bound] before squashing
    pub clip_bound: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            cutoff: 0.55,
            clip_bound: 10.0,
        }
    }
}

impl ConfigSection for SignalConfig {
    fn section_name() -> &'static str {
        "signal"
    }

    fn validate(&self) -> Result<(), SignalGpError> {
        if !(self.cutoff > 0.0 && self.cutoff < 1.0) {
            return Err(SignalGpError::Configuration(format!(
                "Signal cutoff must be strictly between 0 and 1, got {}",
                self.cutoff
            )));
        }
        if !(self.clip_bound.is_finite() && self.clip_bound > 0.0) {
            return Err(SignalGpError::Configuration(
                "clip_bound must be a positive finite number".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EarlyStoppingConfig {
    pub enabled: bool,
    /// Cumulative validation return that ends the search
    pub validation_target: f64,
}

impl Default for EarlyStoppingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            validation_target: 0.80,
        }
    }
}

impl ConfigSection for EarlyStoppingConfig {
    fn section_name() -> &'static str {
        "early_stopping"
    }

    fn validate(&self) -> Result<(), SignalGpError> {
        if !self.validation_target.is_finite() {
            return Err(SignalGpError::Configuration(
                "validation_target must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
