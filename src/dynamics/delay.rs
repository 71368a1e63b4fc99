//! First-order exponential delay
//!
//! Models inertia in decisions: the output moves a fraction `dt / tc` of the
//! remaining gap toward the input each step.

use serde::{Deserialize, Serialize};

use crate::core::error::{InsurgencyError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExponentialDelay {
    output: f64,
    time_constant: f64,
}

impl ExponentialDelay {
    pub fn new(initial_value: f64, time_constant: f64) -> Result<Self> {
        validate_time_constant("time_constant", time_constant)?;
        if !initial_value.is_finite() {
            return Err(InsurgencyError::invalid_parameter(
                "initial_value",
                format!("must be finite, got {}", initial_value),
            ));
        }

        Ok(Self {
            output: initial_value,
            time_constant,
        })
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn time_constant(&self) -> f64 {
        self.time_constant
    }

    /// Advance one step toward `input` and return the new output
    pub fn update(&mut self, input: f64, dt: f64) -> f64 {
        self.update_with(input, dt, self.time_constant)
    }

    /// Advance one step using a time constant other than the configured one
    ///
    /// Callers must pass a validated positive `time_constant`.
    pub fn update_with(&mut self, input: f64, dt: f64, time_constant: f64) -> f64 {
        self.output += dt / time_constant * (input - self.output);
        self.output
    }

    /// Reseed the cell, e.g. before reusing it in another run
    pub fn reset(&mut self, value: f64) {
        self.output = value;
    }
}

/// Shared check for every time constant in the model
pub fn validate_time_constant(name: &str, time_constant: f64) -> Result<()> {
    if !time_constant.is_finite() || time_constant <= 0.0 {
        return Err(InsurgencyError::invalid_parameter(
            name,
            format!("time constant must be > 0, got {}", time_constant),
        ));
    }
    Ok(())
}
