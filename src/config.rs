/*
 * Simulation Configuration Module
 *
 * This module defines the SimConfig struct that contains all the
 * parameters for a crowd flow run: population size, area bounds, the
 * three interaction radii and weights, and the kinematic limits.
 * Malformed configurations are rejected at construction rather than
 * silently clamped.
 */

use thiserror::Error;

/// Errors raised when validating a simulation configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("population size must be at least 1")]
    ZeroPopulation,
    #[error("area dimensions must be positive and finite, got {width}x{height}")]
    InvalidArea { width: f32, height: f32 },
    #[error("{name} must be non-negative and finite, got {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}

// Parameters for the simulation, fixed for the duration of a run
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub num_agents: usize,
    pub width: f32,
    pub height: f32,
    pub separation_radius: f32,
    pub alignment_radius: f32,
    pub cohesion_radius: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub max_speed: f32,
    pub max_force: f32,
    /// Seed for the run's random stream; equal seeds give equal runs.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_agents: 100,
            width: 800.0,
            height: 600.0,
            separation_radius: 25.0,
            alignment_radius: 50.0,
            cohesion_radius: 100.0,
            separation_weight: 1.0,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            max_speed: 2.0,
            max_force: 0.05,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Check every parameter before a simulation is built from this config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_agents == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if !(self.width > 0.0 && self.width.is_finite())
            || !(self.height > 0.0 && self.height.is_finite())
        {
            return Err(ConfigError::InvalidArea {
                width: self.width,
                height: self.height,
            });
        }
        let non_negative = [
            ("separation_radius", self.separation_radius),
            ("alignment_radius", self.alignment_radius),
            ("cohesion_radius", self.cohesion_radius),
            ("separation_weight", self.separation_weight),
            ("alignment_weight", self.alignment_weight),
            ("cohesion_weight", self.cohesion_weight),
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
        ];
        for (name, value) in non_negative {
            // The negated form also rejects NaN.
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}
