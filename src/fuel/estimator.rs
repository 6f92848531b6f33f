use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::model::{FuelBreakdown, FuelModel};
use super::{fuel_per_100_pax_km, FuelError, FuelResult, Mission, FUEL_DENSITY_KG_PER_L};

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Stopping rule for the fixed-point iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorSettings {
    /// Stop once `|new - old| / new` falls below this. `None` runs exactly
    /// `max_iterations` steps.
    pub tolerance: Option<f64>,
    /// Safety cap on the number of iterations (≥ 1).
    pub max_iterations: usize,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            tolerance: Some(DEFAULT_TOLERANCE),
            max_iterations: 50,
        }
    }
}

impl EstimatorSettings {
    /// Run exactly `iterations` steps with no convergence test.
    pub fn fixed(iterations: usize) -> Self {
        Self {
            tolerance: None,
            max_iterations: iterations,
        }
    }

    fn validate(&self) -> FuelResult<()> {
        if self.max_iterations == 0 {
            return Err(FuelError::InvalidInput {
                field: "max_iterations",
                reason: "must be at least 1".into(),
            });
        }
        if let Some(tol) = self.tolerance {
            if !tol.is_finite() || tol <= 0.0 {
                return Err(FuelError::InvalidInput {
                    field: "tolerance",
                    reason: format!("{tol} must be a positive finite number"),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelEstimate {
    pub mission: Mission,
    /// Final fuel mass [kg].
    pub fuel_mass: f64,
    /// Fuel mass after each iteration [kg]; the last entry is `fuel_mass`.
    pub trajectory: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
    /// Per-phase split of the final estimate.
    pub breakdown: FuelBreakdown,
}

impl FuelEstimate {
    /// Fuel volume per 100 passenger-km [l] at the standard jet fuel density.
    pub fn fuel_per_100_pax_km(&self) -> f64 {
        self.fuel_per_100_pax_km_at(FUEL_DENSITY_KG_PER_L)
    }

    pub fn fuel_per_100_pax_km_at(&self, density: f64) -> f64 {
        fuel_per_100_pax_km(
            self.fuel_mass,
            self.mission.distance,
            self.mission.passengers,
            density,
        )
    }

    /// Take-off mass with the estimated fuel on board [kg].
    pub fn take_off_mass(&self) -> f64 {
        self.mission.total_mass(self.fuel_mass)
    }

    /// Change between consecutive iterates.
    pub fn increments(&self) -> Vec<f64> {
        self.trajectory.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

// ---------------------------------------------------------------------------
// Estimator
// ---------------------------------------------------------------------------

/// Solves `fuel = model(OEW + payload + fuel, distance)` by repeated
/// substitution, starting from an empty tank.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuelEstimator {
    pub model: FuelModel,
    pub settings: EstimatorSettings,
}

impl FuelEstimator {
    pub fn new(model: FuelModel, settings: EstimatorSettings) -> Self {
        Self { model, settings }
    }

    pub fn with_settings(settings: EstimatorSettings) -> Self {
        Self {
            model: FuelModel::default(),
            settings,
        }
    }

    pub fn estimate(&self, mission: &Mission) -> FuelResult<FuelEstimate> {
        self.settings.validate()?;

        let mut fuel_mass = 0.0_f64;
        let mut trajectory = Vec::with_capacity(self.settings.max_iterations);
        let mut converged = false;

        for iteration in 1..=self.settings.max_iterations {
            let total_mass = mission.total_mass(fuel_mass);
            let next = self.model.fuel_mass(total_mass, mission.distance);
            if !next.is_finite() {
                return Err(FuelError::Diverged { iteration });
            }

            let change = relative_change(fuel_mass, next);
            debug!("iteration {iteration}: total mass {total_mass:.2} kg, fuel {next:.2} kg (rel. change {change:.3e})");

            trajectory.push(next);
            fuel_mass = next;

            if let Some(tol) = self.settings.tolerance {
                if change < tol {
                    converged = true;
                    break;
                }
            }
        }

        if self.settings.tolerance.is_none() {
            // Fixed-count mode: judge the last step against the default tolerance.
            converged = trajectory
                .windows(2)
                .last()
                .is_some_and(|w| relative_change(w[0], w[1]) < DEFAULT_TOLERANCE);
        } else if !converged {
            warn!(
                "fuel estimate not converged after {} iterations ({:.2} kg)",
                self.settings.max_iterations, fuel_mass
            );
        }

        Ok(FuelEstimate {
            mission: *mission,
            fuel_mass,
            iterations: trajectory.len(),
            trajectory,
            converged,
            breakdown: self.model.breakdown(mission.total_mass(fuel_mass), mission.distance),
        })
    }
}

fn relative_change(old: f64, new: f64) -> f64 {
    if new == 0.0 {
        return if old == 0.0 { 0.0 } else { f64::INFINITY };
    }
    ((new - old) / new).abs()
}
