/// Fuel layer: mission inputs, the power-law fuel model and the
/// fixed-point estimator that couples them.
///
/// ```text
///   Mission (OEW, pax, kg/pax, km)
///        │
///        ▼
///   ┌────────────┐   total mass = OEW + payload + fuel
///   │ estimator  │ ◄──────────────────────────────┐
///   └────────────┘                                │
///        │                                        │
///        ▼                                        │
///   ┌────────────┐   cruise + TO/LDG + CLB/DSC    │
///   │   model    │   + reserve  ──────────────────┘
///   └────────────┘
/// ```

pub mod estimator;
pub mod model;

use thiserror::Error;

pub use estimator::{EstimatorSettings, FuelEstimate, FuelEstimator};
pub use model::{FuelBreakdown, FuelModel};

/// Density of jet fuel used for volume reporting [kg/l].
pub const FUEL_DENSITY_KG_PER_L: f64 = 0.8;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FuelError {
    #[error("Invalid mission input '{field}': {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Fuel estimate diverged at iteration {iteration}")]
    Diverged { iteration: usize },
}

pub type FuelResult<T> = Result<T, FuelError>;

// ---------------------------------------------------------------------------
// Mission – validated estimator input
// ---------------------------------------------------------------------------

/// A single mission: aircraft empty weight, cabin load and stage length.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Mission {
    /// Operating empty weight [kg].
    pub operating_empty_weight: f64,
    /// Number of passengers on board.
    pub passengers: u32,
    /// Mass per passenger including baggage [kg].
    pub mass_per_passenger: f64,
    /// Mission distance [km].
    pub distance: f64,
}

impl Mission {
    /// Validate and build a mission. Every quantity must be finite and
    /// strictly positive.
    pub fn new(
        operating_empty_weight: f64,
        passengers: u32,
        mass_per_passenger: f64,
        distance: f64,
    ) -> FuelResult<Self> {
        positive("operating_empty_weight", operating_empty_weight)?;
        if passengers == 0 {
            return Err(FuelError::InvalidInput {
                field: "passengers",
                reason: "must be at least 1".into(),
            });
        }
        positive("mass_per_passenger", mass_per_passenger)?;
        positive("distance", distance)?;

        Ok(Self {
            operating_empty_weight,
            passengers,
            mass_per_passenger,
            distance,
        })
    }

    /// Passenger payload [kg].
    pub fn payload(&self) -> f64 {
        f64::from(self.passengers) * self.mass_per_passenger
    }

    /// Take-off mass for a given fuel load [kg].
    pub fn total_mass(&self, fuel_mass: f64) -> f64 {
        self.operating_empty_weight + self.payload() + fuel_mass
    }
}

fn positive(field: &'static str, value: f64) -> FuelResult<()> {
    if !value.is_finite() {
        return Err(FuelError::InvalidInput {
            field,
            reason: format!("{value} is not a finite number"),
        });
    }
    if value <= 0.0 {
        return Err(FuelError::InvalidInput {
            field,
            reason: format!("{value} must be greater than zero"),
        });
    }
    Ok(())
}

/// Fuel volume per 100 passenger-km [l], at the given density.
pub fn fuel_per_100_pax_km(fuel_mass: f64, distance: f64, passengers: u32, density: f64) -> f64 {
    let volume = fuel_mass / density;
    volume / (distance * f64::from(passengers)) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_passengers() {
        let err = Mission::new(55_912.87, 0, 110.0, 6654.0).unwrap_err();
        assert!(matches!(
            err,
            FuelError::InvalidInput {
                field: "passengers",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_positive_distance() {
        for d in [0.0, -1.0, f64::NAN] {
            let err = Mission::new(55_912.87, 177, 110.0, d).unwrap_err();
            assert!(
                matches!(err, FuelError::InvalidInput { field: "distance", .. }),
                "distance {d} accepted"
            );
        }
    }

    #[test]
    fn rejects_non_positive_weights() {
        assert!(Mission::new(0.0, 177, 110.0, 6654.0).is_err());
        assert!(Mission::new(55_912.87, 177, -110.0, 6654.0).is_err());
        assert!(Mission::new(f64::INFINITY, 177, 110.0, 6654.0).is_err());
    }

    #[test]
    fn payload_and_total_mass() {
        let m = Mission::new(50_000.0, 100, 100.0, 1000.0).unwrap();
        assert_eq!(m.payload(), 10_000.0);
        assert_eq!(m.total_mass(2_500.0), 62_500.0);
    }

    #[test]
    fn error_message_names_field() {
        let err = Mission::new(55_912.87, 177, 110.0, -5.0).unwrap_err();
        assert!(err.to_string().contains("distance"));
    }

    #[test]
    fn fuel_volume_per_100_pkm() {
        // 8000 kg = 10 000 l over 1000 km × 100 pax → 10 l/100 pkm
        let v = fuel_per_100_pax_km(8000.0, 1000.0, 100, FUEL_DENSITY_KG_PER_L);
        assert!((v - 10.0).abs() < 1e-12);
    }
}
